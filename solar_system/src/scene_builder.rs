//! Scene construction
//!
//! Runs once at startup: uploads the three kinds of geometry, creates one
//! material per texture and lays out the sun, the eight planets along +X,
//! their orbit rings and the accessory ring.

use orrery_engine::foundation::math::{constants, Vec3};
use orrery_engine::render::{Camera, GraphicsEngine, Material, Mesh, PointLight, Scene, SceneNode, ZoomControls};
use orrery_engine::AppError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bodies::{self, AccessoryRing, CelestialBody, OrbitRing, Sun, PLANET_COUNT, RING_BODY_INDEX};
use crate::config::SolarSystemConfig;
use crate::world::{AnimationRates, SolarSystem};

const SUN_RADIUS: f32 = 6.0;
const PLANET_RADIUS: f32 = 2.0;
const SPHERE_SEGMENTS: u32 = 50;
const ORBIT_RING_HALF_WIDTH: f32 = 0.01;
const ORBIT_RING_SEGMENTS: u32 = 320;
const ACCESSORY_RING_RADIUS: f32 = 3.0;
const ACCESSORY_RING_TUBE: f32 = 0.2;
const ACCESSORY_RING_SEGMENTS: u32 = 480;
const ACCESSORY_RING_COLOR: u32 = 0x00c2_b280;
const LIGHT_RANGE: f32 = 500.0;

/// Random source for orbit speeds: seeded when a seed is given, OS entropy otherwise
pub fn orbit_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            log::info!("Orbit speeds seeded with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

/// Builds a [`SolarSystem`] from configuration
pub struct SceneBuilder<'a> {
    config: &'a SolarSystemConfig,
}

impl<'a> SceneBuilder<'a> {
    /// Builder for `config`
    pub fn new(config: &'a SolarSystemConfig) -> Self {
        Self { config }
    }

    /// Upload geometry and materials and lay out the world
    ///
    /// `aspect` is the viewport's width over height. Missing textures are
    /// not errors; the backend substitutes plain white.
    pub fn build<R: Rng + ?Sized>(
        &self,
        graphics: &mut GraphicsEngine,
        rng: &mut R,
        aspect: f32,
    ) -> Result<SolarSystem, AppError> {
        self.config
            .validate()
            .map_err(|e| AppError::Custom(format!("invalid configuration: {}", e)))?;

        let config = self.config;
        let orbits = &config.orbits;
        let camera_settings = &config.camera;

        let mut camera = Camera::perspective(
            camera_settings.position(),
            camera_settings.fov_degrees,
            aspect,
            camera_settings.near,
            camera_settings.far,
        );
        camera.look_at(Vec3::zeros(), Vec3::y());
        let zoom = ZoomControls::new(camera_settings.min_distance, camera_settings.max_distance);

        let mut scene = Scene::new();
        scene.add_light(PointLight::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0), 1.0, LIGHT_RANGE));

        let sun_mesh = graphics.upload_mesh(&Mesh::sphere(SUN_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS))?;
        let sun_material = graphics.create_material(&Material::emissive([1.0; 3]).with_texture(config.sun_texture()))?;
        let sun = Sun {
            node: scene.add(SceneNode::new(sun_mesh, sun_material)),
            rotation_step: orbits.sun_rotation_step,
        };

        let planet_mesh = graphics.upload_mesh(&Mesh::sphere(PLANET_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS))?;
        let ring_material = graphics.create_material(&Material::unlit().with_hex_color(0x00ff_ffff).double_sided())?;
        let ring_rotation = Vec3::new(constants::HALF_PI, 0.0, 0.0);

        let mut bodies = Vec::with_capacity(PLANET_COUNT);
        let mut orbit_rings = Vec::with_capacity(PLANET_COUNT);
        for index in 0..PLANET_COUNT {
            let radius = bodies::base_radius(index, orbits.base_radius, orbits.spacing);
            let speed = rng.gen_range(orbits.min_speed..orbits.max_speed);

            let material = graphics.create_material(&Material::unlit().with_texture(config.planet_texture(index)))?;
            let node =
                scene.add(SceneNode::new(planet_mesh, material).with_position(Vec3::new(radius, 0.0, 0.0)));
            bodies.push(CelestialBody {
                node,
                index,
                base_radius: radius,
                speed,
                rotation_step: orbits.planet_rotation_step,
            });

            let ring_mesh = graphics.upload_mesh(&Mesh::ring(
                radius + ORBIT_RING_HALF_WIDTH,
                radius - ORBIT_RING_HALF_WIDTH,
                ORBIT_RING_SEGMENTS,
            ))?;
            let ring_node = scene.add(SceneNode::new(ring_mesh, ring_material).with_rotation(ring_rotation));
            orbit_rings.push(OrbitRing { node: ring_node, radius });

            log::debug!("Planet {} at radius {:.1}, speed {:.3}", index + 1, radius, speed);
        }

        let accessory_mesh = graphics.upload_mesh(&Mesh::torus(
            ACCESSORY_RING_RADIUS,
            ACCESSORY_RING_TUBE,
            ACCESSORY_RING_SEGMENTS,
            ACCESSORY_RING_SEGMENTS,
        ))?;
        let accessory_material = graphics.create_material(&Material::unlit().with_hex_color(ACCESSORY_RING_COLOR))?;
        let accessory_radius = bodies::base_radius(RING_BODY_INDEX, orbits.base_radius, orbits.spacing);
        let accessory_node = scene.add(
            SceneNode::new(accessory_mesh, accessory_material)
                .with_position(Vec3::new(accessory_radius, 0.0, 0.0))
                .with_rotation(ring_rotation),
        );
        let accessory_ring = AccessoryRing {
            node: accessory_node,
            body_index: RING_BODY_INDEX,
        };

        log::info!(
            "Solar system built: {} planets, {} scene nodes",
            bodies.len(),
            scene.len()
        );

        Ok(SolarSystem::new(
            scene,
            camera,
            zoom,
            sun,
            bodies,
            orbit_rings,
            accessory_ring,
            AnimationRates {
                time_scale: orbits.time_scale,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use orrery_engine::render::{HeadlessBackend, MaterialFlags};

    fn build(seed: u64) -> (GraphicsEngine, SolarSystem) {
        let config = SolarSystemConfig::default();
        let mut graphics = GraphicsEngine::new(Box::new(HeadlessBackend::new(1280, 720)));
        let world = SceneBuilder::new(&config)
            .build(&mut graphics, &mut orbit_rng(Some(seed)), 1280.0 / 720.0)
            .unwrap();
        (graphics, world)
    }

    #[test]
    fn test_layout_matches_orbit_formula() {
        let (_, world) = build(1);
        assert_eq!(world.bodies.len(), PLANET_COUNT);
        assert_eq!(world.orbit_rings.len(), PLANET_COUNT);
        for (i, body) in world.bodies.iter().enumerate() {
            assert_eq!(body.index, i);
            assert_relative_eq!(body.base_radius, i as f32 * 5.0 + 30.0);
            assert_relative_eq!(world.orbit_rings[i].radius, body.base_radius);
            assert!((0.2..2.2).contains(&body.speed));

            let node = world.body_node(i).unwrap();
            assert_relative_eq!(node.transform.position.x, body.base_radius);
        }
        assert_eq!(world.scene.len(), 1 + 2 * PLANET_COUNT + 1);
    }

    #[test]
    fn test_accessory_ring_sits_on_ringed_body() {
        let (_, world) = build(2);
        assert_eq!(world.accessory_ring.body_index, 5);
        let ring = world.accessory_ring_node().unwrap();
        assert_relative_eq!(ring.transform.position.x, 55.0);
        assert_relative_eq!(ring.transform.rotation.x, constants::HALF_PI);
        assert_relative_eq!(world.ringed_body().unwrap().base_radius, 55.0);
    }

    #[test]
    fn test_seed_makes_speeds_reproducible() {
        let speeds = |seed| build(seed).1.bodies.iter().map(|b| b.speed).collect::<Vec<_>>();
        assert_eq!(speeds(7), speeds(7));
        assert_ne!(speeds(7), speeds(8));
    }

    #[test]
    fn test_meshes_are_shared_where_geometry_is() {
        let (graphics, world) = build(3);
        let backend = graphics.backend::<HeadlessBackend>().unwrap();
        // sun, shared planet sphere, eight orbit rings, torus
        assert_eq!(backend.mesh_count(), 1 + 1 + PLANET_COUNT + 1);
        // sun, shared ring material, eight planets, accessory ring
        assert_eq!(backend.material_count(), 1 + 1 + PLANET_COUNT + 1);

        let sun = backend.material(world.sun_node().unwrap().material).unwrap();
        assert!(sun.material.flags.contains(MaterialFlags::EMISSIVE));
        let planet = backend.material(world.body_node(0).unwrap().material).unwrap();
        assert!(planet.material.flags.contains(MaterialFlags::UNLIT));
        assert!(planet.material.texture.as_ref().unwrap().ends_with("planet-1.jpg"));

        let orbit = backend.material(world.scene.node(world.orbit_rings[0].node).unwrap().material).unwrap();
        assert!(orbit.material.flags.contains(MaterialFlags::UNLIT | MaterialFlags::DOUBLE_SIDED));
        let torus = backend.material(world.accessory_ring_node().unwrap().material).unwrap();
        assert!(torus.material.flags.contains(MaterialFlags::UNLIT));
        assert!(!torus.material.flags.contains(MaterialFlags::DOUBLE_SIDED));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SolarSystemConfig::default();
        config.orbits.spacing = -1.0;
        let mut graphics = GraphicsEngine::new(Box::new(HeadlessBackend::new(1, 1)));
        let result = SceneBuilder::new(&config).build(&mut graphics, &mut orbit_rng(Some(0)), 1.0);
        assert!(matches!(result, Err(AppError::Custom(_))));
    }
}

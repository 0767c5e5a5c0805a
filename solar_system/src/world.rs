//! The solar system world
//!
//! One value owns everything the demo mutates: the scene, the camera and
//! its zoom controls, and the body records that point into the scene.

use orrery_engine::foundation::math::Vec3;
use orrery_engine::render::{Camera, Scene, SceneNode, ZoomControls};

use crate::bodies::{AccessoryRing, CelestialBody, OrbitRing, Sun};

/// Per-frame animation rates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRates {
    /// Converts epoch milliseconds times speed into an orbit angle
    pub time_scale: f64,
}

/// World context for the solar system demo
#[derive(Debug)]
pub struct SolarSystem {
    /// Scene holding every drawable node and the light
    pub scene: Scene,
    /// Viewing camera
    pub camera: Camera,
    /// Wheel zoom state
    pub zoom: ZoomControls,
    /// Central body
    pub sun: Sun,
    /// Orbiting bodies, innermost first
    pub bodies: Vec<CelestialBody>,
    /// One ring per body orbit
    pub orbit_rings: Vec<OrbitRing>,
    /// Ring that follows one body
    pub accessory_ring: AccessoryRing,
    /// Animation rates
    pub rates: AnimationRates,
    initial_camera_position: Vec3,
}

impl SolarSystem {
    /// Assemble a world; the camera's current position becomes its reset position
    pub fn new(
        scene: Scene,
        camera: Camera,
        zoom: ZoomControls,
        sun: Sun,
        bodies: Vec<CelestialBody>,
        orbit_rings: Vec<OrbitRing>,
        accessory_ring: AccessoryRing,
        rates: AnimationRates,
    ) -> Self {
        let initial_camera_position = camera.position;
        Self {
            scene,
            camera,
            zoom,
            sun,
            bodies,
            orbit_rings,
            accessory_ring,
            rates,
            initial_camera_position,
        }
    }

    /// The body the accessory ring follows
    pub fn ringed_body(&self) -> Option<&CelestialBody> {
        self.bodies.get(self.accessory_ring.body_index)
    }

    /// Scene node of the sun
    pub fn sun_node(&self) -> Option<&SceneNode> {
        self.scene.node(self.sun.node)
    }

    /// Scene node of body `index`
    pub fn body_node(&self, index: usize) -> Option<&SceneNode> {
        self.bodies.get(index).and_then(|body| self.scene.node(body.node))
    }

    /// Scene node of the accessory ring
    pub fn accessory_ring_node(&self) -> Option<&SceneNode> {
        self.scene.node(self.accessory_ring.node)
    }

    /// Put the camera back where it started and drop pending zoom
    pub fn reset_camera(&mut self) {
        self.zoom.reset();
        self.camera.set_position(self.initial_camera_position);
        self.camera.look_at(Vec3::zeros(), Vec3::y());
        log::debug!("Camera reset to {:?}", self.initial_camera_position);
    }
}

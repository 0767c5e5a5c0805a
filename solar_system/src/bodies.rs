//! Celestial bodies and orbit geometry
//!
//! Bodies are plain records pointing at scene nodes; the scene owns the
//! transforms. Orbit angles are computed in `f64` because they start from
//! epoch milliseconds (~1.7e12), where `f32` cannot resolve a frame step.

use orrery_engine::foundation::math::Vec3;
use orrery_engine::render::NodeId;

/// Number of orbiting planets
pub const PLANET_COUNT: usize = 8;

/// Index of the planet that wears the accessory ring
pub const RING_BODY_INDEX: usize = 5;

/// Orbit radius of planet `index`: `index * spacing + base_radius`
pub fn base_radius(index: usize, base_radius: f32, spacing: f32) -> f32 {
    index as f32 * spacing + base_radius
}

/// Position on a circular orbit in the XZ plane at time `now_ms`
///
/// `x = cos(now * time_scale * speed) * radius`, `z = sin(..) * radius`.
pub fn orbit_position(now_ms: f64, time_scale: f64, speed: f64, radius: f32) -> Vec3 {
    let angle = now_ms * time_scale * speed;
    let radius = f64::from(radius);
    Vec3::new((angle.cos() * radius) as f32, 0.0, (angle.sin() * radius) as f32)
}

/// An orbiting planet
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    /// Scene node carrying the planet's transform
    pub node: NodeId,
    /// Position in the body list, innermost first
    pub index: usize,
    /// Fixed orbit radius
    pub base_radius: f32,
    /// Random angular speed multiplier
    pub speed: f64,
    /// Self-rotation added each frame, radians
    pub rotation_step: f32,
}

impl CelestialBody {
    /// Where this body sits at `now_ms`
    pub fn position_at(&self, now_ms: f64, time_scale: f64) -> Vec3 {
        orbit_position(now_ms, time_scale, self.speed, self.base_radius)
    }
}

/// The central, stationary body
#[derive(Debug, Clone, PartialEq)]
pub struct Sun {
    /// Scene node
    pub node: NodeId,
    /// Self-rotation added each frame, radians
    pub rotation_step: f32,
}

/// Static ring tracing one planet's orbit
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitRing {
    /// Scene node
    pub node: NodeId,
    /// Radius of the traced orbit
    pub radius: f32,
}

/// Decorative ring that follows one planet around its orbit
#[derive(Debug, Clone, PartialEq)]
pub struct AccessoryRing {
    /// Scene node
    pub node: NodeId,
    /// Index of the planet it follows
    pub body_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_radii_step_by_spacing() {
        let radii: Vec<f32> = (0..PLANET_COUNT).map(|i| base_radius(i, 30.0, 5.0)).collect();
        assert_eq!(radii, vec![30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0]);
        assert_eq!(base_radius(RING_BODY_INDEX, 30.0, 5.0), 55.0);
    }

    #[test]
    fn test_orbit_stays_on_circle_at_epoch_scale_times() {
        for &now in &[0.0, 1.0, 1_700_000_000_000.0, 1_712_345_678_901.5] {
            for &speed in &[0.2, 1.0, 2.19] {
                let p = orbit_position(now, 0.0001, speed, 45.0);
                assert_relative_eq!((p.x * p.x + p.z * p.z).sqrt(), 45.0, epsilon = 1e-3);
                assert_eq!(p.y, 0.0);
            }
        }
    }

    #[test]
    fn test_orbit_starts_on_positive_x() {
        let p = orbit_position(0.0, 0.0001, 1.3, 30.0);
        assert_relative_eq!(p.x, 30.0);
        assert_relative_eq!(p.z, 0.0);
    }

    #[test]
    fn test_quarter_period_reaches_positive_z() {
        // angle = now * 0.0001 * speed = pi / 2
        let speed = 2.0;
        let now = std::f64::consts::FRAC_PI_2 / (0.0001 * speed);
        let p = orbit_position(now, 0.0001, speed, 30.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(p.z, 30.0, epsilon = 1e-4);
    }
}

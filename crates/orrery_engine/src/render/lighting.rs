//! Lighting system

use crate::foundation::math::Vec3;

/// Omnidirectional light with a finite range
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// Light position in world space
    pub position: Vec3,
    /// Light color
    pub color: Vec3,
    /// Light intensity
    pub intensity: f32,
    /// Distance at which the light has faded to nothing; 0 means unbounded
    pub range: f32,
}

impl PointLight {
    /// Create a point light
    pub fn new(position: Vec3, color: Vec3, intensity: f32, range: f32) -> Self {
        Self {
            position,
            color,
            intensity,
            range,
        }
    }

    /// Brightness factor at `distance`, smoothly falling to zero at `range`
    pub fn attenuation(&self, distance: f32) -> f32 {
        if self.range <= 0.0 {
            return 1.0;
        }
        let falloff = (1.0 - distance / self.range).clamp(0.0, 1.0);
        falloff * falloff
    }
}

/// Lighting environment: point lights plus a flat ambient term
#[derive(Debug, Clone)]
pub struct LightingEnvironment {
    /// Point lights in the scene
    pub lights: Vec<PointLight>,
    /// Ambient light color
    pub ambient_color: Vec3,
    /// Ambient light intensity
    pub ambient_intensity: f32,
}

impl LightingEnvironment {
    /// Create a new empty lighting environment
    pub fn new() -> Self {
        Self {
            lights: Vec::new(),
            ambient_color: Vec3::new(1.0, 1.0, 1.0),
            ambient_intensity: 0.1,
        }
    }

    /// Add a light to the environment
    pub fn add_light(mut self, light: PointLight) -> Self {
        self.lights.push(light);
        self
    }

    /// Set ambient lighting
    pub fn with_ambient(mut self, color: Vec3, intensity: f32) -> Self {
        self.ambient_color = color;
        self.ambient_intensity = intensity;
        self
    }

    /// The light the GPU path shades with; backends support one point light
    pub fn primary_light(&self) -> Option<&PointLight> {
        self.lights.first()
    }
}

impl Default for LightingEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_attenuation_fades_to_range() {
        let light = PointLight::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0), 1.0, 500.0);
        assert_relative_eq!(light.attenuation(0.0), 1.0);
        assert_relative_eq!(light.attenuation(250.0), 0.25);
        assert_relative_eq!(light.attenuation(600.0), 0.0);
    }

    #[test]
    fn test_unbounded_light_never_fades() {
        let light = PointLight::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0), 1.0, 0.0);
        assert_relative_eq!(light.attenuation(1.0e6), 1.0);
    }

    #[test]
    fn test_primary_light_is_first() {
        let env = LightingEnvironment::new()
            .add_light(PointLight::new(Vec3::zeros(), Vec3::x(), 1.0, 500.0))
            .add_light(PointLight::new(Vec3::y(), Vec3::y(), 1.0, 10.0));
        assert_eq!(env.primary_light().map(|l| l.color), Some(Vec3::x()));
    }
}

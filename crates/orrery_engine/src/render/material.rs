//! Material system for rendering
//!
//! Three shading models cover the scene: unlit (flat colour times texture),
//! lit (Lambert diffuse from the scene lights) and emissive, where the
//! texture is treated as light the surface gives off.

use std::path::PathBuf;

use crate::foundation::math::utils;

bitflags::bitflags! {
    /// Shading switches, packed into the per-draw push constants
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MaterialFlags: u32 {
        /// Ignore scene lights
        const UNLIT = 1 << 0;
        /// Sample the texture as emitted light instead of albedo
        const EMISSIVE = 1 << 1;
        /// Render back faces too
        const DOUBLE_SIDED = 1 << 2;
        /// A texture is bound; otherwise the white fallback is sampled
        const TEXTURED = 1 << 3;
    }
}

/// Material properties for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color (RGB)
    pub base_color: [f32; 3],

    /// Emitted color, multiplied by the texture for emissive materials
    pub emissive: [f32; 3],

    /// Image file sampled by the shader
    pub texture: Option<PathBuf>,

    /// Shading switches
    pub flags: MaterialFlags,
}

impl Material {
    /// Flat colour that ignores lighting
    pub fn unlit() -> Self {
        Self {
            flags: MaterialFlags::UNLIT,
            ..Self::default()
        }
    }

    /// Lambert-shaded surface
    pub fn lit() -> Self {
        Self::default()
    }

    /// Lambert surface that also glows with its texture
    pub fn emissive(color: [f32; 3]) -> Self {
        Self {
            emissive: color,
            flags: MaterialFlags::EMISSIVE,
            ..Self::default()
        }
    }

    /// Set the base color
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b];
        self
    }

    /// Set the base color from a `0xRRGGBB` value
    pub fn with_hex_color(mut self, hex: u32) -> Self {
        self.base_color = utils::rgb_from_hex(hex);
        self
    }

    /// Sample `path` as this material's texture
    pub fn with_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture = Some(path.into());
        self.flags |= MaterialFlags::TEXTURED;
        self
    }

    /// Render both faces
    pub fn double_sided(mut self) -> Self {
        self.flags |= MaterialFlags::DOUBLE_SIDED;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0],
            emissive: [0.0, 0.0, 0.0],
            texture: None,
            flags: MaterialFlags::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_set_flags() {
        let ring = Material::unlit().with_hex_color(0xffffff).double_sided();
        assert!(ring.flags.contains(MaterialFlags::UNLIT | MaterialFlags::DOUBLE_SIDED));
        assert!(!ring.flags.contains(MaterialFlags::TEXTURED));

        let sun = Material::emissive([1.0; 3]).with_texture("sun.jpg");
        assert!(sun.flags.contains(MaterialFlags::EMISSIVE | MaterialFlags::TEXTURED));
        assert_eq!(sun.texture.as_deref(), Some(std::path::Path::new("sun.jpg")));
    }
}

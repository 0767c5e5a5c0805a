//! Image loading for texture data
//!
//! Decodes PNG and JPEG files into tightly packed RGBA8 for GPU upload.

use std::path::Path;

use crate::assets::AssetError;

/// Loaded image data ready for GPU upload
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        log::debug!("Loading image from: {}", path.display());

        let img = image::open(path)
            .map_err(|e| AssetError::LoadFailed(format!("{}: {}", path.display(), e)))?
            .to_rgba8();
        let (width, height) = img.dimensions();

        log::info!("Loaded image {}x{} from {}", width, height, path.display());

        Ok(Self {
            data: img.into_raw(),
            width,
            height,
        })
    }

    /// Load an image, substituting a 1x1 white pixel when loading fails
    ///
    /// Untextured geometry keeps rendering in its base colour, so a missing
    /// texture costs looks rather than the frame.
    pub fn from_file_or_white<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path.as_ref()).unwrap_or_else(|e| {
            log::warn!("Texture unavailable, using plain white: {}", e);
            Self::white()
        })
    }

    /// Create a solid color image
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        Self {
            data: color.repeat(pixel_count),
            width,
            height,
        }
    }

    /// Single opaque white pixel
    pub fn white() -> Self {
        Self::solid_color(1, 1, [255; 4])
    }

    /// Get the size of the image data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 4);
        assert_eq!(img.size_bytes(), 4 * 4 * 4);
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = ImageData::from_file("./no/such/planet-9.jpg");
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_white() {
        let img = ImageData::from_file_or_white("./no/such/sun.jpg");
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(img.data, vec![255, 255, 255, 255]);
    }
}

//! Core data types

use crate::error::{BgRemovalError, Result};
use image::{GrayImage, ImageBuffer, Luma, RgbaImage};

/// Encoded image bytes, opaque to the pipeline
///
/// A payload is produced by reading a file, handed once to a removal
/// capability, and the returned payload is written out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePayload(Vec<u8>);

impl ImagePayload {
    /// Wrap encoded image bytes
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ImagePayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ImagePayload {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for ImagePayload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Grayscale foreground mask, 0 = background, 255 = foreground
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationMask {
    /// Mask data as grayscale values (0-255), row-major
    pub data: Vec<u8>,

    /// Mask dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl SegmentationMask {
    #[must_use]
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Self {
        Self { data, dimensions }
    }

    /// Create mask from a grayscale image
    #[must_use]
    pub fn from_image(image: &GrayImage) -> Self {
        Self::new(image.as_raw().clone(), image.dimensions())
    }

    /// Convert mask to a grayscale image
    pub fn to_image(&self) -> Result<GrayImage> {
        let (width, height) = self.dimensions;
        ImageBuffer::<Luma<u8>, _>::from_raw(width, height, self.data.clone())
            .ok_or_else(|| BgRemovalError::processing("Failed to create image from mask data"))
    }

    /// Resize the mask to new dimensions
    pub fn resize(&self, new_width: u32, new_height: u32) -> Result<Self> {
        if self.dimensions == (new_width, new_height) {
            return Ok(self.clone());
        }
        let resized = image::imageops::resize(
            &self.to_image()?,
            new_width,
            new_height,
            image::imageops::FilterType::Lanczos3,
        );
        Ok(Self::from_image(&resized))
    }

    /// Use the mask as the alpha channel of an RGBA image
    ///
    /// Existing transparency is kept: the resulting alpha is the product of
    /// the image's alpha and the mask.
    pub fn apply_to_image(&self, image: &mut RgbaImage) -> Result<()> {
        if image.dimensions() != self.dimensions {
            return Err(BgRemovalError::processing(format!(
                "Image and mask dimensions do not match: {:?} vs {:?}",
                image.dimensions(),
                self.dimensions
            )));
        }

        for (pixel, &mask) in image.pixels_mut().zip(&self.data) {
            let alpha = u16::from(pixel[3]) * u16::from(mask) / 255;
            pixel[3] = alpha as u8;
        }

        Ok(())
    }
}

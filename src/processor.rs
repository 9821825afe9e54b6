//! Segmentation-based background removal
//!
//! `SegmentationRemover` is the removal capability used by the CLI. It
//! decodes the payload, asks an inference backend for a foreground mask,
//! uses that mask as the alpha channel and re-encodes the result as PNG.

use crate::{
    capability::RemovalCapability,
    error::{BgRemovalError, Result},
    inference::InferenceBackend,
    types::ImagePayload,
    utils::ImagePreprocessor,
};
use image::{DynamicImage, ImageFormat};
use instant::Instant;
use std::io::Cursor;
use tracing::{debug, info};

/// Removal capability backed by a segmentation model
pub struct SegmentationRemover<B: InferenceBackend> {
    backend: B,
}

impl<B: InferenceBackend> SegmentationRemover<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Cut the background out of a decoded image
    ///
    /// # Errors
    /// - Backend initialization or inference failures
    /// - Mask post-processing failures
    pub fn process_image(&mut self, image: &DynamicImage) -> Result<DynamicImage> {
        if let Some(load_time) = self.backend.initialize()? {
            info!(elapsed_ms = load_time.as_millis() as u64, "Segmentation model ready");
        }

        let preprocessing = self.backend.preprocessing_config();
        let start = Instant::now();
        let tensor = ImagePreprocessor::preprocess_for_inference(image, &preprocessing)?;
        let preprocess_ms = start.elapsed().as_millis() as u64;

        let start = Instant::now();
        let output = self.backend.infer(&tensor)?;
        let inference_ms = start.elapsed().as_millis() as u64;

        let start = Instant::now();
        let mask = ImagePreprocessor::tensor_to_mask(&output, (image.width(), image.height()))?;
        let mut rgba = image.to_rgba8();
        mask.apply_to_image(&mut rgba)?;
        let postprocess_ms = start.elapsed().as_millis() as u64;

        debug!(preprocess_ms, inference_ms, postprocess_ms, "Segmentation timings");
        Ok(DynamicImage::ImageRgba8(rgba))
    }
}

impl<B: InferenceBackend> RemovalCapability for SegmentationRemover<B> {
    fn transform(&mut self, payload: &ImagePayload) -> Result<ImagePayload> {
        let format = image::guess_format(payload.as_bytes())
            .map_err(|e| BgRemovalError::processing(format!("Unrecognized image data: {e}")))?;
        let image = image::load_from_memory_with_format(payload.as_bytes(), format)?;
        debug!(
            format = ?format,
            width = image.width(),
            height = image.height(),
            "Decoded input image"
        );

        let cutout = self.process_image(&image)?;

        let mut encoded = Vec::new();
        cutout.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)?;
        Ok(ImagePayload::new(encoded))
    }
}

#[cfg(feature = "tract")]
impl SegmentationRemover<crate::backends::TractBackend> {
    /// U²-Net remover using the model found through [`crate::models::ModelLocation::resolve`]
    ///
    /// The model is only loaded on the first `transform` call. With the
    /// `download` feature a missing model file is fetched at that point.
    ///
    /// # Errors
    /// - The model location cannot be resolved
    pub fn u2net() -> Result<Self> {
        let location = crate::models::ModelLocation::resolve()?;
        debug!(model = %location.path().display(), "Resolved segmentation model");
        let backend = crate::backends::TractBackend::new(location);
        #[cfg(feature = "download")]
        let backend = backend.with_downloader(crate::download::ModelDownloader::u2net());
        Ok(Self::new(backend))
    }
}

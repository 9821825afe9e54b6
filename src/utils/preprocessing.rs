//! Tensor preparation and mask post-processing around model inference

use crate::{
    error::{BgRemovalError, Result},
    models::PreprocessingConfig,
    types::SegmentationMask,
};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use ndarray::Array4;

/// Stateless image ⇄ tensor conversions
pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// Turn an image into the model's NCHW input tensor
    ///
    /// The image is converted to RGB and stretched to the model's input size
    /// (aspect ratio is not kept; the mask is stretched back afterwards).
    /// Pixel values are divided by the brightest channel value in the
    /// resized image, then normalized per channel.
    ///
    /// # Errors
    /// - Zero-sized input image
    pub fn preprocess_for_inference(
        image: &DynamicImage,
        preprocessing_config: &PreprocessingConfig,
    ) -> Result<Array4<f32>> {
        if image.width() == 0 || image.height() == 0 {
            return Err(BgRemovalError::processing("Cannot process an empty image"));
        }

        let [target_width, target_height] = preprocessing_config.target_size;
        let _span = tracing::debug_span!(
            "preprocessing",
            original_width = image.width(),
            original_height = image.height(),
            target_width,
            target_height
        )
        .entered();

        let resized = image::imageops::resize(
            &image.to_rgb8(),
            target_width,
            target_height,
            image::imageops::FilterType::Lanczos3,
        );

        Ok(Self::canvas_to_tensor(&resized, preprocessing_config))
    }

    /// Convert canvas to normalized tensor
    fn canvas_to_tensor(canvas: &RgbImage, preprocessing_config: &PreprocessingConfig) -> Array4<f32> {
        let (width, height) = canvas.dimensions();
        let max_value = f32::from(canvas.as_raw().iter().copied().max().unwrap_or(0)).max(1e-6);
        let mean = preprocessing_config.normalization_mean;
        let std = preprocessing_config.normalization_std;

        let mut tensor = Array4::<f32>::zeros((1, 3, height as usize, width as usize));
        for (x, y, pixel) in canvas.enumerate_pixels() {
            for (channel, ((&value, m), s)) in pixel.0.iter().zip(mean).zip(std).enumerate() {
                if let Some(slot) = tensor.get_mut([0, channel, y as usize, x as usize]) {
                    *slot = (f32::from(value) / max_value - m) / s;
                }
            }
        }

        tensor
    }

    /// Turn the model output into a mask of the original image size
    ///
    /// The first channel of the first batch entry is min-max normalized to
    /// 0..=255. A flat prediction carries no contrast to stretch, so it is
    /// only clamped to 0..=1 instead.
    ///
    /// # Errors
    /// - Output tensor with no batch entries or channels
    pub fn tensor_to_mask(output: &Array4<f32>, original_size: (u32, u32)) -> Result<SegmentationMask> {
        let (batch, channels, height, width) = output.dim();
        if batch == 0 || channels == 0 || height == 0 || width == 0 {
            return Err(BgRemovalError::processing(format!(
                "Model output has an empty dimension: {:?}",
                output.shape()
            )));
        }

        let _span = tracing::debug_span!("postprocessing", operation = "tensor_to_mask").entered();

        let prediction = output.slice(ndarray::s![0, 0, .., ..]);
        let (min, max) = prediction
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let range = max - min;

        let scale = |v: f32| -> u8 {
            let unit = if range > f32::EPSILON {
                (v - min) / range
            } else {
                v.clamp(0.0, 1.0)
            };
            (unit * 255.0).round().clamp(0.0, 255.0) as u8
        };

        let mask_image = GrayImage::from_fn(width as u32, height as u32, |x, y| {
            Luma([scale(prediction.get((y as usize, x as usize)).copied().unwrap_or(0.0))])
        });

        let (original_width, original_height) = original_size;
        SegmentationMask::from_image(&mask_image).resize(original_width, original_height)
    }
}

//! Tract backend implementation for the segmentation model
//!
//! Tract is a pure Rust ONNX runtime, so the tool needs no native
//! libraries: the model is parsed, its input shape pinned, and the graph
//! optimized once before the first inference.

use crate::error::{BgRemovalError, Result};
use crate::inference::InferenceBackend;
use crate::models::{ModelLocation, PreprocessingConfig};
use ndarray::Array4;
use tract_onnx::prelude::*;

// Use instant crate for cross-platform time compatibility
use instant::{Duration, Instant};

/// Type alias for the complex Tract model type to reduce complexity warnings
type TractModel = RunnableModel<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Tract backend for running the segmentation model using pure Rust inference
#[derive(Debug)]
pub struct TractBackend {
    model: Option<TractModel>,
    location: ModelLocation,
    preprocessing: PreprocessingConfig,
    #[cfg(feature = "download")]
    downloader: Option<crate::download::ModelDownloader>,
}

impl TractBackend {
    /// Create an uninitialized backend for the U²-Net model at `location`
    #[must_use]
    pub fn new(location: ModelLocation) -> Self {
        Self {
            model: None,
            location,
            preprocessing: PreprocessingConfig::u2net(),
            #[cfg(feature = "download")]
            downloader: None,
        }
    }

    /// Fetch the model with `downloader` if it is missing at load time
    #[cfg(feature = "download")]
    #[must_use]
    pub fn with_downloader(mut self, downloader: crate::download::ModelDownloader) -> Self {
        self.downloader = Some(downloader);
        self
    }

    #[must_use]
    pub fn location(&self) -> &ModelLocation {
        &self.location
    }

    /// Load and initialize the model using Tract
    fn load_model(&mut self) -> Result<Duration> {
        let model_load_start = Instant::now();
        let path = self.location.path().to_path_buf();

        #[cfg(feature = "download")]
        if let Some(downloader) = self.downloader.as_mut() {
            downloader.ensure(&self.location)?;
        }

        let model_data = self.location.load()?;

        #[allow(clippy::cast_precision_loss)]
        let size_mb = model_data.len() as f64 / (1024.0 * 1024.0);
        tracing::info!(model = %path.display(), size_mb = %format!("{size_mb:.2}"), "Loading segmentation model");

        let (_, channels, height, width) = self.preprocessing.input_shape();
        let input_fact = f32::fact([1, channels, height, width]);

        let model = onnx()
            .model_for_read(&mut std::io::Cursor::new(model_data))
            .map_err(|e| {
                BgRemovalError::model_error_with_context("parse", &path, &e.to_string(), &[])
            })?
            .with_input_fact(0, input_fact.into())
            .map_err(|e| BgRemovalError::model(format!("Failed to set model input shape: {e}")))?
            .into_optimized()
            .map_err(|e| BgRemovalError::model(format!("Failed to optimize model: {e}")))?
            .into_runnable()
            .map_err(|e| {
                BgRemovalError::model(format!("Failed to create runnable model: {e}"))
            })?;

        self.model = Some(model);

        let model_load_time = model_load_start.elapsed();
        tracing::debug!(
            elapsed_ms = model_load_time.as_millis() as u64,
            "Tract backend initialized"
        );

        Ok(model_load_time)
    }
}

impl InferenceBackend for TractBackend {
    fn initialize(&mut self) -> Result<Option<Duration>> {
        if self.model.is_some() {
            return Ok(None);
        }

        let model_load_time = self.load_model()?;
        Ok(Some(model_load_time))
    }

    fn infer(&mut self, input: &Array4<f32>) -> Result<Array4<f32>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| BgRemovalError::inference("Tract model not initialized"))?;

        tracing::debug!(shape = ?input.shape(), "Running Tract inference");
        let inference_start = Instant::now();

        let input_data = input
            .as_standard_layout()
            .as_slice()
            .map(<[f32]>::to_vec)
            .ok_or_else(|| BgRemovalError::inference("Input tensor is not contiguous"))?;
        let input_tensor = Tensor::from_shape(input.shape(), &input_data).map_err(|e| {
            BgRemovalError::inference(format!("Failed to build input tensor: {e}"))
        })?;

        let outputs = model
            .run(tvec![input_tensor.into()])
            .map_err(|e| BgRemovalError::inference(format!("Tract inference failed: {e}")))?;

        // U²-Net emits seven side outputs; the first one is the fused map.
        let output_tensor = outputs
            .into_iter()
            .next()
            .ok_or_else(|| BgRemovalError::inference("No output tensor found"))?
            .into_arc_tensor();

        let dims: [usize; 4] = output_tensor.shape().try_into().map_err(|_| {
            BgRemovalError::inference(format!(
                "Expected 4D output tensor, got {}D",
                output_tensor.shape().len()
            ))
        })?;
        let output_data = output_tensor.as_slice::<f32>().map_err(|e| {
            BgRemovalError::inference(format!("Failed to read output tensor: {e}"))
        })?;

        let output_array = Array4::from_shape_vec(dims, output_data.to_vec()).map_err(|e| {
            BgRemovalError::inference(format!("Failed to reshape output tensor: {e}"))
        })?;

        tracing::debug!(
            shape = ?output_array.shape(),
            elapsed_ms = inference_start.elapsed().as_millis() as u64,
            "Tract inference completed"
        );

        Ok(output_array)
    }

    fn preprocessing_config(&self) -> PreprocessingConfig {
        self.preprocessing.clone()
    }

    fn is_initialized(&self) -> bool {
        self.model.is_some()
    }
}

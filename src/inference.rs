//! Inference backend abstraction

use crate::{error::Result, models::PreprocessingConfig};
use instant::Duration;
use ndarray::Array4;

/// Trait for segmentation model backends
pub trait InferenceBackend {
    /// Load the model if that has not happened yet
    ///
    /// Returns the model loading time, or `None` when the backend was
    /// already initialized.
    ///
    /// # Errors
    /// - Model file missing or unreadable
    /// - Model cannot be parsed or optimized
    fn initialize(&mut self) -> Result<Option<Duration>>;

    /// Run inference on an NCHW input tensor
    ///
    /// # Errors
    /// - Backend not initialized
    /// - Model inference failures
    /// - Unexpected output tensor shape
    fn infer(&mut self, input: &Array4<f32>) -> Result<Array4<f32>>;

    /// Preprocessing the model expects
    fn preprocessing_config(&self) -> PreprocessingConfig;

    /// Expected input shape for this backend
    fn input_shape(&self) -> (usize, usize, usize, usize) {
        self.preprocessing_config().input_shape()
    }

    fn is_initialized(&self) -> bool;
}

//! Mock backend implementation for testing and debugging

use crate::error::{BgRemovalError, Result};
use crate::inference::InferenceBackend;
use crate::models::PreprocessingConfig;
use instant::Duration;
use ndarray::Array4;

/// Mock backend that marks bright pixels as foreground
///
/// A pixel whose normalized red channel is above zero (roughly brighter
/// than mid-grey) gets a mask value of 1.0, everything else 0.0. This is
/// enough to exercise the full decode → mask → cut-out path without a model.
#[derive(Debug)]
pub struct MockBackend {
    preprocessing: PreprocessingConfig,
    initialized: bool,
    fail_inference: bool,
    /// Number of completed `infer` calls
    pub inference_count: usize,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            preprocessing: PreprocessingConfig::u2net(),
            initialized: false,
            fail_inference: false,
            inference_count: 0,
        }
    }

    /// Use a smaller model input to keep tests fast
    #[must_use]
    pub fn with_target_size(mut self, size: u32) -> Self {
        self.preprocessing.target_size = [size, size];
        self
    }

    /// Make every `infer` call fail
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_inference: true,
            ..Self::new()
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceBackend for MockBackend {
    fn initialize(&mut self) -> Result<Option<Duration>> {
        if self.initialized {
            return Ok(None);
        }
        self.initialized = true;
        Ok(Some(Duration::ZERO))
    }

    fn infer(&mut self, input: &Array4<f32>) -> Result<Array4<f32>> {
        if !self.initialized {
            return Err(BgRemovalError::inference("Mock backend not initialized"));
        }
        if self.fail_inference {
            return Err(BgRemovalError::inference("mock inference failure"));
        }

        let (n, _c, h, w) = input.dim();
        let output = Array4::from_shape_fn((n, 1, h, w), |(batch, _, y, x)| {
            let red = input.get([batch, 0, y, x]).copied().unwrap_or(0.0);
            if red > 0.0 {
                1.0
            } else {
                0.0
            }
        });

        self.inference_count += 1;
        Ok(output)
    }

    fn preprocessing_config(&self) -> PreprocessingConfig {
        self.preprocessing.clone()
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_requires_initialization() {
        let mut backend = MockBackend::new();
        assert!(backend.infer(&Array4::zeros((1, 3, 4, 4))).is_err());

        assert!(backend.initialize().unwrap().is_some());
        assert!(backend.initialize().unwrap().is_none());
        assert!(backend.is_initialized());
    }

    #[test]
    fn test_mock_marks_bright_pixels() {
        let mut backend = MockBackend::new();
        backend.initialize().unwrap();

        let mut input = Array4::<f32>::from_elem((1, 3, 2, 2), -2.0);
        input[[0, 0, 1, 1]] = 2.0;
        let output = backend.infer(&input).unwrap();

        assert_eq!(output.dim(), (1, 1, 2, 2));
        assert_eq!(output[[0, 0, 0, 0]], 0.0);
        assert_eq!(output[[0, 0, 1, 1]], 1.0);
        assert_eq!(backend.inference_count, 1);
    }

    #[test]
    fn test_target_size_override() {
        let backend = MockBackend::new().with_target_size(64);
        assert_eq!(backend.input_shape(), (1, 3, 64, 64));
    }
}

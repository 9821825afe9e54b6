//! Error types for background removal operations

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for background removal operations
pub type Result<T> = std::result::Result<T, BgRemovalError>;

/// How a failure is surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configured input file does not exist
    FileNotFound,
    /// Anything else: decoding, inference, writing, permissions
    GenericFailure,
}

/// Error types for background removal operations
#[derive(Error, Debug)]
pub enum BgRemovalError {
    /// The input image file does not exist
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Input/output errors (permission denied, disk full, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Backend inference errors
    #[error("Inference error: {0}")]
    Inference(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Model loading or initialization errors
    #[error("Model error: {0}")]
    Model(String),

    /// Tensor or mask processing errors
    #[error("Processing error: {0}")]
    Processing(String),

    /// Model download or verification errors
    #[error("Network error: {0}")]
    Network(String),
}

impl BgRemovalError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new model error
    pub fn model<S: Into<String>>(msg: S) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create a new inference error
    pub fn inference<S: Into<String>>(msg: S) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new network error with the underlying cause
    pub fn network_error<S: Into<String>, E: std::fmt::Display>(context: S, error: E) -> Self {
        Self::Network(format!("{}: {}", context.into(), error))
    }

    /// Create file I/O error for reading an input file
    ///
    /// A `NotFound` error becomes [`BgRemovalError::FileNotFound`] so callers
    /// can tell a missing input apart from every other I/O problem. Only the
    /// read side uses this; a missing directory on the write side is an
    /// ordinary [`BgRemovalError::Io`].
    pub fn input_io_error<P: AsRef<Path>>(operation: &str, path: P, error: &std::io::Error) -> Self {
        let path = path.as_ref();
        if error.kind() == std::io::ErrorKind::NotFound {
            return Self::FileNotFound {
                path: path.to_path_buf(),
            };
        }
        Self::file_io_error(operation, path, error)
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<Path>>(operation: &str, path: P, error: &std::io::Error) -> Self {
        let path = path.as_ref();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path.display(), error),
        ))
    }

    /// Create model error with troubleshooting context
    pub fn model_error_with_context<P: AsRef<Path>>(
        operation: &str,
        model_path: P,
        error: &str,
        suggestions: &[&str],
    ) -> Self {
        let suggestion_text = if suggestions.is_empty() {
            String::new()
        } else {
            format!(" Suggestions: {}", suggestions.join(", "))
        };

        Self::Model(format!(
            "Failed to {} model '{}': {}.{}",
            operation,
            model_path.as_ref().display(),
            error,
            suggestion_text
        ))
    }

    /// Classify this error into the two user-facing tiers
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            _ => ErrorKind::GenericFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BgRemovalError::invalid_config("input path is empty");
        assert_eq!(err.to_string(), "Invalid configuration: input path is empty");
    }

    #[test]
    fn test_not_found_input_error_becomes_file_not_found() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = BgRemovalError::input_io_error("open image", Path::new("in/profile.png"), &io_error);

        assert!(matches!(err, BgRemovalError::FileNotFound { .. }));
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert!(err.to_string().contains("in/profile.png"));
    }

    #[test]
    fn test_not_found_on_write_side_stays_generic() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = BgRemovalError::file_io_error("create temporary file in", Path::new("out"), &io_error);

        assert!(matches!(err, BgRemovalError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::GenericFailure);
        assert!(err.to_string().contains("create temporary file in"));
    }

    #[test]
    fn test_other_io_errors_keep_context() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = BgRemovalError::file_io_error("write output", Path::new("/out/result.png"), &io_error);
        let error_string = err.to_string();

        assert_eq!(err.kind(), ErrorKind::GenericFailure);
        assert!(error_string.contains("write output"));
        assert!(error_string.contains("/out/result.png"));
        assert!(error_string.contains("access denied"));
    }

    #[test]
    fn test_model_error_with_suggestions() {
        let err = BgRemovalError::model_error_with_context(
            "load",
            Path::new("/models/u2net.onnx"),
            "file not found",
            &["download u2net.onnx", "set U2NET_HOME"],
        );
        let error_string = err.to_string();

        assert_eq!(err.kind(), ErrorKind::GenericFailure);
        assert!(error_string.contains("/models/u2net.onnx"));
        assert!(error_string.contains("Suggestions: download u2net.onnx, set U2NET_HOME"));
    }

    #[test]
    fn test_every_other_variant_is_generic() {
        let errors = [
            BgRemovalError::inference("boom"),
            BgRemovalError::processing("bad mask"),
            BgRemovalError::model("corrupt"),
            BgRemovalError::invalid_config("same path"),
            BgRemovalError::network_error("download u2net.onnx", "connection refused"),
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::GenericFailure);
        }
    }
}

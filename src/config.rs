//! Configuration types for background removal

use crate::error::{BgRemovalError, Result};
use std::path::{Path, PathBuf};

/// Image read when no input path is configured
pub const DEFAULT_INPUT_PATH: &str = "frontend/public/images/profile.png";

/// Image written when no output path is configured
pub const DEFAULT_OUTPUT_PATH: &str = "frontend/public/images/profile_transparent.png";

/// Paths for a single background removal run
///
/// Both paths are fixed once the configuration is built; nothing in the
/// pipeline derives them at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalConfig {
    /// Image to read. Never modified.
    pub input_path: PathBuf,

    /// Where the cut-out image is created or overwritten
    pub output_path: PathBuf,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl RemovalConfig {
    /// Create a builder starting from the default paths
    #[must_use]
    pub fn builder() -> RemovalConfigBuilder {
        RemovalConfigBuilder::default()
    }

    /// Validate the configured paths
    ///
    /// # Errors
    /// - Either path is empty
    /// - Input and output refer to the same file
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(BgRemovalError::invalid_config("input path is empty"));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(BgRemovalError::invalid_config("output path is empty"));
        }

        if same_location(&self.input_path, &self.output_path) {
            return Err(BgRemovalError::invalid_config(format!(
                "output path '{}' would overwrite the input image",
                self.output_path.display()
            )));
        }

        Ok(())
    }
}

/// Compare two paths, resolving them when both exist on disk
fn same_location(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Builder for `RemovalConfig`
#[derive(Debug, Default)]
pub struct RemovalConfigBuilder {
    config: RemovalConfig,
}

impl RemovalConfigBuilder {
    /// Set the input image path
    #[must_use]
    pub fn input_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.input_path = path.into();
        self
    }

    /// Set the output image path
    #[must_use]
    pub fn output_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    /// - Validation failures, see [`RemovalConfig::validate`]
    pub fn build(self) -> Result<RemovalConfig> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}

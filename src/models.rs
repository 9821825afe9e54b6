//! Segmentation model description and on-disk location
//!
//! The tool always uses the general purpose U²-Net model. Only *where* the
//! model file lives can vary, following the usual `~/.u2net` convention.

use crate::error::{BgRemovalError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name of the segmentation model
pub const U2NET_MODEL_FILE: &str = "u2net.onnx";

/// Environment variable naming the directory that holds the model
pub const U2NET_HOME_ENV: &str = "U2NET_HOME";

/// Directory created under the data home when `U2NET_HOME` is unset
pub const U2NET_DIR_NAME: &str = ".u2net";

/// Preprocessing expected by the model
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessingConfig {
    /// Model input size as [width, height]
    pub target_size: [u32; 2],
    /// Per-channel mean (RGB), applied to values scaled to 0..=1
    pub normalization_mean: [f32; 3],
    /// Per-channel standard deviation (RGB)
    pub normalization_std: [f32; 3],
}

impl PreprocessingConfig {
    /// Settings for U²-Net: 320×320 input with ImageNet statistics
    #[must_use]
    pub fn u2net() -> Self {
        Self {
            target_size: [320, 320],
            normalization_mean: [0.485, 0.456, 0.406],
            normalization_std: [0.229, 0.224, 0.225],
        }
    }

    /// NCHW input shape for a single image
    #[must_use]
    pub fn input_shape(&self) -> (usize, usize, usize, usize) {
        (1, 3, self.target_size[1] as usize, self.target_size[0] as usize)
    }
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self::u2net()
    }
}

/// Location of the model file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelLocation {
    path: PathBuf,
}

impl ModelLocation {
    /// Use an explicit model file
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the model path from the environment
    ///
    /// `$U2NET_HOME/u2net.onnx` wins; otherwise `.u2net/u2net.onnx` under
    /// `$XDG_DATA_HOME`, falling back to the home directory.
    ///
    /// # Errors
    /// - None of the variables is set and no home directory can be found
    pub fn resolve() -> Result<Self> {
        Self::resolve_with(
            std::env::var_os(U2NET_HOME_ENV),
            std::env::var_os("XDG_DATA_HOME"),
            dirs::home_dir(),
        )
    }

    fn resolve_with(
        u2net_home: Option<OsString>,
        data_home: Option<OsString>,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        let non_empty = |v: Option<OsString>| v.filter(|s| !s.is_empty()).map(PathBuf::from);

        let model_dir = if let Some(dir) = non_empty(u2net_home) {
            dir
        } else if let Some(base) = non_empty(data_home).or(home) {
            base.join(U2NET_DIR_NAME)
        } else {
            return Err(BgRemovalError::model(format!(
                "cannot locate {U2NET_MODEL_FILE}: no home directory found, set {U2NET_HOME_ENV}"
            )));
        };

        Ok(Self::from_path(model_dir.join(U2NET_MODEL_FILE)))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the model bytes
    ///
    /// # Errors
    /// - Model file is missing or unreadable
    pub fn load(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| {
            let download = format!("download {U2NET_MODEL_FILE} into {}", self.dir_display());
            let relocate = format!("or point {U2NET_HOME_ENV} at the directory containing it");
            BgRemovalError::model_error_with_context(
                "load",
                &self.path,
                &e.to_string(),
                &[download.as_str(), relocate.as_str()],
            )
        })
    }

    /// Directory that holds the model file
    #[must_use]
    pub fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn dir_display(&self) -> String {
        self.directory().display().to_string()
    }
}

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # remove-bg
//!
//! Removes the background from one image file and writes a transparent PNG
//! next to it.
//!
//! The pipeline is deliberately small: read the input bytes, hand them to a
//! [`RemovalCapability`], write the returned bytes, and tell the user what
//! happened. The bundled capability, [`SegmentationRemover`], runs the U²-Net
//! segmentation model through the pure Rust Tract runtime.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use remove_bg::{BackgroundRemover, ConsoleStatusReporter, RemovalConfig, SegmentationRemover};
//!
//! # fn example() -> remove_bg::Result<()> {
//! let config = RemovalConfig::builder()
//!     .input_path("photo.jpg")
//!     .output_path("photo_transparent.png")
//!     .build()?;
//!
//! let mut remover = BackgroundRemover::new(config, SegmentationRemover::u2net()?);
//! remover.run(&mut ConsoleStatusReporter::stdout())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom capabilities
//!
//! Any `FnMut(&[u8]) -> Result<Vec<u8>>` closure can stand in for the model:
//!
//! ```rust
//! use remove_bg::{BackgroundRemover, NoOpStatusReporter, RemovalConfig, Result};
//!
//! let config = RemovalConfig::builder()
//!     .input_path("does-not-exist.png")
//!     .output_path("out.png")
//!     .build()
//!     .unwrap();
//! let identity = |bytes: &[u8]| -> Result<Vec<u8>> { Ok(bytes.to_vec()) };
//!
//! let err = BackgroundRemover::new(config, identity)
//!     .run(&mut NoOpStatusReporter)
//!     .unwrap_err();
//! assert_eq!(err.kind(), remove_bg::ErrorKind::FileNotFound);
//! ```
//!
//! ### Feature Flags
//!
//! - `tract` (default): Tract backend and [`SegmentationRemover::u2net`]
//! - `download` (default): fetch a missing `u2net.onnx` on first use
//! - `cli` (default): command-line interface and tracing subscriber setup
//! - `webp-support`: WebP input decoding
//! - `tracing-json`: JSON diagnostics output

pub mod backends;
pub mod capability;
#[cfg(all(feature = "cli", feature = "tract"))]
pub mod cli;
pub mod config;
#[cfg(feature = "download")]
pub mod download;
pub mod error;
pub mod inference;
pub mod models;
pub mod processor;
pub mod remover;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;
pub mod utils;

pub use backends::MockBackend;
#[cfg(feature = "tract")]
pub use backends::TractBackend;
pub use capability::RemovalCapability;
pub use config::{RemovalConfig, RemovalConfigBuilder};
#[cfg(feature = "download")]
pub use download::{HttpFetcher, ModelDownloader, ModelFetcher, ModelSource};
pub use error::{BgRemovalError, ErrorKind, Result};
pub use inference::InferenceBackend;
pub use models::{ModelLocation, PreprocessingConfig};
pub use processor::SegmentationRemover;
pub use remover::BackgroundRemover;
pub use services::{ConsoleStatusReporter, NoOpStatusReporter, PayloadIOService, StatusReporter};
pub use types::{ImagePayload, SegmentationMask};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};

//! Backend implementations for the segmentation model
//!
//! - Tract backend (pure Rust, no external dependencies)
//! - Mock backend (deterministic masks for tests without a model file)

pub mod mock;

#[cfg(feature = "tract")]
pub mod tract;

pub use self::mock::MockBackend;

#[cfg(feature = "tract")]
pub use self::tract::TractBackend;

//! Helpers shared by the processing pipeline

pub mod preprocessing;

pub use preprocessing::ImagePreprocessor;

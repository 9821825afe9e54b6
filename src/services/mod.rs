//! Services that keep file handling and user output out of the pipeline

pub mod io;
pub mod status;

pub use io::PayloadIOService;
pub use status::{ConsoleStatusReporter, NoOpStatusReporter, StatusReporter};

//! The read → transform → write → report pipeline

use crate::{
    capability::RemovalCapability,
    config::RemovalConfig,
    error::Result,
    services::{PayloadIOService, StatusReporter},
};
use instant::Instant;
use tracing::{debug, info, info_span};

/// Runs one background removal over the configured paths
///
/// The input file is only ever read. The output file is written once, after
/// the capability has returned successfully, so any failure leaves
/// `output_path` untouched.
pub struct BackgroundRemover<C: RemovalCapability> {
    config: RemovalConfig,
    capability: C,
}

impl<C: RemovalCapability> BackgroundRemover<C> {
    pub fn new(config: RemovalConfig, capability: C) -> Self {
        Self { config, capability }
    }

    #[must_use]
    pub fn config(&self) -> &RemovalConfig {
        &self.config
    }

    /// Run the pipeline and report every outcome through `reporter`
    ///
    /// The error is returned after it has been reported so the caller can
    /// pick an exit status; it needs no further presentation.
    ///
    /// # Errors
    /// - `FileNotFound` when the input file does not exist
    /// - Any read, removal or write failure
    pub fn run<R: StatusReporter + ?Sized>(&mut self, reporter: &mut R) -> Result<()> {
        let input = self.config.input_path.clone();
        let output = self.config.output_path.clone();
        let _span = info_span!(
            "remove_background",
            input = %input.display(),
            output = %output.display()
        )
        .entered();

        reporter.report_start(&input);
        match self.process() {
            Ok(()) => {
                reporter.report_success(&input, &output);
                Ok(())
            },
            Err(e) => {
                tracing::error!(error = %e, kind = ?e.kind(), "Background removal failed");
                reporter.report_failure(&input, &e);
                Err(e)
            },
        }
    }

    fn process(&mut self) -> Result<()> {
        let start = Instant::now();

        let payload = PayloadIOService::read_payload(&self.config.input_path)?;
        debug!(bytes = payload.len(), "Loaded input image");

        let transformed = self.capability.transform(&payload)?;
        debug!(bytes = transformed.len(), "Background removed");

        PayloadIOService::write_payload(&self.config.output_path, &transformed)?;

        info!(
            input_bytes = payload.len(),
            output_bytes = transformed.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Saved cut-out image"
        );
        Ok(())
    }
}

//! Human-readable status reporting
//!
//! Status lines are meant for the person running the tool. They are written
//! to a plain writer rather than through `tracing`, so they read the same at
//! every log verbosity.

use crate::error::BgRemovalError;
use std::io::Write;
use std::path::Path;

/// Receives the outcome of each pipeline step
pub trait StatusReporter {
    /// Processing of `input` is about to start
    fn report_start(&mut self, input: &Path);

    /// The cut-out image was saved to `output`
    fn report_success(&mut self, input: &Path, output: &Path);

    /// The pipeline stopped because of `error`
    fn report_failure(&mut self, input: &Path, error: &BgRemovalError);
}

/// Reporter that writes status lines to any `Write` sink
///
/// The CLI uses stdout; tests hand in a `Vec<u8>` and inspect the text.
pub struct ConsoleStatusReporter<W: Write> {
    out: W,
}

impl ConsoleStatusReporter<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleStatusReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "Failed to write status line");
        }
    }
}

impl<W: Write> StatusReporter for ConsoleStatusReporter<W> {
    fn report_start(&mut self, input: &Path) {
        self.line(&format!("배경 제거 중: {}", input.display()));
    }

    fn report_success(&mut self, input: &Path, output: &Path) {
        self.line(&format!("✅ 완료! 저장 위치: {}", output.display()));
        // Replacing the original stays a manual step.
        self.line("원본 파일을 교체하려면:");
        self.line(&format!("  mv {} {}", output.display(), input.display()));
    }

    fn report_failure(&mut self, _input: &Path, error: &BgRemovalError) {
        match error {
            BgRemovalError::FileNotFound { path } => {
                self.line(&format!("❌ 오류: {} 파일을 찾을 수 없습니다.", path.display()));
            },
            _ => self.line(&format!("❌ 오류 발생: {error}")),
        }
    }
}

/// Reporter that discards everything
pub struct NoOpStatusReporter;

impl StatusReporter for NoOpStatusReporter {
    fn report_start(&mut self, _input: &Path) {}

    fn report_success(&mut self, _input: &Path, _output: &Path) {}

    fn report_failure(&mut self, _input: &Path, _error: &BgRemovalError) {}
}

//! Payload I/O operations service
//!
//! This module keeps file handling out of the pipeline logic. Every file
//! handle opened here is scoped to a single call and closed on return,
//! whether the call succeeds or not.

use crate::{
    error::{BgRemovalError, Result},
    types::ImagePayload,
};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Service for reading and writing encoded image payloads
pub struct PayloadIOService;

impl PayloadIOService {
    /// Read the full contents of an image file
    ///
    /// # Errors
    /// - [`BgRemovalError::FileNotFound`] when `path` does not exist
    /// - [`BgRemovalError::Io`] for any other read failure
    pub fn read_payload<P: AsRef<Path>>(path: P) -> Result<ImagePayload> {
        let path_ref = path.as_ref();

        let mut file = File::open(path_ref)
            .map_err(|e| BgRemovalError::input_io_error("open image file", path_ref, &e))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| BgRemovalError::input_io_error("read image data", path_ref, &e))?;

        tracing::debug!(path = %path_ref.display(), bytes = bytes.len(), "Read input payload");
        Ok(ImagePayload::new(bytes))
    }

    /// Write a payload to `path`, creating or replacing the file
    ///
    /// The bytes go to a temporary file next to the destination which is
    /// then renamed over it, so a failed write never leaves a truncated
    /// output behind. The parent directory is created if it is missing.
    ///
    /// # Errors
    /// - Parent directory cannot be created
    /// - Temporary file cannot be written or persisted
    pub fn write_payload<P: AsRef<Path>>(path: P, payload: &ImagePayload) -> Result<()> {
        let path_ref = path.as_ref();

        let parent = match path_ref.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)
            .map_err(|e| BgRemovalError::file_io_error("create output directory", parent, &e))?;

        let mut temp = NamedTempFile::new_in(parent)
            .map_err(|e| BgRemovalError::file_io_error("create temporary file in", parent, &e))?;
        temp.write_all(payload.as_bytes())
            .and_then(|()| temp.flush())
            .map_err(|e| BgRemovalError::file_io_error("write output image", path_ref, &e))?;

        temp.persist(path_ref)
            .map_err(|e| BgRemovalError::file_io_error("save output image", path_ref, &e.error))?;

        tracing::debug!(path = %path_ref.display(), bytes = payload.len(), "Wrote output payload");
        Ok(())
    }
}

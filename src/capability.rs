//! The removal capability seam
//!
//! The pipeline only knows that some collaborator turns one encoded image
//! into another with the background made transparent. How that happens is
//! up to the implementation: [`crate::processor::SegmentationRemover`] runs a
//! segmentation model, tests plug in closures.

use crate::error::Result;
use crate::types::ImagePayload;

/// A pure function from one encoded image to another
pub trait RemovalCapability {
    /// Remove the background from `payload`
    ///
    /// # Errors
    /// - Unsupported or corrupt input data
    /// - Failures of the underlying removal algorithm
    fn transform(&mut self, payload: &ImagePayload) -> Result<ImagePayload>;
}

impl<F> RemovalCapability for F
where
    F: FnMut(&[u8]) -> Result<Vec<u8>>,
{
    fn transform(&mut self, payload: &ImagePayload) -> Result<ImagePayload> {
        self(payload.as_bytes()).map(ImagePayload::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BgRemovalError;

    #[test]
    fn test_closure_is_a_capability() {
        let mut reverse = |bytes: &[u8]| -> Result<Vec<u8>> { Ok(bytes.iter().rev().copied().collect()) };
        let out = reverse.transform(&ImagePayload::from(&[1u8, 2, 3][..])).unwrap();
        assert_eq!(out.as_bytes(), &[3, 2, 1]);
    }

    #[test]
    fn test_closure_errors_propagate() {
        let mut failing = |_: &[u8]| -> Result<Vec<u8>> { Err(BgRemovalError::inference("model crashed")) };
        let err = failing.transform(&ImagePayload::default()).unwrap_err();
        assert!(err.to_string().contains("model crashed"));
    }
}

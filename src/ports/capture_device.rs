//! Capture Device Port - Camera access for automated analysis.
//!
//! Acquiring the device yields a [`CaptureStream`] that owns the underlying
//! tracks. The stream must be stopped on every exit path; callers wrap it in
//! a guard that stops it on drop.

use async_trait::async_trait;

use crate::domain::analysis::CapturedImage;

/// Port for acquiring a camera stream.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Opens the device. Fails with `PermissionDenied` or `Unavailable`.
    async fn acquire(&self) -> Result<Box<dyn CaptureStream>, CaptureError>;

    /// Number of tracks currently open on this device, across all streams.
    fn active_tracks(&self) -> usize;
}

/// An open camera stream.
#[async_trait]
pub trait CaptureStream: Send {
    /// Grabs the current frame.
    async fn grab_frame(&mut self) -> Result<CapturedImage, CaptureError>;

    /// Stops all tracks. Idempotent.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device unavailable: {0}")]
    Unavailable(String),

    #[error("frame capture failed: {0}")]
    FrameFailed(String),
}

impl CaptureError {
    /// Acquisition errors send the kind to manual input.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            CaptureError::PermissionDenied | CaptureError::Unavailable(_)
        )
    }
}

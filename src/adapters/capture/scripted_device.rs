//! Scripted capture device for tests and headless runs.
//!
//! Hands out streams that replay queued frames (or a default JPEG) and keeps
//! a shared count of open tracks so callers can verify that every stream was
//! stopped. Streams are not stopped on drop; releasing them is the caller's
//! job.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::analysis::CapturedImage;
use crate::ports::{CaptureDevice, CaptureError, CaptureStream};

type FrameQueue = Arc<Mutex<VecDeque<Result<CapturedImage, CaptureError>>>>;

#[derive(Debug, Clone)]
pub struct ScriptedCaptureDevice {
    denial: Option<CaptureError>,
    frames: FrameQueue,
    active_tracks: Arc<AtomicUsize>,
    acquisitions: Arc<AtomicUsize>,
    tracks_per_stream: usize,
    frame_delay: Duration,
}

impl Default for ScriptedCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedCaptureDevice {
    pub fn new() -> Self {
        Self {
            denial: None,
            frames: Arc::new(Mutex::new(VecDeque::new())),
            active_tracks: Arc::new(AtomicUsize::new(0)),
            acquisitions: Arc::new(AtomicUsize::new(0)),
            tracks_per_stream: 1,
            frame_delay: Duration::ZERO,
        }
    }

    /// Every `acquire` fails with `PermissionDenied`.
    pub fn denied() -> Self {
        Self::new().with_denial(CaptureError::PermissionDenied)
    }

    pub fn with_denial(mut self, error: CaptureError) -> Self {
        self.denial = Some(error);
        self
    }

    pub fn with_frame(self, image: CapturedImage) -> Self {
        self.frames.lock().unwrap().push_back(Ok(image));
        self
    }

    pub fn with_frame_error(self, error: CaptureError) -> Self {
        self.frames.lock().unwrap().push_back(Err(error));
        self
    }

    /// Tracks opened per stream (a real camera may expose audio + video).
    pub fn with_tracks_per_stream(mut self, tracks: usize) -> Self {
        self.tracks_per_stream = tracks;
        self
    }

    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureDevice for ScriptedCaptureDevice {
    async fn acquire(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
        if let Some(err) = &self.denial {
            return Err(err.clone());
        }
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        self.active_tracks
            .fetch_add(self.tracks_per_stream, Ordering::SeqCst);
        Ok(Box::new(ScriptedStream {
            frames: Arc::clone(&self.frames),
            active_tracks: Arc::clone(&self.active_tracks),
            tracks: self.tracks_per_stream,
            frame_delay: self.frame_delay,
            stopped: false,
        }))
    }

    fn active_tracks(&self) -> usize {
        self.active_tracks.load(Ordering::SeqCst)
    }
}

struct ScriptedStream {
    frames: FrameQueue,
    active_tracks: Arc<AtomicUsize>,
    tracks: usize,
    frame_delay: Duration,
    stopped: bool,
}

#[async_trait]
impl CaptureStream for ScriptedStream {
    async fn grab_frame(&mut self) -> Result<CapturedImage, CaptureError> {
        if self.stopped {
            return Err(CaptureError::FrameFailed("stream stopped".to_string()));
        }
        if !self.frame_delay.is_zero() {
            sleep(self.frame_delay).await;
        }
        let next = self.frames.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(CapturedImage::jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9])))
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.active_tracks.fetch_sub(self.tracks, Ordering::SeqCst);
        }
    }

    fn is_active(&self) -> bool {
        !self.stopped
    }
}

//! Capture device adapters.

mod scripted_device;

pub use scripted_device::ScriptedCaptureDevice;

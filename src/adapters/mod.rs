//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `classifier` - Analysis backend (HTTP multipart) and a queue-driven mock
//! - `capture` - Scripted camera for tests and headless runs
//! - `storage` - Local profile context (YAML file, in-memory)
//! - `profile_sync` - Backend user record (HTTP) and a recording double
//! - `notify` - Channel-backed onboarding listener

mod backend_client;

pub mod capture;
pub mod classifier;
pub mod notify;
pub mod profile_sync;
pub mod storage;

pub use backend_client::BackendClientConfig;
pub use capture::ScriptedCaptureDevice;
pub use classifier::{HttpImageClassifier, MockImageClassifier};
pub use notify::{ChannelListener, OnboardingEvent};
pub use profile_sync::{HttpProfileSync, RecordingProfileSync};
pub use storage::{FileProfileStore, InMemoryProfileStore};

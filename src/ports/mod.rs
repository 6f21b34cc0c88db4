//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Analysis Ports
//!
//! - `ImageClassifier` - Remote skin tone / face shape / body shape inference
//! - `CaptureDevice` - Camera acquisition and frame grabbing
//!
//! ## Profile Ports
//!
//! - `ProfileStore` - Local profile context (load/save/update/clear)
//! - `ProfileSync` - Backend user record
//!
//! ## Flow Ports
//!
//! - `OnboardingListener` - Completion and skip callbacks

mod capture_device;
mod image_classifier;
mod onboarding_listener;
mod profile_store;
mod profile_sync;

pub use capture_device::{CaptureDevice, CaptureError, CaptureStream};
pub use image_classifier::{Classification, ClassifierError, ImageClassifier};
pub use onboarding_listener::{NoopListener, OnboardingListener};
pub use profile_store::{ProfileStore, ProfileStoreError};
pub use profile_sync::{ProfileSync, ProfileSyncError};

//! Remote profile adapters.

mod http_profile_sync;
mod recording_profile_sync;

pub use http_profile_sync::HttpProfileSync;
pub use recording_profile_sync::RecordingProfileSync;

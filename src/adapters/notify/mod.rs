//! Onboarding listener adapters.

mod channel_listener;

pub use channel_listener::{ChannelListener, OnboardingEvent};

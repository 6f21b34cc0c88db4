//! Channel-backed onboarding listener.
//!
//! Forwards controller callbacks as [`OnboardingEvent`]s over an unbounded
//! tokio channel so a UI loop (or a test) can await them.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::analysis::AnalysisKind;
use crate::ports::OnboardingListener;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OnboardingEvent {
    Completed { kind: AnalysisKind, label: String },
    Skipped { kind: AnalysisKind },
}

#[derive(Debug, Clone)]
pub struct ChannelListener {
    sender: mpsc::UnboundedSender<OnboardingEvent>,
}

impl ChannelListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OnboardingEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: OnboardingEvent) {
        if self.sender.send(event).is_err() {
            warn!("Onboarding event dropped: receiver closed");
        }
    }
}

impl OnboardingListener for ChannelListener {
    fn on_complete(&self, kind: AnalysisKind, label: &str) {
        self.send(OnboardingEvent::Completed {
            kind,
            label: label.to_string(),
        });
    }

    fn on_skip(&self, kind: AnalysisKind) {
        self.send(OnboardingEvent::Skipped { kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_order() {
        let (listener, mut rx) = ChannelListener::new();
        listener.on_complete(AnalysisKind::SkinTone, "Warm");
        listener.on_skip(AnalysisKind::FaceShape);

        assert_eq!(
            rx.recv().await,
            Some(OnboardingEvent::Completed {
                kind: AnalysisKind::SkinTone,
                label: "Warm".to_string()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(OnboardingEvent::Skipped {
                kind: AnalysisKind::FaceShape
            })
        );
    }

    #[test]
    fn closed_receiver_does_not_panic() {
        let (listener, rx) = ChannelListener::new();
        drop(rx);
        listener.on_skip(AnalysisKind::BodyShape);
    }

    #[test]
    fn event_serializes_with_tag() {
        let json = serde_json::to_value(OnboardingEvent::Skipped {
            kind: AnalysisKind::BodyShape,
        })
        .unwrap();
        assert_eq!(json["event"], "skipped");
        assert_eq!(json["kind"], "body_shape");
    }
}

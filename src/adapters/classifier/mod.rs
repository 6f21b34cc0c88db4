//! Image classifier adapters.

mod http_classifier;
mod mock_classifier;

pub use http_classifier::{endpoint_path, parse_classification, response_field, HttpImageClassifier};
pub use mock_classifier::MockImageClassifier;

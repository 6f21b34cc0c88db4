//! AuraSync - Analysis reconciliation and personality scoring core
//!
//! This crate turns a fixed questionnaire into a four-letter personality code,
//! reconciles repeated noisy image classifications into one voted label, and
//! sequences the camera, upload and manual paths of onboarding.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

//! Relay service for mikan-translate
//!
//! A small axum application exposing one operation: accept a form-encoded
//! batch of texts, check the shared token, forward the batch to the Google
//! Translate API, and answer with the `{success, data}` envelope the page
//! translator expects. Stateless per request; every failure is a structured
//! JSON reply with an HTTP status, never a bare error.

pub mod config;
pub mod service;

pub use config::RelayConfig;
pub use service::{AppState, app};

//! Shared test mocks and fixtures for the Wayfare editor core.

mod api;
mod credentials;
mod fixtures;
mod logging;

pub use api::{FailingApi, RecordingApi};
pub use credentials::FixedCredentials;
pub use fixtures::{jpeg_fixture, sample_experience};
pub use logging::init_tracing;

//! Evidence service backends.
//!
//! - [`HttpEvidenceService`]: a remote JSON evidence service
//! - [`FixtureEvidenceService`]: a search result stored in a local file
//! - [`MockEvidenceService`](crate::service::MockEvidenceService): scripted
//!   responses, seeded with the bundled demo data
//!
//! Use [`create_service`] to instantiate the backend named in the config.

pub mod fixture;
pub mod http;

use crate::config::{ServiceBackend, ServiceConfig};
use crate::error::{ConfigError, EvidexError};
use crate::service::{EvidenceService, MockEvidenceService};
use std::sync::Arc;
use tracing::info;

pub use fixture::{FixtureData, FixtureEvidenceService};
pub use http::HttpEvidenceService;

/// Create the evidence service selected by `config.backend`.
pub fn create_service(config: &ServiceConfig) -> Result<Arc<dyn EvidenceService>, EvidexError> {
    let service: Arc<dyn EvidenceService> = match config.backend {
        ServiceBackend::Http => Arc::new(HttpEvidenceService::new(config)?),
        ServiceBackend::Fixture => {
            let path = config
                .fixture_path
                .as_deref()
                .ok_or_else(|| ConfigError::Invalid {
                    message: "service.fixture_path is required for the fixture backend".into(),
                })?;
            Arc::new(FixtureEvidenceService::from_path(path)?)
        }
        ServiceBackend::Mock => {
            let demo = FixtureData::demo()?;
            Arc::new(MockEvidenceService::new().with_fallback(demo.result, demo.suggestions))
        }
    };
    info!(backend = service.name(), "Evidence service ready");
    Ok(service)
}

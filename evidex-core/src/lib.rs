//! # Evidex Core
//!
//! Core library for the evidex evidence-search dashboard.
//! Provides the evidence model, matrix sorting, the study selection state
//! machine, the search session, the render projection, evidence service
//! clients, and configuration.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod providers;
pub mod selection;
pub mod service;
pub mod session;
pub mod sort;
pub mod types;
pub mod view;

// Re-export commonly used types at the crate root.
pub use config::{EvidexConfig, ServiceBackend, load_config};
pub use dashboard::Dashboard;
pub use error::{ConfigError, EvidexError, Result, SearchFailure, SuggestionFailure};
pub use providers::create_service;
pub use selection::{SelectionController, SelectionState};
pub use service::{EvidenceService, MockEvidenceService};
pub use session::{SearchCompletion, SearchSession, SearchTicket, SuggestTicket};
pub use sort::{SortDirection, SortKey, SortSpec, sort_studies};
pub use types::{
    EvidenceGrade, OutcomeGroup, RiskOfBias, SearchResult, Study, StudyId, StudyType,
};
pub use view::{DetailPanel, RenderMode, ResolvedOutcome, ViewModel, YearCount};

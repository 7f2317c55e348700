//! Offline evidence service backed by a JSON file.
//!
//! The file holds one search result plus an optional `suggestions` list.
//! Every search returns that result with the query echoed into it.

use crate::error::{EvidexError, SearchFailure, SuggestionFailure};
use crate::service::{EvidenceService, filter_suggestions, validate_result};
use crate::types::SearchResult;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

const DEMO_FIXTURE: &str = include_str!("../../fixtures/metformin.json");

/// Parsed contents of a fixture file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureData {
    #[serde(flatten)]
    pub result: SearchResult,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl FixtureData {
    pub fn from_json(json: &str) -> Result<Self, EvidexError> {
        let data: FixtureData = serde_json::from_str(json)?;
        let result = validate_result(data.result)?;
        Ok(Self {
            result,
            suggestions: data.suggestions,
        })
    }

    pub fn load(path: &Path) -> Result<Self, EvidexError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The bundled metformin example.
    pub fn demo() -> Result<Self, EvidexError> {
        Self::from_json(DEMO_FIXTURE)
    }
}

pub struct FixtureEvidenceService {
    data: FixtureData,
}

impl FixtureEvidenceService {
    pub fn new(data: FixtureData) -> Self {
        Self { data }
    }

    pub fn from_path(path: &Path) -> Result<Self, EvidexError> {
        let data = FixtureData::load(path)?;
        info!(
            path = %path.display(),
            studies = data.result.evidence_matrix.len(),
            "Loaded evidence fixture"
        );
        Ok(Self::new(data))
    }
}

#[async_trait]
impl EvidenceService for FixtureEvidenceService {
    async fn search(&self, query: &str) -> Result<SearchResult, SearchFailure> {
        let mut result = self.data.result.clone();
        result.query = query.to_string();
        Ok(result)
    }

    async fn suggest(&self, partial_query: &str) -> Result<Vec<String>, SuggestionFailure> {
        Ok(filter_suggestions(&self.data.suggestions, partial_query))
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_fixture_parses() {
        let data = FixtureData::demo().unwrap();
        assert_eq!(data.result.evidence_matrix.len(), 6);
        assert_eq!(data.result.outcomes.len(), 3);
        assert!(!data.suggestions.is_empty());
    }

    #[test]
    fn test_fixture_without_suggestions() {
        let data = FixtureData::from_json(
            r#"{"summary": "s", "keyTakeaways": [], "evidenceMatrix": []}"#,
        )
        .unwrap();
        assert!(data.suggestions.is_empty());
        assert!(data.result.evidence_matrix.is_empty());
    }

    #[test]
    fn test_fixture_rejects_duplicate_ids() {
        let json = r#"{
            "summary": "s", "keyTakeaways": [],
            "evidenceMatrix": [
                {"id": "a", "title": "t", "year": 2020, "type": "RCT", "grade": "WEAK"},
                {"id": "a", "title": "t", "year": 2021, "type": "RCT", "grade": "WEAK"}
            ]
        }"#;
        assert!(matches!(
            FixtureData::from_json(json),
            Err(EvidexError::Search(SearchFailure::Malformed { .. }))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        std::fs::write(&path, DEMO_FIXTURE).unwrap();
        let service = FixtureEvidenceService::from_path(&path).unwrap();
        assert_eq!(service.name(), "fixture");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FixtureEvidenceService::from_path(&dir.path().join("nope.json"));
        assert!(matches!(err, Err(EvidexError::Io(_))));
    }

    #[tokio::test]
    async fn test_search_echoes_query() {
        let service = FixtureEvidenceService::new(FixtureData::demo().unwrap());
        let result = service.search("statins").await.unwrap();
        assert_eq!(result.query, "statins");
        assert_eq!(result.evidence_matrix.len(), 6);
    }

    #[tokio::test]
    async fn test_suggest_filters_case_insensitively() {
        let service = FixtureEvidenceService::new(FixtureData::demo().unwrap());
        let suggestions = service.suggest("glp-1").await.unwrap();
        assert_eq!(
            suggestions,
            vec![
                "GLP-1 agonists side effects".to_string(),
                "GLP-1 agonists and cardiovascular outcomes".to_string(),
            ]
        );
    }
}

//! Core type definitions for evidex.
//!
//! Defines the evidence model received from the search service: studies,
//! their categorical labels, and the synthesized search result that owns them.
//! All of these are immutable once deserialized.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier of a study, unique within one [`SearchResult`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyId(String);

impl StudyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StudyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StudyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for StudyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Research design of a study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudyType {
    #[serde(rename = "RCT")]
    Rct,
    #[serde(rename = "Meta-Analysis", alias = "Meta Analysis")]
    MetaAnalysis,
    #[serde(rename = "Systematic Review", alias = "Systematic-Review")]
    SystematicReview,
    #[serde(rename = "Observational")]
    Observational,
    #[serde(
        rename = "Clinical Guideline",
        alias = "Clinical-Guideline",
        alias = "Guideline"
    )]
    ClinicalGuideline,
}

impl StudyType {
    /// Label as shown in the matrix and used for lexicographic sorting.
    pub fn label(&self) -> &'static str {
        match self {
            StudyType::Rct => "RCT",
            StudyType::MetaAnalysis => "Meta-Analysis",
            StudyType::SystematicReview => "Systematic Review",
            StudyType::Observational => "Observational",
            StudyType::ClinicalGuideline => "Clinical Guideline",
        }
    }
}

impl std::fmt::Display for StudyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative strength-of-evidence label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EvidenceGrade {
    Strong,
    Moderate,
    Weak,
    Conflicting,
}

impl EvidenceGrade {
    pub fn label(&self) -> &'static str {
        match self {
            EvidenceGrade::Strong => "STRONG",
            EvidenceGrade::Moderate => "MODERATE",
            EvidenceGrade::Weak => "WEAK",
            EvidenceGrade::Conflicting => "CONFLICTING",
        }
    }
}

impl std::fmt::Display for EvidenceGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Assessed risk of bias for a study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskOfBias {
    Low,
    #[default]
    Moderate,
    High,
}

impl std::fmt::Display for RiskOfBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskOfBias::Low => write!(f, "Low"),
            RiskOfBias::Moderate => write!(f, "Moderate"),
            RiskOfBias::High => write!(f, "High"),
        }
    }
}

/// One clinical research record in the evidence matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub id: StudyId,
    pub title: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub journal: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub study_type: StudyType,
    #[serde(default)]
    pub sample_size: u32,
    #[serde(default)]
    pub population: String,
    #[serde(default)]
    pub intervention: String,
    #[serde(default)]
    pub outcome: String,
    pub grade: EvidenceGrade,
    #[serde(default)]
    pub pubmed_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub abstract_snippet: String,
    #[serde(default)]
    pub risk_of_bias: RiskOfBias,
}

impl Study {
    /// Create a study with only the fields the service is required to send.
    pub fn new(
        id: impl Into<StudyId>,
        title: impl Into<String>,
        year: i32,
        study_type: StudyType,
        grade: EvidenceGrade,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: String::new(),
            journal: String::new(),
            year,
            study_type,
            sample_size: 0,
            population: String::new(),
            intervention: String::new(),
            outcome: String::new(),
            grade,
            pubmed_id: String::new(),
            url: String::new(),
            abstract_snippet: String::new(),
            risk_of_bias: RiskOfBias::default(),
        }
    }
}

/// Findings grouped by outcome category, referencing studies by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeGroup {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, rename = "studies")]
    pub study_ids: Vec<StudyId>,
}

/// One synthesized answer to a query. Replaced wholesale by the next search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub query: String,
    pub summary: String,
    pub key_takeaways: Vec<String>,
    pub evidence_matrix: Vec<Study>,
    #[serde(default)]
    pub outcomes: Vec<OutcomeGroup>,
    #[serde(default)]
    pub limitations: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl SearchResult {
    /// A result carrying only an evidence matrix.
    pub fn with_studies(query: impl Into<String>, studies: Vec<Study>) -> Self {
        Self {
            query: query.into(),
            summary: String::new(),
            key_takeaways: Vec::new(),
            evidence_matrix: studies,
            outcomes: Vec::new(),
            limitations: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// Look up a study of this result's evidence matrix.
    pub fn study(&self, id: &StudyId) -> Option<&Study> {
        self.evidence_matrix.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &StudyId) -> bool {
        self.study(id).is_some()
    }

    /// First id that appears more than once in the evidence matrix, if any.
    pub fn duplicate_study_id(&self) -> Option<&StudyId> {
        let mut seen = HashSet::new();
        self.evidence_matrix
            .iter()
            .map(|s| &s.id)
            .find(|id| !seen.insert(*id))
    }
}

//! Evidence matrix ordering.
//!
//! Produces a sorted view over the studies of a result without touching the
//! result itself. Ordering is stable: studies with equal keys keep the order
//! the service returned them in, whichever direction is active.

use crate::types::Study;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sortable matrix column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Year,
    Type,
    Population,
    Outcome,
    Grade,
}

impl SortKey {
    /// Columns in matrix display order.
    pub const ALL: [SortKey; 5] = [
        SortKey::Year,
        SortKey::Type,
        SortKey::Population,
        SortKey::Outcome,
        SortKey::Grade,
    ];

    /// Column header text.
    pub fn header(&self) -> &'static str {
        match self {
            SortKey::Year => "Year",
            SortKey::Type => "Study Type",
            SortKey::Population => "Population",
            SortKey::Outcome => "Outcome",
            SortKey::Grade => "Grade",
        }
    }

    /// Column for a 1-based column number, as bound to the digit keys.
    pub fn from_column(column: usize) -> Option<SortKey> {
        column
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    fn compare(&self, a: &Study, b: &Study) -> Ordering {
        match self {
            SortKey::Year => a.year.cmp(&b.year),
            SortKey::Type => a.study_type.label().cmp(b.study_type.label()),
            SortKey::Population => a.population.cmp(&b.population),
            SortKey::Outcome => a.outcome.cmp(&b.outcome),
            SortKey::Grade => a.grade.label().cmp(b.grade.label()),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "year" => Ok(SortKey::Year),
            "type" | "studytype" | "study_type" => Ok(SortKey::Type),
            "population" => Ok(SortKey::Population),
            "outcome" => Ok(SortKey::Outcome),
            "grade" => Ok(SortKey::Grade),
            other => Err(format!(
                "unknown sort key '{other}' (expected year, type, population, outcome, grade)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Active ordering of the evidence matrix. Kept across searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::Year,
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header click: the active column flips direction, any other column
    /// becomes active in descending order.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Descending,
            }
        }
    }
}

/// Return the studies ordered by `spec`. The input slice is left untouched.
pub fn sort_studies<'a>(studies: &'a [Study], spec: SortSpec) -> Vec<&'a Study> {
    let mut ordered: Vec<&Study> = studies.iter().collect();
    // Must stay a stable sort: ties keep input order in both directions.
    ordered.sort_by(|a, b| {
        let ord = spec.key.compare(a, b);
        match spec.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    ordered
}

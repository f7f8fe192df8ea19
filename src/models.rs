//! Core data models used throughout the catalog pipeline.
//!
//! These types represent the course and program records extracted from the
//! catalog document and the ranked search results built on top of them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The two record families the catalog yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Course,
    Program,
}

impl RecordKind {
    /// Singular noun used in human-readable output.
    pub fn noun(self) -> &'static str {
        match self {
            RecordKind::Course => "course",
            RecordKind::Program => "program",
        }
    }

    /// Plural form, as used in CLI arguments and URL paths.
    pub fn plural(self) -> &'static str {
        match self {
            RecordKind::Course => "courses",
            RecordKind::Program => "programs",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "course" | "courses" => Ok(RecordKind::Course),
            "program" | "programs" => Ok(RecordKind::Program),
            other => Err(format!(
                "unknown record kind '{}'. Use courses or programs.",
                other
            )),
        }
    }
}

/// Department (or degree label) and the college that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub department: String,
    pub college: String,
}

/// A parsed course or graduate program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRecord {
    pub kind: RecordKind,
    /// `"CS 5100"` for courses, `"Data Science, MS"` for programs.
    pub id: String,
    pub name: String,
    pub description: String,
    pub classification: Classification,
    pub keywords: BTreeSet<String>,
    pub credits: Option<f32>,
    pub concentrations: Vec<String>,
    /// 1-based page the record was first seen on.
    pub page: Option<usize>,
}

impl CatalogRecord {
    /// Leading code of the identifier: the subject prefix for a course
    /// (`"CS"`), the degree for a program (`"MS"`).
    pub fn prefix(&self) -> &str {
        match self.kind {
            RecordKind::Course => course_prefix(&self.id),
            RecordKind::Program => self
                .id
                .rsplit_once(',')
                .map(|(_, degree)| degree.trim())
                .unwrap_or(""),
        }
    }
}

/// Leading alphabetic run of a course identifier.
pub fn course_prefix(id: &str) -> &str {
    let trimmed = id.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}

/// A record matched by a query, with its score and explanation.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub record: CatalogRecord,
    pub score: f64,
    pub matched_terms: Vec<String>,
    pub justification: String,
}

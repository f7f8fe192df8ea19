//! Weighted field-match relevance search over cached catalog records.
//!
//! Every query term is tested case-insensitively against five fields in a
//! fixed order. Each hit adds that field's weight:
//!
//! | Field | Test | Weight |
//! |-------|------|--------|
//! | identifier | substring | 10 |
//! | name | substring | 8 |
//! | department or college | substring | 4 |
//! | keywords | exact member | 5 |
//! | description | substring | 3 |
//!
//! Records with no matching term are dropped. Results are ranked by score
//! descending, then identifier ascending.

use anyhow::Result;

use crate::config::Config;
use crate::models::{CatalogRecord, RecordKind, SearchResult};
use crate::service::CatalogService;

const MIN_TERM_CHARS: usize = 2;
const MAX_REASONS: usize = 3;
const PREVIEW_CHARS: usize = 150;

/// A parsed free-text query: case-folded, deduplicated terms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    /// Splits a query into terms.
    ///
    /// A query containing a comma is a list of phrases separated by commas
    /// or plus signs (`"machine learning, ai"`). Otherwise whitespace and
    /// plus signs separate single-word terms (`"robotics ai"`). Terms shorter
    /// than two characters are dropped.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let pieces: Vec<&str> = if lower.contains(',') {
            lower.split([',', '+']).collect()
        } else {
            lower
                .split(|c: char| c.is_whitespace() || c == '+')
                .collect()
        };

        let mut terms: Vec<String> = Vec::new();
        for piece in pieces {
            let term = piece.split_whitespace().collect::<Vec<_>>().join(" ");
            if term.chars().count() >= MIN_TERM_CHARS && !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Record fields a term can match, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Identifier,
    Name,
    Classification,
    Keyword,
    Description,
}

impl MatchField {
    pub const ALL: [MatchField; 5] = [
        MatchField::Identifier,
        MatchField::Name,
        MatchField::Classification,
        MatchField::Keyword,
        MatchField::Description,
    ];

    pub fn weight(self) -> f64 {
        match self {
            MatchField::Identifier => 10.0,
            MatchField::Name => 8.0,
            MatchField::Classification => 4.0,
            MatchField::Keyword => 5.0,
            MatchField::Description => 3.0,
        }
    }

    /// Whether `term` (already lower-cased) hits this field of `record`.
    pub fn matches(self, record: &CatalogRecord, term: &str) -> bool {
        match self {
            MatchField::Identifier => contains_folded(&record.id, term),
            MatchField::Name => contains_folded(&record.name, term),
            MatchField::Classification => {
                contains_folded(&record.classification.department, term)
                    || contains_folded(&record.classification.college, term)
            }
            MatchField::Keyword => record.keywords.contains(term),
            MatchField::Description => contains_folded(&record.description, term),
        }
    }

    fn reason(self, kind: RecordKind, term: &str) -> String {
        match self {
            MatchField::Identifier => format!("{} number matches '{}'", kind.noun(), term),
            MatchField::Name => format!("title contains '{}'", term),
            MatchField::Classification => {
                format!("offered by a department or college matching '{}'", term)
            }
            MatchField::Keyword => format!("related to '{}'", term),
            MatchField::Description => format!("covers topics in '{}'", term),
        }
    }
}

fn contains_folded(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}

/// Scores one record. `None` when no term matches.
pub fn score_record(record: &CatalogRecord, query: &Query) -> Option<SearchResult> {
    let mut score = 0.0;
    let mut matched_terms = Vec::new();
    let mut reasons = Vec::new();

    for term in query.terms() {
        let mut first_hit = None;
        for field in MatchField::ALL {
            if field.matches(record, term) {
                score += field.weight();
                first_hit.get_or_insert(field);
            }
        }
        if let Some(field) = first_hit {
            matched_terms.push(term.clone());
            reasons.push(field.reason(record.kind, term));
        }
    }

    if matched_terms.is_empty() {
        return None;
    }

    Some(SearchResult {
        justification: justify(record, &reasons),
        record: record.clone(),
        score,
        matched_terms,
    })
}

fn justify(record: &CatalogRecord, reasons: &[String]) -> String {
    let shown = &reasons[..reasons.len().min(MAX_REASONS)];
    let mut text = format!(
        "This {} is relevant because {}.",
        record.kind.noun(),
        shown.join(", ")
    );
    let preview = description_preview(&record.description);
    if !preview.is_empty() {
        text.push(' ');
        text.push_str(&preview);
    }
    text
}

/// The description cut to 150 characters, with `...` when it was longer.
pub fn description_preview(description: &str) -> String {
    let description = description.trim();
    match description.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &description[..idx]),
        None => description.to_string(),
    }
}

/// Ranks `records` against `query`, keeping at most `limit` results.
pub fn search(records: &[CatalogRecord], query: &Query, limit: usize) -> Vec<SearchResult> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = records
        .iter()
        .filter_map(|record| score_record(record, query))
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.record.id.cmp(&b.record.id))
    });
    results.truncate(limit);
    results
}

/// `catalog search`: ranks one record kind and prints the results.
pub async fn run_search(
    config: &Config,
    raw_query: &str,
    kind: RecordKind,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let service = CatalogService::from_config(config);
    let results = service.search(kind, raw_query, limit).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        let record = &result.record;
        println!("{}. [{:.1}] {}  {}", i + 1, result.score, record.id, record.name);
        println!(
            "    {} / {}",
            record.classification.college, record.classification.department
        );
        println!("    matched: {}", result.matched_terms.join(", "));
        println!("    why: {}", result.justification);
        println!();
    }

    Ok(())
}

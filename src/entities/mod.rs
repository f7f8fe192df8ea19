//! Recovery of course and program entities from normalized catalog text.
//!
//! Each record family has an ordered list of pattern strategies
//! ([`CoursePattern`], [`ProgramPattern`]). Strategies run in order over the
//! same text and the first strategy to produce an identifier owns it.

mod course;
mod program;

pub use course::{clean_course_name, extract_courses, CourseMatch, CoursePattern};
pub use program::{describe_program, extract_programs, ProgramMatch, ProgramPattern};

use crate::classify::classify;
use crate::keywords::generate_keywords;
use crate::models::{CatalogRecord, RecordKind};

/// An extracted entity before classification and keyword expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub credits: Option<f32>,
    pub concentrations: Vec<String>,
}

impl Entity {
    /// Classifies the entity and expands its keywords.
    pub fn into_record(self, kind: RecordKind, page: Option<usize>) -> CatalogRecord {
        let classification = classify(kind, &self.id);
        let mut record = CatalogRecord {
            kind,
            id: self.id,
            name: self.name,
            description: self.description,
            classification,
            keywords: Default::default(),
            credits: self.credits,
            concentrations: self.concentrations,
            page,
        };
        record.keywords =
            generate_keywords(record.prefix(), &record.classification, &record.name);
        record
    }
}

/// Words that join title fragments. Stripped from the ends of names.
const CONJUNCTIONS: &[&str] = &["and", "or", "for", "of", "in", "with", "to", "the"];

fn is_conjunction(word: &str) -> bool {
    CONJUNCTIONS.iter().any(|c| c.eq_ignore_ascii_case(word))
}

/// Collapses runs of whitespace into single spaces and trims the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max_chars` characters on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_record_classifies_and_expands() {
        let entity = Entity {
            id: "CS 6140".to_string(),
            name: "Machine Learning".to_string(),
            description: String::new(),
            credits: Some(4.0),
            concentrations: Vec::new(),
        };
        let record = entity.into_record(RecordKind::Course, Some(12));
        assert_eq!(record.classification.department, "Computer Science");
        assert!(record.keywords.contains("cs"));
        assert!(record.keywords.contains("computer science"));
        assert!(record.keywords.contains("ml"));
        assert_eq!(record.page, Some(12));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("Bouvé College", 5), "Bouvé");
        assert_eq!(truncate_chars("short", 50), "short");
    }

    #[test]
    fn collapse_joins_lines() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
    }
}

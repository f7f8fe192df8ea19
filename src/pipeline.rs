//! Parse pipeline: pages → normalize → extract → classify → keywords → dedup.
//!
//! Courses are extracted page by page so a bad page is skipped on its own.
//! Programs are extracted from the concatenated text of every readable page,
//! since their headings and descriptions regularly straddle page breaks.
//!
//! Records are deduplicated by identifier; the first occurrence (page order,
//! then pattern order) is kept and later duplicates are dropped.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::entities::{extract_courses, extract_programs};
use crate::extract::PageSource;
use crate::models::{CatalogRecord, RecordKind};
use crate::normalize::normalize_text;

const PROGRESS_EVERY: usize = 100;

/// What a parse produced, along with page accounting.
#[derive(Debug, Default)]
pub struct ParseReport {
    pub records: Vec<CatalogRecord>,
    pub pages: usize,
    pub failed_pages: Vec<usize>,
}

/// Parses records of the given kind from every page of `source`.
pub fn parse(kind: RecordKind, source: &dyn PageSource) -> ParseReport {
    match kind {
        RecordKind::Course => parse_courses(source),
        RecordKind::Program => parse_programs(source),
    }
}

/// Extracts courses page by page.
pub fn parse_courses(source: &dyn PageSource) -> ParseReport {
    let pages = source.page_count();
    let mut report = ParseReport {
        pages,
        ..Default::default()
    };
    let mut seen: HashSet<String> = HashSet::new();

    for page in 1..=pages {
        let text = match source.page_text(page) {
            Ok(text) => text,
            Err(e) => {
                warn!(page, error = %e, "skipping unreadable page");
                report.failed_pages.push(page);
                continue;
            }
        };

        let text = normalize_text(&text);
        for entity in extract_courses(&text) {
            if !seen.insert(entity.id.clone()) {
                debug!(id = %entity.id, page, "duplicate course ignored");
                continue;
            }
            report
                .records
                .push(entity.into_record(RecordKind::Course, Some(page)));
        }

        if page % PROGRESS_EVERY == 0 {
            info!(
                page,
                pages,
                courses = report.records.len(),
                "course extraction progress"
            );
        }
    }

    info!(
        courses = report.records.len(),
        pages,
        failed = report.failed_pages.len(),
        "course extraction finished"
    );
    report
}

/// Extracts programs from the whole-document text.
pub fn parse_programs(source: &dyn PageSource) -> ParseReport {
    let pages = source.page_count();
    let mut report = ParseReport {
        pages,
        ..Default::default()
    };
    let mut full_text = String::new();

    for page in 1..=pages {
        match source.page_text(page) {
            Ok(text) => {
                full_text.push_str(&normalize_text(&text));
                full_text.push('\n');
            }
            Err(e) => {
                warn!(page, error = %e, "skipping unreadable page");
                report.failed_pages.push(page);
            }
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    for entity in extract_programs(&full_text) {
        if seen.insert(entity.id.clone()) {
            report
                .records
                .push(entity.into_record(RecordKind::Program, None));
        }
    }

    info!(
        programs = report.records.len(),
        pages,
        failed = report.failed_pages.len(),
        "program extraction finished"
    );
    report
}

//! Catalog statistics overview.
//!
//! Summarizes what the parse produced: record counts per kind and per-college
//! and per-department breakdowns. Used by `catalog stats` to check that a new
//! catalog edition still parses sensibly.

use std::collections::BTreeMap;
use std::time::SystemTime;

use anyhow::Result;

use crate::config::Config;
use crate::models::{CatalogRecord, RecordKind};
use crate::service::CatalogService;

const TOP_DEPARTMENTS: usize = 15;

/// Number of records sharing one group label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub name: String,
    pub count: usize,
}

/// Groups records by `key`, largest groups first, ties by name.
pub fn count_by<F>(records: &[CatalogRecord], key: F) -> Vec<GroupCount>
where
    F: Fn(&CatalogRecord) -> &str,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(key(record)).or_default() += 1;
    }

    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(name, count)| GroupCount {
            name: name.to_string(),
            count,
        })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    groups
}

/// Run the stats command: parse both kinds and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let service = CatalogService::from_config(config);
    let courses = service.records(RecordKind::Course).await;
    let programs = service.records(RecordKind::Program).await;

    let path = &config.catalog.path;
    let metadata = std::fs::metadata(path).ok();
    let size = metadata.as_ref().map(|m| m.len()).unwrap_or(0);
    let modified = metadata
        .and_then(|m| m.modified().ok())
        .map(format_modified)
        .unwrap_or_else(|| "missing".to_string());

    println!("Course Catalog — Stats");
    println!("======================");
    println!();
    println!("  Document:    {}", path.display());
    println!("  Size:        {}", format_bytes(size));
    println!("  Modified:    {}", modified);
    println!();
    println!("  Courses:     {}", courses.len());
    println!("  Programs:    {}", programs.len());

    print_groups(
        "Courses by college",
        &count_by(&courses, |r| &r.classification.college),
        usize::MAX,
    );
    print_groups(
        "Courses by department",
        &count_by(&courses, |r| &r.classification.department),
        TOP_DEPARTMENTS,
    );
    print_groups(
        "Programs by college",
        &count_by(&programs, |r| &r.classification.college),
        usize::MAX,
    );

    println!();
    Ok(())
}

fn print_groups(title: &str, groups: &[GroupCount], max_rows: usize) {
    if groups.is_empty() {
        return;
    }
    println!();
    println!("  {}:", title);
    for group in groups.iter().take(max_rows) {
        println!("    {:<48} {:>6}", group.name, group.count);
    }
    if groups.len() > max_rows {
        println!("    ... {} more", groups.len() - max_rows);
    }
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

fn format_modified(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Utc>::from(time)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

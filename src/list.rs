//! `catalog list`: prints parsed records of one kind.

use anyhow::Result;

use crate::config::Config;
use crate::models::{CatalogRecord, RecordKind};
use crate::service::CatalogService;

pub async fn run_list(
    config: &Config,
    kind: RecordKind,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let service = CatalogService::from_config(config);
    let records = service.records(kind).await;
    let shown = &records[..limit.unwrap_or(records.len()).min(records.len())];

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No {} found.", kind);
        return Ok(());
    }

    for record in shown {
        println!("{}", summary_line(record));
    }
    if shown.len() < records.len() {
        println!("... {} of {} {}", shown.len(), records.len(), kind);
    }
    Ok(())
}

fn summary_line(record: &CatalogRecord) -> String {
    let mut line = format!("{:<12} {}", record.id, record.name);
    if let Some(credits) = record.credits {
        line.push_str(&format!("  ({} cr)", credits));
    }
    line.push_str(&format!("  [{}]", record.classification.college));
    line
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// A two-page plain-text catalog: courses on page one, programs on page two.
pub const FIXTURE: &str = "Graduate Catalog 2024-2025
CS 5100 Foundations of Artificial Intelligence (4 Hours)
Introduces the fundamental problems, theories, and algorithms of the artificial intelligence field.
CS6140MachineLearningAndDataMining
DS 5110 Introduction to Data Management and Processing
Covers the practical aspects of data management, storage and processing for analytics.
\x0cData Science, MS
The Master of Science in Data Science program prepares students to turn raw data into decisions. Students complete a curriculum spanning statistics and machine learning.
Program Requirements
Robotics, MS
Robotics is an interdisciplinary program that combines mechanical engineering, electrical engineering and computer science. The degree prepares graduates for careers in autonomous systems.
Admission Requirements
";

/// Writes `config/catalog.toml` under `root` pointing at `catalog_path`.
pub fn write_config(
    root: &Path,
    catalog_path: &Path,
    source_url: &str,
    timeout_secs: u64,
) -> PathBuf {
    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let content = format!(
        r#"[catalog]
path = "{}"
source_url = "{}"
fetch_timeout_secs = {}

[search]
max_results = 10

[server]
bind = "127.0.0.1:0"
"#,
        catalog_path.display(),
        source_url,
        timeout_secs
    );

    let config_path = config_dir.join("catalog.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}

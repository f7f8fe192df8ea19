//! Keyword expansion for catalog records.
//!
//! Keywords come from three places: the identifier prefix, the department
//! label, and a synonym table keyed by name substrings. Generation reads only
//! the immutable source fields of a record, never previously generated
//! keywords, so it is idempotent.

use std::collections::BTreeSet;

use crate::models::Classification;

/// `(name substring, synonyms added when it appears)`.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("artificial intelligence", &["ai", "artificial intelligence", "machine learning"]),
    ("machine learning", &["ml", "machine learning", "ai", "data science"]),
    ("deep learning", &["deep learning", "neural networks", "ai", "ml"]),
    ("neural network", &["neural networks", "deep learning", "ai", "ml"]),
    ("data science", &["data science", "analytics", "data", "statistics"]),
    ("data mining", &["data mining", "machine learning", "analytics", "data science"]),
    ("data visual", &["data visualization", "visualization", "data", "analytics"]),
    ("algorithm", &["algorithms", "programming", "computer science"]),
    ("pattern recognition", &["pattern recognition", "ml", "computer vision", "ai"]),
    ("computer vision", &["computer vision", "ai", "ml", "image processing"]),
    ("natural language", &["nlp", "natural language processing", "ai", "text mining"]),
    ("human-computer", &["hci", "human-computer interaction", "interaction", "ux"]),
    ("robotics", &["robotics", "robots", "engineering", "ai"]),
    ("database", &["database", "data", "sql", "data management"]),
    ("software", &["software", "programming", "development"]),
    ("programming", &["programming", "software", "coding"]),
    ("statistics", &["statistics", "statistical", "data", "analytics"]),
    ("numerical", &["numerical methods", "optimization", "mathematics"]),
    ("control", &["control systems", "engineering", "automation"]),
    ("mechanics", &["mechanics", "mechanical", "engineering"]),
    ("mixed reality", &["mixed reality", "vr", "ar", "virtual reality", "augmented reality"]),
    ("empirical", &["research methods", "empirical research", "data analysis"]),
    ("analytics", &["analytics", "data analytics", "business analytics", "data science"]),
    ("bioinformatics", &["bioinformatics", "computational biology", "data science"]),
    ("cybersecurity", &["cybersecurity", "security", "information security"]),
    ("cloud", &["cloud computing", "distributed systems", "aws", "azure"]),
    ("big data", &["big data", "data engineering", "hadoop", "spark"]),
];

/// Builds the keyword set for a record from its prefix, classification and
/// display name.
pub fn generate_keywords(
    prefix: &str,
    classification: &Classification,
    name: &str,
) -> BTreeSet<String> {
    let mut keywords = BTreeSet::new();

    let prefix = prefix.trim().to_lowercase();
    if !prefix.is_empty() {
        keywords.insert(prefix);
    }

    let department = classification.department.trim().to_lowercase();
    if !department.is_empty() {
        keywords.insert(department);
    }

    let name = name.to_lowercase();
    for (key, synonyms) in SYNONYMS {
        if name.contains(key) {
            keywords.extend(synonyms.iter().map(|s| s.to_string()));
        }
    }

    keywords
}

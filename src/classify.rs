//! Department and college lookup for catalog records.
//!
//! Courses are classified by subject prefix through a static table. Programs
//! are classified by degree and by terms in the program name. Both lookups
//! consult only the record identifier, so the same identifier always yields
//! the same classification.

use crate::models::{course_prefix, Classification, RecordKind};

/// College assigned when nothing in the tables applies.
pub const UNSCOPED_COLLEGE: &str = "(unscoped)";

const KHOURY: &str = "Khoury College of Computer Sciences";
const ENGINEERING: &str = "College of Engineering";
const SCIENCE: &str = "College of Science";
const HEALTH: &str = "Bouvé College of Health Sciences";
const BUSINESS: &str = "D'Amore-McKim School of Business";
const ARTS: &str = "College of Arts, Media and Design";

/// `(prefixes, department, college)`.
const SUBJECTS: &[(&[&str], &str, &str)] = &[
    (&["CS", "CSCI"], "Computer Science", KHOURY),
    (&["CY"], "Cybersecurity", KHOURY),
    (&["INFO", "IS"], "Information Systems", KHOURY),
    (&["DS", "DA"], "Data Science", KHOURY),
    (&["ME", "MECH"], "Mechanical Engineering", ENGINEERING),
    (&["EECE", "ECE"], "Electrical and Computer Engineering", ENGINEERING),
    (&["CIVE", "CIV"], "Civil and Environmental Engineering", ENGINEERING),
    (&["IE"], "Industrial Engineering", ENGINEERING),
    (&["ENGR"], "Engineering", ENGINEERING),
    (&["BINF"], "Bioinformatics", SCIENCE),
    (&["BIOL"], "Biology", SCIENCE),
    (&["CHEM"], "Chemistry", SCIENCE),
    (&["PHYS"], "Physics", SCIENCE),
    (&["MATH"], "Mathematics", SCIENCE),
    (&["PT"], "Physical Therapy", HEALTH),
    (&["MISM"], "Information Systems Management", BUSINESS),
    (&["ACCT"], "Accounting", BUSINESS),
    (&["FINA"], "Finance", BUSINESS),
    (&["MKTG"], "Marketing", BUSINESS),
    (&["BUSN"], "Business", BUSINESS),
    (&["ARTG"], "Art + Design", ARTS),
    (&["GSND"], "Game Science and Design", ARTS),
];

const DEGREES: &[(&str, &str)] = &[
    ("MS", "Master of Science"),
    ("MA", "Master of Arts"),
    ("MBA", "Master of Business Administration"),
    ("MED", "Master of Education"),
    ("MFA", "Master of Fine Arts"),
    ("PHD", "Doctor of Philosophy"),
    ("MPA", "Master of Public Administration"),
    ("MPS", "Master of Professional Studies"),
    ("GRADUATE CERTIFICATE", "Graduate Certificate"),
    ("CERTIFICATE", "Certificate"),
];

/// Program-name terms that identify the owning college, checked in order.
const PROGRAM_COLLEGES: &[(&[&str], &str)] = &[
    (
        &[
            "computer",
            "artificial intelligence",
            "data science",
            "cybersecurity",
            "information systems",
        ],
        KHOURY,
    ),
    (&["engineering", "robotics"], ENGINEERING),
    (
        &["business", "management", "finance", "marketing", "accounting"],
        BUSINESS,
    ),
    (
        &["biology", "chemistry", "physics", "mathematics", "bioinformatics"],
        SCIENCE,
    ),
    (&["design", "game", "media"], ARTS),
    (&["health", "therapy", "nursing"], HEALTH),
];

/// Classifies any identifier of the given kind. Total over all strings.
pub fn classify(kind: RecordKind, id: &str) -> Classification {
    match kind {
        RecordKind::Course => classify_course(id),
        RecordKind::Program => {
            let (name, degree) = id.rsplit_once(',').unwrap_or((id, ""));
            classify_program(name.trim(), degree.trim())
        }
    }
}

/// Maps a course identifier's subject prefix (case-insensitive) to its
/// department and college.
pub fn classify_course(id: &str) -> Classification {
    let prefix = course_prefix(id);
    let upper = prefix.to_ascii_uppercase();

    SUBJECTS
        .iter()
        .find(|(prefixes, _, _)| prefixes.contains(&upper.as_str()))
        .map(|(_, department, college)| Classification {
            department: department.to_string(),
            college: college.to_string(),
        })
        .unwrap_or_else(|| Classification {
            department: prefix.to_string(),
            college: UNSCOPED_COLLEGE.to_string(),
        })
}

/// Classifies a program by its degree label and the terms in its name.
pub fn classify_program(name: &str, degree: &str) -> Classification {
    Classification {
        department: degree_label(degree),
        college: program_college(name).to_string(),
    }
}

/// Expands a degree abbreviation. Unknown degrees are returned as given.
pub fn degree_label(degree: &str) -> String {
    let upper = degree.to_ascii_uppercase();
    DEGREES
        .iter()
        .find(|(abbrev, _)| *abbrev == upper)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| degree.to_string())
}

fn program_college(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    PROGRAM_COLLEGES
        .iter()
        .find(|(terms, _)| terms.iter().any(|t| lower.contains(t)))
        .map(|(_, college)| *college)
        .unwrap_or(UNSCOPED_COLLEGE)
}

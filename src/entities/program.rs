//! Graduate program extraction from the whole-document text.
//!
//! Program headings span page breaks often enough that programs are read
//! from the concatenated text of every page rather than page by page.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{collapse_whitespace, is_conjunction, truncate_chars, Entity};

const MIN_NAME_CHARS: usize = 3;
const MAX_NAME_CHARS: usize = 100;
/// Descriptions must be longer than this for the program to be accepted.
const MIN_DESCRIPTION_CHARS: usize = 50;
const WINDOW_CHARS: usize = 2000;
/// Section markers closer than this to the heading are ignored.
const MIN_MARKER_OFFSET: usize = 20;
const MAX_SENTENCES: usize = 3;
const MIN_SENTENCE_CHARS: usize = 30;

/// Degree tokens in canonical spelling, longest alternatives first.
const DEGREES: &[&str] = &[
    "Graduate Certificate",
    "Certificate",
    "MBA",
    "MEd",
    "MFA",
    "MPA",
    "MPS",
    "PhD",
    "MS",
    "MA",
];

const REJECTED_NAME_PARTS: &[&str] = &["Professor", "University", "College,"];
const REJECTED_SENTENCE_PARTS: &[&str] = &["Professor", "PhD,", "University,"];

/// A sentence must mention one of these to count as a program description.
const DESCRIPTION_CUES: &[&str] = &[
    "program",
    "master",
    "degree",
    "student",
    "curriculum",
    "designed",
    "provides",
    "prepares",
    "focuses",
    "offers",
];

/// Capitalized words, optionally joined by lower-case connectives.
const PROPER_NAME: &str = r"[A-Z][A-Za-z&-]*(?:[ \t]+(?:and|of|in|for|[A-Z][A-Za-z&-]*))*";

static NAMED_DEGREE: LazyLock<Regex> = LazyLock::new(|| {
    let degrees = DEGREES.join("|");
    Regex::new(&format!(
        r"(?m)^[ \t]*([A-Za-z][A-Za-z \t&,-]{{1,99}}?)[ \t]*,[ \t]*((?i:{degrees}))[ \t]*$"
    ))
    .expect("valid named degree pattern")
});

static MASTER_OF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i:master\s+of\s+(science|arts)\s+in)\s+({PROPER_NAME})"
    ))
    .expect("valid master-of pattern")
});

static CONCENTRATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"Concentration\s+in\s+({PROPER_NAME})"))
        .expect("valid concentration pattern")
});

/// Another program heading starting inside a description window.
static NEXT_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),\s*(?:MS|MA|MBA|PhD|MFA)\b").expect("valid heading pattern")
});

/// Where a program's introductory text ends.
static SECTION_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"Program Requirements",
        r"Core Requirements",
        r"Admission Requirements",
        r"Code\s+Title\s+Hours",
        r"Complete all courses",
        r"semester hours required",
        r"University Faculty",
        r"\d+\s*(?:total\s+)?semester\s+hours",
        r"Minimum.*GPA",
        r"Concentration Options",
        r"Electives",
        r"^\s*•",
        r"https?://",
        r"\d{3}[A-Za-z]",
        r"\.{5,}",
        r"\s+\d{3,4}\s*$",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?im){p}")).expect("valid section marker"))
    .collect()
});

static DOT_LEADERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{2,}").expect("valid dot leader pattern"));
static GLUED_PAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3,4}([A-Z])").expect("valid page number pattern"));
static URL_IN_PARENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\([^)]*https?://[^)]+\)").expect("valid parenthesized url pattern")
});
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S+").expect("valid url pattern"));
static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][^.!?]*[.!?]").expect("valid sentence pattern"));
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3,}").expect("valid digit run pattern"));

/// Program heading shapes, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramPattern {
    /// A line of the form `Data Science, MS`.
    NamedDegree,
    /// Running text of the form `Master of Science in Data Science`.
    MasterOf,
}

/// One heading match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramMatch<'t> {
    pub name: &'t str,
    /// Canonical degree token, e.g. `"MS"` or `"PhD"`.
    pub degree: &'static str,
    /// Byte offset just past the heading.
    pub end: usize,
}

impl ProgramPattern {
    pub const ALL: [ProgramPattern; 2] = [ProgramPattern::NamedDegree, ProgramPattern::MasterOf];

    pub fn matches(self, text: &str) -> Vec<ProgramMatch<'_>> {
        match self {
            ProgramPattern::NamedDegree => NAMED_DEGREE
                .captures_iter(text)
                .filter_map(|caps| {
                    Some(ProgramMatch {
                        name: caps.get(1)?.as_str(),
                        degree: canonical_degree(caps.get(2)?.as_str())?,
                        end: caps.get(0)?.end(),
                    })
                })
                .collect(),
            ProgramPattern::MasterOf => MASTER_OF
                .captures_iter(text)
                .filter_map(|caps| {
                    let degree = if caps.get(1)?.as_str().eq_ignore_ascii_case("arts") {
                        "MA"
                    } else {
                        "MS"
                    };
                    Some(ProgramMatch {
                        name: caps.get(2)?.as_str(),
                        degree,
                        end: caps.get(0)?.end(),
                    })
                })
                .collect(),
        }
    }
}

fn canonical_degree(token: &str) -> Option<&'static str> {
    DEGREES
        .iter()
        .copied()
        .find(|d| d.eq_ignore_ascii_case(token.trim()))
}

/// Extracts graduate programs from the full catalog text.
///
/// A program is kept only if a usable description follows its heading.
/// Name and degree together identify a program, case-insensitively.
pub fn extract_programs(text: &str) -> Vec<Entity> {
    let text = text.replace("\r\n", "\n");
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut programs = Vec::new();

    for pattern in ProgramPattern::ALL {
        for m in pattern.matches(&text) {
            let name = tidy_program_name(m.name);
            if !is_valid_program_name(&name) {
                continue;
            }

            let key = (name.to_lowercase(), m.degree.to_lowercase());
            if seen.contains(&key) {
                continue;
            }

            let after = &text[m.end..];
            let description = describe_program(after);
            if description.chars().count() <= MIN_DESCRIPTION_CHARS {
                continue;
            }

            seen.insert(key);
            programs.push(Entity {
                id: format!("{}, {}", name, m.degree),
                concentrations: concentrations(after),
                description,
                credits: None,
                name,
            });
        }
    }

    programs
}

fn tidy_program_name(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let mut words: Vec<&str> = collapsed
        .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
        .split(' ')
        .collect();
    while words.len() > 1 && words.last().is_some_and(|w| is_conjunction(w)) {
        words.pop();
    }
    words.join(" ")
}

fn is_valid_program_name(name: &str) -> bool {
    let len = name.chars().count();
    (MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&len)
        && !REJECTED_NAME_PARTS.iter().any(|p| name.contains(p))
}

/// The leading slice of `after` that belongs to the current program.
fn program_window(after: &str) -> &str {
    truncate_chars(after.trim_start(), WINDOW_CHARS)
}

/// Builds a program description from the text that follows its heading.
///
/// The window ends at the first section marker (requirements tables, URLs,
/// the next program heading and so on). Up to three descriptive sentences
/// are kept; failing that, the cleaned window itself if it is long enough.
pub fn describe_program(after: &str) -> String {
    let window = program_window(after);
    let cut = SECTION_MARKERS
        .iter()
        .chain(std::iter::once(&*NEXT_HEADING))
        .filter_map(|re| {
            re.find_iter(window)
                .map(|m| m.start())
                .find(|&i| i > MIN_MARKER_OFFSET)
        })
        .min()
        .unwrap_or(window.len());

    let raw = collapse_whitespace(&window[..cut]);
    let raw = DOT_LEADERS.replace_all(&raw, "");
    let raw = GLUED_PAGE_NUMBER.replace_all(&raw, " $1");
    let raw = URL_IN_PARENS.replace_all(&raw, "");
    let raw = URL.replace_all(&raw, "");
    let raw = collapse_whitespace(&raw);

    let sentences: Vec<&str> = SENTENCE
        .find_iter(&raw)
        .map(|m| m.as_str().trim())
        .filter(|s| is_descriptive_sentence(s))
        .take(MAX_SENTENCES)
        .collect();

    if !sentences.is_empty() {
        return sentences.join(" ");
    }
    if raw.chars().count() > MIN_DESCRIPTION_CHARS {
        raw
    } else {
        String::new()
    }
}

fn is_descriptive_sentence(sentence: &str) -> bool {
    if sentence.chars().count() <= MIN_SENTENCE_CHARS
        || REJECTED_SENTENCE_PARTS.iter().any(|p| sentence.contains(p))
        || DIGIT_RUN.is_match(sentence)
    {
        return false;
    }
    let lower = sentence.to_lowercase();
    DESCRIPTION_CUES.iter().any(|cue| lower.contains(cue))
}

/// Concentrations named before the next program heading.
fn concentrations(after: &str) -> Vec<String> {
    let window = program_window(after);
    let end = NEXT_HEADING
        .find_iter(window)
        .map(|m| m.start())
        .find(|&i| i > MIN_MARKER_OFFSET)
        .unwrap_or(window.len());

    let mut found: Vec<String> = Vec::new();
    for caps in CONCENTRATION.captures_iter(&window[..end]) {
        let name = tidy_program_name(&caps[1]);
        if !name.is_empty() && !found.contains(&name) {
            found.push(name);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\
Graduate Programs
Data Science, MS
The Master of Science in Data Science program prepares students to turn raw data into decisions. Students complete a curriculum spanning statistics and machine learning. Concentration in Health Informatics is available.
Program Requirements
Code Title Hours
DS 5110 Introduction to Data Management and Processing 4
Robotics, MS
Robotics is an interdisciplinary program that combines mechanical engineering, electrical engineering and computer science. The degree prepares graduates for careers in autonomous systems.
Admission Requirements
Professor of Practice, MS
Short.
Master of Arts in Public History and Archives
The program offers students hands-on training in museums and archives across the region. It focuses on public engagement.
Core Requirements
";

    fn ids(entities: &[Entity]) -> Vec<&str> {
        entities.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn named_degree_lines() {
        let matches = ProgramPattern::NamedDegree.matches(CATALOG);
        let names: Vec<(&str, &str)> = matches.iter().map(|m| (m.name, m.degree)).collect();
        assert_eq!(
            names,
            vec![
                ("Data Science", "MS"),
                ("Robotics", "MS"),
                ("Professor of Practice", "MS"),
            ]
        );
    }

    #[test]
    fn degree_tokens_are_canonicalized() {
        let matches = ProgramPattern::NamedDegree.matches("Law, Policy, and Society, phd\n");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Law, Policy, and Society");
        assert_eq!(matches[0].degree, "PhD");
    }

    #[test]
    fn master_of_phrases() {
        let matches = ProgramPattern::MasterOf.matches(CATALOG);
        let names: Vec<(&str, &str)> = matches.iter().map(|m| (m.name, m.degree)).collect();
        assert_eq!(
            names,
            vec![("Data Science", "MS"), ("Public History and Archives", "MA")]
        );
    }

    #[test]
    fn extracts_programs_with_descriptions() {
        let programs = extract_programs(CATALOG);
        assert_eq!(
            ids(&programs),
            vec![
                "Data Science, MS",
                "Robotics, MS",
                "Public History and Archives, MA"
            ]
        );
        assert_eq!(
            programs[0].description,
            "The Master of Science in Data Science program prepares students to turn raw data into decisions. \
             Students complete a curriculum spanning statistics and machine learning."
        );
        assert!(programs.iter().all(|p| p.credits.is_none()));
    }

    #[test]
    fn collects_concentrations() {
        let programs = extract_programs(CATALOG);
        assert_eq!(programs[0].concentrations, vec!["Health Informatics"]);
        assert!(programs[1].concentrations.is_empty());
    }

    #[test]
    fn rejects_faculty_lines_and_thin_descriptions() {
        let programs = extract_programs(CATALOG);
        assert!(programs.iter().all(|p| !p.name.contains("Professor")));

        let thin = extract_programs("Nursing, MS\nSee website.\n");
        assert!(thin.is_empty());
    }

    #[test]
    fn description_stops_at_section_marker() {
        let text = "\nThis program provides students with a rigorous grounding in applied ethics.\n\
                    Program Requirements\nComplete all courses listed below.";
        let desc = describe_program(text);
        assert_eq!(
            desc,
            "This program provides students with a rigorous grounding in applied ethics."
        );
    }

    #[test]
    fn description_drops_urls() {
        let text = "The degree offers students flexible study online and on campus. \
                    Details are listed at https://catalog.example.edu/ds for applicants.";
        let desc = describe_program(text);
        assert!(!desc.contains("http"));
        assert_eq!(
            desc,
            "The degree offers students flexible study online and on campus."
        );
    }

    #[test]
    fn handles_crlf_line_endings() {
        let programs = extract_programs(&CATALOG.replace('\n', "\r\n"));
        assert_eq!(programs.len(), 3);
    }
}

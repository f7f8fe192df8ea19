//! Course extraction from a single page of catalog text.
//!
//! PDF-to-text conversion spaces course headings inconsistently, so three
//! shapes are tried in order:
//!
//! | Strategy | Example |
//! |----------|---------|
//! | [`CoursePattern::Adjacent`] | `ACCT6217Corporate Governance and Ethics` |
//! | [`CoursePattern::Spaced`] | `CS 5100 Foundations of Artificial Intelligence` |
//! | [`CoursePattern::Concatenated`] | `CS6140MachineLearning`, `CS 6140MachineLearning` |

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::{collapse_whitespace, is_conjunction, truncate_chars, Entity};

const DEFAULT_CREDITS: f32 = 4.0;
/// Names must be longer than this to be accepted.
const MIN_NAME_CHARS: usize = 5;
const DESCRIPTION_MAX_CHARS: usize = 600;
const DESCRIPTION_MIN_CHARS: usize = 40;

/// Title words separated by spaces or tabs, never line breaks.
const TITLE: &str =
    r"[A-Z][a-z]+(?:[ \t]+[A-Z]?[a-z]+)*(?:[ \t]+(?:and|for|in|of|with)[ \t]+[A-Z]?[a-z]+)*";

/// Table headers and requirement labels that precede names in catalog tables.
const LEADING_NOISE: &[&str] = &[
    "code", "title", "hours", "elective", "required", "complete", "course",
];

static ADJACENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"([A-Z]{{2,6}})\s*(\d{{4}})({TITLE})")).expect("valid adjacent pattern")
});

static SPACED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"([A-Z]{{2,6}})\s+(\d{{4}})[ \t]+({TITLE})"))
        .expect("valid spaced pattern")
});

static CONCATENATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z]{2,6})\s*(\d{4})([A-Z][a-z]+(?:[A-Z][a-z]+)*)")
        .expect("valid concatenated pattern")
});

static COURSE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{2,6}\s*\d{4}").expect("valid course code pattern"));

/// A course code followed, with no digits in between, by a credit statement.
static CREDITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([A-Z]{2,6})\s*(\d{4})(?i:[^0-9]*?(\d+(?:\.\d+)?)\s*(?:credits?|hours?|sh|ch)\b)",
    )
    .expect("valid credits pattern")
});

static LEADING_CREDIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?\s*\d+(?:\.\d+)?\s*(?i:credits?|hours?|sh|ch)\b\s*\)?[.;,]?\s*")
        .expect("valid leading credit pattern")
});

/// Course heading shapes, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoursePattern {
    /// Name starts immediately after the number.
    Adjacent,
    /// Code, number and name separated by whitespace.
    Spaced,
    /// A camel-case name glued to the number, whatever the spacing between
    /// code and number.
    Concatenated,
}

/// One heading match, borrowing from the page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseMatch<'t> {
    pub prefix: &'t str,
    pub number: &'t str,
    pub name: &'t str,
    /// Byte offset just past the match.
    pub end: usize,
}

impl CoursePattern {
    pub const ALL: [CoursePattern; 3] = [
        CoursePattern::Adjacent,
        CoursePattern::Spaced,
        CoursePattern::Concatenated,
    ];

    fn regex(self) -> &'static Regex {
        match self {
            CoursePattern::Adjacent => &*ADJACENT,
            CoursePattern::Spaced => &*SPACED,
            CoursePattern::Concatenated => &*CONCATENATED,
        }
    }

    /// All headings of this shape in `text`, in document order.
    ///
    /// `Adjacent` and `Spaced` skip matches whose name stops in the middle
    /// of a camel-case run; those belong to `Concatenated`.
    pub fn matches(self, text: &str) -> Vec<CourseMatch<'_>> {
        self.regex()
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if self != CoursePattern::Concatenated && continues_camel_run(text, whole.end())
                {
                    return None;
                }
                Some(CourseMatch {
                    prefix: caps.get(1)?.as_str(),
                    number: caps.get(2)?.as_str(),
                    name: caps.get(3)?.as_str(),
                    end: whole.end(),
                })
            })
            .collect()
    }
}

fn continues_camel_run(text: &str, end: usize) -> bool {
    let mut rest = text[end..].chars();
    matches!(
        (rest.next(), rest.next()),
        (Some(a), Some(b)) if a.is_uppercase() && b.is_lowercase()
    )
}

/// Extracts the courses on one page of normalized text.
///
/// Identifiers are unique within the result: the first strategy, then the
/// first match, wins.
pub fn extract_courses(text: &str) -> Vec<Entity> {
    let credits = credit_table(text);
    let mut seen: HashSet<String> = HashSet::new();
    let mut courses = Vec::new();

    for pattern in CoursePattern::ALL {
        for m in pattern.matches(text) {
            let id = format!("{} {}", m.prefix, m.number);
            if seen.contains(&id) {
                continue;
            }

            let name = clean_course_name(m.name);
            if name.chars().count() <= MIN_NAME_CHARS {
                continue;
            }

            seen.insert(id.clone());
            courses.push(Entity {
                credits: Some(credits.get(&id).copied().unwrap_or(DEFAULT_CREDITS)),
                description: course_description(text, m.end),
                concentrations: Vec::new(),
                id,
                name,
            });
        }
    }

    courses
}

/// First credit statement seen for each course code on the page.
fn credit_table(text: &str) -> HashMap<String, f32> {
    let mut table = HashMap::new();
    for caps in CREDITS.captures_iter(text) {
        let id = format!("{} {}", &caps[1], &caps[2]);
        if let Ok(credits) = caps[3].parse::<f32>() {
            table.entry(id).or_insert(credits);
        }
    }
    table
}

/// Prose between a heading and the next course code, if it reads like a
/// description rather than table residue.
fn course_description(text: &str, start: usize) -> String {
    let rest = &text[start..];
    let stop = COURSE_CODE
        .find(rest)
        .map(|m| m.start())
        .unwrap_or(rest.len());
    let window = collapse_whitespace(truncate_chars(&rest[..stop], DESCRIPTION_MAX_CHARS));
    let body = LEADING_CREDIT.replace(&window, "");
    let body = body.trim();

    let has_sentence = body.contains(|c: char| matches!(c, '.' | '!' | '?'));
    if body.chars().count() >= DESCRIPTION_MIN_CHARS && has_sentence {
        body.to_string()
    } else {
        String::new()
    }
}

/// Turns a raw matched name into a display name.
///
/// Splits camel case, lowers conjunctions that were glued in as capitalized
/// words, collapses whitespace, then strips edge noise: leading conjunctions
/// and table labels, trailing conjunctions, digits and course codes.
pub fn clean_course_name(raw: &str) -> String {
    let spaced = split_camel_case(raw);
    let mut words: Vec<String> = spaced
        .split_whitespace()
        .enumerate()
        .map(|(i, w)| {
            if i > 0 && is_conjunction(w) {
                w.to_lowercase()
            } else {
                w.to_string()
            }
        })
        .collect();

    loop {
        if words.first().is_some_and(|w| is_leading_noise(w)) {
            words.remove(0);
            continue;
        }
        let n = words.len();
        if n >= 2 && is_code_prefix(&words[n - 2]) && is_code_number(&words[n - 1]) {
            words.truncate(n - 2);
            continue;
        }
        if words
            .last()
            .is_some_and(|w| is_code_word(w) || is_conjunction(w) || is_digits(w))
        {
            words.pop();
            continue;
        }
        break;
    }

    words.join(" ")
}

/// Inserts a space before each uppercase letter that follows a lowercase
/// letter or digit.
fn split_camel_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn is_leading_noise(word: &str) -> bool {
    (is_conjunction(word) && !word.eq_ignore_ascii_case("the"))
        || LEADING_NOISE.iter().any(|n| n.eq_ignore_ascii_case(word))
}

fn is_digits(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit())
}

fn is_code_prefix(word: &str) -> bool {
    (2..=6).contains(&word.len()) && word.chars().all(|c| c.is_ascii_uppercase())
}

fn is_code_number(word: &str) -> bool {
    word.len() == 4 && is_digits(word)
}

fn is_code_word(word: &str) -> bool {
    let split = word
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(word.len());
    let (prefix, number) = word.split_at(split);
    is_code_prefix(prefix) && is_code_number(number)
}

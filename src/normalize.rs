//! Cleanup of encoding artifacts left behind by PDF text extraction.

use std::borrow::Cow;

/// Typographic ligatures and the non-breaking space, with their plain forms.
const REPLACEMENTS: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{00A0}', " "),
];

fn replacement(c: char) -> Option<&'static str> {
    REPLACEMENTS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Replaces ligatures and non-breaking spaces with ASCII equivalents.
///
/// Returns the input unchanged (borrowed) when it holds no artifacts, which
/// also makes the function idempotent.
pub fn normalize_text(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| replacement(c).is_some()) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match replacement(c) {
            Some(plain) => out.push_str(plain),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/*!
 * Rule-based proofreading over transcript text.
 *
 * The engine is fully local and deterministic: locale-specific rulesets
 * produce candidate edits, global whitespace rules are layered on top,
 * and a single overlap-resolution pass guarantees the final suggestion
 * list is non-overlapping and sorted by start offset.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

mod arabic;
mod english;

/// Caller-side cap on proofreading input length, in characters. The
/// engine itself performs no truncation; callers reject longer inputs
/// before invocation to bound regex-scan cost.
pub const MAX_SUGGEST_INPUT_CHARS: usize = 200_000;

// @const: Runs of two or more spaces
static MULTI_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

// @const: Whitespace immediately preceding punctuation
static SPACE_BEFORE_PUNCT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([ \t]+)([.,!?;:])").unwrap());

/// A proposed text edit, expressed as a byte-offset span into the source
/// string plus a replacement.
///
/// Spans always lie on char boundaries and satisfy `start < end <=
/// text.len()`. Within one suggestion set, spans never overlap; applying
/// a set in descending start order (see [`apply_suggestions`]) is always
/// index-safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Span start, byte offset into the source string
    pub start: usize,

    /// Span end, exclusive byte offset
    pub end: usize,

    /// The matched source text
    pub original: String,

    /// Proposed replacement
    pub replacement: String,

    /// Human-readable rule label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Detected script locale of a proofreading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    /// Any Arabic-range code point present
    Arabic,
    /// Everything else
    English,
}

/// Binary, first-match locale decision: the presence of any code point in
/// the Arabic block selects the Arabic ruleset.
pub fn detect_locale(text: &str) -> Locale {
    if text.chars().any(|c| ('\u{0600}'..='\u{06ff}').contains(&c)) {
        Locale::Arabic
    } else {
        Locale::English
    }
}

/// Produce edit suggestions for transcript text.
///
/// Empty or whitespace-only input yields an empty list. The output is
/// sorted ascending by start with strictly non-overlapping spans.
pub fn suggest(text: &str) -> Vec<Suggestion> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let locale = detect_locale(text);
    let mut suggestions = match locale {
        Locale::Arabic => arabic::suggest(text),
        Locale::English => english::suggest(text),
    };
    suggestions.extend(global_suggestions(text, locale));

    resolve_overlaps(suggestions)
}

// Cross-cutting whitespace rules, applied after the locale ruleset:
// collapse space runs (both locales), strip whitespace before
// punctuation (English only).
fn global_suggestions(text: &str, locale: Locale) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = Vec::new();

    for m in MULTI_SPACE_REGEX.find_iter(text) {
        out.push(Suggestion {
            start: m.start(),
            end: m.end(),
            original: m.as_str().to_string(),
            replacement: " ".to_string(),
            reason: Some("Extra whitespace".to_string()),
        });
    }

    if locale == Locale::English {
        for caps in SPACE_BEFORE_PUNCT_REGEX.captures_iter(text) {
            let ws = caps.get(1).unwrap();
            out.push(Suggestion {
                start: ws.start(),
                end: ws.end(),
                original: ws.as_str().to_string(),
                replacement: String::new(),
                reason: Some("Whitespace before punctuation".to_string()),
            });
        }
    }

    out
}

/// The authoritative overlap-resolution pass shared by both locales:
/// sort ascending by start (longer span first on ties), then keep a
/// suggestion only when its start is at or past the previous kept end.
pub(crate) fn resolve_overlaps(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| (b.end - b.start).cmp(&(a.end - a.start)))
    });

    let mut kept: Vec<Suggestion> = Vec::with_capacity(suggestions.len());
    for suggestion in suggestions {
        if kept.last().is_none_or(|prev| suggestion.start >= prev.end) {
            kept.push(suggestion);
        }
    }
    kept
}

/// Apply suggestions to the exact text they were produced for.
///
/// Edits are applied in descending start order so earlier indices stay
/// valid. Entries whose span no longer fits the text are skipped rather
/// than trusted.
pub fn apply_suggestions(text: &str, suggestions: &[Suggestion]) -> String {
    let mut ordered: Vec<&Suggestion> = suggestions.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut result = text.to_string();
    for s in ordered {
        if span_fits(&result, s.start, s.end) {
            result.replace_range(s.start..s.end, &s.replacement);
        }
    }
    result
}

/// Filter out suggestions with malformed spans (inverted, out of range,
/// or off a char boundary) before they are used. Required for any
/// suggestion set produced outside the engine.
pub fn sanitize_suggestions(text: &str, suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions
        .into_iter()
        .filter(|s| span_fits(text, s.start, s.end))
        .collect()
}

fn span_fits(text: &str, start: usize, end: usize) -> bool {
    start < end && end <= text.len() && text.is_char_boundary(start) && text.is_char_boundary(end)
}

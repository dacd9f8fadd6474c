use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides the two operations the pipeline needs: checking
/// whether two codes name the same language (for caption-track
/// selection), and normalizing a code to its two-letter form (for
/// endpoint query parameters and output filenames).
/// Check whether two language codes refer to the same language.
///
/// Codes are compared on their base subtag ("en-US" matches "en") and
/// across ISO 639-1/639-3 forms ("en" matches "eng"). Unknown codes only
/// match on literal equality of the base subtag.
pub fn language_codes_match(a: &str, b: &str) -> bool {
    let a = base_subtag(a);
    let b = base_subtag(b);

    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }

    match (lookup(&a), lookup(&b)) {
        (Some(lang_a), Some(lang_b)) => lang_a == lang_b,
        _ => false,
    }
}

/// Normalize a language code to ISO 639-1 (2-letter) form where one
/// exists, falling back to the ISO 639-3 form otherwise.
pub fn normalize_to_part1(code: &str) -> Result<String> {
    let base = base_subtag(code);
    let lang = lookup(&base).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;

    match lang.to_639_1() {
        Some(part1) => Ok(part1.to_string()),
        None => Ok(lang.to_639_3().to_string()),
    }
}

/// English name of the language a code refers to
pub fn get_language_name(code: &str) -> Result<String> {
    let base = base_subtag(code);
    let lang = lookup(&base).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    Ok(lang.to_name().to_string())
}

// Strip region/script subtags: "en-US" -> "en", "zh_Hant" -> "zh".
fn base_subtag(code: &str) -> String {
    code.trim()
        .to_lowercase()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_string()
}

fn lookup(base: &str) -> Option<Language> {
    match base.len() {
        2 => Language::from_639_1(base),
        3 => Language::from_639_3(base),
        _ => None,
    }
}

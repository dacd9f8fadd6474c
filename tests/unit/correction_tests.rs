/*!
 * Tests for the correction rule engine
 */

use yascap::correction::{
    Locale, MAX_SUGGEST_INPUT_CHARS, Suggestion, apply_suggestions, detect_locale,
    sanitize_suggestions, suggest,
};

fn assert_non_overlapping_and_sorted(text: &str, suggestions: &[Suggestion]) {
    for suggestion in suggestions {
        assert!(suggestion.start < suggestion.end);
        assert!(suggestion.end <= text.len());
    }
    for window in suggestions.windows(2) {
        assert!(
            window[0].end <= window[1].start,
            "overlapping spans: {:?} and {:?}",
            window[0],
            window[1]
        );
    }
}

/// Test locale detection
#[test]
fn test_detect_locale_withArabicText_shouldSelectArabic() {
    assert_eq!(detect_locale("ذهبت إلى السوق"), Locale::Arabic);
    assert_eq!(detect_locale("hello world"), Locale::English);
    // A single Arabic code point flips the decision
    assert_eq!(detect_locale("hello ب world"), Locale::Arabic);
}

/// Test the canonical English scenario from the proofreading flow
#[test]
fn test_suggest_withEnglishTypos_shouldFlagSpellingContractionAndSpacing() {
    let text = "teh cat sat.  It wont move.";
    let suggestions = suggest(text);

    let teh = suggestions
        .iter()
        .find(|s| s.original == "teh")
        .expect("expected a suggestion for 'teh'");
    assert_eq!(teh.replacement, "the");
    assert_eq!(&text[teh.start..teh.end], "teh");

    let wont = suggestions
        .iter()
        .find(|s| s.original == "wont")
        .expect("expected a suggestion for 'wont'");
    assert_eq!(wont.replacement, "won't");
    assert_eq!(&text[wont.start..wont.end], "wont");

    let spacing = suggestions
        .iter()
        .find(|s| s.original == "  ")
        .expect("expected a suggestion for the double space");
    assert_eq!(spacing.replacement, " ");

    assert_non_overlapping_and_sorted(text, &suggestions);
}

/// Test that matching is case-insensitive on the English path
#[test]
fn test_suggest_withUppercaseTypo_shouldStillMatch() {
    let suggestions = suggest("Teh start");
    assert!(suggestions.iter().any(|s| s.original == "Teh" && s.replacement == "the"));
}

/// Test that earlier-priority rules claim spans first within a sentence
#[test]
fn test_suggest_withCompetingRules_shouldLetPriorityClaimFirst() {
    // "sport car" (priority 3) contains "car"; nothing lower-priority
    // competes, but the span must be claimed exactly once.
    let text = "I saw a sport car today.";
    let suggestions = suggest(text);

    let matches: Vec<&Suggestion> = suggestions
        .iter()
        .filter(|s| s.replacement == "sports car")
        .collect();
    assert_eq!(matches.len(), 1);
    assert_non_overlapping_and_sorted(text, &suggestions);
}

/// Test whitespace-before-punctuation flagging on the English path
#[test]
fn test_suggest_withSpaceBeforePunctuation_shouldProposeRemoval() {
    let text = "Hello , world";
    let suggestions = suggest(text);

    let removal = suggestions
        .iter()
        .find(|s| s.replacement.is_empty())
        .expect("expected a whitespace removal");
    assert_eq!(&text[removal.start..removal.end], " ");
}

/// Test the Arabic spelling rules
#[test]
fn test_suggest_withArabicTypos_shouldProposeSpellingFixes() {
    let text = "زهبت الى السوق ثم ساءلت الباءع";
    let suggestions = suggest(text);

    assert!(suggestions.iter().any(|s| s.original == "زهبت" && s.replacement == "ذهبت"));
    assert!(suggestions.iter().any(|s| s.original == "ساءلت" && s.replacement == "سألت"));
    assert!(suggestions.iter().any(|s| s.original == "الباءع" && s.replacement == "البائع"));
    assert_non_overlapping_and_sorted(text, &suggestions);
}

/// Test the line-scoped tomato/car context rule
#[test]
fn test_suggest_withTomatoAndCarOnSameLine_shouldFlagCarWord() {
    // The trigger and the confusable share a line: flag the confusable
    let text = "اشتريت بندورة من السوق وركبت سيارة حمراء";
    let suggestions = suggest(text);
    assert!(
        suggestions
            .iter()
            .any(|s| s.original.contains("سيار") && s.replacement == "بندورة"),
        "expected the car word to be flagged on a tomato line: {:?}",
        suggestions
    );
}

/// Test that the context rule does not fire across lines
#[test]
fn test_suggest_withTomatoAndCarOnDifferentLines_shouldNotFlagCarWord() {
    let text = "اشتريت بندورة من السوق\nوركبت سيارة حمراء";
    let suggestions = suggest(text);
    assert!(
        !suggestions
            .iter()
            .any(|s| s.original.contains("سيار") && s.replacement == "بندورة")
    );
}

/// Test that the space-collapse rule also applies to Arabic text
#[test]
fn test_suggest_withArabicDoubleSpace_shouldCollapseIt() {
    let suggestions = suggest("ذهبت  إلى السوق");
    assert!(suggestions.iter().any(|s| s.replacement == " " && s.original == "  "));
}

/// Test empty and whitespace-only input
#[test]
fn test_suggest_withEmptyInput_shouldReturnNoSuggestions() {
    assert!(suggest("").is_empty());
    assert!(suggest("   \n  ").is_empty());
}

/// Test the suggestion application law
#[test]
fn test_apply_suggestions_withEngineOutput_shouldMatchLengthDelta() {
    let text = "teh cat sat.  It wont move.";
    let suggestions = suggest(text);

    let expected_delta: i64 = suggestions
        .iter()
        .map(|s| s.replacement.len() as i64 - (s.end - s.start) as i64)
        .sum();

    let applied = apply_suggestions(text, &suggestions);
    assert_eq!(
        applied.len() as i64,
        text.len() as i64 + expected_delta
    );
    assert!(applied.contains("the cat sat."));
    assert!(applied.contains("won't"));
    assert!(!applied.contains("  "));
}

/// Test sanitization of externally produced suggestion sets
#[test]
fn test_sanitize_suggestions_withMalformedSpans_shouldDropThem() {
    let text = "hello world";
    let suggestions = vec![
        Suggestion {
            start: 0,
            end: 5,
            original: "hello".to_string(),
            replacement: "Hello".to_string(),
            reason: None,
        },
        // Inverted span
        Suggestion {
            start: 7,
            end: 3,
            original: String::new(),
            replacement: "x".to_string(),
            reason: None,
        },
        // Out of range
        Suggestion {
            start: 6,
            end: 50,
            original: String::new(),
            replacement: "x".to_string(),
            reason: None,
        },
    ];

    let kept = sanitize_suggestions(text, suggestions);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].original, "hello");
}

/// Test that sanitization rejects spans off char boundaries
#[test]
fn test_sanitize_suggestions_withNonCharBoundary_shouldDropThem() {
    let text = "héllo";
    let suggestions = vec![Suggestion {
        start: 1,
        end: 2,
        original: String::new(),
        replacement: "e".to_string(),
        reason: None,
    }];
    assert!(sanitize_suggestions(text, suggestions).is_empty());
}

/// Test the engine-wide size guard constant
#[test]
fn test_max_suggest_input_chars_shouldMatchObservedCap() {
    assert_eq!(MAX_SUGGEST_INPUT_CHARS, 200_000);
}

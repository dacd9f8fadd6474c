use once_cell::sync::Lazy;
use regex::Regex;

use super::Suggestion;

// @module: Arabic ruleset - flat spelling corrections plus line-scoped
// context rules

struct WordRule {
    pattern: Regex,
    replacement: &'static str,
    reason: &'static str,
}

fn word_rule(pattern: &str, replacement: &'static str, reason: &'static str) -> WordRule {
    WordRule {
        pattern: Regex::new(pattern).unwrap(),
        replacement,
        reason,
    }
}

static WORD_RULES: Lazy<Vec<WordRule>> = Lazy::new(|| {
    vec![
        word_rule(r"\bزهبت\b", "ذهبت", "تصحيح إملائي"),
        word_rule(r"\bساءلت\b", "سألت", "تصحيح إملائي"),
        word_rule(r"\bالباءع\b", "البائع", "تصحيح إملائي"),
        word_rule(r"\bبندوره\b", "بندورة", "تصحيح إملائي"),
        word_rule(r"\bالسياره\b", "السيارة", "تصحيح إملائي"),
    ]
});

// A dictation-error heuristic scoped to a single line: when the trigger
// word appears on a line, occurrences of the confusable word on that same
// line are proposed for replacement with the trigger's canonical form.
// Kept as table entries so scope changes are data edits, not new control
// flow.
struct ContextRule {
    trigger: Regex,
    confusable: Regex,
    replacement: &'static str,
    reason: &'static str,
}

static CONTEXT_RULES: Lazy<Vec<ContextRule>> = Lazy::new(|| {
    vec![
        // "tomato" dictated as the near-homophone "car"
        ContextRule {
            trigger: Regex::new(r"بندور[ةه]").unwrap(),
            confusable: Regex::new(r"سيار[ةه]").unwrap(),
            replacement: "بندورة",
            reason: "تصحيح سياقي",
        },
    ]
});

/// Flat word-rule pass over the whole text, then the line-scoped context
/// rules. No priority tiers and no sentence segmentation; the shared
/// overlap-resolution pass downstream arbitrates any collisions.
pub(super) fn suggest(text: &str) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = Vec::new();

    for rule in WORD_RULES.iter() {
        for m in rule.pattern.find_iter(text) {
            out.push(Suggestion {
                start: m.start(),
                end: m.end(),
                original: m.as_str().to_string(),
                replacement: rule.replacement.to_string(),
                reason: Some(rule.reason.to_string()),
            });
        }
    }

    let mut base = 0usize;
    for line in text.split('\n') {
        for rule in CONTEXT_RULES.iter() {
            if !rule.trigger.is_match(line) {
                continue;
            }
            for m in rule.confusable.find_iter(line) {
                out.push(Suggestion {
                    start: base + m.start(),
                    end: base + m.end(),
                    original: m.as_str().to_string(),
                    replacement: rule.replacement.to_string(),
                    reason: Some(rule.reason.to_string()),
                });
            }
        }
        base += line.len() + 1;
    }

    out
}

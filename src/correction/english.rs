use once_cell::sync::Lazy;
use regex::Regex;

use super::Suggestion;

// @module: English ruleset, applied sentence by sentence

// A correction rule: matches are proposed with `replacement`, lower
// priority numbers claim spans first within a sentence.
struct Rule {
    pattern: Regex,
    replacement: &'static str,
    reason: &'static str,
    priority: u8,
}

fn rule(pattern: &str, replacement: &'static str, reason: &'static str, priority: u8) -> Rule {
    Rule {
        pattern: Regex::new(pattern).unwrap(),
        replacement,
        reason,
        priority,
    }
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = vec![
        // High-signal spelling/grammar
        rule(r"(?i)\bteh\b", "the", "Spelling", 1),
        rule(r"(?i)\brecieve\b", "receive", "Spelling", 1),
        rule(r"(?i)\bseperate\b", "separate", "Spelling", 1),
        rule(r"(?i)\bdefinately\b", "definitely", "Spelling", 1),
        rule(r"(?i)\bwich\b", "which", "Spelling", 1),
        rule(r"(?i)\bthier\b", "their", "Spelling", 1),
        rule(r"(?i)\bhte\b", "the", "Spelling", 1),
        rule(r"(?i)\balot\b", "a lot", "Common phrase", 2),
        rule(r"(?i)\bdont\b", "don't", "Contraction", 2),
        rule(r"(?i)\bcant\b", "can't", "Contraction", 2),
        rule(r"(?i)\bwont\b", "won't", "Contraction", 2),
        rule(r"(?i)\bive\b", "I've", "Contraction", 2),
        rule(r"(?i)\bdoesnt\b", "doesn't", "Contraction", 2),
        rule(r"(?i)\bdidnt\b", "didn't", "Contraction", 2),
        rule(r"(?i)\bhallo\b", "Hello", "Spelling", 2),
        // Targeted phrasing (medium)
        rule(r"(?i)\bmany\s+car\b", "many cars", "Plural noun", 3),
        rule(r"(?i)\bpeople\s+scare\b", "people are scared", "Grammar", 3),
        rule(r"(?i)\bgo\s+market\b", "go to the market", "Preposition", 3),
        rule(r"(?i)\bsport\s+car\b", "sports car", "Noun form", 3),
        rule(r"(?i)\bless\s+repair\b", "fewer repairs", "Countable noun", 3),
        rule(r"(?i)\bsometime\b", "sometimes", "Frequency word", 3),
        rule(r"(?i)\bfastly\b", "quickly", "Word choice", 3),
        rule(r"(?i)\bsound\s+is\s+boom\b", "sounds loud", "Natural phrasing", 4),
        rule(r"(?i)\bfuel\s+is\s+finish\b", "fuel runs out", "Natural phrasing", 4),
        rule(r"(?i)\bbattery\s+finish\b", "battery runs out", "Natural phrasing", 4),
        rule(r"(?i)\bvery\s+trust\b", "very reliable", "Word choice", 4),
        rule(r"(?i)\bautomatic\s+easy\b", "automatic is easy", "Grammar", 4),
        rule(r"(?i)\bmanual\s+cheap\b", "manual is cheaper", "Comparative", 4),
        rule(r"(?i)\btoday\s+i\s+go\b", "today I went", "Tense", 4),
        rule(r"(?i)\bone\s+friend\s+buy\b", "one friend bought", "Tense", 4),
    ];
    rules.sort_by_key(|r| r.priority);
    rules
});

// @const: Sentence-like segments within a line, boundary-inclusive of the
// terminal punctuation
static SENTENCE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?\n]+[.!?]?").unwrap());

/// Sentence-first pass: within each sentence segment, rules are applied
/// in ascending priority order and a match is accepted only when its span
/// does not touch a span already claimed in that segment.
pub(super) fn suggest(text: &str) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = Vec::new();
    let mut base = 0usize;

    for line in text.split('\n') {
        for segment in SENTENCE_REGEX.find_iter(line) {
            if segment.as_str().trim().is_empty() {
                continue;
            }
            let segment_base = base + segment.start();
            let mut claimed: Vec<(usize, usize)> = Vec::new();

            for rule in RULES.iter() {
                for m in rule.pattern.find_iter(segment.as_str()) {
                    let start = segment_base + m.start();
                    let end = segment_base + m.end();
                    if claimed.iter().any(|&(cs, ce)| start < ce && end > cs) {
                        continue;
                    }
                    claimed.push((start, end));
                    out.push(Suggestion {
                        start,
                        end,
                        original: m.as_str().to_string(),
                        replacement: rule.replacement.to_string(),
                        reason: Some(rule.reason.to_string()),
                    });
                }
            }
        }
        base += line.len() + 1;
    }

    out
}

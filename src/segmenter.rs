use crate::captions::CaptionItem;

// @module: Naive time-approximated segmentation of unstructured text

/// Shared cap on generated cue durations, in seconds. Used as the
/// segmenter default and by the plain-text parsing fallback.
pub const DEFAULT_MAX_CHUNK_SECONDS: u32 = 5;

/// Floor on generated cue durations, in seconds
const MIN_CHUNK_SECONDS: u32 = 2;

/// Reading-speed heuristic: characters a viewer reads per second
const READING_SPEED_CHARS_PER_SEC: usize = 18;

/// Split text into sentence-like cues with approximated timing.
///
/// Units are cut on whitespace following a sentence-terminal punctuation
/// mark (`.`, `!`, `?`); empty fragments are discarded. Cues are laid out
/// back-to-back from t=0 with no gaps or overlaps. This is the fallback
/// used whenever no real timing information is available.
pub fn naive_segment(text: &str, max_chunk_seconds: u32) -> Vec<CaptionItem> {
    let mut cues: Vec<CaptionItem> = Vec::new();
    let mut t = 0.0;

    for unit in split_sentence_units(text) {
        let duration = chunk_duration_secs(unit.chars().count(), max_chunk_seconds);
        cues.push(CaptionItem::new(cues.len() + 1, t, t + duration, unit.to_string()));
        t += duration;
    }

    cues
}

/// Duration for a chunk of `char_count` characters: a floor of
/// `MIN_CHUNK_SECONDS`, a ceiling of `max_chunk_seconds`, and linear
/// scaling by the reading-speed heuristic in between.
pub(crate) fn chunk_duration_secs(char_count: usize, max_chunk_seconds: u32) -> f64 {
    let scaled = char_count.div_ceil(READING_SPEED_CHARS_PER_SEC) as u32;
    scaled.min(max_chunk_seconds).max(MIN_CHUNK_SECONDS) as f64
}

// Cut after a terminal punctuation mark when it is followed by
// whitespace; the whitespace run itself is the separator and is dropped.
fn split_sentence_units(text: &str) -> Vec<&str> {
    let mut units: Vec<&str> = Vec::new();
    let mut unit_start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((_, ch)) = iter.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let Some(&(next_idx, next_ch)) = iter.peek() else {
            break;
        };
        if !next_ch.is_whitespace() {
            continue;
        }

        units.push(&text[unit_start..next_idx]);
        unit_start = next_idx;
        while let Some(&(ws_idx, ws_ch)) = iter.peek() {
            if !ws_ch.is_whitespace() {
                break;
            }
            unit_start = ws_idx + ws_ch.len_utf8();
            iter.next();
        }
    }

    if unit_start < text.len() {
        units.push(&text[unit_start..]);
    }

    units.into_iter().filter(|u| !u.is_empty()).collect()
}

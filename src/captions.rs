use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::segmenter::{DEFAULT_MAX_CHUNK_SECONDS, chunk_duration_secs};
use crate::timecode::{SubtitleFormat, format_timestamp, parse_timestamp};

// @module: Caption parsing and serialization

// @const: Blank-line block delimiter for SRT documents
static BLOCK_SPLIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

// @const: SRT time-range line
static TIME_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3}:\d{1,2}:\d{1,2}[.,]\d{1,3})\s*-->\s*(\d{1,3}:\d{1,2}:\d{1,2}[.,]\d{1,3})").unwrap()
});

// @const: VTT time-range line (timestamps are free-form, validated by the codec)
static ARROW_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\S+)\s+-->\s+(\S+)").unwrap()
});

// @const: Inline markup tags such as <i> or <c.colorE5E5E5>
static MARKUP_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^>]+>").unwrap());

static NEWLINE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());

/// A single timed caption entry.
///
/// Ids are dense, 1-based and reflect emission order; they are reassigned
/// on every parse or segmentation pass and carry no external identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionItem {
    /// Sequence number, 1-based
    pub id: usize,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Caption text
    pub text: String,
}

impl CaptionItem {
    pub fn new(id: usize, start: f64, end: f64, text: String) -> Self {
        CaptionItem { id, start, end, text }
    }
}

/// Parse output: the cue sequence plus the plain-transcript view used by
/// the correction engine and re-upload paths.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionDocument {
    /// Newline-joined concatenation of all cue texts, in order
    pub text: String,

    /// Parsed cues
    pub cues: Vec<CaptionItem>,
}

impl CaptionDocument {
    pub fn from_cues(cues: Vec<CaptionItem>) -> Self {
        let text = cues
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        CaptionDocument { text, cues }
    }
}

/// Parse caption content with dialect selection by file extension:
/// `.vtt` and `.srt` go through the block parsers, anything else is
/// treated as plain text and segmented line by line.
pub fn parse_captions(filename: &str, content: &str) -> CaptionDocument {
    let lower = filename.to_lowercase();
    if lower.ends_with(".vtt") {
        parse_vtt(content)
    } else if lower.ends_with(".srt") {
        parse_srt(content)
    } else {
        parse_plain(content)
    }
}

/// Parse an SRT document into cues.
///
/// Blocks lacking a recognizable timestamp line are skipped, never fatal.
/// The numeric index line preceding the time range is ignored; cue ids
/// are reassigned densely from 1.
pub fn parse_srt(input: &str) -> CaptionDocument {
    let normalized = input.replace('\r', "");
    let mut cues: Vec<CaptionItem> = Vec::new();

    for block in BLOCK_SPLIT_REGEX.split(&normalized) {
        let lines: Vec<&str> = block
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.len() < 2 {
            continue;
        }

        let Some(time_idx) = lines.iter().position(|l| l.contains("-->")) else {
            debug!("Skipping SRT block without a time-range line");
            continue;
        };
        let time_line = lines[time_idx].replace('\u{feff}', "");
        let Some(caps) = TIME_RANGE_REGEX.captures(&time_line) else {
            debug!("Skipping SRT block with unparseable time range: {}", time_line);
            continue;
        };

        let start = parse_timestamp(&caps[1], SubtitleFormat::Srt);
        let end = parse_timestamp(&caps[2], SubtitleFormat::Srt);
        let text = strip_markup_tags(&lines[time_idx + 1..].join(" "));

        cues.push(CaptionItem::new(cues.len() + 1, start, end, text));
    }

    CaptionDocument::from_cues(cues)
}

/// Parse a VTT document into cues.
///
/// A cue's timestamp line may be preceded by an optional identifier line;
/// the identifier is only discarded when the following line actually is a
/// timestamp, otherwise both lines are skipped as noise. Cues whose text
/// is empty after markup stripping are dropped.
pub fn parse_vtt(input: &str) -> CaptionDocument {
    let normalized = input.replace('\r', "");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut cues: Vec<CaptionItem> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let mut line = lines[i].trim();
        i += 1;

        if line.is_empty() {
            continue;
        }
        if line.get(..6).is_some_and(|p| p.eq_ignore_ascii_case("webvtt")) {
            continue;
        }
        if !line.contains("-->") {
            if i >= lines.len() {
                continue;
            }
            let peek = lines[i].trim();
            if peek.contains("-->") {
                line = peek;
                i += 1;
            } else {
                continue;
            }
        }

        let Some(caps) = ARROW_RANGE_REGEX.captures(line) else {
            continue;
        };
        let start = parse_timestamp(&caps[1], SubtitleFormat::Vtt);
        let end = parse_timestamp(&caps[2], SubtitleFormat::Vtt);

        let mut text_lines: Vec<&str> = Vec::new();
        while i < lines.len() && !lines[i].trim().is_empty() {
            text_lines.push(lines[i]);
            i += 1;
        }

        let text = strip_markup_tags(&text_lines.join(" ")).trim().to_string();
        if !text.is_empty() {
            cues.push(CaptionItem::new(cues.len() + 1, start, end, text));
        }
    }

    CaptionDocument::from_cues(cues)
}

// Plain-text fallback: one cue per non-empty line, laid out back-to-back
// with the shared reading-speed duration heuristic.
fn parse_plain(input: &str) -> CaptionDocument {
    let normalized = input.replace('\r', "");
    let mut cues: Vec<CaptionItem> = Vec::new();
    let mut t = 0.0;

    for part in NEWLINE_RUN_REGEX.split(&normalized) {
        if part.is_empty() {
            continue;
        }
        let duration = chunk_duration_secs(part.chars().count(), DEFAULT_MAX_CHUNK_SECONDS);
        cues.push(CaptionItem::new(cues.len() + 1, t, t + duration, part.to_string()));
        t += duration;
    }

    CaptionDocument::from_cues(cues)
}

/// Render a cue sequence into subtitle file content.
///
/// Serialization trusts the producer: cue ordering and overlap are not
/// re-validated here.
pub fn render_captions(cues: &[CaptionItem], format: SubtitleFormat) -> String {
    match format {
        SubtitleFormat::Srt => cues
            .iter()
            .map(|c| {
                format!(
                    "{}\n{} --> {}\n{}\n",
                    c.id,
                    format_timestamp(c.start, format),
                    format_timestamp(c.end, format),
                    c.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        SubtitleFormat::Vtt => {
            let body = cues
                .iter()
                .map(|c| {
                    format!(
                        "{} --> {}\n{}\n",
                        format_timestamp(c.start, format),
                        format_timestamp(c.end, format),
                        c.text
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("WEBVTT\n\n{}", body)
        }
    }
}

/// Pair replacement texts onto existing cue timing, one text per cue.
/// The result is truncated to the shorter of the two inputs.
pub fn with_text(cues: &[CaptionItem], texts: &[String]) -> Vec<CaptionItem> {
    cues.iter()
        .zip(texts.iter())
        .map(|(cue, text)| CaptionItem {
            text: text.clone(),
            ..cue.clone()
        })
        .collect()
}

pub(crate) fn strip_markup_tags(input: &str) -> String {
    MARKUP_TAG_REGEX.replace_all(input, "").into_owned()
}

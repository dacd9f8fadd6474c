/*!
 * Transcript acquisition for hosted videos.
 *
 * This module contains the strategy implementations used to obtain a
 * video's caption track:
 * - `player_api`: primary transcript API (the player endpoint mobile
 *   clients use)
 * - `timedtext`: public timed-text endpoint, queried per language
 *   candidate
 * - `watch_page`: caption-track discovery from the embedded player
 *   response of the public video page
 *
 * Strategies are tried strictly in order by [`TranscriptFetcher`]; a
 * later strategy never runs once an earlier one has produced segments.
 */

use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::fmt::Debug;
use url::Url;

use crate::captions::{CaptionItem, strip_markup_tags};
use crate::errors::FetchError;

pub mod player_api;
pub mod timedtext;
pub mod watch_page;

pub use player_api::PlayerApiStrategy;
pub use timedtext::TimedTextStrategy;
pub use watch_page::WatchPageStrategy;

// @const: Bare 11-character video identifier
static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

// @const: Decimal HTML character references such as &#243;
static NUMERIC_ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#(\d+);").unwrap());

// @const: Timed-text payload entries
static TIMEDTEXT_TEXT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text[^>]*start="([\d.]+)"[^>]*dur="([\d.]+)"[^>]*>(.*?)</text>"#).unwrap()
});

/// A caption-like unit as returned by an external transcript source,
/// before conversion to a cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTranscriptSegment {
    /// Segment text, entity-decoded and markup-stripped
    pub text: String,

    /// Offset from media start, in milliseconds
    pub offset_ms: u64,

    /// Segment duration, in milliseconds
    pub duration_ms: u64,
}

/// One language candidate in a caller's preference order. The textual
/// form uses an `a.` prefix for auto-generated variants ("a.en").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePreference {
    /// Plain language code ("en", "pt")
    pub code: String,

    /// Whether this candidate names the auto-generated track
    pub auto_generated: bool,
}

impl LanguagePreference {
    pub fn parse(candidate: &str) -> Self {
        match candidate.strip_prefix("a.") {
            Some(code) => LanguagePreference {
                code: code.to_string(),
                auto_generated: true,
            },
            None => LanguagePreference {
                code: candidate.to_string(),
                auto_generated: false,
            },
        }
    }
}

impl std::fmt::Display for LanguagePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.auto_generated {
            write!(f, "a.{}", self.code)
        } else {
            write!(f, "{}", self.code)
        }
    }
}

/// Everything a strategy needs to locate a caption track
#[derive(Debug, Clone)]
pub struct TranscriptRequest {
    /// Video identifier (not a URL)
    pub video_id: String,

    /// The caller's target language, used for caption-track selection
    pub target_language: String,

    /// Ordered language candidates for per-language endpoints
    pub language_hints: Vec<LanguagePreference>,
}

/// One acquisition strategy in the fallback chain.
///
/// Implementations signal "found nothing" with [`FetchError::NotFound`]
/// so the orchestrator can continue; any other error ends the chain.
#[async_trait]
pub trait TranscriptStrategy: Send + Sync + Debug {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Attempt to fetch the transcript for one video
    async fn fetch(
        &self,
        client: &Client,
        request: &TranscriptRequest,
    ) -> Result<Vec<RawTranscriptSegment>, FetchError>;
}

/// Orchestrates the ordered fallback chain over an injected HTTP client.
///
/// Strategies run sequentially, never in parallel, so the "stop at first
/// success" contract holds. An empty success is treated the same as
/// not-found.
#[derive(Debug)]
pub struct TranscriptFetcher {
    client: Client,
    strategies: Vec<Box<dyn TranscriptStrategy>>,
}

impl TranscriptFetcher {
    /// Fetcher with the standard strategy chain
    pub fn new(client: Client) -> Self {
        Self::with_strategies(
            client,
            vec![
                Box::new(PlayerApiStrategy::new()),
                Box::new(TimedTextStrategy::new()),
                Box::new(WatchPageStrategy::new()),
            ],
        )
    }

    /// Fetcher with a caller-supplied strategy chain
    pub fn with_strategies(client: Client, strategies: Vec<Box<dyn TranscriptStrategy>>) -> Self {
        TranscriptFetcher { client, strategies }
    }

    /// Try each strategy in order until one produces segments.
    ///
    /// Recoverable failures (nothing found) continue the chain; a
    /// strategy-fatal error is returned as-is. When every strategy is
    /// exhausted the result is [`FetchError::NotFound`].
    pub async fn fetch_transcript(
        &self,
        request: &TranscriptRequest,
    ) -> Result<Vec<RawTranscriptSegment>, FetchError> {
        for strategy in &self.strategies {
            match strategy.fetch(&self.client, request).await {
                Ok(segments) if !segments.is_empty() => {
                    debug!(
                        "Strategy '{}' produced {} segments for video {}",
                        strategy.name(),
                        segments.len(),
                        request.video_id
                    );
                    return Ok(segments);
                }
                Ok(_) => {
                    debug!("Strategy '{}' produced no segments, trying next", strategy.name());
                }
                Err(err) if err.is_recoverable() => {
                    debug!("Strategy '{}' found nothing: {}", strategy.name(), err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(FetchError::NotFound)
    }
}

/// Extract a video identifier from a URL or bare id.
///
/// Accepts `watch?v=`, `youtu.be/`, `/embed/` and `/shorts/` forms as
/// well as a bare 11-character id.
pub fn extract_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if VIDEO_ID_REGEX.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    let parsed = Url::parse(trimmed).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    if host == "youtu.be" || host.ends_with(".youtu.be") {
        let id = parsed.path().trim_start_matches('/');
        return checked_id(id);
    }

    if host.contains("youtube.com") {
        if let Some((_, v)) = parsed.query_pairs().find(|(k, _)| k == "v") {
            return checked_id(&v);
        }
        let mut segments = parsed.path_segments()?;
        if let (Some("embed" | "shorts"), Some(id)) = (segments.next(), segments.next()) {
            return checked_id(id);
        }
    }

    None
}

fn checked_id(candidate: &str) -> Option<String> {
    VIDEO_ID_REGEX
        .is_match(candidate)
        .then(|| candidate.to_string())
}

/// Map raw segments into cues, dividing milliseconds into seconds and
/// assigning dense 1-based ids.
pub fn to_caption_items(segments: &[RawTranscriptSegment]) -> Vec<CaptionItem> {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            CaptionItem::new(
                i + 1,
                segment.offset_ms as f64 / 1000.0,
                (segment.offset_ms + segment.duration_ms) as f64 / 1000.0,
                segment.text.clone(),
            )
        })
        .collect()
}

/// Decode the HTML character references that appear in timed-text
/// payloads: the five named entities plus decimal numeric references.
pub fn decode_html_entities(input: &str) -> String {
    let replaced = input
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    NUMERIC_ENTITY_REGEX
        .replace_all(&replaced, |caps: &regex::Captures| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .into_owned()
}

/// Parse a timed-text XML payload into raw segments.
///
/// Timestamps are float seconds converted to integer milliseconds;
/// segment text is entity-decoded and markup-stripped, and segments that
/// end up empty are dropped.
pub fn parse_timedtext_xml(xml: &str) -> Vec<RawTranscriptSegment> {
    let mut segments: Vec<RawTranscriptSegment> = Vec::new();

    for caps in TIMEDTEXT_TEXT_REGEX.captures_iter(xml) {
        let start_sec: f64 = caps[1].parse().unwrap_or(0.0);
        let dur_sec: f64 = caps[2].parse().unwrap_or(0.0);

        let flattened = caps[3].replace('\n', " ");
        let text = decode_html_entities(&strip_markup_tags(&flattened))
            .trim()
            .to_string();
        if text.is_empty() {
            continue;
        }

        segments.push(RawTranscriptSegment {
            text,
            offset_ms: (start_sec * 1000.0).round() as u64,
            duration_ms: (dur_sec * 1000.0).round() as u64,
        });
    }

    segments
}

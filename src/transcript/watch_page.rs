use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;

use crate::captions;
use crate::errors::FetchError;

use super::{RawTranscriptSegment, TranscriptRequest, TranscriptStrategy, decode_html_entities};

// @module: Video page caption-track discovery strategy

// @const: Embedded player-response JSON blob
static PLAYER_RESPONSE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)ytInitialPlayerResponse\s*=\s*(\{.*?\});").unwrap());

/// Final fallback: fetch the public video page, extract the embedded
/// player-response blob, select a caption track, and parse its VTT
/// payload into millisecond segments.
///
/// This strategy has nothing behind it, so its failures are typed and
/// strategy-fatal: a missing blob, an absent track list or an empty
/// parse ends the fallback chain.
#[derive(Debug, Default)]
pub struct WatchPageStrategy;

impl WatchPageStrategy {
    pub fn new() -> Self {
        WatchPageStrategy
    }
}

#[async_trait]
impl TranscriptStrategy for WatchPageStrategy {
    fn name(&self) -> &'static str {
        "watch-page"
    }

    async fn fetch(
        &self,
        client: &Client,
        request: &TranscriptRequest,
    ) -> Result<Vec<RawTranscriptSegment>, FetchError> {
        let page_url = format!(
            "https://www.youtube.com/watch?v={}&hl=en",
            urlencoding_lite(&request.video_id)
        );
        let html = client
            .get(&page_url)
            .header("accept-language", "en")
            .send()
            .await
            .map_err(|e| FetchError::PageRequestFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError::PageRequestFailed(e.to_string()))?
            .text()
            .await
            .map_err(|e| FetchError::PageRequestFailed(e.to_string()))?;

        let blob = PLAYER_RESPONSE_REGEX
            .captures(&html)
            .and_then(|caps| caps.get(1))
            .ok_or(FetchError::PlayerResponseMissing)?;
        let player: Value = serde_json::from_str(blob.as_str())
            .map_err(|e| FetchError::PlayerResponseInvalid(e.to_string()))?;

        let tracks = player
            .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
            .and_then(Value::as_array)
            .filter(|tracks| !tracks.is_empty())
            .ok_or(FetchError::NoCaptionTracks)?;

        let track = pick_caption_track(tracks, &request.target_language);
        let mut track_url = track
            .get("baseUrl")
            .and_then(Value::as_str)
            .ok_or(FetchError::TrackUrlMissing)?
            .to_string();
        if !track_url.contains("fmt=") {
            track_url.push(if track_url.contains('?') { '&' } else { '?' });
            track_url.push_str("fmt=vtt");
        }

        let vtt = client
            .get(&track_url)
            .send()
            .await
            .map_err(|e| FetchError::TrackRequestFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError::TrackRequestFailed(e.to_string()))?
            .text()
            .await
            .map_err(|e| FetchError::TrackRequestFailed(e.to_string()))?;

        let document = captions::parse_vtt(&vtt);
        if document.cues.is_empty() {
            return Err(FetchError::TrackEmpty);
        }

        Ok(document
            .cues
            .iter()
            .map(|cue| RawTranscriptSegment {
                text: decode_html_entities(&cue.text),
                offset_ms: (cue.start * 1000.0).round() as u64,
                duration_ms: ((cue.end - cue.start).max(0.0) * 1000.0).round() as u64,
            })
            .collect())
    }
}

/// Track selection precedence: exact match to the caller's target
/// language, exact match to English, first non-auto-generated track,
/// first track of any kind.
///
/// Callers guarantee a non-empty track list.
pub fn pick_caption_track<'a>(tracks: &'a [Value], target_language: &str) -> &'a Value {
    let mut preferences: Vec<String> = vec![target_language.trim().to_lowercase()];
    for english in ["en", "en-us", "en-gb"] {
        if !preferences.iter().any(|p| p == english) {
            preferences.push(english.to_string());
        }
    }

    for preference in &preferences {
        if let Some(track) = tracks
            .iter()
            .find(|t| track_language_code(t).eq_ignore_ascii_case(preference))
        {
            return track;
        }
    }

    tracks
        .iter()
        .find(|t| t.get("kind").is_none())
        .unwrap_or(&tracks[0])
}

fn track_language_code(track: &Value) -> &str {
    track
        .get("languageCode")
        .and_then(Value::as_str)
        .unwrap_or_default()
}

// Video ids are already constrained to [A-Za-z0-9_-], so escaping is a
// pass-through for valid input; anything else is dropped.
fn urlencoding_lite(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .collect()
}

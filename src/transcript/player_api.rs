use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::errors::FetchError;
use crate::language_utils;

use super::{
    LanguagePreference, RawTranscriptSegment, TranscriptRequest, TranscriptStrategy,
    parse_timedtext_xml,
};

// @module: Primary transcript API strategy

const PLAYER_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/player";
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";
const ANDROID_SDK_VERSION: u32 = 30;

/// Player API request body
#[derive(Debug, Serialize)]
struct PlayerRequest<'a> {
    context: PlayerContext,

    #[serde(rename = "videoId")]
    video_id: &'a str,
}

#[derive(Debug, Serialize)]
struct PlayerContext {
    client: PlayerClient,
}

/// Client identification the player endpoint expects
#[derive(Debug, Serialize)]
struct PlayerClient {
    #[serde(rename = "clientName")]
    client_name: &'static str,

    #[serde(rename = "clientVersion")]
    client_version: &'static str,

    #[serde(rename = "androidSdkVersion")]
    android_sdk_version: u32,
}

/// Primary acquisition strategy: asks the player endpoint for the video's
/// caption track list and downloads the best match. This endpoint is an
/// undocumented dependency and breaks from time to time, so any failure
/// here is reported as [`FetchError::NotFound`] and the chain continues.
#[derive(Debug, Default)]
pub struct PlayerApiStrategy;

impl PlayerApiStrategy {
    pub fn new() -> Self {
        PlayerApiStrategy
    }

    async fn try_fetch(
        &self,
        client: &Client,
        request: &TranscriptRequest,
    ) -> Result<Vec<RawTranscriptSegment>> {
        let body = PlayerRequest {
            context: PlayerContext {
                client: PlayerClient {
                    client_name: CLIENT_NAME,
                    client_version: CLIENT_VERSION,
                    android_sdk_version: ANDROID_SDK_VERSION,
                },
            },
            video_id: &request.video_id,
        };

        let response: Value = client
            .post(PLAYER_ENDPOINT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let tracks = response
            .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("player response carries no caption tracks"))?;

        let track = select_track(tracks, &request.language_hints)
            .ok_or_else(|| anyhow!("caption track list is empty"))?;
        let base_url = track
            .get("baseUrl")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("caption track missing baseUrl"))?;

        let xml = client
            .get(base_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let segments = parse_timedtext_xml(&xml);
        if segments.is_empty() {
            bail!("caption track parsed to zero segments");
        }
        Ok(segments)
    }
}

#[async_trait]
impl TranscriptStrategy for PlayerApiStrategy {
    fn name(&self) -> &'static str {
        "player-api"
    }

    async fn fetch(
        &self,
        client: &Client,
        request: &TranscriptRequest,
    ) -> Result<Vec<RawTranscriptSegment>, FetchError> {
        match self.try_fetch(client, request).await {
            Ok(segments) => Ok(segments),
            Err(err) => {
                debug!("player API strategy unavailable: {}", err);
                Err(FetchError::NotFound)
            }
        }
    }
}

// Scan the caller's candidates in order, matching language code and
// auto-generated kind; fall back to the first listed track.
fn select_track<'a>(tracks: &'a [Value], candidates: &[LanguagePreference]) -> Option<&'a Value> {
    for candidate in candidates {
        let found = tracks.iter().find(|track| {
            let code = track
                .get("languageCode")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let auto = track.get("kind").and_then(Value::as_str) == Some("asr");
            auto == candidate.auto_generated
                && language_utils::language_codes_match(code, &candidate.code)
        });
        if found.is_some() {
            return found;
        }
    }
    tracks.first()
}

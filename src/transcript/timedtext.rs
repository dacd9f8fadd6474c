use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;

use crate::errors::FetchError;

use super::{
    LanguagePreference, RawTranscriptSegment, TranscriptRequest, TranscriptStrategy,
    parse_timedtext_xml,
};

// @module: Public timed-text endpoint strategy

const TIMEDTEXT_ENDPOINT: &str = "https://www.youtube.com/api/timedtext";

/// Queries the public timed-text endpoint once per language candidate in
/// the caller's preference order, accepting the first response with at
/// least one parseable entry. Only publicly listed captions are reachable
/// this way, so finding nothing is an expected outcome and every failure
/// maps to [`FetchError::NotFound`].
#[derive(Debug, Default)]
pub struct TimedTextStrategy;

impl TimedTextStrategy {
    pub fn new() -> Self {
        TimedTextStrategy
    }
}

#[async_trait]
impl TranscriptStrategy for TimedTextStrategy {
    fn name(&self) -> &'static str {
        "timedtext"
    }

    async fn fetch(
        &self,
        client: &Client,
        request: &TranscriptRequest,
    ) -> Result<Vec<RawTranscriptSegment>, FetchError> {
        for candidate in &request.language_hints {
            let Ok(url) = build_url(&request.video_id, candidate) else {
                continue;
            };

            let response = match client
                .get(url.as_str())
                .header("accept", "text/xml,*/*")
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    debug!("timedtext request for '{}' failed: {}", candidate, err);
                    continue;
                }
            };
            if !response.status().is_success() {
                continue;
            }

            let Ok(xml) = response.text().await else {
                continue;
            };
            if !xml.contains("<text") {
                continue;
            }

            let segments = parse_timedtext_xml(&xml);
            if !segments.is_empty() {
                return Ok(segments);
            }
        }

        Err(FetchError::NotFound)
    }
}

fn build_url(video_id: &str, candidate: &LanguagePreference) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(TIMEDTEXT_ENDPOINT)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("v", video_id);
        pairs.append_pair("lang", &candidate.code);
        if candidate.auto_generated {
            pairs.append_pair("kind", "asr");
        }
    }
    Ok(url)
}

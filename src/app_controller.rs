use anyhow::{Context, Result};
use log::{debug, info, warn};
use reqwest::Client;
use std::time::Duration;

use crate::app_config::Config;
use crate::captions::{CaptionDocument, CaptionItem, parse_captions, render_captions};
use crate::correction::{self, Suggestion};
use crate::errors::AppError;
use crate::language_utils;
use crate::segmenter::naive_segment;
use crate::transcript::{
    LanguagePreference, TranscriptFetcher, TranscriptRequest, extract_video_id, to_caption_items,
};

// @module: Application controller driving the caption pipeline

/// A rendered subtitle artifact ready to hand back to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleOutput {
    /// Suggested download name, `captions-{lang}.{ext}`
    pub filename: String,

    /// Subtitle file content
    pub content: String,
}

/// Main application controller for caption acquisition and normalization.
///
/// Holds the configuration and a single transcript fetcher whose HTTP
/// client is constructed once at startup and shared by every strategy.
pub struct Controller {
    config: Config,
    fetcher: TranscriptFetcher,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        let fetcher = TranscriptFetcher::new(client);
        Ok(Controller { config, fetcher })
    }

    /// Controller with a caller-supplied fetcher (strategy injection)
    pub fn with_fetcher(config: Config, fetcher: TranscriptFetcher) -> Self {
        Controller { config, fetcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Upload path: turn a caption or transcript file into cues.
    ///
    /// `.srt`/`.vtt` files go through the dialect parsers; `.txt` is
    /// segmented sentence by sentence. Other extensions are rejected
    /// (audio/video transcription is an external concern).
    pub fn process_subtitle_input(
        &self,
        filename: &str,
        content: &str,
    ) -> Result<CaptionDocument, AppError> {
        if content.len() as u64 > self.config.max_upload_bytes {
            return Err(AppError::InputTooLarge(format!(
                "upload exceeds {} bytes",
                self.config.max_upload_bytes
            )));
        }

        let lower = filename.to_lowercase();
        let document = if lower.ends_with(".srt") || lower.ends_with(".vtt") {
            parse_captions(filename, content)
        } else if lower.ends_with(".txt") {
            CaptionDocument::from_cues(naive_segment(content, self.config.max_chunk_seconds))
        } else {
            return Err(AppError::InvalidInput(format!(
                "unsupported file type: {}",
                filename
            )));
        };

        if document.cues.is_empty() {
            return Err(AppError::NoCues);
        }

        debug!("Processed '{}' into {} cues", filename, document.cues.len());
        Ok(document)
    }

    /// Fetch path: obtain a hosted video's transcript and render it as a
    /// subtitle file.
    ///
    /// The whole fetch runs under the configured deadline; on expiry the
    /// partial result is discarded and a timeout-specific error is
    /// returned. When acquisition fails and the caller supplied a raw
    /// transcript, that text is segmented instead.
    pub async fn generate_subtitles(
        &self,
        url_or_id: &str,
        fallback_transcript: Option<&str>,
    ) -> Result<SubtitleOutput, AppError> {
        let cues = match extract_video_id(url_or_id) {
            Some(video_id) => self.fetch_cues(&video_id, fallback_transcript).await?,
            None => match usable_transcript(fallback_transcript) {
                Some(raw) => naive_segment(raw, self.config.max_chunk_seconds),
                None => {
                    return Err(AppError::InvalidInput(
                        "not a recognizable video URL or id, and no transcript was provided"
                            .to_string(),
                    ));
                }
            },
        };

        if cues.is_empty() {
            return Err(AppError::NoCues);
        }

        let format = self.config.output_format;
        Ok(SubtitleOutput {
            filename: format!(
                "captions-{}.{}",
                self.config.target_language,
                format.extension()
            ),
            content: render_captions(&cues, format),
        })
    }

    async fn fetch_cues(
        &self,
        video_id: &str,
        fallback_transcript: Option<&str>,
    ) -> Result<Vec<CaptionItem>, AppError> {
        let request = TranscriptRequest {
            video_id: video_id.to_string(),
            target_language: self.config.target_language.clone(),
            language_hints: self.language_hints(),
        };

        let deadline = Duration::from_secs(self.config.fetch_timeout_secs);
        let outcome = tokio::time::timeout(deadline, self.fetcher.fetch_transcript(&request)).await;

        match outcome {
            Err(_) => Err(AppError::Timeout(self.config.fetch_timeout_secs)),
            Ok(Ok(segments)) => {
                info!("Fetched {} transcript segments for {}", segments.len(), video_id);
                Ok(to_caption_items(&segments))
            }
            Ok(Err(err)) => match usable_transcript(fallback_transcript) {
                Some(raw) => {
                    warn!(
                        "Transcript fetch failed ({}), segmenting caller-provided transcript",
                        err
                    );
                    Ok(naive_segment(raw, self.config.max_chunk_seconds))
                }
                None => Err(AppError::Fetch(err)),
            },
        }
    }

    /// Proofreading path: run the correction engine over transcript text.
    ///
    /// The configured character cap is enforced here, before invocation,
    /// to bound the engine's regex-scan cost.
    pub fn proofread(&self, text: &str) -> Result<Vec<Suggestion>, AppError> {
        if text.chars().count() > self.config.max_suggest_chars {
            return Err(AppError::InputTooLarge(format!(
                "proofreading input exceeds {} characters",
                self.config.max_suggest_chars
            )));
        }
        Ok(correction::suggest(text))
    }

    // English first, then the target language, then the configured tail,
    // deduplicated while preserving order.
    fn language_hints(&self) -> Vec<LanguagePreference> {
        // Normalize the target to its two-letter form when possible, but
        // continue with the raw value if not
        let target = match language_utils::normalize_to_part1(&self.config.target_language) {
            Ok(code) => code,
            Err(e) => {
                warn!("Language code issue: {}", e);
                self.config.target_language.trim().to_lowercase()
            }
        };
        let mut candidates: Vec<String> = vec![
            "en".to_string(),
            "a.en".to_string(),
            target.clone(),
            format!("a.{}", target),
        ];
        candidates.extend(self.config.language_hints.iter().cloned());

        let mut seen: Vec<String> = Vec::new();
        for candidate in candidates {
            if !candidate.is_empty() && !seen.contains(&candidate) {
                seen.push(candidate);
            }
        }

        seen.iter().map(|c| LanguagePreference::parse(c)).collect()
    }
}

fn usable_transcript(transcript: Option<&str>) -> Option<&str> {
    transcript.filter(|t| !t.trim().is_empty())
}

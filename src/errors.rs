/*!
 * Error types for the yascap application.
 *
 * This module contains custom error types for different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while acquiring a transcript for a hosted video
#[derive(Error, Debug)]
pub enum FetchError {
    /// A strategy found nothing usable; the fallback chain may continue.
    /// Also the terminal error once every strategy is exhausted.
    #[error("no transcript segments available")]
    NotFound,

    /// The video page could not be retrieved
    #[error("video page request failed: {0}")]
    PageRequestFailed(String),

    /// The embedded player-response blob was missing from the page
    #[error("player response not found in video page")]
    PlayerResponseMissing,

    /// The player-response blob was present but not valid JSON
    #[error("failed to parse player response: {0}")]
    PlayerResponseInvalid(String),

    /// The player response carried no caption track list
    #[error("video has no caption tracks")]
    NoCaptionTracks,

    /// The selected caption track had no payload URL
    #[error("caption track base URL missing")]
    TrackUrlMissing,

    /// The caption track payload could not be fetched
    #[error("caption track request failed: {0}")]
    TrackRequestFailed(String),

    /// The caption track fetched but parsed to zero cues
    #[error("caption track contained no cues")]
    TrackEmpty,
}

impl FetchError {
    /// Whether the fallback chain may continue past this error. Only the
    /// expected-empty case is recoverable; everything else ends the chain.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FetchError::NotFound)
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// The request input was malformed or unsupported
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request input exceeded a configured size cap
    #[error("input too large: {0}")]
    InputTooLarge(String),

    /// Transcript acquisition failed after the whole fallback chain
    #[error("could not obtain transcript: {0}")]
    Fetch(#[from] FetchError),

    /// The fetch-and-generate request exceeded its deadline
    #[error("transcript fetch timed out after {0} seconds")]
    Timeout(u64),

    /// No valid caption cue survived parsing
    #[error("no caption cues could be parsed from the input")]
    NoCues,

    /// Error from a file operation
    #[error("file error: {0}")]
    File(String),

    /// Any other error
    #[error("unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// @module: Timestamp encoding and decoding for the two subtitle dialects

// @const: SRT timestamp regex (hour field required, 1-3 digits)
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3}):(\d{1,2}):(\d{1,2})[.,](\d{1,3})").unwrap()
});

// @const: VTT timestamp regex (hour field optional)
static VTT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(\d{1,3}):)?(\d{1,2}):(\d{1,2})[.,](\d{1,3})").unwrap()
});

/// Subtitle dialect selector
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    // @dialect: SubRip, comma millisecond separator
    #[default]
    Srt,
    // @dialect: WebVTT, dot millisecond separator
    Vtt,
}

impl SubtitleFormat {
    /// File extension for this dialect, without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
        }
    }

    fn millis_separator(&self) -> char {
        match self {
            Self::Srt => ',',
            Self::Vtt => '.',
        }
    }
}

impl std::fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for SubtitleFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            _ => Err(anyhow!("Invalid subtitle format: {}", s)),
        }
    }
}

/// Format a seconds value as a dialect timestamp.
///
/// Hours, minutes and seconds are zero-padded to two digits (hours grow
/// past two digits for long media instead of being truncated). The
/// millisecond field is truncated, not rounded, from the fractional part.
pub fn format_timestamp(seconds: f64, format: SubtitleFormat) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let whole = seconds.floor();
    let total = whole as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    let millis = ((seconds - whole) * 1000.0).floor() as u64;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        secs,
        format.millis_separator(),
        millis
    )
}

/// Parse a dialect timestamp into seconds.
///
/// Accepts flexible inputs: a leading byte-order marker, 1-3 digit hour
/// fields, either millisecond separator, a missing hour field (VTT) and
/// short millisecond fields (right-padded to three digits). Returns 0.0
/// when no timestamp pattern is found so a single malformed line never
/// aborts a whole document.
pub fn parse_timestamp(value: &str, format: SubtitleFormat) -> f64 {
    let cleaned = value.replace('\u{feff}', "");
    let cleaned = cleaned.trim();

    let pattern = match format {
        SubtitleFormat::Srt => &SRT_TIMESTAMP_REGEX,
        SubtitleFormat::Vtt => &VTT_TIMESTAMP_REGEX,
    };

    let Some(caps) = pattern.captures(cleaned) else {
        return 0.0;
    };

    let hours: u64 = caps
        .get(1)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let minutes: u64 = caps
        .get(2)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let seconds: u64 = caps
        .get(3)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let millis = normalize_millis(caps.get(4).map_or("0", |m| m.as_str()));

    (hours * 3600 + minutes * 60 + seconds) as f64 + millis as f64 / 1000.0
}

// Pad short millisecond fields on the right ("5" means 500ms, not 5ms)
// and keep only the first three digits.
fn normalize_millis(raw: &str) -> u64 {
    let mut digits = raw.to_string();
    while digits.len() < 3 {
        digits.push('0');
    }
    digits.truncate(3);
    digits.parse().unwrap_or(0)
}

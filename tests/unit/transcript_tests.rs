/*!
 * Tests for transcript acquisition
 */

use reqwest::Client;

use yascap::errors::FetchError;
use yascap::transcript::{
    LanguagePreference, TranscriptFetcher, decode_html_entities, extract_video_id,
    parse_timedtext_xml, to_caption_items,
};

use crate::common::mock_strategies::{
    MockOutcome, MockStrategy, new_call_log, request_for, sample_segments,
};

/// Test video id extraction across URL forms
#[test]
fn test_extract_video_id_withKnownForms_shouldReturnId() {
    let expected = Some("dQw4w9WgXcQ".to_string());

    assert_eq!(extract_video_id("dQw4w9WgXcQ"), expected);
    assert_eq!(extract_video_id("  dQw4w9WgXcQ  "), expected);
    assert_eq!(
        extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
        expected
    );
    assert_eq!(
        extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"),
        expected
    );
    assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), expected);
    assert_eq!(
        extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
        expected
    );
    assert_eq!(
        extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
        expected
    );
}

/// Test rejection of non-video inputs
#[test]
fn test_extract_video_id_withInvalidInput_shouldReturnNone() {
    assert_eq!(extract_video_id(""), None);
    assert_eq!(extract_video_id("not-a-valid-id"), None);
    assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
    assert_eq!(extract_video_id("https://www.youtube.com/watch"), None);
}

/// Test language preference parsing
#[test]
fn test_language_preference_parse_withAutoPrefix_shouldMarkAutoGenerated() {
    let plain = LanguagePreference::parse("en");
    assert_eq!(plain.code, "en");
    assert!(!plain.auto_generated);

    let auto = LanguagePreference::parse("a.pt");
    assert_eq!(auto.code, "pt");
    assert!(auto.auto_generated);

    assert_eq!(plain.to_string(), "en");
    assert_eq!(auto.to_string(), "a.pt");
}

/// Test HTML entity decoding
#[test]
fn test_decode_html_entities_withNamedAndNumeric_shouldDecodeAll() {
    assert_eq!(
        decode_html_entities("Tom &amp; Jerry &#39;live&#39;"),
        "Tom & Jerry 'live'"
    );
    assert_eq!(decode_html_entities("&lt;b&gt;bold&lt;/b&gt;"), "<b>bold</b>");
    assert_eq!(decode_html_entities("caf&#233;"), "café");
    assert_eq!(decode_html_entities("plain text"), "plain text");
}

/// Test timed-text XML payload parsing
#[test]
fn test_parse_timedtext_xml_withValidPayload_shouldProduceSegments() {
    let xml = r#"<?xml version="1.0"?><transcript>
<text start="0.5" dur="2.25">Hello &amp; welcome</text>
<text start="3.1" dur="1.9"><i>styled</i> text</text>
<text start="5.0" dur="1.0">   </text>
</transcript>"#;

    let segments = parse_timedtext_xml(xml);

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].text, "Hello & welcome");
    assert_eq!(segments[0].offset_ms, 500);
    assert_eq!(segments[0].duration_ms, 2250);
    assert_eq!(segments[1].text, "styled text");
    assert_eq!(segments[1].offset_ms, 3100);
    assert_eq!(segments[1].duration_ms, 1900);
}

/// Test the millisecond-to-seconds cue mapping
#[test]
fn test_to_caption_items_withSegments_shouldDivideByThousand() {
    let cues = to_caption_items(&sample_segments());

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].id, 1);
    assert_eq!(cues[0].start, 1.0);
    assert_eq!(cues[0].end, 3.5);
    assert_eq!(cues[0].text, "Hello world");
    assert_eq!(cues[1].id, 2);
    assert_eq!(cues[1].start, 4.0);
    assert_eq!(cues[1].end, 6.0);
}

/// Test that the first successful strategy stops the chain
#[test]
fn test_fetch_transcript_withFirstStrategySucceeding_shouldNotTryOthers() {
    let calls = new_call_log();
    let fetcher = TranscriptFetcher::with_strategies(
        Client::new(),
        vec![
            MockStrategy::boxed("first", MockOutcome::Segments(sample_segments()), &calls),
            MockStrategy::boxed("second", MockOutcome::Segments(sample_segments()), &calls),
        ],
    );

    let result = tokio_test::block_on(fetcher.fetch_transcript(&request_for("dQw4w9WgXcQ")));

    assert_eq!(result.unwrap().len(), 2);
    assert_eq!(*calls.lock().unwrap(), vec!["first"]);
}

/// Test that a raising primary and an empty second strategy still reach
/// the final strategy
#[test]
fn test_fetch_transcript_withEarlyFailures_shouldReachFinalStrategy() {
    let calls = new_call_log();
    let fetcher = TranscriptFetcher::with_strategies(
        Client::new(),
        vec![
            MockStrategy::boxed("primary", MockOutcome::NotFound, &calls),
            MockStrategy::boxed("timedtext", MockOutcome::Empty, &calls),
            MockStrategy::boxed("watch-page", MockOutcome::Segments(sample_segments()), &calls),
        ],
    );

    let result = tokio_test::block_on(fetcher.fetch_transcript(&request_for("dQw4w9WgXcQ")));

    assert!(result.is_ok());
    assert_eq!(*calls.lock().unwrap(), vec!["primary", "timedtext", "watch-page"]);
}

/// Test that an empty success is treated like not-found
#[test]
fn test_fetch_transcript_withEmptySuccess_shouldContinueChain() {
    let calls = new_call_log();
    let fetcher = TranscriptFetcher::with_strategies(
        Client::new(),
        vec![
            MockStrategy::boxed("empty", MockOutcome::Empty, &calls),
            MockStrategy::boxed("full", MockOutcome::Segments(sample_segments()), &calls),
        ],
    );

    let result = tokio_test::block_on(fetcher.fetch_transcript(&request_for("dQw4w9WgXcQ")));

    assert_eq!(result.unwrap().len(), 2);
    assert_eq!(*calls.lock().unwrap(), vec!["empty", "full"]);
}

/// Test that a strategy-fatal error ends the chain immediately
#[test]
fn test_fetch_transcript_withFatalError_shouldStopChain() {
    let calls = new_call_log();
    let fetcher = TranscriptFetcher::with_strategies(
        Client::new(),
        vec![
            MockStrategy::boxed("fatal", MockOutcome::Fatal, &calls),
            MockStrategy::boxed("unreached", MockOutcome::Segments(sample_segments()), &calls),
        ],
    );

    let result = tokio_test::block_on(fetcher.fetch_transcript(&request_for("dQw4w9WgXcQ")));

    assert!(matches!(result, Err(FetchError::PlayerResponseMissing)));
    assert_eq!(*calls.lock().unwrap(), vec!["fatal"]);
}

/// Test that exhausting every strategy yields the not-found error
#[test]
fn test_fetch_transcript_withAllStrategiesEmpty_shouldReturnNotFound() {
    let calls = new_call_log();
    let fetcher = TranscriptFetcher::with_strategies(
        Client::new(),
        vec![
            MockStrategy::boxed("one", MockOutcome::NotFound, &calls),
            MockStrategy::boxed("two", MockOutcome::Empty, &calls),
        ],
    );

    let result = tokio_test::block_on(fetcher.fetch_transcript(&request_for("dQw4w9WgXcQ")));

    assert!(matches!(result, Err(FetchError::NotFound)));
    assert_eq!(*calls.lock().unwrap(), vec!["one", "two"]);
}

/// Test caption-track selection precedence on the watch-page path
#[test]
fn test_pick_caption_track_withVariousTracks_shouldFollowPrecedence() {
    use serde_json::json;
    use yascap::transcript::watch_page::pick_caption_track;

    let auto_es = json!({ "languageCode": "es", "kind": "asr", "baseUrl": "auto-es" });
    let manual_fr = json!({ "languageCode": "fr", "baseUrl": "manual-fr" });
    let manual_en = json!({ "languageCode": "en", "baseUrl": "manual-en" });

    // Exact target-language match wins
    let tracks = vec![auto_es.clone(), manual_fr.clone(), manual_en.clone()];
    assert_eq!(pick_caption_track(&tracks, "fr")["baseUrl"], "manual-fr");

    // Then exact English match
    let tracks = vec![manual_fr.clone(), manual_en.clone()];
    assert_eq!(pick_caption_track(&tracks, "de")["baseUrl"], "manual-en");

    // Then the first non-auto-generated track
    let tracks = vec![auto_es.clone(), manual_fr.clone()];
    assert_eq!(pick_caption_track(&tracks, "pt")["baseUrl"], "manual-fr");

    // Finally the first track of any kind
    let tracks = vec![auto_es.clone()];
    assert_eq!(pick_caption_track(&tracks, "pt")["baseUrl"], "auto-es");
}

/// Test recoverability classification on fetch errors
#[test]
fn test_fetch_error_isRecoverable_shouldOnlyAllowNotFound() {
    assert!(FetchError::NotFound.is_recoverable());
    assert!(!FetchError::PlayerResponseMissing.is_recoverable());
    assert!(!FetchError::NoCaptionTracks.is_recoverable());
    assert!(!FetchError::TrackEmpty.is_recoverable());
}

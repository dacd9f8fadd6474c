/*!
 * Common test utilities for the yascap test suite
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;


/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small two-cue SRT document used across tests
pub fn sample_srt() -> &'static str {
    "1\n00:00:01,000 --> 00:00:03,500\nHello world\n\n2\n00:00:04,000 --> 00:00:06,000\nSecond line\n"
}

/// A small VTT document with a cue identifier line and inline markup
pub fn sample_vtt() -> &'static str {
    "WEBVTT\n\nintro\n00:00:01.000 --> 00:00:03.500\n<i>Hello</i> world\n\n00:00:04.000 --> 00:00:06.000\nSecond line\n"
}

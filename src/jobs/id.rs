//! Job id derivation and source id extraction.

use lazy_static::lazy_static;
use regex::Regex;

use super::JobError;

/// Length of a source token (e.g. a video id).
pub const SOURCE_ID_LEN: usize = 11;

lazy_static! {
    static ref WATCH_URL_RE: Regex =
        Regex::new(r"(?:www\.)?youtube\.com/watch\?v=(?P<v_id>.{11})$").unwrap();
}

/// Extract the source token from a submitted link.
///
/// Accepts either a bare token of [`SOURCE_ID_LEN`] characters or a full
/// `youtube.com/watch?v=...` URL. Anything else yields `None`.
pub fn extract_source_id(link: &str) -> Option<String> {
    if link.chars().count() == SOURCE_ID_LEN {
        return Some(link.to_string());
    }
    WATCH_URL_RE
        .captures(link)
        .map(|caps| caps["v_id"].to_string())
}

/// Derive a job id from a source id.
///
/// The id is the concatenation of the decimal code point of every character
/// of the source id, in order. Deterministic and pure, but NOT
/// collision-free: two distinct source ids can in principle concatenate to
/// the same digit string, so this is a best-effort identifier kept for
/// compatibility with existing clients, not a cryptographic hash.
pub fn derive_job_id(source_id: &str) -> Result<String, JobError> {
    if source_id.is_empty() {
        return Err(JobError::InvalidSource(
            "empty source id".to_string(),
        ));
    }
    let mut job_id = String::with_capacity(source_id.len() * 3);
    for c in source_id.chars() {
        job_id.push_str(&(c as u32).to_string());
    }
    Ok(job_id)
}

//! Cleanup of source-reported titles and channel names.
//!
//! Source titles come littered with release tags ("[Monstercat Release]",
//! "(Official Video)") and channel names with branding suffixes
//! ("TaylorSwiftVEVO"). The cleaned title doubles as the job label and the
//! download filename.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Anything bracketed at the very beginning of a segment, e.g. "[Future Bass] - ...".
    static ref LEADING_BRACKET_RE: Regex = Regex::new(r"^\[.*\]\s*").unwrap();
    // Bracketed or parenthesized segments carrying release-tag noise.
    static ref NOISE_BRACKET_RE: Regex = Regex::new(
        r"(?i)\s?[\[(][^\])]*(?:monstercat|release|official|music|video|audio)[^\])]*[\])]"
    )
    .unwrap();
    static ref TRAILING_VEVO_RE: Regex = Regex::new(r"(?i)vevo$").unwrap();
    static ref TRAILING_TV_RE: Regex = Regex::new(r"(?i)tv$").unwrap();
    static ref CAMEL_WORD_RE: Regex = Regex::new(r"[A-Z][^A-Z\s]*").unwrap();
}

/// Clean a source-reported title into a label/filename.
///
/// Splits on `-`, strips leading bracketed tags and noise-keyword brackets
/// from each piece, drops pieces that end up empty and rejoins with " - ".
pub fn clean_title(title: &str) -> String {
    let cleaned: Vec<String> = title
        .split('-')
        .map(|piece| {
            let piece = LEADING_BRACKET_RE.replace(piece, "");
            let piece = NOISE_BRACKET_RE.replace_all(&piece, "");
            piece.trim().to_string()
        })
        .filter(|piece| !piece.is_empty())
        .collect();
    cleaned.join(" - ")
}

/// Clean a channel name: drop trailing "VEVO"/"TV" branding and break up
/// camel case, except for the "UKF ..." channel family which is kept as-is.
pub fn clean_channel(channel: &str) -> String {
    let stripped = TRAILING_VEVO_RE.replace(channel, "");
    let stripped = TRAILING_TV_RE.replace(&stripped, "").to_string();
    if stripped.starts_with("UKF") {
        return stripped;
    }
    let words: Vec<&str> = CAMEL_WORD_RE
        .find_iter(&stripped)
        .map(|m| m.as_str())
        .collect();
    if words.is_empty() {
        stripped
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_strips_leading_genre_tag_and_release_bracket() {
        assert_eq!(
            clean_title("[Future Bass] - Grant Bowtie - High Tide [Monstercat Release]"),
            "Grant Bowtie - High Tide"
        );
    }

    #[test]
    fn test_title_strips_official_video_parens() {
        assert_eq!(
            clean_title("Ellie Goulding - Love Me Like You Do (Official Video)"),
            "Ellie Goulding - Love Me Like You Do"
        );
        assert_eq!(
            clean_title("Eminem - Kings Never Die (Audio) ft. Gwen Stefani"),
            "Eminem - Kings Never Die ft. Gwen Stefani"
        );
    }

    #[test]
    fn test_title_without_noise_is_untouched() {
        assert_eq!(
            clean_title("Taylor Swift - Bad Blood ft. Kendrick Lamar"),
            "Taylor Swift - Bad Blood ft. Kendrick Lamar"
        );
    }

    #[test]
    fn test_channel_drops_vevo_and_splits_camel_case() {
        assert_eq!(clean_channel("TaylorSwiftVEVO"), "Taylor Swift");
        assert_eq!(clean_channel("MeekMillTV"), "Meek Mill");
        assert_eq!(clean_channel("Monstercat"), "Monstercat");
    }

    #[test]
    fn test_ukf_channels_are_kept_verbatim() {
        assert_eq!(clean_channel("UKF Dubstep"), "UKF Dubstep");
        assert_eq!(clean_channel("UKF Drum & Bass"), "UKF Drum & Bass");
    }

    #[test]
    fn test_channel_with_spaces() {
        assert_eq!(clean_channel("Iron Maiden"), "Iron Maiden");
    }
}

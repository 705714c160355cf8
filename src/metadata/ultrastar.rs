use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::SongMetadata;
use crate::errors::{AppError, Result};

const REQUIRED: [&str; 5] = ["TITLE", "ARTIST", "COVER", "MP3", "VIDEO"];

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#([A-Za-z0-9_-]+):(.*)$").expect("header regex is valid"))
}

/// Parses the `#KEY:value` header block of an UltraStar txt file.
///
/// Parsing stops at the first line that is not a header (the note data).
/// Keys are matched case-insensitively; the last occurrence of a key wins.
pub fn parse_song_txt(raw: &str) -> Result<SongMetadata> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut headers: HashMap<String, String> = HashMap::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        match header_regex().captures(line) {
            Some(caps) => {
                headers.insert(caps[1].to_ascii_uppercase(), caps[2].trim().to_string());
            }
            None => break,
        }
    }

    let missing: Vec<&str> = REQUIRED
        .iter()
        .copied()
        .filter(|key| headers.get(*key).map_or(true, |v| v.is_empty()))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Metadata(format!(
            "song file is missing required headers: {}",
            missing.join(", ")
        )));
    }

    let mut take = |key: &str| headers.remove(key).unwrap_or_default();
    Ok(SongMetadata {
        title: take("TITLE"),
        artist: take("ARTIST"),
        cover_ref: take("COVER"),
        audio_filename: take("MP3"),
        video_filename: take("VIDEO"),
        raw_text: raw.to_string(),
    })
}

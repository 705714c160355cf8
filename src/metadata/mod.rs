pub mod ultrastar;

use serde::{Deserialize, Serialize};

pub use ultrastar::parse_song_txt;

/// Header values of an UltraStar song file, plus the text they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMetadata {
    pub title: String,
    pub artist: String,
    pub cover_ref: String,
    pub audio_filename: String,
    pub video_filename: String,
    #[serde(skip)]
    pub raw_text: String,
}

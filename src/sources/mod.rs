//! Collaborators the pipeline pulls song assets from.

pub mod http;
pub mod prompt;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::Result;

pub use http::SongDatabase;
pub use prompt::StdinPrompt;

#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Raw UltraStar text for the song.
    async fn fetch_song_txt(&self, song_id: &str) -> Result<String>;
}

#[async_trait]
pub trait CoverSource: Send + Sync {
    /// Downloads the cover into `dir` and returns the written path.
    async fn download_cover(&self, song_id: &str, dir: &Path, cover_ref: &str) -> Result<PathBuf>;
}

#[async_trait]
pub trait LinkLookup: Send + Sync {
    /// `Ok(None)` when the database has no video link for the song.
    async fn fetch_link(&self, song_id: &str) -> Result<Option<String>>;
}

/// Asks the operator for a line of text.
#[async_trait]
pub trait LinkPrompt: Send + Sync {
    async fn prompt(&self, label: &str) -> Result<String>;
}

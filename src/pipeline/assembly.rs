use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::Result;
use crate::metadata::{parse_song_txt, SongMetadata};
use crate::sources::{CoverSource, LyricsSource};
use crate::utils::{ensure_dir_exists, song_dir};

pub const LYRICS_FILENAME: &str = "song.txt";

/// Parsed song with its directory created but nothing written yet.
#[derive(Debug, Clone)]
pub struct PreparedBundle {
    pub metadata: SongMetadata,
    pub target_dir: PathBuf,
    /// False when the directory was left over from an earlier run.
    pub created_dir: bool,
}

#[derive(Debug, Clone)]
pub struct AssembledBundle {
    pub metadata: SongMetadata,
    pub target_dir: PathBuf,
    pub lyrics_path: PathBuf,
    pub cover_path: PathBuf,
}

pub struct BundleAssembler {
    lyrics: Arc<dyn LyricsSource>,
    covers: Arc<dyn CoverSource>,
    songs_dir: PathBuf,
}

impl BundleAssembler {
    pub fn new(
        lyrics: Arc<dyn LyricsSource>,
        covers: Arc<dyn CoverSource>,
        songs_dir: PathBuf,
    ) -> Self {
        Self { lyrics, covers, songs_dir }
    }

    /// Both steps at once. The pipeline calls them separately so it knows the
    /// directory before populating it.
    #[cfg(test)]
    pub async fn assemble(&self, song_id: &str) -> Result<AssembledBundle> {
        let prepared = self.prepare(song_id).await?;
        self.populate(song_id, prepared).await
    }

    /// Fetches and parses the song text, then creates the target directory.
    pub async fn prepare(&self, song_id: &str) -> Result<PreparedBundle> {
        let raw = self.lyrics.fetch_song_txt(song_id).await?;
        let metadata = parse_song_txt(&raw)?;
        log::info!("[ASSEMBLY] Song: {} by {}", metadata.title, metadata.artist);

        let target_dir = song_dir(&self.songs_dir, &metadata.artist, &metadata.title);
        let created_dir = ensure_dir_exists(&target_dir).await?;

        Ok(PreparedBundle {
            metadata,
            target_dir,
            created_dir,
        })
    }

    /// Writes the lyrics, then downloads the cover.
    pub async fn populate(
        &self,
        song_id: &str,
        prepared: PreparedBundle,
    ) -> Result<AssembledBundle> {
        let PreparedBundle {
            metadata, target_dir, ..
        } = prepared;

        let lyrics_path = target_dir.join(LYRICS_FILENAME);
        tokio::fs::write(&lyrics_path, metadata.raw_text.as_bytes()).await?;
        log::info!("[ASSEMBLY] Saved lyrics");

        let cover_path = self
            .covers
            .download_cover(song_id, &target_dir, &metadata.cover_ref)
            .await?;
        log::info!("[ASSEMBLY] Downloaded cover image");

        Ok(AssembledBundle {
            metadata,
            target_dir,
            lyrics_path,
            cover_path,
        })
    }
}

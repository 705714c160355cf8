//! Song bundle acquisition: assembly, link resolution, then media download.
//!
//! Every stage runs to completion before the next one starts. The first
//! failure ends the run and is returned tagged with its [`Stage`].

pub mod assembly;
pub mod link;
pub mod media;
#[cfg(test)]
pub(crate) mod testing;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{AppConfig, FailurePolicy};
use crate::downloader::ytdlp::YtDlp;
use crate::downloader::{DownloaderAdapter, MediaDownloader};
use crate::errors::{AppError, PipelineError, Stage};
use crate::metadata::SongMetadata;
use crate::sources::{
    CoverSource, LinkLookup, LinkPrompt, LyricsSource, SongDatabase, StdinPrompt,
};

use assembly::{BundleAssembler, PreparedBundle};
use link::LinkResolver;
use media::MediaAcquirer;

/// Written into a song directory whose run failed under [`FailurePolicy::Mark`].
pub const INCOMPLETE_MARKER: &str = ".incomplete";

/// External services a pipeline is wired to.
pub struct Collaborators {
    pub lyrics: Arc<dyn LyricsSource>,
    pub covers: Arc<dyn CoverSource>,
    pub links: Arc<dyn LinkLookup>,
    pub prompt: Arc<dyn LinkPrompt>,
    pub downloader: Arc<dyn MediaDownloader>,
}

impl Collaborators {
    /// HTTP song database, `yt-dlp`, and a stdin prompt.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let database = Arc::new(SongDatabase::new(config)?);
        let ytdlp = YtDlp::new().with_ytdlp_path(config.ytdlp_path.clone());
        log::info!("Using {} at {}", ytdlp.get_name(), config.ytdlp_path);

        Ok(Self {
            lyrics: database.clone(),
            covers: database.clone(),
            links: database,
            prompt: Arc::new(StdinPrompt),
            downloader: Arc::new(ytdlp),
        })
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct BundleReport {
    pub metadata: SongMetadata,
    pub target_dir: PathBuf,
    pub lyrics_path: PathBuf,
    pub cover_path: PathBuf,
    pub link: String,
    pub audio_path: PathBuf,
    pub video_path: PathBuf,
}

pub struct Pipeline {
    assembler: BundleAssembler,
    resolver: LinkResolver,
    acquirer: MediaAcquirer,
    prompt: Arc<dyn LinkPrompt>,
    on_failure: FailurePolicy,
}

impl Pipeline {
    pub fn new(config: &AppConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            lyrics,
            covers,
            links,
            prompt,
            downloader,
        } = collaborators;

        Self {
            assembler: BundleAssembler::new(lyrics, covers, config.songs_dir.clone()),
            resolver: LinkResolver::new(links),
            acquirer: MediaAcquirer::new(
                DownloaderAdapter::new(downloader),
                config.audio_format.clone(),
                config.video_format.clone(),
            ),
            prompt,
            on_failure: config.on_failure,
        }
    }

    pub async fn run(&self, song_id: &str) -> Result<BundleReport, PipelineError> {
        log::info!("Fetching song with id: {}", song_id);

        let prepared = self
            .assembler
            .prepare(song_id)
            .await
            .map_err(|e| PipelineError::new(Stage::Assembly, e))?;
        let target_dir = prepared.target_dir.clone();
        let created_dir = prepared.created_dir;

        match self.run_in_dir(song_id, prepared).await {
            Ok(report) => {
                clear_marker(&target_dir).await;
                log::info!("Finished {}", target_dir.display());
                Ok(report)
            }
            Err(err) => {
                self.apply_failure_policy(&target_dir, created_dir, &err).await;
                Err(err)
            }
        }
    }

    async fn run_in_dir(
        &self,
        song_id: &str,
        prepared: PreparedBundle,
    ) -> Result<BundleReport, PipelineError> {
        let bundle = self
            .assembler
            .populate(song_id, prepared)
            .await
            .map_err(|e| PipelineError::new(Stage::Assembly, e))?;
        log::info!("Bundle assembled in {}", bundle.target_dir.display());

        let link = self
            .resolver
            .resolve(song_id, self.prompt.as_ref())
            .await
            .map_err(|e| PipelineError::new(Stage::LinkResolution, e))?;

        let media = self
            .acquirer
            .acquire(
                &link,
                &bundle.target_dir,
                &bundle.metadata.audio_filename,
                &bundle.metadata.video_filename,
            )
            .await
            .map_err(|e| PipelineError::new(Stage::MediaAcquisition, e))?;
        log::info!(
            "Media downloaded in {:.1}s",
            (media.audio.elapsed + media.video.elapsed).as_secs_f64()
        );

        Ok(BundleReport {
            metadata: bundle.metadata,
            target_dir: bundle.target_dir,
            lyrics_path: bundle.lyrics_path,
            cover_path: bundle.cover_path,
            link,
            audio_path: media.audio.output_path,
            video_path: media.video.output_path,
        })
    }

    /// `Remove` only deletes directories this run created; an existing one is marked instead.
    async fn apply_failure_policy(
        &self,
        target_dir: &Path,
        created_dir: bool,
        err: &PipelineError,
    ) {
        let result = match self.on_failure {
            FailurePolicy::Keep => {
                log::warn!("Leaving partial bundle in {}", target_dir.display());
                Ok(())
            }
            FailurePolicy::Remove if created_dir => {
                log::warn!("Removing partial bundle {}", target_dir.display());
                tokio::fs::remove_dir_all(target_dir).await
            }
            FailurePolicy::Remove => {
                log::warn!(
                    "{} existed before this run, marking it instead of removing",
                    target_dir.display()
                );
                write_marker(target_dir, err).await
            }
            FailurePolicy::Mark => write_marker(target_dir, err).await,
        };

        if let Err(e) = result {
            log::warn!(
                "Could not apply failure policy to {}: {}",
                target_dir.display(),
                e
            );
        }
    }
}

async fn write_marker(target_dir: &Path, err: &PipelineError) -> std::io::Result<()> {
    let note = format!("stage: {}\nerror: {}\n", err.stage, err.source);
    tokio::fs::write(target_dir.join(INCOMPLETE_MARKER), note).await
}

async fn clear_marker(target_dir: &Path) {
    match tokio::fs::remove_file(target_dir.join(INCOMPLETE_MARKER)).await {
        Ok(()) => log::debug!("Removed stale {} marker", INCOMPLETE_MARKER),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove {} marker: {}", INCOMPLETE_MARKER, e),
    }
}

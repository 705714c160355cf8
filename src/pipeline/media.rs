use std::path::Path;

use crate::downloader::{DownloadJob, DownloadOutcome, DownloaderAdapter};
use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct AcquiredMedia {
    pub audio: DownloadOutcome,
    pub video: DownloadOutcome,
}

/// Downloads the audio track, then the video, from one link.
///
/// The two jobs never overlap, and the video job is skipped when audio fails.
pub struct MediaAcquirer {
    adapter: DownloaderAdapter,
    audio_format: String,
    video_format: String,
}

impl MediaAcquirer {
    pub fn new(adapter: DownloaderAdapter, audio_format: String, video_format: String) -> Self {
        Self {
            adapter,
            audio_format,
            video_format,
        }
    }

    pub async fn acquire(
        &self,
        link: &str,
        target_dir: &Path,
        audio_filename: &str,
        video_filename: &str,
    ) -> Result<AcquiredMedia> {
        log::info!("[MEDIA] Starting to download video and audio");

        let audio_job = DownloadJob::audio(
            link,
            target_dir.to_path_buf(),
            audio_filename,
            &self.audio_format,
        );
        let audio = self.adapter.invoke(&audio_job, "Downloaded audio file").await?;

        let video_job = DownloadJob::video(
            link,
            target_dir.to_path_buf(),
            video_filename,
            &self.video_format,
        );
        let video = self.adapter.invoke(&video_job, "Downloaded video file").await?;

        Ok(AcquiredMedia { audio, video })
    }
}

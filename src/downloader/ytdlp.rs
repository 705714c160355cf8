use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::downloader::{DownloadJob, MediaDownloader};
use crate::errors::{AppError, Result};

/// Drives the `yt-dlp` binary.
pub struct YtDlp {
    name: String,
    ytdlp_path: String,
}

impl YtDlp {
    pub fn new() -> Self {
        Self {
            name: "yt-dlp".to_string(),
            ytdlp_path: "yt-dlp".to_string(),
        }
    }

    pub fn with_ytdlp_path(mut self, path: String) -> Self {
        self.ytdlp_path = path;
        self
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaDownloader for YtDlp {
    async fn download(&self, job: &DownloadJob) -> Result<()> {
        let args = job.to_args();
        let kind = if job.is_audio_extraction() { "audio" } else { "video" };
        log::info!("[YTDLP] Fetching {} into {:?}", kind, job.output_path());
        log::debug!("[YTDLP] Running: {} {}", self.ytdlp_path, args.join(" "));

        let output = Command::new(&self.ytdlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        log::debug!("[YTDLP] exit status: {}", output.status);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            log::debug!("[YTDLP] stderr: {}", stderr);
            return Err(AppError::Source(if stderr.is_empty() {
                format!("yt-dlp exited with {}", output.status)
            } else {
                format!("yt-dlp exited with {}: {}", output.status, stderr)
            }));
        }

        Ok(())
    }

    fn get_name(&self) -> &str {
        &self.name
    }
}

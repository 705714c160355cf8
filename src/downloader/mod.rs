pub mod ytdlp;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::{AppError, Result};

/// Audio-only extraction settings, passed ahead of the output options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionFlags {
    pub audio_format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputOptions {
    /// Stream format selector, e.g. `bestvideo[ext=mp4]+bestaudio[ext=m4a]/mp4`.
    pub format: Option<String>,
}

/// One external downloader invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub link: String,
    pub target_dir: PathBuf,
    pub output_filename: String,
    pub extraction: Option<ExtractionFlags>,
    pub output: OutputOptions,
}

impl DownloadJob {
    pub fn audio(
        link: &str,
        target_dir: PathBuf,
        output_filename: &str,
        audio_format: &str,
    ) -> Self {
        Self {
            link: link.to_string(),
            target_dir,
            output_filename: output_filename.to_string(),
            extraction: Some(ExtractionFlags {
                audio_format: audio_format.to_string(),
            }),
            output: OutputOptions::default(),
        }
    }

    pub fn video(link: &str, target_dir: PathBuf, output_filename: &str, format: &str) -> Self {
        Self {
            link: link.to_string(),
            target_dir,
            output_filename: output_filename.to_string(),
            extraction: None,
            output: OutputOptions {
                format: Some(format.to_string()),
            },
        }
    }

    pub fn is_audio_extraction(&self) -> bool {
        self.extraction.is_some()
    }

    pub fn output_path(&self) -> PathBuf {
        self.target_dir.join(&self.output_filename)
    }

    /// Command-line arguments: extraction flags, then output options, then the link.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(flags) = &self.extraction {
            args.push("--extract-audio".to_string());
            args.push("--audio-format".to_string());
            args.push(flags.audio_format.clone());
        }

        args.push("--paths".to_string());
        args.push(self.target_dir.to_string_lossy().into_owned());
        args.push("--output".to_string());
        args.push(self.output_filename.clone());
        if let Some(format) = &self.output.format {
            args.push("--format".to_string());
            args.push(format.clone());
        }

        args.push("--".to_string());
        args.push(self.link.clone());
        args
    }

    fn check_preconditions(&self) -> Result<()> {
        if self.link.trim().is_empty() {
            return Err(AppError::InvalidInput("download link is empty".to_string()));
        }
        if !self.target_dir.is_dir() {
            return Err(AppError::InvalidInput(format!(
                "target directory {:?} does not exist",
                self.target_dir
            )));
        }
        Ok(())
    }
}

/// Successful completion of a [`DownloadJob`].
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

/// External tool that fetches a link and writes the result to disk.
#[async_trait::async_trait]
pub trait MediaDownloader: Send + Sync {
    async fn download(&self, job: &DownloadJob) -> Result<()>;
    fn get_name(&self) -> &str;
}

/// Runs a job through a [`MediaDownloader`] with uniform logging and errors.
///
/// Failures are logged and returned as [`AppError::Download`]; nothing is retried.
#[derive(Clone)]
pub struct DownloaderAdapter {
    downloader: Arc<dyn MediaDownloader>,
}

impl DownloaderAdapter {
    pub fn new(downloader: Arc<dyn MediaDownloader>) -> Self {
        Self { downloader }
    }

    pub async fn invoke(
        &self,
        job: &DownloadJob,
        success_message: &str,
    ) -> Result<DownloadOutcome> {
        if let Err(e) = job.check_preconditions() {
            log::error!("Error downloading {}: {}", job.output_filename, e);
            return Err(e);
        }

        let start_time = Instant::now();
        log::debug!(
            "[{}] {} -> {:?}",
            self.downloader.get_name(),
            job.link,
            job.output_path()
        );

        match self.downloader.download(job).await {
            Ok(()) => {
                log::info!("{}", success_message);
                Ok(DownloadOutcome {
                    output_path: job.output_path(),
                    elapsed: start_time.elapsed(),
                })
            }
            Err(e) => {
                log::error!("Error downloading {}: {}", job.output_filename, e);
                Err(AppError::Download {
                    filename: job.output_filename.clone(),
                    message: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every job and fails the ones whose filename is listed.
    #[derive(Default)]
    pub struct RecordingDownloader {
        pub jobs: Mutex<Vec<DownloadJob>>,
        pub fail_on: Vec<String>,
    }

    impl RecordingDownloader {
        pub fn failing_on(filename: &str) -> Self {
            Self {
                jobs: Mutex::new(Vec::new()),
                fail_on: vec![filename.to_string()],
            }
        }

        pub fn jobs(&self) -> Vec<DownloadJob> {
            self.jobs.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl MediaDownloader for RecordingDownloader {
        async fn download(&self, job: &DownloadJob) -> Result<()> {
            self.jobs.lock().unwrap().push(job.clone());
            if self.fail_on.contains(&job.output_filename) {
                return Err(AppError::Source("HTTP Error 403: Forbidden".to_string()));
            }
            std::fs::write(job.output_path(), b"media")?;
            Ok(())
        }

        fn get_name(&self) -> &str {
            "recording"
        }
    }
}

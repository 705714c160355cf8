mod config;
mod downloader;
mod errors;
mod metadata;
mod pipeline;
mod sources;
mod utils;

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use log::info;

use crate::config::{AppConfig, FailurePolicy};
use crate::errors::PipelineError;
use crate::pipeline::{Collaborators, Pipeline};

/// Download lyrics, cover, audio and video for songs into `songs/{artist} - {title}`.
#[derive(Parser, Debug)]
#[command(name = "songbundle", version, about)]
struct Cli {
    /// Song identifiers in the song database
    #[arg(required_unless_present = "write_config")]
    ids: Vec<String>,

    /// Configuration file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory song bundles are written under
    #[arg(long, value_name = "DIR")]
    songs_dir: Option<PathBuf>,

    /// yt-dlp executable
    #[arg(long = "ytdlp", value_name = "PATH")]
    ytdlp_path: Option<String>,

    /// What to do with a song directory when its run fails: keep, mark or remove
    #[arg(long, value_name = "POLICY")]
    on_failure: Option<FailurePolicy>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,

    /// More log output (repeat for trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Warn;
        }
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.songs_dir {
            config.songs_dir = dir.clone();
        }
        if let Some(path) = &self.ytdlp_path {
            config.ytdlp_path = path.clone();
        }
        if let Some(policy) = self.on_failure {
            config.on_failure = policy;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over -v/-q
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    info!("Configuration loaded, songs go to {}", config.songs_dir.display());

    if cli.write_config {
        let path = config.save(cli.config.as_deref())?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let collaborators = Collaborators::from_config(&config)?;
    let pipeline = Pipeline::new(&config, collaborators);

    for id in &cli.ids {
        match pipeline.run(id).await {
            Ok(report) => {
                info!(
                    "{} - {} in {}: lyrics {}, cover {}, audio {}, video {} (from {})",
                    report.metadata.artist,
                    report.metadata.title,
                    report.target_dir.display(),
                    report.lyrics_path.display(),
                    report.cover_path.display(),
                    report.audio_path.display(),
                    report.video_path.display(),
                    report.link,
                );
            }
            Err(e) => {
                let context = failure_context(id, &e);
                return Err(e).context(context);
            }
        }
    }

    Ok(())
}

/// Top line of the error chain printed when a song fails; stage and cause follow it.
fn failure_context(id: &str, err: &PipelineError) -> String {
    format!("song {} was not downloaded ({:?} error)", id, err.kind())
}

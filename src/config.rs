use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::errors::{AppError, Result};

const ENV_PREFIX: &str = "SONGBUNDLE";

pub const DEFAULT_VIDEO_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/mp4";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub songs_dir: PathBuf,
    pub database_url: String,
    pub lyrics_path: String,
    pub cover_path: String,
    pub link_path: String,
    pub ytdlp_path: String,
    pub audio_format: String,
    pub video_format: String,
    pub proxy: Option<String>,
    pub connect_timeout_secs: u64,
    pub on_failure: FailurePolicy,
}

/// What happens to the song directory when a run fails after creating it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Keep,
    Mark,
    Remove,
}

impl std::str::FromStr for FailurePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "keep" => Ok(FailurePolicy::Keep),
            "mark" => Ok(FailurePolicy::Mark),
            "remove" => Ok(FailurePolicy::Remove),
            other => Err(AppError::InvalidInput(format!(
                "unknown failure policy '{}', expected keep, mark or remove",
                other
            ))),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            songs_dir: PathBuf::from("songs"),
            database_url: "http://127.0.0.1:3000".to_string(),
            lyrics_path: "/songs/{id}/txt".to_string(),
            cover_path: "/songs/{id}/cover/{cover}".to_string(),
            link_path: "/songs/{id}/youtube".to_string(),
            ytdlp_path: "yt-dlp".to_string(),
            audio_format: "mp3".to_string(),
            video_format: DEFAULT_VIDEO_FORMAT.to_string(),
            proxy: None,
            connect_timeout_secs: 15,
            on_failure: FailurePolicy::Keep,
        }
    }
}

impl AppConfig {
    /// Loads defaults, then the JSON file (if present), then `SONGBUNDLE_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::get_config_path()?,
        };
        log::debug!("Loading configuration from {:?}", config_path);

        let settings = config::Config::builder()
            .add_source(
                config::File::from(config_path)
                    .format(config::FileFormat::Json)
                    .required(false),
            )
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::get_config_path()?,
        };

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
                std::fs::create_dir_all(config_dir)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            AppError::Config(config::ConfigError::Message(
                "Could not find config directory".to_string(),
            ))
        })?;

        Ok(config_dir.join("songbundle").join("config.json"))
    }
}

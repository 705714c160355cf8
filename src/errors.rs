use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Error downloading {filename}: {message}")]
    Download { filename: String, message: String },

    #[error("Prompt error: {0}")]
    Prompt(String),
}

/// Coarse classification callers can branch on without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    ExternalCall,
    Filesystem,
    Config,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Metadata(_) | AppError::InvalidInput(_) => ErrorKind::Input,
            AppError::Http(_)
            | AppError::Source(_)
            | AppError::Download { .. }
            | AppError::Prompt(_) => ErrorKind::ExternalCall,
            AppError::Io(_) => ErrorKind::Filesystem,
            AppError::Config(_) | AppError::Json(_) | AppError::Url(_) => ErrorKind::Config,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Assembly,
    LinkResolution,
    MediaAcquisition,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Assembly => "bundle assembly",
            Stage::LinkResolution => "link resolution",
            Stage::MediaAcquisition => "media acquisition",
        };
        f.write_str(name)
    }
}

/// A failed pipeline run, tagged with the stage that produced it.
#[derive(Error, Debug)]
#[error("{stage} failed")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: AppError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: AppError) -> Self {
        Self { stage, source }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_error_names_the_file() {
        let err = AppError::Download {
            filename: "song.mp3".to_string(),
            message: "exit status 1".to_string(),
        };
        assert_eq!(err.to_string(), "Error downloading song.mp3: exit status 1");
        assert_eq!(err.kind(), ErrorKind::ExternalCall);
    }

    #[test]
    fn pipeline_error_reports_stage_and_kind() {
        let err = PipelineError::new(
            Stage::Assembly,
            AppError::Metadata("missing #TITLE".to_string()),
        );
        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(err.to_string(), "bundle assembly failed");
        let cause = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(cause.as_deref(), Some("Metadata error: missing #TITLE"));
    }
}

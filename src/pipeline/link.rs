use std::sync::Arc;

use crate::errors::{AppError, Result};
use crate::sources::{LinkLookup, LinkPrompt};

pub const MANUAL_LINK_LABEL: &str = "Enter youtube link manually: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution {
    Resolved(String),
    NeedsManualInput,
}

pub struct LinkResolver {
    lookup: Arc<dyn LinkLookup>,
}

impl LinkResolver {
    pub fn new(lookup: Arc<dyn LinkLookup>) -> Self {
        Self { lookup }
    }

    /// Asks the link source only; never prompts.
    pub async fn resolve_automatic(&self, song_id: &str) -> Result<LinkResolution> {
        match self.lookup.fetch_link(song_id).await? {
            Some(link) if !link.trim().is_empty() => {
                log::info!("[LINK] Youtube link found: {}", link);
                Ok(LinkResolution::Resolved(link))
            }
            _ => {
                log::warn!("[LINK] Youtube link not found for song {}", song_id);
                Ok(LinkResolution::NeedsManualInput)
            }
        }
    }

    /// Automatic lookup, falling back to a single `prompt` call.
    pub async fn resolve(&self, song_id: &str, prompt: &dyn LinkPrompt) -> Result<String> {
        match self.resolve_automatic(song_id).await? {
            LinkResolution::Resolved(link) => Ok(link),
            LinkResolution::NeedsManualInput => {
                let link = prompt.prompt(MANUAL_LINK_LABEL).await?;
                let link = link.trim();
                if link.is_empty() {
                    return Err(AppError::InvalidInput("no link was entered".to_string()));
                }
                log::info!("[LINK] Using manually entered link: {}", link);
                Ok(link.to_string())
            }
        }
    }
}

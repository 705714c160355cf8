use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, ClientBuilder, Proxy, StatusCode};
use tokio::io::AsyncWriteExt;
use url::Url;

use super::{CoverSource, LinkLookup, LyricsSource};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::utils::sanitize_filename;

/// HTTP client for the song database that serves lyrics, covers and links.
pub struct SongDatabase {
    client: Client,
    base_url: String,
    lyrics_path: String,
    cover_path: String,
    link_path: String,
}

impl SongDatabase {
    pub fn new(config: &AppConfig) -> Result<Self> {
        // No overall timeout: slow bodies are allowed to finish.
        let mut builder = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!("songbundle/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true);

        if let Some(proxy_url) = &config.proxy {
            log::info!("[HTTP] Using proxy: {}", proxy_url);
            builder = builder.proxy(Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.database_url.trim_end_matches('/').to_string(),
            lyrics_path: config.lyrics_path.clone(),
            cover_path: config.cover_path.clone(),
            link_path: config.link_path.clone(),
        })
    }

    fn endpoint(&self, template: &str, song_id: &str, cover_ref: &str) -> Result<Url> {
        let path = template
            .replace("{id}", &urlencoding::encode(song_id))
            .replace("{cover}", &urlencoding::encode(cover_ref));
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        log::debug!("[HTTP] GET {}", url);
        let response = self.client.get(url).send().await?;
        log::debug!("[HTTP] status {}", response.status());
        Ok(response)
    }
}

fn status_error(what: &str, song_id: &str, status: StatusCode) -> AppError {
    AppError::Source(format!("{} request for song {} returned {}", what, song_id, status))
}

#[async_trait]
impl LyricsSource for SongDatabase {
    async fn fetch_song_txt(&self, song_id: &str) -> Result<String> {
        let response = self.get(self.endpoint(&self.lyrics_path, song_id, "")?).await?;
        if !response.status().is_success() {
            return Err(status_error("lyrics", song_id, response.status()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl CoverSource for SongDatabase {
    async fn download_cover(&self, song_id: &str, dir: &Path, cover_ref: &str) -> Result<PathBuf> {
        let response = self.get(self.endpoint(&self.cover_path, song_id, cover_ref)?).await?;
        if !response.status().is_success() {
            return Err(status_error("cover", song_id, response.status()));
        }

        let target = dir.join(sanitize_filename(cover_ref));
        let mut file = tokio::fs::File::create(&target).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            written += chunk.len() as u64;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        log::debug!("[HTTP] wrote {} bytes to {:?}", written, target);
        Ok(target)
    }
}

#[async_trait]
impl LinkLookup for SongDatabase {
    async fn fetch_link(&self, song_id: &str) -> Result<Option<String>> {
        let response = self.get(self.endpoint(&self.link_path, song_id, "")?).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.text().await?;
                let link = body.trim();
                Ok(if link.is_empty() { None } else { Some(link.to_string()) })
            }
            status => Err(status_error("link", song_id, status)),
        }
    }
}

//! In-process stand-ins for the song database and the operator.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{AppError, Result};
use crate::sources::{CoverSource, LinkLookup, LinkPrompt, LyricsSource};

pub const SONG_TXT: &str = concat!(
    "#TITLE:Foo\n#ARTIST:Bar\n#MP3:song.mp3\n#COVER:cover.jpg\n#VIDEO:song.mp4\n",
    ": 0 4 5 Hel\nE\n",
);

pub struct FakeDatabase {
    song_txt: String,
    link: Option<String>,
    cover_fails: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeDatabase {
    pub fn new(song_txt: &str, link: Option<&str>) -> Self {
        Self {
            song_txt: song_txt.to_string(),
            link: link.map(str::to_string),
            cover_fails: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_cover_failure(mut self) -> Self {
        self.cover_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl LyricsSource for FakeDatabase {
    async fn fetch_song_txt(&self, song_id: &str) -> Result<String> {
        self.record(format!("txt:{}", song_id));
        Ok(self.song_txt.clone())
    }
}

#[async_trait]
impl CoverSource for FakeDatabase {
    async fn download_cover(&self, song_id: &str, dir: &Path, cover_ref: &str) -> Result<PathBuf> {
        self.record(format!("cover:{}:{}", song_id, cover_ref));
        if self.cover_fails {
            return Err(AppError::Source("cover request returned 404 Not Found".to_string()));
        }
        let path = dir.join(cover_ref);
        std::fs::write(&path, b"jpeg")?;
        Ok(path)
    }
}

#[async_trait]
impl LinkLookup for FakeDatabase {
    async fn fetch_link(&self, song_id: &str) -> Result<Option<String>> {
        self.record(format!("link:{}", song_id));
        Ok(self.link.clone())
    }
}

pub struct CountingPrompt {
    answer: String,
    labels: Mutex<Vec<String>>,
    count: AtomicUsize,
}

impl CountingPrompt {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            labels: Mutex::new(Vec::new()),
            count: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkPrompt for CountingPrompt {
    async fn prompt(&self, label: &str) -> Result<String> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.labels.lock().unwrap().push(label.to_string());
        Ok(self.answer.clone())
    }
}

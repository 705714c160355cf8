use std::path::{Path, PathBuf};
use crate::errors::Result;
use log::info;

/// Sanitizes a filename by removing invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Directory name for a song in "Artist - Title" format
pub fn song_dir_name(artist: &str, title: &str) -> String {
    format!("{} - {}", sanitize_filename(artist), sanitize_filename(title))
}

pub fn song_dir(songs_dir: &Path, artist: &str, title: &str) -> PathBuf {
    songs_dir.join(song_dir_name(artist, title))
}

/// Creates a directory (and parents); succeeds if it already exists.
/// Returns whether this call created it.
pub async fn ensure_dir_exists(path: &Path) -> Result<bool> {
    if !path.exists() {
        tokio::fs::create_dir_all(path).await?;
        info!("Created directory {:?}", path);
        Ok(true)
    } else {
        info!("Using existing directory {:?}", path);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_never_nest_directories() {
        assert_eq!(song_dir_name("AC/DC", "T.N.T."), "AC_DC - T.N.T.");
        assert_eq!(sanitize_filename("what?*.jpg"), "what__.jpg");
    }

    #[test]
    fn plain_names_are_untouched() {
        let dir = song_dir(Path::new("songs"), "Bar", "Foo");
        assert_eq!(dir, PathBuf::from("songs/Bar - Foo"));
    }

    #[tokio::test]
    async fn ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("songs").join("Bar - Foo");
        assert!(ensure_dir_exists(&target).await.unwrap());
        assert!(!ensure_dir_exists(&target).await.unwrap());
        assert!(target.is_dir());
    }
}

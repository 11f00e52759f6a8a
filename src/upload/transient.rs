//! Transient upload storage
//!
//! An upload lives on disk only while its request is being handled. The
//! file is owned by [`TransientUpload`] and deleted when that value is
//! dropped, so every exit path of the handler releases it.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempPath};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::logger;

const FILE_PREFIX: &str = "upload-";

pub struct TransientUpload {
    location: PathBuf,
    writer: Option<fs::File>,
    path: Option<TempPath>,
}

impl TransientUpload {
    /// Create an empty file with a server-assigned name inside `dir`.
    ///
    /// The exclusive create runs on the blocking pool.
    pub async fn create_in(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir).await?;
        let dir = dir.to_path_buf();
        let (file, path) = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(FILE_PREFIX)
                .tempfile_in(&dir)
                .map(NamedTempFile::into_parts)
        })
        .await
        .map_err(io::Error::other)??;
        Ok(Self {
            location: path.to_path_buf(),
            writer: Some(fs::File::from_std(file)),
            path: Some(path),
        })
    }

    pub fn path(&self) -> &Path {
        &self.location
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.write_all(chunk).await,
            None => Err(io::Error::other("upload already finished")),
        }
    }

    /// Flush and close the write handle; no more chunks are accepted
    pub async fn finish(&mut self) -> io::Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await?;
            writer.sync_all().await?;
        }
        Ok(())
    }

    pub async fn read_all(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.location).await
    }
}

impl Drop for TransientUpload {
    fn drop(&mut self) {
        drop(self.writer.take());
        if let Some(path) = self.path.take() {
            if let Err(e) = path.close() {
                logger::log_cleanup_failed(&self.location, &e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_and_delete_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let mut upload = TransientUpload::create_in(dir.path()).await.unwrap();
        let path = upload.path().to_path_buf();
        assert!(path.starts_with(dir.path()));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with(FILE_PREFIX));

        upload.write_chunk(b"hello ").await.unwrap();
        upload.write_chunk(b"world").await.unwrap();
        upload.finish().await.unwrap();
        assert_eq!(upload.read_all().await.unwrap(), b"hello world");
        assert!(upload.write_chunk(b"late").await.is_err());

        drop(upload);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let first = TransientUpload::create_in(dir.path()).await.unwrap();
        let second = TransientUpload::create_in(dir.path()).await.unwrap();
        assert_ne!(first.path(), second.path());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let upload = TransientUpload::create_in(&nested).await.unwrap();
        assert!(upload.path().starts_with(&nested));
    }

    #[tokio::test]
    async fn test_file_already_removed_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let upload = TransientUpload::create_in(dir.path()).await.unwrap();
        std::fs::remove_file(upload.path()).unwrap();
        drop(upload);
    }
}

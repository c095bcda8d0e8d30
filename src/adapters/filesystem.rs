use crate::domain::ports::FileSystem;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }

    async fn read_dir(&self, dir: &Path, include_dirs: bool) -> Result<Vec<PathBuf>> {
        let mut reader = match tokio::fs::read_dir(dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            if !include_dirs && entry.file_type().await?.is_dir() {
                continue;
            }
            entries.push(entry.path());
        }
        entries.sort();
        Ok(entries)
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn list_entries(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir(dir, true).await
    }

    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir(dir, false).await
    }

    async fn remove_entry(&self, path: &Path) -> Result<()> {
        // 不跟隨符號連結，連結本身當成檔案刪除
        let metadata = tokio::fs::symlink_metadata(path).await?;
        if metadata.is_dir() {
            tokio::fs::remove_dir_all(path).await?;
        } else {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }
}

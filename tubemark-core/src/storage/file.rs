use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::{StorageArea, StorageError};

type Document = Map<String, Value>;

/// Every key lives in one JSON object on disk.
///
/// Writes land in a temp file beside the target and are renamed over it,
/// so a crash mid-write leaves the previous document intact.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_document(path: &Path) -> Result<Document, StorageError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Ok(Document::new());
        }
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if contents.trim().is_empty() {
        return Ok(Document::new());
    }

    serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn write_document(path: &Path, document: &Document) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;

    let temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.flush().map_err(io_err)?;
    }
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}

#[async_trait]
impl StorageArea for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path.clone();
        let document =
            tokio::task::spawn_blocking(move || read_document(&path)).await??;
        trace!(key, found = document.contains_key(key), "storage read");
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        // Other keys in the document must survive, so the read and the
        // rename happen under one lock.
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || {
            let mut document = read_document(&path)?;
            document.insert(key, value);
            write_document(&path, &document)
        })
        .await??;
        debug!(path = %self.path.display(), "storage document written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.get("videos").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/storage.json");
        let storage = JsonFileStorage::new(&path);

        storage.set("settings", json!({"theme": "dark"})).await.unwrap();
        storage.set("videos", json!({})).await.unwrap();

        let on_disk: Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            on_disk,
            json!({"settings": {"theme": "dark"}, "videos": {}})
        );
    }

    #[tokio::test]
    async fn non_object_document_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let storage = JsonFileStorage::new(&path);
        let err = storage.get("videos").await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}

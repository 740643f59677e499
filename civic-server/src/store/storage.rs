//! Key-value blob storage
//!
//! Each key maps to one JSON document. [`FileStorage`] keeps `<key>.json`
//! files under a data directory, [`MemoryStorage`] is used by tests.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::utils::{AppError, AppResult};

/// Durable string blobs addressed by key
pub trait Storage: Send + Sync + Debug {
    /// Read the blob, `None` when the key was never written
    fn read(&self, key: &str) -> AppResult<Option<String>>;
    /// Replace the blob
    fn write(&self, key: &str, value: &str) -> AppResult<()>;
    /// Delete the blob (no-op when absent)
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// 文件存储: {data_dir}/{key}.json
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// 打开数据目录 (不存在时创建)
    pub fn open(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| AppError::storage(format!("Failed to create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key);
        // 先写临时文件再 rename，避免半写文件
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value)
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|e| AppError::storage(format!("Failed to write {}: {e}", path.display())))
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!(
                "Failed to remove {}: {e}",
                path.display()
            ))),
        }
    }
}

/// 内存存储 (测试用)
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.blobs.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        self.blobs.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.blobs.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("data")).unwrap();

        assert_eq!(storage.read("cp_issues").unwrap(), None);
        storage.write("cp_issues", "[]").unwrap();
        assert_eq!(storage.read("cp_issues").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data/cp_issues.json").exists());

        storage.remove("cp_issues").unwrap();
        assert_eq!(storage.read("cp_issues").unwrap(), None);
        // 再次删除不报错
        storage.remove("cp_issues").unwrap();
    }

    #[test]
    fn memory_storage_keys_are_independent() {
        let storage = MemoryStorage::new();
        storage.write("cp_user", "{}").unwrap();
        storage.write("cp_issues", "[]").unwrap();
        storage.remove("cp_user").unwrap();
        assert_eq!(storage.read("cp_user").unwrap(), None);
        assert_eq!(storage.read("cp_issues").unwrap().as_deref(), Some("[]"));
    }
}

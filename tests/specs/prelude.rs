//! Shared helpers for specs

pub use persisted_storage::{
    JsonCodec, LogConfig, LogError, Operation, PersistedList, APPEND_KEY,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory holding one (initially empty) log file
pub struct Store {
    _dir: TempDir,
    path: PathBuf,
}

impl Store {
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.jsonl");
        File::create(&path).unwrap();
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the list with fsync disabled and the given threshold
    pub fn open_with_threshold(&self, threshold: u64) -> Result<PersistedList<i64>, LogError> {
        let config = LogConfig::default()
            .with_compaction_threshold(threshold)
            .with_sync_writes(false);
        PersistedList::open_with_config(&self.path, config, JsonCodec::new())
    }

    pub fn open(&self) -> PersistedList<i64> {
        self.open_with_threshold(LogConfig::default().compaction_threshold)
            .unwrap()
    }

    pub fn size(&self) -> u64 {
        std::fs::metadata(&self.path).unwrap().len()
    }

    pub fn contents(&self) -> String {
        std::fs::read_to_string(&self.path).unwrap()
    }

    pub fn write(&self, contents: impl AsRef<[u8]>) {
        std::fs::write(&self.path, contents).unwrap();
    }

    /// One encoded append record, newline-terminated
    pub fn append_record(value: i64) -> String {
        let mut line = Operation::new(APPEND_KEY, vec![value])
            .encode(&JsonCodec::new())
            .unwrap()
            .to_line()
            .unwrap();
        line.push('\n');
        line
    }
}

pub fn values(list: &PersistedList<i64>) -> Vec<i64> {
    list.iter().copied().collect()
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only operation log with compaction
//!
//! ## Format
//!
//! One [`EncodedOperation`] per line, serialized as JSON (JSONL). Records are
//! self-delimiting, so replay is a single forward pass. An empty file is an
//! empty log.
//!
//! ## Durability Guarantees
//!
//! - Every appended record is fsync'd before `add` returns (unless disabled
//!   via [`LogConfig::sync_writes`])
//! - Compaction writes a sibling temp file and renames it over the log, so a
//!   crash leaves either the old or the new file intact, never a mix
//! - An append that fails partway is cut back off the file, so the file only
//!   ever holds complete records
//! - A truncated or corrupted record fails replay outright; a damaged log is
//!   never partially trusted
//! - If the log file cannot be reopened after a compaction, the log closes
//!   and every later call fails with [`LogError::Io`]
//!
//! The log does not decide whether its file should be created. Callers create
//! the file (and its parent directory) before calling [`OperationLog::open`].

use crate::config::LogConfig;
use persisted_core::{ApplyError, Codec, CodecError, EncodedOperation, Operation};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in operation log calls
#[derive(Debug, Error)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode {key} operation: {source}")]
    Encode { key: String, source: CodecError },
    #[error("corrupted record at line {line}: {source}")]
    Decode { line: u64, source: CodecError },
    #[error("unknown operation key {key:?} at line {line}")]
    UnknownKey { line: u64, key: String },
    #[error("failed to apply {key} at line {line}: {source}")]
    Apply {
        line: u64,
        key: String,
        source: ApplyError,
    },
}

/// Produces the shortest operation sequence that rebuilds the current state
///
/// Order matters: replaying the returned operations into an empty structure
/// must reproduce the structure exactly.
pub trait CompactionSource<P> {
    fn compacted_operations(&self) -> Vec<Operation<P>>;
}

/// Applies replayed operations to the structure that owns a log
///
/// Return [`ApplyError::UnknownKey`] for keys the structure does not know.
pub trait ApplyTable<P> {
    fn apply(&mut self, operation: Operation<P>) -> Result<(), ApplyError>;
}

/// Append-only log of operations on a single structure
pub struct OperationLog<P, C> {
    path: PathBuf,
    /// `None` once the handle has been lost; the log is then closed
    file: Option<File>,
    config: LogConfig,
    codec: C,
    _marker: PhantomData<fn(P) -> P>,
}

impl<P, C: Codec<P>> OperationLog<P, C> {
    /// Open the log backed by an existing file
    ///
    /// Fails with [`LogError::Io`] if the file does not exist.
    pub fn open(path: impl AsRef<Path>, config: LogConfig, codec: C) -> Result<Self, LogError> {
        let path = path.as_ref().to_path_buf();
        let file = open_existing(&path)?;

        Ok(Self {
            path,
            file: Some(file),
            config,
            codec,
            _marker: PhantomData,
        })
    }

    /// Append an operation, then compact if the log has grown past the threshold
    pub fn add<S>(&mut self, operation: &Operation<P>, source: &S) -> Result<(), LogError>
    where
        S: CompactionSource<P> + ?Sized,
    {
        let line = self.encode_line(operation)?;
        self.append_line_with(line.as_bytes(), |file, bytes| file.write_all(bytes))?;

        self.compact_if_necessary(source)?;
        Ok(())
    }

    /// Re-apply every recorded operation to `state`, in file order
    ///
    /// Stops at the first record that fails to decode or apply. On success the
    /// log is compacted from the rebuilt state and the number of applied
    /// records is returned.
    pub fn replay<S>(&mut self, state: &mut S) -> Result<u64, LogError>
    where
        S: ApplyTable<P> + CompactionSource<P> + ?Sized,
    {
        let mut handle = self.handle()?;
        handle.seek(SeekFrom::Start(0))?;
        let mut reader = BufReader::new(handle);
        let mut record = Vec::new();
        let mut line = 0u64;
        let mut applied = 0u64;

        loop {
            record.clear();
            if reader.read_until(b'\n', &mut record)? == 0 {
                break;
            }
            line += 1;

            if record.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let operation = EncodedOperation::from_line(&record)
                .and_then(|encoded| encoded.decode(&self.codec))
                .map_err(|source| LogError::Decode { line, source })?;
            let key = operation.key().to_string();

            state.apply(operation).map_err(|e| match e {
                ApplyError::UnknownKey(key) => LogError::UnknownKey { line, key },
                source => LogError::Apply { line, key, source },
            })?;
            applied += 1;
        }
        drop(reader);

        tracing::debug!(path = %self.path.display(), applied, "replayed operation log");

        self.compact(&*state)?;
        Ok(applied)
    }

    /// Rewrite the log as the source's compacted operation sequence
    ///
    /// The old file stays in place until the rename; on any failure the temp
    /// file is removed and the log is left as it was.
    pub fn compact<S>(&mut self, source: &S) -> Result<(), LogError>
    where
        S: CompactionSource<P> + ?Sized,
    {
        let operations = source.compacted_operations();
        let mut contents = String::new();
        for operation in &operations {
            contents.push_str(&self.encode_line(operation)?);
        }

        let bytes_before = self.file_size()?;
        let temp_path = self.compaction_path();
        if let Err(e) = self.replace_with(&temp_path, contents.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        let reopened = open_existing(&self.path);
        self.install_reopened(reopened)?;
        if self.config.sync_writes {
            sync_parent_dir(&self.path)?;
        }

        tracing::info!(
            path = %self.path.display(),
            operations = operations.len(),
            bytes_before,
            bytes_after = contents.len(),
            "compacted operation log"
        );

        Ok(())
    }

    /// Compact only if the file is larger than the compaction threshold
    ///
    /// If the compacted file is still over the threshold, the threshold is
    /// doubled instead of compacting again on the next call. Returns whether
    /// compaction ran.
    pub fn compact_if_necessary<S>(&mut self, source: &S) -> Result<bool, LogError>
    where
        S: CompactionSource<P> + ?Sized,
    {
        let threshold = self.config.compaction_threshold;
        if self.file_size()? <= threshold {
            return Ok(false);
        }

        self.compact(source)?;

        let size = self.file_size()?;
        if size > threshold {
            let doubled = threshold.saturating_mul(2).max(1);
            self.config.compaction_threshold = doubled;
            tracing::warn!(
                size,
                threshold,
                doubled,
                "compacted log still over threshold, raising threshold"
            );
        }

        Ok(true)
    }

    /// Current size of the log file in bytes
    pub fn file_size(&self) -> Result<u64, LogError> {
        Ok(self.handle()?.metadata()?.len())
    }

    /// Whether the log still holds a usable file handle
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn compaction_threshold(&self) -> u64 {
        self.config.compaction_threshold
    }

    pub fn set_compaction_threshold(&mut self, bytes: u64) {
        self.config.compaction_threshold = bytes;
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn handle(&self) -> Result<&File, LogError> {
        self.file.as_ref().ok_or_else(|| LogError::Io(closed_log()))
    }

    fn handle_mut(&mut self) -> Result<&mut File, LogError> {
        self.file.as_mut().ok_or_else(|| LogError::Io(closed_log()))
    }

    /// Append one encoded record at end of file using `write`
    ///
    /// If the write or the sync fails, the file is truncated back to its prior
    /// length so the next record starts on a fresh line. If even that fails,
    /// the log closes.
    fn append_line_with<W>(&mut self, line: &[u8], write: W) -> Result<(), LogError>
    where
        W: FnOnce(&mut File, &[u8]) -> io::Result<()>,
    {
        let sync = self.config.sync_writes;
        let file = self.handle_mut()?;
        let before = file.seek(SeekFrom::End(0))?;

        let written = write(&mut *file, line).and_then(|()| {
            if sync {
                file.sync_all()
            } else {
                Ok(())
            }
        });
        let Err(e) = written else {
            return Ok(());
        };

        if let Err(truncate) = file.set_len(before) {
            tracing::error!(
                path = %self.path.display(),
                error = %truncate,
                "could not remove partial record, closing log"
            );
            self.file = None;
        }
        Err(e.into())
    }

    /// Swap in the handle opened after a compaction rename
    ///
    /// The old handle points at the unlinked pre-compaction file, so it is
    /// dropped either way; without a new one the log closes.
    fn install_reopened(&mut self, reopened: io::Result<File>) -> Result<(), LogError> {
        match reopened {
            Ok(file) => {
                self.file = Some(file);
                Ok(())
            }
            Err(e) => {
                self.file = None;
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "could not reopen log after compaction, closing log"
                );
                Err(e.into())
            }
        }
    }

    fn encode_line(&self, operation: &Operation<P>) -> Result<String, LogError> {
        let mut line = operation
            .encode(&self.codec)
            .and_then(|encoded| encoded.to_line())
            .map_err(|source| LogError::Encode {
                key: operation.key().to_string(),
                source,
            })?;
        line.push('\n');
        Ok(line)
    }

    fn compaction_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("log"));
        name.push(".compact.tmp");
        self.path.with_file_name(name)
    }

    fn replace_with(&self, temp_path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = File::create(temp_path)?;
        file.write_all(contents)?;
        if self.config.sync_writes {
            file.sync_all()?;
        }
        drop(file);

        // Atomic replace (rename is atomic on POSIX)
        fs::rename(temp_path, &self.path)
    }
}

fn open_existing(path: &Path) -> io::Result<File> {
    OpenOptions::new().read(true).write(true).open(path)
}

fn closed_log() -> io::Error {
    io::Error::new(
        io::ErrorKind::NotConnected,
        "operation log is closed after a lost file handle",
    )
}

/// Make a rename in `path`'s directory durable
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Doubly linked list persisted through an operation log
//!
//! Every mutation updates the in-memory list first, then records the matching
//! [`ListOp`] in the log. Opening a list replays the log into a fresh
//! in-memory list and compacts it down to one `append` per element.

use crate::config::LogConfig;
use crate::log::{ApplyTable, CompactionSource, LogError, OperationLog};
use persisted_core::{ApplyError, Codec, InMemoryList, Iter, JsonCodec, Operation};
use std::path::Path;

/// Key recorded for [`ListOp::Append`]
pub const APPEND_KEY: &str = "append";
/// Key recorded for [`ListOp::Push`]
pub const PUSH_KEY: &str = "push";
/// Key recorded for [`ListOp::Pop`]
pub const POP_KEY: &str = "pop";

/// Mutations a persisted list records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOp<T> {
    /// Insert at the tail
    Append(T),
    /// Insert at the head
    Push(T),
    /// Remove the tail
    Pop,
}

impl<T> ListOp<T> {
    pub fn key(&self) -> &'static str {
        match self {
            ListOp::Append(_) => APPEND_KEY,
            ListOp::Push(_) => PUSH_KEY,
            ListOp::Pop => POP_KEY,
        }
    }

    pub fn into_operation(self) -> Operation<T> {
        let key = self.key();
        match self {
            ListOp::Append(value) | ListOp::Push(value) => Operation::new(key, vec![value]),
            ListOp::Pop => Operation::bare(key),
        }
    }

    /// Apply this mutation to an in-memory list
    pub fn apply_to(self, list: &mut InMemoryList<T>) {
        match self {
            ListOp::Append(value) => list.append(value),
            ListOp::Push(value) => list.push(value),
            ListOp::Pop => {
                list.pop();
            }
        }
    }
}

impl<T> TryFrom<Operation<T>> for ListOp<T> {
    type Error = ApplyError;

    fn try_from(operation: Operation<T>) -> Result<Self, Self::Error> {
        let arity = match operation.key() {
            APPEND_KEY | PUSH_KEY => 1,
            POP_KEY => 0,
            other => return Err(ApplyError::UnknownKey(other.to_string())),
        };
        operation.expect_arity(arity)?;

        let (key, mut parameters) = operation.into_parts();
        match (key.as_str(), parameters.pop()) {
            (APPEND_KEY, Some(value)) => Ok(ListOp::Append(value)),
            (PUSH_KEY, Some(value)) => Ok(ListOp::Push(value)),
            (POP_KEY, None) => Ok(ListOp::Pop),
            _ => Err(ApplyError::UnknownKey(key)),
        }
    }
}

impl<T> ApplyTable<T> for InMemoryList<T> {
    fn apply(&mut self, operation: Operation<T>) -> Result<(), ApplyError> {
        ListOp::try_from(operation)?.apply_to(self);
        Ok(())
    }
}

impl<T: Clone> CompactionSource<T> for InMemoryList<T> {
    fn compacted_operations(&self) -> Vec<Operation<T>> {
        self.iter()
            .map(|value| ListOp::Append(value.clone()).into_operation())
            .collect()
    }
}

/// Doubly linked list whose mutations survive restarts
///
/// If recording a mutation fails, the in-memory list keeps the change while
/// the file does not; the error is returned and the caller should treat the
/// on-disk state as authoritative (reopen) rather than keep going.
pub struct PersistedList<T, C = JsonCodec<T>> {
    list: InMemoryList<T>,
    log: OperationLog<T, C>,
}

impl<T: Clone, C: Codec<T>> PersistedList<T, C> {
    /// Open the list stored in an existing file, using the default config
    pub fn open(path: impl AsRef<Path>, codec: C) -> Result<Self, LogError> {
        Self::open_with_config(path, LogConfig::default(), codec)
    }

    /// Open the list stored in an existing file
    ///
    /// An empty file yields an empty list. Any malformed record fails the
    /// whole call; no partially rebuilt list is returned.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: LogConfig,
        codec: C,
    ) -> Result<Self, LogError> {
        let mut log = OperationLog::open(path, config, codec)?;
        let mut list = InMemoryList::new();
        let applied = log.replay(&mut list)?;

        tracing::debug!(
            path = %log.path().display(),
            applied,
            len = list.len(),
            "opened persisted list"
        );

        Ok(Self { list, log })
    }

    /// Insert a value at the tail
    pub fn append(&mut self, value: T) -> Result<(), LogError> {
        self.record(ListOp::Append(value))
    }

    /// Insert a value at the head
    pub fn push(&mut self, value: T) -> Result<(), LogError> {
        self.record(ListOp::Push(value))
    }

    /// Remove and return the tail value
    ///
    /// Popping an empty list returns `Ok(None)` and writes nothing.
    pub fn pop(&mut self) -> Result<Option<T>, LogError> {
        let Some(value) = self.list.pop() else {
            return Ok(None);
        };
        self.log
            .add(&ListOp::<T>::Pop.into_operation(), &self.list)?;
        Ok(Some(value))
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.list.get(index)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Iterate values from head to tail
    pub fn iter(&self) -> Iter<'_, T> {
        self.list.iter()
    }

    /// Rewrite the backing file as one append per element
    pub fn compact(&mut self) -> Result<(), LogError> {
        self.log.compact(&self.list)
    }

    pub fn set_compaction_threshold(&mut self, bytes: u64) {
        self.log.set_compaction_threshold(bytes);
    }

    pub fn log(&self) -> &OperationLog<T, C> {
        &self.log
    }

    fn record(&mut self, op: ListOp<T>) -> Result<(), LogError> {
        let operation = op.clone().into_operation();
        op.apply_to(&mut self.list);
        self.log.add(&operation, &self.list)
    }
}

impl<'a, T, C> IntoIterator for &'a PersistedList<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! persisted-storage: operation-log persistence for in-memory structures
//!
//! ## Architecture
//!
//! ```text
//! PersistedList::append → InMemoryList (memory) → OperationLog::add → disk (JSONL)
//!                                                        ↓ over threshold
//!                                              compact → temp file → rename
//!
//! PersistedList::open → OperationLog::replay → InMemoryList → compact
//! ```

pub mod config;
pub mod list;
pub mod log;

pub use config::{LogConfig, DEFAULT_COMPACTION_THRESHOLD};
pub use list::{ListOp, PersistedList, APPEND_KEY, POP_KEY, PUSH_KEY};
pub use log::{ApplyTable, CompactionSource, LogError, OperationLog};
pub use persisted_core::{
    ApplyError, Codec, CodecError, FnCodec, InMemoryList, Iter, JsonCodec, Operation,
};

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation log configuration

use serde::{Deserialize, Serialize};

/// Compaction threshold used when none is configured (10 KiB)
pub const DEFAULT_COMPACTION_THRESHOLD: u64 = 10 * 1024;

/// Configuration for an [`OperationLog`](crate::OperationLog)
///
/// Can be embedded in a larger TOML file; missing keys take their defaults.
///
/// ```toml
/// compaction_threshold = 65536
/// sync_writes = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// File size in bytes above which `add` compacts the log
    pub compaction_threshold: u64,
    /// fsync after every appended record and before every compaction rename
    pub sync_writes: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            compaction_threshold: DEFAULT_COMPACTION_THRESHOLD,
            sync_writes: true,
        }
    }
}

impl LogConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn with_compaction_threshold(mut self, bytes: u64) -> Self {
        self.compaction_threshold = bytes;
        self
    }

    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

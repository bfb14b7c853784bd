// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation envelope
//!
//! An [`Operation`] is one state mutation: a key naming the kind of change and
//! an ordered list of parameters. On disk it becomes an [`EncodedOperation`],
//! where every parameter has been encoded on its own by the structure's codec
//! and a CRC32 covers the key and parameter bytes.

use crate::codec::{Codec, CodecError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error applying a replayed operation to a structure
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("unknown operation key: {0}")]
    UnknownKey(String),
    #[error("operation {key} expects {expected} parameter(s), found {found}")]
    Arity {
        key: String,
        expected: usize,
        found: usize,
    },
    #[error("operation {key} rejected: {reason}")]
    Rejected { key: String, reason: String },
}

/// A state mutation recorded in an operation log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation<P> {
    key: String,
    parameters: Vec<P>,
}

impl<P> Operation<P> {
    pub fn new(key: impl Into<String>, parameters: Vec<P>) -> Self {
        Self {
            key: key.into(),
            parameters,
        }
    }

    /// Create an operation that carries no parameters
    pub fn bare(key: impl Into<String>) -> Self {
        Self::new(key, Vec::new())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parameters(&self) -> &[P] {
        &self.parameters
    }

    pub fn into_parts(self) -> (String, Vec<P>) {
        (self.key, self.parameters)
    }

    /// Fail with [`ApplyError::Arity`] unless exactly `expected` parameters are present
    pub fn expect_arity(&self, expected: usize) -> Result<(), ApplyError> {
        if self.parameters.len() == expected {
            Ok(())
        } else {
            Err(ApplyError::Arity {
                key: self.key.clone(),
                expected,
                found: self.parameters.len(),
            })
        }
    }

    /// Encode every parameter independently with `codec`
    pub fn encode<C: Codec<P>>(&self, codec: &C) -> Result<EncodedOperation, CodecError> {
        let parameters = self
            .parameters
            .iter()
            .map(|p| codec.encode(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EncodedOperation::new(self.key.clone(), parameters))
    }
}

/// Marshalled form of an operation, one per log record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedOperation {
    pub key: String,
    pub parameters: Vec<Vec<u8>>,
    /// CRC32 of the key and parameter bytes
    pub checksum: u32,
}

impl EncodedOperation {
    /// Create an envelope with a computed checksum
    pub fn new(key: String, parameters: Vec<Vec<u8>>) -> Self {
        let checksum = Self::calculate_checksum(&key, &parameters);
        Self {
            key,
            parameters,
            checksum,
        }
    }

    fn calculate_checksum(key: &str, parameters: &[Vec<u8>]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(key.as_bytes());
        for parameter in parameters {
            // Length prefix keeps ["ab", "c"] and ["a", "bc"] distinct
            hasher.update(&(parameter.len() as u64).to_le_bytes());
            hasher.update(parameter);
        }
        hasher.finalize()
    }

    /// Verify the checksum matches the contents
    pub fn verify(&self) -> bool {
        self.check_checksum().is_ok()
    }

    fn check_checksum(&self) -> Result<(), CodecError> {
        let found = Self::calculate_checksum(&self.key, &self.parameters);
        if found != self.checksum {
            return Err(CodecError::ChecksumMismatch {
                expected: self.checksum,
                found,
            });
        }
        Ok(())
    }

    /// Decode the parameters back into an [`Operation`]
    ///
    /// The checksum is verified first.
    pub fn decode<P, C: Codec<P>>(self, codec: &C) -> Result<Operation<P>, CodecError> {
        self.check_checksum()?;

        let parameters = self
            .parameters
            .iter()
            .map(|bytes| codec.decode(bytes))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Operation::new(self.key, parameters))
    }

    /// Serialize to a single line of JSON (no trailing newline)
    pub fn to_line(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse one record from a line of JSON
    pub fn from_line(line: &[u8]) -> Result<Self, CodecError> {
        Ok(serde_json::from_slice(line)?)
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;

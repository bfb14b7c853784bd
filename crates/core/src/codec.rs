// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parameter codecs
//!
//! A codec turns one operation parameter into bytes and back. The log never
//! looks inside those bytes; the only requirement is that
//! `decode(encode(x))` is observably equal to `x` for every value ever logged.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// Errors produced while encoding or decoding a parameter
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("checksum mismatch: expected {expected:#010x}, found {found:#010x}")]
    ChecksumMismatch { expected: u32, found: u32 },
    #[error("invalid encoding: {0}")]
    Invalid(String),
}

/// Encode/decode capability for values of type `T`
pub trait Codec<T> {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// Codec for any serde type, using JSON as the byte encoding
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonCodec")
    }
}

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec<T> {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Codec built from a caller-supplied encode/decode function pair
///
/// ```
/// use persisted_core::{Codec, CodecError, FnCodec};
///
/// let codec = FnCodec::new(
///     |v: &u32| -> Result<Vec<u8>, CodecError> { Ok(v.to_string().into_bytes()) },
///     |b: &[u8]| {
///         std::str::from_utf8(b)
///             .ok()
///             .and_then(|s| s.parse().ok())
///             .ok_or_else(|| CodecError::Invalid("not a u32".to_string()))
///     },
/// );
/// let bytes = codec.encode(&42).unwrap();
/// assert_eq!(codec.decode(&bytes).unwrap(), 42);
/// ```
#[derive(Clone)]
pub struct FnCodec<E, D> {
    encode: E,
    decode: D,
}

impl<E, D> FnCodec<E, D> {
    pub fn new(encode: E, decode: D) -> Self {
        Self { encode, decode }
    }
}

impl<E, D> fmt::Debug for FnCodec<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnCodec")
    }
}

impl<T, E, D> Codec<T> for FnCodec<E, D>
where
    E: Fn(&T) -> Result<Vec<u8>, CodecError>,
    D: Fn(&[u8]) -> Result<T, CodecError>,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        (self.encode)(value)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        (self.decode)(bytes)
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;

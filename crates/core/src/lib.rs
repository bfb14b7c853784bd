// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! persisted-core: building blocks for log-persisted data structures
//!
//! This crate provides:
//! - The operation envelope recorded in an operation log
//! - Parameter codecs (JSON or caller-supplied function pairs)
//! - A pure in-memory doubly linked list
//!
//! Nothing here touches the filesystem; see `persisted-storage`.

pub mod codec;
pub mod list;
pub mod operation;

pub use codec::{Codec, CodecError, FnCodec, JsonCodec};
pub use list::{InMemoryList, Iter};
pub use operation::{ApplyError, EncodedOperation, Operation};

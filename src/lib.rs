// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An incremental SHAKE digest engine.
//!
//! Ordinary hash functions must reprocess an entire message to reflect a
//! single changed byte. This crate splits a message into fixed-size blocks,
//! hashes each block independently with SHAKE128/SHAKE256, and combines the
//! per-block digests into a running aggregate with a cheap, invertible
//! group operation. Inserting, deleting, or updating a block costs only
//! that block's own hash plus one combine, not a full rehash.
//!
//! Two addressing modes are supported, selected by [`Mode`]:
//!
//! * [`Mode::AppendOnly`]: feed in an ordered byte stream with
//!   [`IshakeEngine::append`]; blocks are carved out and indexed
//!   automatically.
//! * [`Mode::Full`]: blocks are addressed by a caller-assigned
//!   `(nonce, neighbor)` header and can be [`IshakeEngine::insert`]ed,
//!   [`IshakeEngine::delete`]d, or [`IshakeEngine::update`]d in any order.
//!
//! Hashing can be spread across a pool of worker threads by passing a
//! nonzero `thread_count` to [`IshakeEngine::new`]; `0` runs every block
//! inline on the calling thread. Both paths produce the same digest.

#![allow(unknown_lints)]
#![warn(clippy::all)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::new_without_default)]
#![allow(clippy::identity_op)]
#![allow(clippy::many_single_char_names)]

mod aggregate;
mod block;
mod combine;
mod engine;
mod error;
mod hasher;
mod header;
mod ingest;
mod mode;
mod pool;
mod shake;

pub use block::Block;
pub use combine::{add_mod64, combine_hex, sub_mod64, Op};
pub use engine::{one_shot_hash, IshakeEngine};
pub use error::Error;
pub use header::Header;
pub use mode::Mode;

//! The caller-facing unit of input data (spec §3).

use crate::header::Header;

/// A single block of input data plus its address header.
///
/// Taken by value everywhere the engine consumes one: the spec requires
/// that the caller not touch a block's data again once it has been handed
/// to `append`/`insert`/`delete`/`update`, and move semantics enforce that
/// at compile time instead of leaving it as a documented-only contract.
#[derive(Debug, Clone)]
pub struct Block {
    data: Vec<u8>,
    header: Header,
}

impl Block {
    /// Build a block from raw data and its header. Does not validate the
    /// block size against an engine's configured `B`; the engine does that
    /// on ingestion.
    pub fn new(data: Vec<u8>, header: Header) -> Self {
        Block { data, header }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// Consume the block, returning its parts.
    pub fn into_parts(self) -> (Vec<u8>, Header) {
        (self.data, self.header)
    }

    /// Bytes hashed for this block: `data ‖ header_be` (spec §6.2).
    pub(crate) fn to_hashed_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + self.header.len());
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&self.header.to_be_bytes());
        out
    }
}

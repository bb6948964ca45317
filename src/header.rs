//! The header appended after a block's data before hashing (spec §6.2).

/// The identifying header attached to a block.
///
/// Replaces the source's `union { ishake_nonce nonce; uint64_t idx; }`
/// tagged by a separate length byte (`ishake_header` in `ishake.h`) with a
/// Rust sum type — the byte length is derived from the variant instead of
/// stored alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    /// Append-only mode: a monotonic 1-based block index. Serializes to 8
    /// big-endian bytes.
    Index(u64),
    /// Full mode: a block's own nonce and the nonce of its neighbor — by
    /// this crate's convention, the *next* block in forward logical order
    /// (see spec §4.5). Serializes to 16 big-endian bytes (`nonce ‖ neighbor`).
    Linked { nonce: u64, neighbor: u64 },
}

impl Header {
    /// Byte length of this header once serialized.
    pub fn len(&self) -> usize {
        match self {
            Header::Index(_) => 8,
            Header::Linked { .. } => 16,
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// True for [`Header::Linked`]; full-mode mutations require this.
    pub fn is_linked(&self) -> bool {
        matches!(self, Header::Linked { .. })
    }

    /// The nonce identifying this block, if it has one (full mode only).
    pub fn nonce(&self) -> Option<u64> {
        match self {
            Header::Index(_) => None,
            Header::Linked { nonce, .. } => Some(*nonce),
        }
    }

    /// The neighbor nonce, if this is a linked header.
    pub fn neighbor(&self) -> Option<u64> {
        match self {
            Header::Index(_) => None,
            Header::Linked { neighbor, .. } => Some(*neighbor),
        }
    }

    /// Big-endian serialization, as hashed after the block's data (spec §6.2).
    pub fn to_be_bytes(self) -> Vec<u8> {
        match self {
            Header::Index(idx) => idx.to_be_bytes().to_vec(),
            Header::Linked { nonce, neighbor } => {
                let mut out = Vec::with_capacity(16);
                out.extend_from_slice(&nonce.to_be_bytes());
                out.extend_from_slice(&neighbor.to_be_bytes());
                out
            }
        }
    }
}

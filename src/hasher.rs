//! Per-block hashing: `data ‖ header` through SHAKE, repacked as words
//! (spec §4.2, grounded on `ishake.c`'s `_hash_block`).

use crate::block::Block;
use crate::shake;

/// Output length in bits, validated against the two legal windows for the
/// chosen SHAKE variant (spec §3: 2688..=4160 for SHAKE128, 6528..=16512
/// for SHAKE256, both multiples of 64).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Variant {
    Shake128,
    Shake256,
}

impl Variant {
    pub(crate) fn from_output_bits(bits: u16) -> Option<Self> {
        match bits {
            2688..=4160 if bits % 64 == 0 => Some(Variant::Shake128),
            6528..=16512 if bits % 64 == 0 => Some(Variant::Shake256),
            _ => None,
        }
    }
}

/// Hash one block to `bits / 8` bytes, repacked as big-endian `u64` words.
///
/// This runs on whatever thread dequeues the block — inline, in a worker, or
/// (thread_count == 0) the caller's own thread — and has no shared state, so
/// it is exactly the unit of work the pool in `src/pool.rs` schedules.
pub(crate) fn hash_block(block: &Block, variant: Variant, bits: u16) -> Vec<u64> {
    let mut out = vec![0u8; bits as usize / 8];
    let hashed = block.to_hashed_bytes();
    match variant {
        Variant::Shake128 => shake::shake128(&mut out, &hashed),
        Variant::Shake256 => shake::shake256(&mut out, &hashed),
    }
    out.chunks_exact(8)
        .map(|c| u64::from_be_bytes(c.try_into().unwrap()))
        .collect()
}

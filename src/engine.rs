//! The public engine: the state machine wiring ingest, hashing, pooling,
//! and the aggregate together (spec §4.5/§6).
//!
//! Grounded on `ishake.c`/`ishake.h`'s `ishake_init`/`ishake_append`/
//! `ishake_update`/`ishake_final` for the append-only path; `insert`/
//! `delete` aren't present in the kept revision of `ishake.c` (only
//! `update` is), so they're built here directly from the
//! subtract-then-add composition the spec gives for `update`.

use crate::block::Block;
use crate::combine::Op;
use crate::error::Error;
use crate::hasher::Variant;
use crate::ingest::Ingest;
use crate::mode::Mode;
use crate::pool::Pool;

/// An in-progress iSHAKE computation.
///
/// Not `Clone`/`Copy`: the worker pool and ingest buffer are exclusively
/// owned, and `finalize` consumes the engine so it cannot be driven again
/// afterward — `AlreadyFinalized` exists only to reject calls made through
/// a stale reference obtained before a move, e.g. via `&mut` aliasing in
/// bindings that outlive a conceptual finalize.
pub struct IshakeEngine {
    mode: Mode,
    bits: u16,
    variant: Variant,
    pool: Pool,
    ingest: Option<Ingest>,
    finalized: bool,
}

impl IshakeEngine {
    /// Start a new engine.
    ///
    /// `block_size` is `B`, the total size in bytes of a hashed unit
    /// (`data ‖ header`). In append-only mode interior blocks carry `B - 8`
    /// data bytes plus the 8-byte index header; in full mode the caller's
    /// own blocks should be sized so their data plus the 16-byte linked
    /// header also sum to `B` (spec §3/§4.4).
    /// `output_bits` selects both the SHAKE variant and the digest length
    /// (spec §3: 2688..=4160 in steps of 64 selects SHAKE128, 6528..=16512
    /// selects SHAKE256). `thread_count` workers are spawned; `0` runs
    /// every hash inline on the calling thread.
    pub fn new(mode: Mode, block_size: u32, output_bits: u16, thread_count: usize) -> Result<Self, Error> {
        if block_size <= 8 {
            return Err(Error::BadBlockSize(block_size));
        }
        let variant = Variant::from_output_bits(output_bits).ok_or(Error::BadOutputBits(output_bits))?;
        let word_count = output_bits as usize / 64;

        let ingest = match mode {
            Mode::AppendOnly => Some(Ingest::new(block_size as usize)),
            Mode::Full => None,
        };

        Ok(IshakeEngine {
            mode,
            bits: output_bits,
            variant,
            pool: Pool::new(thread_count, variant, output_bits, word_count),
            ingest,
            finalized: false,
        })
    }

    /// Feed more bytes into an append-only stream. Full-size blocks carved
    /// out are queued for hashing immediately; any remainder stays
    /// buffered until the next `append` or `finalize`.
    pub fn append(&mut self, data: &[u8]) -> Result<(), Error> {
        self.check_open()?;
        if self.mode.is_full() {
            return Err(Error::WrongMode);
        }
        let ingest = self.ingest.as_mut().expect("append-only engine always has an ingest buffer");
        for block in ingest.push(data) {
            self.pool.submit(block, Op::Add);
        }
        Ok(())
    }

    /// Insert a new linked block into a full-mode aggregate.
    pub fn insert(&mut self, block: Block) -> Result<(), Error> {
        self.check_open()?;
        self.require_full_and_linked(&block)?;
        self.pool.submit(block, Op::Add);
        Ok(())
    }

    /// Remove a previously-inserted linked block from a full-mode
    /// aggregate. `block` must be the same data and header that were
    /// originally inserted — the aggregate stores only the combined sum,
    /// not individual block hashes, so the block's own hash must be
    /// recomputed here in order to subtract it back out.
    pub fn delete(&mut self, block: Block) -> Result<(), Error> {
        self.check_open()?;
        self.require_full_and_linked(&block)?;
        self.pool.submit(block, Op::Sub);
        Ok(())
    }

    /// Replace a linked block's contents in place: subtract the old
    /// block's hash, add the new one's. `old` and `new` should share the
    /// same header (same logical position); this is not independently
    /// validated, since the engine doesn't track which nonces exist.
    pub fn update(&mut self, old: Block, new: Block) -> Result<(), Error> {
        self.check_open()?;
        self.require_full_and_linked(&old)?;
        self.require_full_and_linked(&new)?;
        self.pool.submit(old, Op::Sub);
        self.pool.submit(new, Op::Add);
        Ok(())
    }

    /// Finish the computation and write the digest into `out`, which must
    /// be exactly `output_bits / 8` bytes.
    pub fn finalize(mut self, out: &mut [u8]) -> Result<(), Error> {
        self.check_open()?;

        let expected = self.bits as usize / 8;
        if out.len() != expected {
            return Err(Error::BadOutputBuffer {
                expected,
                got: out.len(),
            });
        }
        self.finalized = true;

        if let Some(ingest) = self.ingest.as_mut() {
            if let Some(tail) = ingest.flush_final() {
                self.pool.submit(tail, Op::Add);
            }
        }

        let pool = std::mem::replace(
            &mut self.pool,
            Pool::new(0, self.variant, self.bits, self.bits as usize / 64),
        );
        let digest = pool.shutdown()?;
        out.copy_from_slice(&digest);
        Ok(())
    }

    fn check_open(&self) -> Result<(), Error> {
        if self.finalized {
            Err(Error::AlreadyFinalized)
        } else {
            Ok(())
        }
    }

    fn require_full_and_linked(&self, block: &Block) -> Result<(), Error> {
        if !self.mode.is_full() {
            return Err(Error::WrongMode);
        }
        if !block.header().is_linked() {
            return Err(Error::WrongHeaderKind);
        }
        Ok(())
    }
}

/// Hash an entire in-memory buffer in append-only mode in one call,
/// equivalent to `new` + repeated `append` + `finalize` — grounded on
/// `ishake.c`'s `ishake_hash` convenience wrapper.
pub fn one_shot_hash(
    block_size: u32,
    output_bits: u16,
    thread_count: usize,
    data: &[u8],
    out: &mut [u8],
) -> Result<(), Error> {
    let mut engine = IshakeEngine::new(Mode::AppendOnly, block_size, output_bits, thread_count)?;
    engine.append(data)?;
    engine.finalize(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;

    #[test]
    fn append_only_digest_is_deterministic_across_thread_counts() {
        let data = b"the quick brown fox jumps over the lazy dog, repeated for blocks";

        let mut out_inline = [0u8; 2688 / 8];
        one_shot_hash(16, 2688, 0, data, &mut out_inline).unwrap();

        let mut out_threaded = [0u8; 2688 / 8];
        one_shot_hash(16, 2688, 4, data, &mut out_threaded).unwrap();

        assert_eq!(out_inline, out_threaded);
    }

    #[test]
    fn append_composability_matches_one_shot() {
        let data = b"0123456789abcdef0123456789abcdef0123456789abcdef";

        let mut one_shot = [0u8; 2688 / 8];
        one_shot_hash(16, 2688, 2, data, &mut one_shot).unwrap();

        let mut engine = IshakeEngine::new(Mode::AppendOnly, 16, 2688, 2).unwrap();
        engine.append(&data[..10]).unwrap();
        engine.append(&data[10..]).unwrap();
        let mut piecewise = [0u8; 2688 / 8];
        engine.finalize(&mut piecewise).unwrap();

        assert_eq!(one_shot, piecewise);
    }

    #[test]
    fn hash_of_empty_input_is_defined_and_consistent() {
        // No append call at all.
        let mut no_append = [0u8; 2688 / 8];
        let engine = IshakeEngine::new(Mode::AppendOnly, 16, 2688, 0).unwrap();
        engine.finalize(&mut no_append).unwrap();

        // An explicit append("").
        let mut empty_append = [0u8; 2688 / 8];
        let mut engine = IshakeEngine::new(Mode::AppendOnly, 16, 2688, 0).unwrap();
        engine.append(b"").unwrap();
        engine.finalize(&mut empty_append).unwrap();

        // Matches one_shot_hash over an empty buffer too.
        let mut one_shot = [0u8; 2688 / 8];
        one_shot_hash(16, 2688, 0, b"", &mut one_shot).unwrap();

        assert_eq!(no_append, empty_append);
        assert_eq!(no_append, one_shot);
        // Not all-zero: a zero-length block's own header still gets hashed.
        assert!(no_append.iter().any(|&b| b != 0));
    }

    #[test]
    fn append_rejected_in_full_mode() {
        let mut engine = IshakeEngine::new(Mode::Full, 16, 2688, 0).unwrap();
        assert!(matches!(engine.append(b"x"), Err(Error::WrongMode)));
    }

    #[test]
    fn insert_then_delete_restores_the_empty_digest() {
        let mut empty_engine = IshakeEngine::new(Mode::Full, 16, 2688, 0).unwrap();
        let mut empty_digest = [0u8; 2688 / 8];
        empty_engine.finalize(&mut empty_digest).unwrap();

        let mut engine = IshakeEngine::new(Mode::Full, 16, 2688, 0).unwrap();
        let block = Block::new(
            vec![9; 16],
            Header::Linked {
                nonce: 1,
                neighbor: 0,
            },
        );
        engine.insert(block.clone()).unwrap();
        engine.delete(block).unwrap();
        let mut digest = [0u8; 2688 / 8];
        engine.finalize(&mut digest).unwrap();

        assert_eq!(digest, empty_digest);
    }

    #[test]
    fn update_is_equivalent_to_delete_then_insert() {
        let old = Block::new(
            vec![1; 16],
            Header::Linked {
                nonce: 1,
                neighbor: 2,
            },
        );
        let new = Block::new(
            vec![2; 16],
            Header::Linked {
                nonce: 1,
                neighbor: 2,
            },
        );

        let mut engine_a = IshakeEngine::new(Mode::Full, 16, 2688, 0).unwrap();
        engine_a.insert(old.clone()).unwrap();
        engine_a.update(old.clone(), new.clone()).unwrap();
        let mut digest_a = [0u8; 2688 / 8];
        engine_a.finalize(&mut digest_a).unwrap();

        let mut engine_b = IshakeEngine::new(Mode::Full, 16, 2688, 0).unwrap();
        engine_b.insert(old.clone()).unwrap();
        engine_b.delete(old).unwrap();
        engine_b.insert(new).unwrap();
        let mut digest_b = [0u8; 2688 / 8];
        engine_b.finalize(&mut digest_b).unwrap();

        assert_eq!(digest_a, digest_b);
    }

    #[test]
    fn insert_rejects_index_header() {
        let mut engine = IshakeEngine::new(Mode::Full, 16, 2688, 0).unwrap();
        let block = Block::new(vec![1; 16], Header::Index(1));
        assert!(matches!(engine.insert(block), Err(Error::WrongHeaderKind)));
    }

    #[test]
    fn finalize_rejects_wrong_buffer_length() {
        let engine = IshakeEngine::new(Mode::AppendOnly, 16, 2688, 0).unwrap();
        let mut out = [0u8; 10];
        assert!(matches!(
            engine.finalize(&mut out),
            Err(Error::BadOutputBuffer { .. })
        ));
    }

    #[test]
    fn bad_output_bits_rejected_at_construction() {
        assert!(matches!(
            IshakeEngine::new(Mode::AppendOnly, 16, 4224, 0),
            Err(Error::BadOutputBits(4224))
        ));
    }

    #[test]
    fn bad_block_size_rejected_at_construction() {
        assert!(matches!(
            IshakeEngine::new(Mode::AppendOnly, 8, 2688, 0),
            Err(Error::BadBlockSize(8))
        ));
    }
}

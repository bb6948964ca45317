//! Append-only mode's byte-stream-to-blocks carving (spec §4.4, grounded on
//! `ishake.c`'s `ishake_append`/`ishake_final` residual-buffer logic).
//!
//! The C original keeps a `malloc`'d residual buffer and `memcpy`s into it
//! across calls; here that's just a `Vec<u8>` and `Vec::drain`.

use crate::block::Block;
use crate::header::Header;

pub(crate) struct Ingest {
    /// Bytes of actual data carved per block: `B` minus the 8-byte index
    /// header, so that `data ‖ header` (what's actually hashed) is exactly
    /// `B` bytes, per spec §4.4/§3.
    data_chunk_size: usize,
    buffer: Vec<u8>,
    next_index: u64,
    /// Whether a block has ever been emitted, via `push` or `flush_final`.
    /// An engine finalized having seen no input at all must still hash one
    /// zero-length block (spec §4.4, testable property #2).
    any_emitted: bool,
}

impl Ingest {
    pub(crate) fn new(block_size: usize) -> Self {
        let header_len = Header::Index(0).len();
        Ingest {
            data_chunk_size: block_size - header_len,
            buffer: Vec::with_capacity(block_size),
            next_index: 1,
            any_emitted: false,
        }
    }

    /// Feed more bytes in. Returns every full-size block that can now be
    /// carved out, each carrying the next monotonic index. Any remainder
    /// shorter than `data_chunk_size` stays buffered for the next call or
    /// for [`Ingest::flush_final`].
    pub(crate) fn push(&mut self, data: &[u8]) -> Vec<Block> {
        self.buffer.extend_from_slice(data);

        let mut blocks = Vec::new();
        while self.buffer.len() >= self.data_chunk_size {
            let chunk: Vec<u8> = self.buffer.drain(..self.data_chunk_size).collect();
            blocks.push(Block::new(chunk, Header::Index(self.next_index)));
            self.next_index += 1;
        }
        if !blocks.is_empty() {
            self.any_emitted = true;
        }
        blocks
    }

    /// Drain whatever is left in the residual buffer as one final block.
    /// Emitted when residual bytes remain, or when no block has ever been
    /// processed — in which case a single zero-length block is emitted so
    /// that hashing an empty input still produces a defined digest
    /// (matches `ishake.c`'s `is->remaining || !is->proc_bytes` guard).
    /// Called once, by `finalize`.
    pub(crate) fn flush_final(&mut self) -> Option<Block> {
        if self.buffer.is_empty() && self.any_emitted {
            return None;
        }
        let remainder = std::mem::take(&mut self.buffer);
        let block = Block::new(remainder, Header::Index(self.next_index));
        self.next_index += 1;
        self.any_emitted = true;
        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_carves_blocks_of_b_minus_8_data_bytes() {
        // B = 12, so each hashed unit is 12 bytes: 4 data bytes + 8-byte index.
        let mut ingest = Ingest::new(12);
        let blocks = ingest.push(b"abcdefghij");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].data(), b"abcd");
        assert_eq!(blocks[0].header(), Header::Index(1));
        assert_eq!(blocks[1].data(), b"efgh");
        assert_eq!(blocks[1].header(), Header::Index(2));
        assert_eq!(ingest.buffer, b"ij");
    }

    #[test]
    fn carving_spans_multiple_push_calls() {
        let mut ingest = Ingest::new(12);
        assert!(ingest.push(b"ab").is_empty());
        let blocks = ingest.push(b"cd");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].data(), b"abcd");
    }

    #[test]
    fn flush_final_returns_the_trailing_short_block() {
        let mut ingest = Ingest::new(12);
        ingest.push(b"abcdef");
        let tail = ingest.flush_final().unwrap();
        assert_eq!(tail.data(), b"ef");
        assert!(ingest.flush_final().is_none());
    }

    #[test]
    fn flush_final_is_none_on_exact_multiple() {
        let mut ingest = Ingest::new(12);
        ingest.push(b"abcd");
        assert!(ingest.flush_final().is_none());
    }

    #[test]
    fn flush_final_emits_one_zero_length_block_when_nothing_was_ever_pushed() {
        let mut ingest = Ingest::new(12);
        let tail = ingest.flush_final().unwrap();
        assert_eq!(tail.data(), b"");
        assert_eq!(tail.header(), Header::Index(1));
        assert!(ingest.flush_final().is_none());
    }

    #[test]
    fn flush_final_emits_one_zero_length_block_for_empty_push() {
        let mut ingest = Ingest::new(12);
        assert!(ingest.push(b"").is_empty());
        let tail = ingest.flush_final().unwrap();
        assert_eq!(tail.data(), b"");
        assert_eq!(tail.header(), Header::Index(1));
    }
}

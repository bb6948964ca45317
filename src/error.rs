//! The error taxonomy of the iSHAKE engine (see spec §7).

/// Everything that can go wrong calling into [`crate::engine::IshakeEngine`]
/// or the standalone [`crate::combine::combine_hex`] helper.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `H` was not a multiple of 64 bits, or fell outside the
    /// `2688..=4160` (SHAKE128) / `6528..=16512` (SHAKE256) windows.
    #[error(
        "output length {0} bits must be a multiple of 64 within 2688..=4160 or 6528..=16512"
    )]
    BadOutputBits(u16),

    /// `B` was zero, or (append-only mode) too small to leave room for the
    /// 8-byte index header.
    #[error("block size must be greater than 8 bytes, got {0}")]
    BadBlockSize(u32),

    /// `append` was called on a [`crate::mode::Mode::Full`] engine, or
    /// `insert`/`delete`/`update` was called on a
    /// [`crate::mode::Mode::AppendOnly`] one.
    #[error("operation is not valid for this engine's mode")]
    WrongMode,

    /// `insert`/`delete`/`update` was called with an 8-byte (`Index`)
    /// header, which is only valid in append-only mode.
    #[error("insert/delete/update require a 16-byte linked header, not an append-only index")]
    WrongHeaderKind,

    /// Any mutating operation called after [`crate::engine::IshakeEngine::finalize`].
    #[error("the engine has already been finalized")]
    AlreadyFinalized,

    /// `finalize`'s output buffer length did not equal `H / 8` bytes.
    #[error("output buffer is {got} bytes, expected {expected}")]
    BadOutputBuffer { expected: usize, got: usize },

    /// A worker thread panicked while hashing a queued block. The
    /// aggregate is missing that block's contribution and must not be
    /// trusted.
    #[error("a worker thread failed to hash a block; the digest is incomplete")]
    WorkerPoisoned,

    /// `combine_hex` was given digests of different lengths.
    #[error("digests must be the same length to combine ({0} != {1} bytes)")]
    LengthMismatch(usize, usize),

    /// `combine_hex` was given a hex string whose length is not a multiple
    /// of 16 (i.e. not a whole number of 8-byte words).
    #[error("hex digest length must be a multiple of 16 hex characters, got {0}")]
    BadHexLength(usize),

    /// `combine_hex` was given a string with non-hex characters.
    #[error("invalid hex digest")]
    InvalidHex,
}

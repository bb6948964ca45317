//! The two block-addressing regimes an [`crate::engine::IshakeEngine`] can run in.

/// Selects how blocks are addressed and which operations are legal.
///
/// Corresponds to `ISHAKE_APPEND_ONLY_MODE`/`ISHAKE_FULL_MODE` in the
/// original C source, expressed as an enum instead of raw tag bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Input is an ordered byte stream. Blocks are addressed by a monotonic
    /// 1-based index assigned by the engine. Only `append` is legal.
    AppendOnly,
    /// Blocks form a caller-managed doubly-linked logical sequence, each
    /// carrying a `(nonce, neighbor)` header. `insert`/`delete`/`update` are
    /// legal; `append` is not.
    Full,
}

impl Mode {
    pub(crate) fn is_full(self) -> bool {
        matches!(self, Mode::Full)
    }
}

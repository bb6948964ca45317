//! The commutative group combiner at the core of iSHAKE (spec §4.1).
//!
//! Per-block digests are treated as vectors of 64-bit words and combined
//! word-wise under addition modulo 2^64. Because `u64` addition and
//! subtraction already wrap at that modulus, `wrapping_add`/`wrapping_sub`
//! give an exact group inverse directly, without reaching for the source's
//! `mod (2^64 - 1)` scheme (spec's own deliberate deviation, see DESIGN.md).

use crate::error::Error;

/// Which group operation to apply. `Sub` is `Add`'s inverse: combining a
/// digest in with `Add` and then combining it back out with `Sub` is the
/// identity, which is what makes delete/update possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
}

/// `a (op) b`, wrapping at 2^64.
pub fn add_mod64(a: u64, b: u64) -> u64 {
    a.wrapping_add(b)
}

/// `a` with `b` removed, i.e. `add_mod64`'s inverse.
pub fn sub_mod64(a: u64, b: u64) -> u64 {
    a.wrapping_sub(b)
}

/// Combine two equal-length word slices element-wise into `out`.
///
/// `out` and `into` may be the same buffer (the common in-place case used by
/// [`crate::aggregate::Aggregate::combine`]).
pub(crate) fn combine_words(into: &mut [u64], other: &[u64], op: Op) {
    debug_assert_eq!(into.len(), other.len());
    for (a, b) in into.iter_mut().zip(other.iter()) {
        *a = match op {
            Op::Add => add_mod64(*a, *b),
            Op::Sub => sub_mod64(*a, *b),
        };
    }
}

/// Combine two equal-length hex-encoded digests under `op`.
///
/// This is the entire surface the out-of-scope `combine` CLI would wrap
/// (spec §6.4): decode both operands into word arrays, apply `op`
/// word-by-word, re-encode. Grounded on `combine.c`'s hex-decode/apply/
/// re-encode shape, minus the `main()`/`exit()` wrapper.
pub fn combine_hex(op: Op, a: &str, b: &str) -> Result<String, Error> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch(a.len(), b.len()));
    }
    if a.len() % 16 != 0 {
        return Err(Error::BadHexLength(a.len()));
    }

    let words_a = decode_words(a)?;
    let words_b = decode_words(b)?;

    let mut out = words_a;
    combine_words(&mut out, &words_b, op);

    let mut hex = String::with_capacity(a.len());
    for w in out {
        hex.push_str(&format!("{:016x}", w));
    }
    Ok(hex)
}

fn decode_words(s: &str) -> Result<Vec<u64>, Error> {
    let bytes = s.as_bytes();
    let mut words = Vec::with_capacity(bytes.len() / 16);
    for chunk in bytes.chunks(16) {
        let word_str = core::str::from_utf8(chunk).map_err(|_| Error::InvalidHex)?;
        let word = u64::from_str_radix(word_str, 16).map_err(|_| Error::InvalidHex)?;
        words.push(word);
    }
    Ok(words)
}

//! Keccak-f[1600] sponge, specialized to one-shot SHAKE128/SHAKE256.
//!
//! Structurally this is the teacher crate's SHA-3 sponge (absorb, permute,
//! squeeze over a 200-byte state), generalized to the SHAKE domain and run
//! to completion in a single call instead of being kept alive as an
//! incremental `Digest` context: the engine only ever needs "hash this
//! exact message to this exact output length" (see `crate::hasher`).

use core::cmp;

/// Keccak state width in bytes (1600 bits).
const STATE_BYTES: usize = 200;
const NROUNDS: usize = 24;

const RC: [u64; NROUNDS] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808a,
    0x8000000080008000,
    0x000000000000808b,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008a,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000a,
    0x000000008000808b,
    0x800000000000008b,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800a,
    0x800000008000000a,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];
const ROTC: [u32; NROUNDS] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];
const PIL: [usize; NROUNDS] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];
const M5: [usize; 10] = [0, 1, 2, 3, 4, 0, 1, 2, 3, 4];

fn keccak_f(state: &mut [u8; STATE_BYTES]) {
    let mut s = [0u64; 25];
    for (lane, chunk) in s.iter_mut().zip(state.chunks_exact(8)) {
        *lane = u64::from_le_bytes(chunk.try_into().unwrap());
    }

    let mut c = [0u64; 5];
    for round in 0..NROUNDS {
        // Theta
        for x in 0..5 {
            c[x] = s[x] ^ s[5 + x] ^ s[10 + x] ^ s[15 + x] ^ s[20 + x];
        }
        for x in 0..5 {
            let t = c[M5[x + 4]] ^ c[M5[x + 1]].rotate_left(1);
            for y in 0..5 {
                s[y * 5 + x] ^= t;
            }
        }

        // Rho and Pi
        let mut t = s[1];
        for x in 0..24 {
            let tmp = s[PIL[x]];
            s[PIL[x]] = t.rotate_left(ROTC[x]);
            t = tmp;
        }

        // Chi
        for y in 0..5 {
            for x in 0..5 {
                c[x] = s[y * 5 + x];
            }
            for x in 0..5 {
                s[y * 5 + x] = c[x] ^ (!c[M5[x + 1]] & c[M5[x + 2]]);
            }
        }

        // Iota
        s[0] ^= RC[round];
    }

    for (lane, chunk) in s.iter().zip(state.chunks_exact_mut(8)) {
        chunk.copy_from_slice(&lane.to_le_bytes());
    }
}

/// Domain-separation suffix length, in bits, for the SHAKE construction
/// (`1111`, FIPS 202 §6.2). Fixed SHA-3 uses `01` (2 bits); plain Keccak
/// uses none; this module only ever needs SHAKE's.
const SHAKE_DS_BITS: usize = 4;

fn pad_len(offset_bits: usize, rate_bits: usize) -> usize {
    let r = rate_bits as i64;
    let m = (offset_bits + SHAKE_DS_BITS) as i64;
    let zeros = (((-m - 2) + 2 * r) % r) as usize;
    (SHAKE_DS_BITS + zeros + 2) / 8
}

fn build_padding(offset_bits: usize, rate_bytes: usize) -> Vec<u8> {
    let p_len = pad_len(offset_bits, rate_bytes * 8);
    let mut p = vec![0u8; p_len];

    // Domain separation: "1111" packed LSB-first into the first bits of p.
    p[0] |= 0x0f;

    // pad10*1, starting right after the domain bits.
    let offset = SHAKE_DS_BITS;
    let s = offset / 8;
    p[s] |= 1 << (offset % 8);
    for i in (offset % 8) + 1..8 {
        p[s] &= !(1 << i);
    }
    let buflen = p.len();
    for b in p[s + 1..].iter_mut() {
        *b = 0;
    }
    p[buflen - 1] |= 0x80;
    p
}

/// One-shot sponge: absorb `data`, then squeeze exactly `out.len()` bytes.
fn shake(rate: usize, out: &mut [u8], data: &[u8]) {
    let mut state = [0u8; STATE_BYTES];

    // Absorb.
    let mut offset = 0usize;
    let mut pos = 0usize;
    while pos < data.len() {
        let n = cmp::min(rate - offset, data.len() - pos);
        for i in 0..n {
            state[offset + i] ^= data[pos + i];
        }
        pos += n;
        if offset + n != rate {
            offset += n;
            break;
        }
        offset = 0;
        keccak_f(&mut state);
    }

    // Pad and absorb the final block.
    let padding = build_padding(offset * 8, rate);
    let mut pos = 0usize;
    while pos < padding.len() {
        let n = cmp::min(rate - offset, padding.len() - pos);
        for i in 0..n {
            state[offset + i] ^= padding[pos + i];
        }
        pos += n;
        if offset + n != rate {
            offset += n;
            break;
        }
        offset = 0;
        keccak_f(&mut state);
    }

    // Squeeze.
    let mut out_pos = 0usize;
    let mut offset = offset % rate;
    while out_pos < out.len() {
        let n = cmp::min(rate - offset, out.len() - out_pos);
        out[out_pos..out_pos + n].copy_from_slice(&state[offset..offset + n]);
        out_pos += n;
        offset += n;
        if offset == rate {
            offset = 0;
            keccak_f(&mut state);
        }
    }
}

/// SHAKE128 rate: `200 - 2 * 16` bytes of capacity.
const SHAKE128_RATE: usize = 168;
/// SHAKE256 rate: `200 - 2 * 64` bytes of capacity.
const SHAKE256_RATE: usize = 136;

/// Hash `data` to exactly `out.len()` bytes using SHAKE128.
pub(crate) fn shake128(out: &mut [u8], data: &[u8]) {
    shake(SHAKE128_RATE, out, data)
}

/// Hash `data` to exactly `out.len()` bytes using SHAKE256.
pub(crate) fn shake256(out: &mut [u8], data: &[u8]) {
    shake(SHAKE256_RATE, out, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shake128_is_deterministic() {
        let mut a = [0u8; 64];
        let mut b = [0u8; 64];
        shake128(&mut a, b"iSHAKE test vector");
        shake128(&mut b, b"iSHAKE test vector");
        assert_eq!(a, b);
    }

    #[test]
    fn shake128_differs_from_shake256() {
        let mut a = [0u8; 64];
        let mut b = [0u8; 64];
        shake128(&mut a, b"same input");
        shake256(&mut b, b"same input");
        assert_ne!(a, b);
    }

    #[test]
    fn output_length_changes_the_bytes_produced_not_just_truncates() {
        // SHAKE is a true XOF: asking for more output must not just append
        // zeros, and the prefix a short squeeze returns must match the
        // prefix a longer squeeze returns (same absorbed state, same
        // squeeze cursor).
        let mut short = [0u8; 32];
        let mut long = [0u8; 256];
        shake128(&mut short, b"xof prefix check");
        shake128(&mut long, b"xof prefix check");
        assert_eq!(&short[..], &long[..32]);
    }

    #[test]
    fn empty_message_is_legal() {
        let mut out = [0u8; 32];
        shake256(&mut out, b"");
        // Just must not panic, and must be deterministic.
        let mut out2 = [0u8; 32];
        shake256(&mut out2, b"");
        assert_eq!(out, out2);
    }

    #[test]
    fn single_byte_difference_changes_output() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        shake128(&mut a, b"block-A");
        shake128(&mut b, b"block-B");
        assert_ne!(a, b);
    }
}

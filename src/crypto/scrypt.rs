//! scrypt (RFC 7914) built on this crate's PBKDF2.
//!
//! ```text
//! B  = PBKDF2(P, S, 1, p * 128 * r)          split into p lanes
//! Bi = ROMix(Bi, N)                          for each lane, in order
//! DK = PBKDF2(P, B, 1, dk_len)
//! ```
//!
//! Lanes are processed sequentially.  Each lane touches only its own
//! slice of `B`, so the result would be identical if they were spread
//! over threads.
//!
//! Internally every block is held as little-endian `u32` words; bytes
//! are only converted at the lane boundary.

use log::debug;
use zeroize::{Zeroize, Zeroizing};

use super::algorithm::Algorithm;
use super::pbkdf2::pbkdf2;
use crate::errors::{PassHashError, Result};

/// Words in one Salsa20 block (64 bytes).
const SALSA_WORDS: usize = 16;

/// Bytes per unit of the block-size parameter `r`.
const BLOCK_BYTES_PER_R: usize = 128;

/// Derive `dk_len` bytes with scrypt.
///
/// `n` is the actual CPU/memory cost (a power of two, at least 2), `r` the
/// block-size multiplier and `p` the number of lanes.  All sizes are
/// checked before anything is allocated or computed.
pub fn scrypt(
    algorithm: Algorithm,
    password: &[u8],
    salt: &[u8],
    n: u64,
    r: u32,
    p: u32,
    dk_len: usize,
) -> Result<Vec<u8>> {
    let layout = Layout::new(algorithm, n, r, p, dk_len)?;
    debug!(
        "scrypt: {algorithm}, N={n}, r={r}, p={p}, {} bytes of working memory",
        layout.v_bytes + layout.lanes_bytes
    );

    let mut b = Zeroizing::new(pbkdf2(algorithm, password, salt, 1, layout.lanes_bytes)?);

    let block_words = layout.block_bytes / 4;
    let mut v = alloc_words(layout.v_bytes / 4)?;
    let mut x = alloc_words(block_words)?;
    let mut y = alloc_words(block_words)?;

    for lane in b.chunks_exact_mut(layout.block_bytes) {
        smix(lane, layout.n, &mut v, &mut x, &mut y);
    }

    pbkdf2(algorithm, password, &b, 1, dk_len)
}

/// Checked buffer sizes for one scrypt invocation.
struct Layout {
    n: usize,
    block_bytes: usize,
    lanes_bytes: usize,
    v_bytes: usize,
}

impl Layout {
    fn new(algorithm: Algorithm, n: u64, r: u32, p: u32, dk_len: usize) -> Result<Self> {
        if n < 2 || !n.is_power_of_two() {
            return Err(PassHashError::InvalidParameter(format!(
                "scrypt N must be a power of two greater than 1 (got {n})"
            )));
        }
        if r == 0 {
            return Err(PassHashError::InvalidParameter(
                "scrypt r must be at least 1".into(),
            ));
        }
        if p == 0 {
            return Err(PassHashError::InvalidParameter(
                "scrypt p must be at least 1".into(),
            ));
        }
        if dk_len == 0 {
            return Err(PassHashError::InvalidParameter(
                "scrypt derived key length must be at least 1".into(),
            ));
        }
        if u32::try_from(dk_len.div_ceil(algorithm.tag_len())).is_err() {
            return Err(PassHashError::InvalidParameter(format!(
                "scrypt derived key length {dk_len} is too large"
            )));
        }

        let too_large = |what: &str| {
            PassHashError::InvalidParameter(format!(
                "scrypt {what} exceeds the maximum buffer size (N={n}, r={r}, p={p})"
            ))
        };

        let n = usize::try_from(n).map_err(|_| too_large("N"))?;
        let block_bytes = usize::try_from(r)
            .ok()
            .and_then(|r| r.checked_mul(BLOCK_BYTES_PER_R))
            .filter(|&len| fits_allocation(len))
            .ok_or_else(|| too_large("128 * r"))?;
        let lanes_bytes = usize::try_from(p)
            .ok()
            .and_then(|p| p.checked_mul(block_bytes))
            .filter(|&len| fits_allocation(len))
            .ok_or_else(|| too_large("128 * r * p"))?;
        let v_bytes = n
            .checked_mul(block_bytes)
            .filter(|&len| fits_allocation(len))
            .ok_or_else(|| too_large("128 * r * N"))?;

        Ok(Self {
            n,
            block_bytes,
            lanes_bytes,
            v_bytes,
        })
    }
}

fn fits_allocation(len: usize) -> bool {
    isize::try_from(len).is_ok()
}

/// Allocate a zeroed word buffer, surfacing allocation failure as an error.
fn alloc_words(len: usize) -> Result<Zeroizing<Vec<u32>>> {
    let mut words = Vec::new();
    words.try_reserve_exact(len).map_err(|e| {
        PassHashError::Primitive(format!("cannot allocate {} bytes for scrypt: {e}", len * 4))
    })?;
    words.resize(len, 0);
    Ok(Zeroizing::new(words))
}

/// ROMix over one lane of `128 * r` bytes.
///
/// `v` holds `n` blocks; `x` and `y` are one block each.
fn smix(lane: &mut [u8], n: usize, v: &mut [u32], x: &mut [u32], y: &mut [u32]) {
    let block_words = x.len();

    for (word, bytes) in x.iter_mut().zip(lane.chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    for slot in v.chunks_exact_mut(block_words) {
        slot.copy_from_slice(x);
        blockmix_salsa8(x, y);
    }

    for _ in 0..n {
        let j = integerify(x, n);
        let slot = &v[j * block_words..(j + 1) * block_words];
        x.iter_mut().zip(slot).for_each(|(x, v)| *x ^= v);
        blockmix_salsa8(x, y);
    }

    for (bytes, word) in lane.chunks_exact_mut(4).zip(x.iter()) {
        bytes.copy_from_slice(&word.to_le_bytes());
    }
}

/// First 64 bits of the last Salsa block, reduced mod `n` (a power of two).
fn integerify(x: &[u32], n: usize) -> usize {
    let last = x.len() - SALSA_WORDS;
    let value = u64::from(x[last]) | (u64::from(x[last + 1]) << 32);
    // n fits in usize, so the masked value does too.
    (value & (n as u64 - 1)) as usize
}

/// BlockMix with Salsa20/8 as the hash function.
///
/// `b` holds `2r` Salsa blocks and is overwritten with the output; `y` is
/// scratch of the same size.  Outputs of even-indexed blocks land in the
/// first half, odd-indexed in the second.
fn blockmix_salsa8(b: &mut [u32], y: &mut [u32]) {
    let blocks = b.len() / SALSA_WORDS;
    let half = blocks / 2;

    let mut t = [0u32; SALSA_WORDS];
    t.copy_from_slice(&b[(blocks - 1) * SALSA_WORDS..]);

    for (i, block) in b.chunks_exact(SALSA_WORDS).enumerate() {
        t.iter_mut().zip(block).for_each(|(t, b)| *t ^= b);
        salsa20_8(&mut t);

        let dst = if i % 2 == 0 { i / 2 } else { half + i / 2 };
        y[dst * SALSA_WORDS..(dst + 1) * SALSA_WORDS].copy_from_slice(&t);
    }

    b.copy_from_slice(y);
    t.zeroize();
}

/// The Salsa20/8 core: four double rounds, then feed-forward.
fn salsa20_8(block: &mut [u32; SALSA_WORDS]) {
    let mut x = *block;

    for _ in 0..4 {
        // Columns.
        quarter_round(&mut x, 0, 4, 8, 12);
        quarter_round(&mut x, 5, 9, 13, 1);
        quarter_round(&mut x, 10, 14, 2, 6);
        quarter_round(&mut x, 15, 3, 7, 11);
        // Rows.
        quarter_round(&mut x, 0, 1, 2, 3);
        quarter_round(&mut x, 5, 6, 7, 4);
        quarter_round(&mut x, 10, 11, 8, 9);
        quarter_round(&mut x, 15, 12, 13, 14);
    }

    for (out, mixed) in block.iter_mut().zip(x.iter()) {
        *out = out.wrapping_add(*mixed);
    }
    x.zeroize();
}

#[inline(always)]
fn quarter_round(x: &mut [u32; SALSA_WORDS], a: usize, b: usize, c: usize, d: usize) {
    x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
    x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
    x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
    x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_invalid(result: Result<Vec<u8>>) -> bool {
        matches!(result, Err(PassHashError::InvalidParameter(_)))
    }

    #[test]
    fn salsa_fixes_the_zero_block() {
        let mut block = [0u32; SALSA_WORDS];
        salsa20_8(&mut block);
        assert_eq!(block, [0u32; SALSA_WORDS]);
    }

    #[test]
    fn salsa_changes_nonzero_input() {
        let mut block = [0u32; SALSA_WORDS];
        block[0] = 1;
        let before = block;
        salsa20_8(&mut block);
        assert_ne!(block, before);
    }

    #[test]
    fn blockmix_reorders_even_then_odd() {
        // With r = 2 there are four Salsa blocks.  Recompute the chain by
        // hand and check the interleaved placement.
        let mut input = vec![0u32; 4 * SALSA_WORDS];
        for (i, w) in input.iter_mut().enumerate() {
            *w = i as u32 * 0x0101_0101;
        }

        let mut expected = Vec::new();
        let mut t = [0u32; SALSA_WORDS];
        t.copy_from_slice(&input[3 * SALSA_WORDS..]);
        for block in input.chunks_exact(SALSA_WORDS) {
            t.iter_mut().zip(block).for_each(|(t, b)| *t ^= b);
            salsa20_8(&mut t);
            expected.push(t);
        }

        let mut b = input.clone();
        let mut y = vec![0u32; b.len()];
        blockmix_salsa8(&mut b, &mut y);

        let order = [0, 2, 1, 3];
        for (position, &source) in order.iter().enumerate() {
            assert_eq!(
                &b[position * SALSA_WORDS..(position + 1) * SALSA_WORDS],
                &expected[source][..]
            );
        }
    }

    #[test]
    fn integerify_reads_last_block() {
        let mut x = vec![0u32; 2 * SALSA_WORDS];
        x[SALSA_WORDS] = 0x1234_5678;
        assert_eq!(integerify(&x, 16), 0x8);
        assert_eq!(integerify(&x, 1 << 16), 0x5678);
    }

    #[test]
    fn rejects_bad_n() {
        for n in [0, 1, 3, 1000] {
            assert!(is_invalid(scrypt(Algorithm::HmacSha256, b"", b"", n, 1, 1, 32)));
        }
    }

    #[test]
    fn rejects_zero_r_p_and_length() {
        assert!(is_invalid(scrypt(Algorithm::HmacSha256, b"", b"", 16, 0, 1, 32)));
        assert!(is_invalid(scrypt(Algorithm::HmacSha256, b"", b"", 16, 1, 0, 32)));
        assert!(is_invalid(scrypt(Algorithm::HmacSha256, b"", b"", 16, 1, 1, 0)));
    }

    #[test]
    fn rejects_oversized_buffers_before_allocating() {
        assert!(is_invalid(scrypt(
            Algorithm::HmacSha256,
            b"",
            b"",
            1 << 62,
            255,
            1,
            32
        )));
        assert!(is_invalid(scrypt(
            Algorithm::HmacSha256,
            b"",
            b"",
            16,
            u32::MAX,
            u32::MAX,
            32
        )));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn unallocatable_lanes_are_an_error() {
        // p * 128 * r = 128 GiB passes the size checks but cannot be backed.
        let result = scrypt(Algorithm::HmacSha512, b"pw", b"salt", 2, 1 << 15, 1 << 15, 32);
        assert!(matches!(result, Err(PassHashError::Primitive(_))));
    }

    #[test]
    fn deterministic_and_salt_sensitive() {
        let a = scrypt(Algorithm::HmacSha256, b"pw", b"salt", 16, 2, 2, 32).unwrap();
        let b = scrypt(Algorithm::HmacSha256, b"pw", b"salt", 16, 2, 2, 32).unwrap();
        let c = scrypt(Algorithm::HmacSha256, b"pw", b"pepper", 16, 2, 2, 32).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}

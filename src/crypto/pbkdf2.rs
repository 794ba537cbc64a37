//! PBKDF2 (RFC 2898 / RFC 8018) over any registered HMAC algorithm.
//!
//! The password keys the PRF; each output block `T_i` is the XOR of the
//! chain `U_1 = PRF(salt || BE32(i))`, `U_j = PRF(U_{j-1})`.

use zeroize::Zeroizing;

use super::algorithm::Algorithm;
use crate::errors::{PassHashError, Result};

/// Derive `dk_len` bytes from `password` and `salt`.
///
/// Fails when `iterations` or `dk_len` is zero, when `dk_len` would
/// need more than `2^32 - 1` blocks, or when the output buffer cannot be
/// allocated.
pub fn pbkdf2(
    algorithm: Algorithm,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    dk_len: usize,
) -> Result<Vec<u8>> {
    if iterations == 0 {
        return Err(PassHashError::InvalidParameter(
            "PBKDF2 iterations must be at least 1".into(),
        ));
    }
    if dk_len == 0 {
        return Err(PassHashError::InvalidParameter(
            "PBKDF2 derived key length must be at least 1".into(),
        ));
    }

    let mut prf = algorithm.engine(password)?;
    let h_len = prf.tag_len();
    let blocks = dk_len.div_ceil(h_len);
    let blocks = u32::try_from(blocks).map_err(|_| {
        PassHashError::InvalidParameter(format!(
            "PBKDF2 derived key length {dk_len} needs {blocks} blocks, more than 2^32 - 1"
        ))
    })?;

    let mut derived = Vec::new();
    derived.try_reserve_exact(dk_len).map_err(|e| {
        PassHashError::Primitive(format!("cannot allocate {dk_len} bytes for PBKDF2 output: {e}"))
    })?;

    for block in 1..=blocks {
        prf.update(salt);
        prf.update(&block.to_be_bytes());
        let mut u = Zeroizing::new(prf.finalize());
        let mut t = Zeroizing::new(u.to_vec());

        for _ in 1..iterations {
            prf.update(&u);
            u = Zeroizing::new(prf.finalize());
            t.iter_mut().zip(u.iter()).for_each(|(t, u)| *t ^= u);
        }

        let take = (dk_len - derived.len()).min(t.len());
        derived.extend_from_slice(&t[..take]);
    }

    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_length_is_exact() {
        for len in [1, 19, 20, 21, 40, 65] {
            let dk = pbkdf2(Algorithm::HmacSha1, b"pw", b"salt", 2, len).unwrap();
            assert_eq!(dk.len(), len);
        }
    }

    #[test]
    fn longer_output_extends_shorter() {
        let short = pbkdf2(Algorithm::HmacSha256, b"pw", b"salt", 3, 16).unwrap();
        let long = pbkdf2(Algorithm::HmacSha256, b"pw", b"salt", 3, 80).unwrap();
        assert_eq!(&long[..16], &short[..]);
    }

    #[test]
    fn zero_iterations_rejected() {
        let result = pbkdf2(Algorithm::HmacSha256, b"pw", b"salt", 0, 32);
        assert!(matches!(result, Err(PassHashError::InvalidParameter(_))));
    }

    #[test]
    fn zero_length_rejected() {
        let result = pbkdf2(Algorithm::HmacSha256, b"pw", b"salt", 1, 0);
        assert!(matches!(result, Err(PassHashError::InvalidParameter(_))));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn too_many_blocks_rejected_before_work() {
        // 2^32 blocks of 16 bytes; the check fires before any allocation.
        let dk_len = (u32::MAX as usize + 1) * 16;
        let result = pbkdf2(Algorithm::HmacMd5, b"pw", b"salt", 1, dk_len);
        assert!(matches!(result, Err(PassHashError::InvalidParameter(_))));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn unallocatable_output_is_an_error() {
        // Within the block limit, but far beyond any real memory.
        let dk_len = (u32::MAX as usize - 1) * 64;
        let result = pbkdf2(Algorithm::HmacSha512, b"pw", b"salt", 1, dk_len);
        assert!(matches!(result, Err(PassHashError::Primitive(_))));
    }

    #[test]
    fn rfc6070_sha1_one_iteration() {
        let dk = pbkdf2(Algorithm::HmacSha1, b"password", b"salt", 1, 20).unwrap();
        assert_eq!(
            dk,
            [
                0x0c, 0x60, 0xc8, 0x0f, 0x96, 0x1f, 0x0e, 0x71, 0xf3, 0xa9, 0xb5, 0x24, 0xaf, 0x60,
                0x12, 0x06, 0x2f, 0xe0, 0x37, 0xa6,
            ]
        );
    }
}

//! Registry of supported HMAC algorithms.
//!
//! Every algorithm is bound to a 4-bit index that is packed into the
//! parameter word of an encoded hash.  The indices are part of the stored
//! format: changing one invalidates every hash created with it, so new
//! algorithms may only be appended.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

use super::engine::HmacEngine;
use crate::errors::{PassHashError, Result};

/// Largest index that fits in the 4-bit algorithm field.
pub const MAX_INDEX: u8 = 0x0f;

/// Supported HMAC algorithms, in index order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    HmacMd5,
    HmacSha1,
    HmacSha224,
    #[default]
    HmacSha256,
    HmacSha384,
    HmacSha512,
    HmacSha512_224,
    HmacSha512_256,
    HmacSha3_224,
    HmacSha3_256,
    HmacSha3_384,
    HmacSha3_512,
}

impl Algorithm {
    /// All registered algorithms, ordered by index.
    pub const ALL: [Algorithm; 12] = [
        Algorithm::HmacMd5,
        Algorithm::HmacSha1,
        Algorithm::HmacSha224,
        Algorithm::HmacSha256,
        Algorithm::HmacSha384,
        Algorithm::HmacSha512,
        Algorithm::HmacSha512_224,
        Algorithm::HmacSha512_256,
        Algorithm::HmacSha3_224,
        Algorithm::HmacSha3_256,
        Algorithm::HmacSha3_384,
        Algorithm::HmacSha3_512,
    ];

    /// The stable 4-bit index stored in encoded hashes.
    pub const fn index(self) -> u8 {
        match self {
            Algorithm::HmacMd5 => 0,
            Algorithm::HmacSha1 => 1,
            Algorithm::HmacSha224 => 2,
            Algorithm::HmacSha256 => 3,
            Algorithm::HmacSha384 => 4,
            Algorithm::HmacSha512 => 5,
            Algorithm::HmacSha512_224 => 6,
            Algorithm::HmacSha512_256 => 7,
            Algorithm::HmacSha3_224 => 8,
            Algorithm::HmacSha3_256 => 9,
            Algorithm::HmacSha3_384 => 10,
            Algorithm::HmacSha3_512 => 11,
        }
    }

    /// Look up an algorithm by its stored index.
    pub fn from_index(index: u8) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.index() == index)
            .ok_or(PassHashError::UnknownAlgorithm(index))
    }

    /// Canonical lower-case name, e.g. `hmac-sha256`.
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::HmacMd5 => "hmac-md5",
            Algorithm::HmacSha1 => "hmac-sha1",
            Algorithm::HmacSha224 => "hmac-sha224",
            Algorithm::HmacSha256 => "hmac-sha256",
            Algorithm::HmacSha384 => "hmac-sha384",
            Algorithm::HmacSha512 => "hmac-sha512",
            Algorithm::HmacSha512_224 => "hmac-sha512-224",
            Algorithm::HmacSha512_256 => "hmac-sha512-256",
            Algorithm::HmacSha3_224 => "hmac-sha3-224",
            Algorithm::HmacSha3_256 => "hmac-sha3-256",
            Algorithm::HmacSha3_384 => "hmac-sha3-384",
            Algorithm::HmacSha3_512 => "hmac-sha3-512",
        }
    }

    /// Tag size in bytes.
    pub const fn tag_len(self) -> usize {
        match self {
            Algorithm::HmacMd5 => 16,
            Algorithm::HmacSha1 => 20,
            Algorithm::HmacSha224 | Algorithm::HmacSha512_224 | Algorithm::HmacSha3_224 => 28,
            Algorithm::HmacSha256 | Algorithm::HmacSha512_256 | Algorithm::HmacSha3_256 => 32,
            Algorithm::HmacSha384 | Algorithm::HmacSha3_384 => 48,
            Algorithm::HmacSha512 | Algorithm::HmacSha3_512 => 64,
        }
    }

    /// MD5 and SHA-1 are kept only to verify old hashes.
    pub const fn is_legacy(self) -> bool {
        matches!(self, Algorithm::HmacMd5 | Algorithm::HmacSha1)
    }

    /// Create a fresh HMAC engine keyed with `key`.
    pub fn engine(self, key: &[u8]) -> Result<Box<dyn HmacEngine>> {
        match self {
            Algorithm::HmacMd5 => keyed::<Hmac<Md5>>(key),
            Algorithm::HmacSha1 => keyed::<Hmac<Sha1>>(key),
            Algorithm::HmacSha224 => keyed::<Hmac<Sha224>>(key),
            Algorithm::HmacSha256 => keyed::<Hmac<Sha256>>(key),
            Algorithm::HmacSha384 => keyed::<Hmac<Sha384>>(key),
            Algorithm::HmacSha512 => keyed::<Hmac<Sha512>>(key),
            Algorithm::HmacSha512_224 => keyed::<Hmac<Sha512_224>>(key),
            Algorithm::HmacSha512_256 => keyed::<Hmac<Sha512_256>>(key),
            Algorithm::HmacSha3_224 => keyed::<Hmac<Sha3_224>>(key),
            Algorithm::HmacSha3_256 => keyed::<Hmac<Sha3_256>>(key),
            Algorithm::HmacSha3_384 => keyed::<Hmac<Sha3_384>>(key),
            Algorithm::HmacSha3_512 => keyed::<Hmac<Sha3_512>>(key),
        }
    }
}

fn keyed<M>(key: &[u8]) -> Result<Box<dyn HmacEngine>>
where
    M: HmacEngine + Mac + hmac::digest::KeyInit + 'static,
{
    let mac = <M as Mac>::new_from_slice(key)
        .map_err(|e| PassHashError::Primitive(format!("HMAC init failed: {e}")))?;
    Ok(Box::new(mac))
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = PassHashError;

    /// Accepts the canonical name with or without the `hmac-` prefix,
    /// case-insensitively, with `_` treated like `-`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let wanted = if normalized.starts_with("hmac-") {
            normalized
        } else {
            format!("hmac-{normalized}")
        };
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.name() == wanted)
            .ok_or_else(|| PassHashError::UnknownAlgorithmName(s.to_string()))
    }
}

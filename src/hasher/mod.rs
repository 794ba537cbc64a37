//! Salted password hashers that produce and check encoded records.
//!
//! Three schemes are available, each with its own record layout (see
//! `format`):
//! - `IteratedHmacHasher`: chained HMAC keyed by the salt
//! - `Pbkdf2Hasher`: PBKDF2 with up to 65 535 iterations
//! - `ScryptHasher`: scrypt with `N = 2^log_n`
//!
//! Hashers are immutable and validated at construction, so `create`
//! never fails on a cost parameter.  `check` reads every parameter from
//! the record itself.

pub mod format;
pub mod iterated;
pub mod pbkdf2;
pub mod scrypt;

use std::fmt;
use std::str::FromStr;

use rand::{CryptoRng, RngCore};
use serde::Serialize;
use subtle::ConstantTimeEq;

use crate::crypto::Algorithm;
use crate::errors::{PassHashError, Result};

pub use iterated::IteratedHmacHasher;
pub use pbkdf2::Pbkdf2Hasher;
pub use scrypt::ScryptHasher;

/// Default salt length in bytes for every scheme.
pub const DEFAULT_SALT_LEN: usize = 16;

/// Default derived-key length for PBKDF2 and scrypt.
pub const DEFAULT_DERIVED_LEN: usize = 32;

/// Upper bound for configurable salt and derived-key lengths.
pub const MAX_LEN: usize = 1024;

/// Shortest derived key PBKDF2 and scrypt records may carry.  A shorter
/// stored hash would be too easy to match by chance.
pub const MIN_DERIVED_LEN: usize = 16;

/// The three hashing schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    IteratedHmac,
    Pbkdf2,
    Scrypt,
}

impl Scheme {
    pub const ALL: [Scheme; 3] = [Scheme::IteratedHmac, Scheme::Pbkdf2, Scheme::Scrypt];

    pub const fn name(self) -> &'static str {
        match self {
            Scheme::IteratedHmac => "hmac",
            Scheme::Pbkdf2 => "pbkdf2",
            Scheme::Scrypt => "scrypt",
        }
    }

    /// Guess the scheme from the record shape.
    ///
    /// Only scrypt records are self-identifying; iterated-HMAC and PBKDF2
    /// records share a layout and return `None`.
    pub fn detect(record: &str) -> Option<Scheme> {
        let prefix = format!("{d}{m}{d}", d = format::DELIMITER, m = format::SCRYPT_MARKER);
        record.starts_with(&prefix).then_some(Scheme::Scrypt)
    }

    /// Check `password` against a record of this scheme.
    pub fn check(self, password: &[u8], record: &str) -> Result<bool> {
        match self {
            Scheme::IteratedHmac => IteratedHmacHasher::check(password, record),
            Scheme::Pbkdf2 => Pbkdf2Hasher::check(password, record),
            Scheme::Scrypt => ScryptHasher::check(password, record),
        }
    }

    /// Decode a record of this scheme without checking any password.
    pub fn inspect(self, record: &str) -> Result<HashInfo> {
        let info = match self {
            Scheme::IteratedHmac => {
                let parsed = IteratedHmacHasher::parse(record)?;
                HashInfo::new(
                    self,
                    parsed.hasher.algorithm(),
                    Cost::Rounds {
                        rounds: parsed.hasher.rounds(),
                    },
                    &parsed,
                )
            }
            Scheme::Pbkdf2 => {
                let parsed = Pbkdf2Hasher::parse(record)?;
                HashInfo::new(
                    self,
                    parsed.hasher.algorithm(),
                    Cost::Iterations {
                        iterations: parsed.hasher.iterations(),
                    },
                    &parsed,
                )
            }
            Scheme::Scrypt => {
                let parsed = ScryptHasher::parse(record)?;
                HashInfo::new(
                    self,
                    parsed.hasher.algorithm(),
                    Cost::Scrypt {
                        log_n: parsed.hasher.log_n(),
                        r: parsed.hasher.r(),
                        p: parsed.hasher.p(),
                    },
                    &parsed,
                )
            }
        };
        Ok(info)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = PassHashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hmac" | "iterated-hmac" => Ok(Scheme::IteratedHmac),
            "pbkdf2" => Ok(Scheme::Pbkdf2),
            "scrypt" => Ok(Scheme::Scrypt),
            other => Err(PassHashError::InvalidParameter(format!(
                "unknown scheme '{other}', supported: hmac, pbkdf2, scrypt"
            ))),
        }
    }
}

/// Any configured hasher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hasher {
    IteratedHmac(IteratedHmacHasher),
    Pbkdf2(Pbkdf2Hasher),
    Scrypt(ScryptHasher),
}

impl Hasher {
    pub fn scheme(&self) -> Scheme {
        match self {
            Hasher::IteratedHmac(_) => Scheme::IteratedHmac,
            Hasher::Pbkdf2(_) => Scheme::Pbkdf2,
            Hasher::Scrypt(_) => Scheme::Scrypt,
        }
    }

    /// Hash `password` with a fresh salt from the thread-local CSPRNG.
    pub fn create(&self, password: &[u8]) -> Result<String> {
        self.create_with_rng(password, &mut rand::rng())
    }

    /// Hash `password` with a salt drawn from `rng`.
    pub fn create_with_rng<R: CryptoRng + ?Sized>(
        &self,
        password: &[u8],
        rng: &mut R,
    ) -> Result<String> {
        match self {
            Hasher::IteratedHmac(h) => h.create_with_rng(password, rng),
            Hasher::Pbkdf2(h) => h.create_with_rng(password, rng),
            Hasher::Scrypt(h) => h.create_with_rng(password, rng),
        }
    }

    /// Check `password` against a record of this hasher's scheme.
    pub fn check(&self, password: &[u8], record: &str) -> Result<bool> {
        self.scheme().check(password, record)
    }
}

impl From<IteratedHmacHasher> for Hasher {
    fn from(h: IteratedHmacHasher) -> Self {
        Hasher::IteratedHmac(h)
    }
}

impl From<Pbkdf2Hasher> for Hasher {
    fn from(h: Pbkdf2Hasher) -> Self {
        Hasher::Pbkdf2(h)
    }
}

impl From<ScryptHasher> for Hasher {
    fn from(h: ScryptHasher) -> Self {
        Hasher::Scrypt(h)
    }
}

/// A record decoded into the hasher that produced it.
///
/// The hasher's salt length is taken from the record, so hashing again
/// with it yields records of the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<H> {
    pub hasher: H,
    pub salt: Vec<u8>,
    pub derived: Vec<u8>,
}

/// Scheme-specific cost parameters, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cost {
    Rounds { rounds: u8 },
    Iterations { iterations: u16 },
    Scrypt { log_n: u8, r: u8, p: u8 },
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Rounds { rounds } => write!(f, "rounds={rounds}"),
            Cost::Iterations { iterations } => write!(f, "iterations={iterations}"),
            Cost::Scrypt { log_n, r, p } => write!(f, "N=2^{log_n}, r={r}, p={p}"),
        }
    }
}

/// Summary of a stored record, safe to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashInfo {
    pub scheme: String,
    pub algorithm: String,
    pub algorithm_index: u8,
    pub cost: Cost,
    pub salt_len: usize,
    pub derived_len: usize,
}

impl HashInfo {
    fn new<H>(scheme: Scheme, algorithm: Algorithm, cost: Cost, parsed: &Parsed<H>) -> Self {
        Self {
            scheme: scheme.name().to_string(),
            algorithm: algorithm.name().to_string(),
            algorithm_index: algorithm.index(),
            cost,
            salt_len: parsed.salt.len(),
            derived_len: parsed.derived.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Draw `len` random salt bytes.
pub(crate) fn generate_salt<R: CryptoRng + ?Sized>(rng: &mut R, len: usize) -> Vec<u8> {
    let mut salt = vec![0u8; len];
    RngCore::fill_bytes(rng, &mut salt);
    salt
}

/// Compare a freshly derived value with the stored one in constant time.
pub(crate) fn derived_matches(computed: &[u8], stored: &[u8]) -> bool {
    computed.ct_eq(stored).into()
}

/// Validate a configurable byte length (salt or derived key).
pub(crate) fn check_len(what: &str, len: usize, min: usize) -> Result<usize> {
    if len < min || len > MAX_LEN {
        return Err(PassHashError::InvalidParameter(format!(
            "{what} length must be between {min} and {MAX_LEN} bytes (got {len})"
        )));
    }
    Ok(len)
}

/// Narrow a cost parameter into its stored width, rejecting anything
/// outside `1..=max`.
pub(crate) fn check_range<T: TryFrom<u32>>(what: &str, value: u32, max: u32) -> Result<T> {
    if value == 0 || value > max {
        return Err(PassHashError::InvalidParameter(format!(
            "{what} must be between 1 and {max} (got {value})"
        )));
    }
    T::try_from(value).map_err(|_| {
        PassHashError::InvalidParameter(format!("{what} {value} does not fit its field"))
    })
}

/// Turn a parameter error found while decoding into a format error.
pub(crate) fn stored_param(err: PassHashError) -> PassHashError {
    match err {
        PassHashError::InvalidParameter(msg) => {
            PassHashError::InvalidFormat(format!("stored parameter out of range: {msg}"))
        }
        other => other,
    }
}

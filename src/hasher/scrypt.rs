//! scrypt password hasher.
//!
//! Record: `$s0$<hex(alg << 20 | log_n << 16 | r << 8 | p)>$<salt>$<hash>`.

use log::{debug, warn};
use rand::CryptoRng;

use super::format::{self, RecordLayout};
use super::{
    check_len, check_range, derived_matches, generate_salt, stored_param, Parsed, MIN_DERIVED_LEN,
};
use crate::crypto::{scrypt, Algorithm};
use crate::errors::Result;

/// Largest `log_n` that fits the 4-bit field (`N = 32768`).
pub const MAX_LOG_N: u32 = 15;

/// Largest `r` or `p` that fits an 8-bit field.
pub const MAX_R_P: u32 = 255;

/// Hashes passwords with scrypt and a random salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScryptHasher {
    algorithm: Algorithm,
    log_n: u8,
    r: u8,
    p: u8,
    salt_len: usize,
    derived_len: usize,
}

impl Default for ScryptHasher {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            log_n: 14,
            r: 8,
            p: 1,
            salt_len: super::DEFAULT_SALT_LEN,
            derived_len: super::DEFAULT_DERIVED_LEN,
        }
    }
}

impl ScryptHasher {
    /// Build a hasher with cost `N = 2^log_n`.
    ///
    /// `log_n` must be in `1..=15`, `r` and `p` in `1..=255`.
    pub fn new(algorithm: Algorithm, log_n: u32, r: u32, p: u32) -> Result<Self> {
        Ok(Self {
            algorithm,
            log_n: check_range("scrypt log_n", log_n, MAX_LOG_N)?,
            r: check_range("scrypt r", r, MAX_R_P)?,
            p: check_range("scrypt p", p, MAX_R_P)?,
            ..Self::default()
        })
    }

    /// Use a different salt length (`1..=1024` bytes).
    pub fn with_salt_len(mut self, salt_len: usize) -> Result<Self> {
        self.salt_len = check_len("salt", salt_len, 1)?;
        Ok(self)
    }

    /// Use a different derived-key length (`16..=1024` bytes).
    pub fn with_derived_len(mut self, derived_len: usize) -> Result<Self> {
        self.derived_len = check_len("derived key", derived_len, MIN_DERIVED_LEN)?;
        Ok(self)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn log_n(&self) -> u8 {
        self.log_n
    }

    /// The actual cost factor `N`.
    pub fn n(&self) -> u64 {
        1u64 << self.log_n
    }

    pub fn r(&self) -> u8 {
        self.r
    }

    pub fn p(&self) -> u8 {
        self.p
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len
    }

    pub fn derived_len(&self) -> usize {
        self.derived_len
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
        if self.algorithm.is_legacy() {
            warn!("creating a new hash with legacy algorithm {}", self.algorithm);
        }
        debug!(
            "scrypt hasher: {}, log_n={}, r={}, p={}, {}-byte salt",
            self.algorithm, self.log_n, self.r, self.p, self.salt_len
        );

        let salt = generate_salt(rng, self.salt_len);
        let hash = self.derive(password, &salt)?;

        Ok(format::encode(
            RecordLayout::Scrypt,
            self.algorithm,
            self.packed_cost(),
            &salt,
            &hash,
        ))
    }

    /// Decode a record into the hasher that produced it.
    pub fn parse(record: &str) -> Result<Parsed<Self>> {
        let decoded = format::decode(RecordLayout::Scrypt, record)?;
        let cost = decoded.cost;
        let hasher = Self::new(
            decoded.algorithm,
            (cost >> 16) & 0x0f,
            (cost >> 8) & 0xff,
            cost & 0xff,
        )
        .and_then(|h| h.with_salt_len(decoded.salt.len()))
        .and_then(|h| h.with_derived_len(decoded.derived.len()))
        .map_err(stored_param)?;

        Ok(Parsed {
            hasher,
            salt: decoded.salt,
            derived: decoded.derived,
        })
    }

    /// Check `password` against `record`.
    ///
    /// A malformed record is an error; a wrong password is `Ok(false)`.
    pub fn check(password: &[u8], record: &str) -> Result<bool> {
        let parsed = Self::parse(record)?;
        let hash = parsed.hasher.derive(password, &parsed.salt)?;
        Ok(derived_matches(&hash, &parsed.derived))
    }

    fn derive(&self, password: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        scrypt(
            self.algorithm,
            password,
            salt,
            self.n(),
            u32::from(self.r),
            u32::from(self.p),
            self.derived_len,
        )
    }

    fn packed_cost(&self) -> u32 {
        (u32::from(self.log_n) << 16) | (u32::from(self.r) << 8) | u32::from(self.p)
    }
}

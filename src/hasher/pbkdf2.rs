//! PBKDF2 password hasher.
//!
//! Record: `$<hex(alg << 16 | iterations)>$<salt>$<hash>`.

use log::{debug, warn};
use rand::CryptoRng;

use super::format::{self, RecordLayout};
use super::{
    check_len, check_range, derived_matches, generate_salt, stored_param, Parsed, MIN_DERIVED_LEN,
};
use crate::crypto::{pbkdf2, Algorithm};
use crate::errors::Result;

/// Highest iteration count that fits the 16-bit field.
pub const MAX_ITERATIONS: u32 = 65_535;

/// Hashes passwords with PBKDF2 and a random salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pbkdf2Hasher {
    algorithm: Algorithm,
    iterations: u16,
    salt_len: usize,
    derived_len: usize,
}

impl Default for Pbkdf2Hasher {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            iterations: u16::MAX,
            salt_len: super::DEFAULT_SALT_LEN,
            derived_len: super::DEFAULT_DERIVED_LEN,
        }
    }
}

impl Pbkdf2Hasher {
    /// Build a hasher; `iterations` must be in `1..=65535`.
    pub fn new(algorithm: Algorithm, iterations: u32) -> Result<Self> {
        Ok(Self {
            algorithm,
            iterations: check_range("PBKDF2 iterations", iterations, MAX_ITERATIONS)?,
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

    pub fn iterations(&self) -> u16 {
        self.iterations
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
            "PBKDF2: {}, {} iterations, {}-byte salt, {}-byte output",
            self.algorithm, self.iterations, self.salt_len, self.derived_len
        );

        let salt = generate_salt(rng, self.salt_len);
        let hash = pbkdf2(
            self.algorithm,
            password,
            &salt,
            u32::from(self.iterations),
            self.derived_len,
        )?;

        Ok(format::encode(
            RecordLayout::Pbkdf2,
            self.algorithm,
            u32::from(self.iterations),
            &salt,
            &hash,
        ))
    }

    /// Decode a record into the hasher that produced it.
    pub fn parse(record: &str) -> Result<Parsed<Self>> {
        let decoded = format::decode(RecordLayout::Pbkdf2, record)?;
        let hasher = Self::new(decoded.algorithm, decoded.cost)
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
        let hasher = &parsed.hasher;
        let hash = pbkdf2(
            hasher.algorithm,
            password,
            &parsed.salt,
            u32::from(hasher.iterations),
            hasher.derived_len,
        )?;
        Ok(derived_matches(&hash, &parsed.derived))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PassHashError;

    fn quick() -> Pbkdf2Hasher {
        Pbkdf2Hasher::new(Algorithm::HmacSha256, 100).unwrap()
    }

    #[test]
    fn create_then_check() {
        let record = quick().create(b"correct horse").unwrap();
        assert!(Pbkdf2Hasher::check(b"correct horse", &record).unwrap());
        assert!(!Pbkdf2Hasher::check(b"battery staple", &record).unwrap());
    }

    #[test]
    fn record_carries_algorithm_and_iterations() {
        let record = quick().create(b"pw").unwrap();
        assert!(record.starts_with("$30064$"), "{record}");
    }

    #[test]
    fn parse_reproduces_hasher() {
        let hasher = Pbkdf2Hasher::new(Algorithm::HmacSha512, 65_535)
            .unwrap()
            .with_salt_len(8)
            .unwrap()
            .with_derived_len(64)
            .unwrap();
        let record = hasher.create(b"pw").unwrap();
        let parsed = Pbkdf2Hasher::parse(&record).unwrap();
        assert_eq!(parsed.hasher, hasher);
    }

    #[test]
    fn iterations_out_of_range_rejected() {
        for iterations in [0, 65_536] {
            assert!(matches!(
                Pbkdf2Hasher::new(Algorithm::HmacSha256, iterations),
                Err(PassHashError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn lengths_out_of_range_rejected() {
        assert!(quick().with_salt_len(0).is_err());
        assert!(quick().with_derived_len(0).is_err());
        assert!(quick().with_derived_len(MIN_DERIVED_LEN - 1).is_err());
        assert!(quick().with_derived_len(MIN_DERIVED_LEN).is_ok());
        assert!(quick().with_derived_len(super::super::MAX_LEN + 1).is_err());
    }

    #[test]
    fn truncated_hash_is_a_format_error() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;

        let record = quick().create(b"pw").unwrap();
        let (head, hash) = record.rsplit_once('$').unwrap();
        let bytes = URL_SAFE_NO_PAD.decode(hash).unwrap();
        for len in [1, MIN_DERIVED_LEN - 1] {
            let truncated = format!("{head}${}", URL_SAFE_NO_PAD.encode(&bytes[..len]));
            assert!(matches!(
                Pbkdf2Hasher::check(b"wrong", &truncated),
                Err(PassHashError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn tampered_hash_does_not_verify() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;

        let record = quick().create(b"pw").unwrap();
        let (head, hash) = record.rsplit_once('$').unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(hash).unwrap();
        bytes[0] ^= 0x01;
        let tampered = format!("{head}${}", URL_SAFE_NO_PAD.encode(&bytes));
        assert!(!Pbkdf2Hasher::check(b"pw", &tampered).unwrap());
    }
}

//! Iterated-HMAC password hasher.
//!
//! Record: `$<hex(alg << 8 | rounds)>$<salt>$<hash>`.

use log::{debug, warn};
use rand::CryptoRng;

use super::format::{self, RecordLayout};
use super::{check_len, check_range, derived_matches, generate_salt, stored_param, Parsed};
use crate::crypto::{iterated_hmac, Algorithm};
use crate::errors::Result;

/// Highest round count that fits the 8-bit field.
pub const MAX_ROUNDS: u32 = 255;

/// Hashes passwords with `rounds` chained HMACs keyed by a random salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IteratedHmacHasher {
    algorithm: Algorithm,
    rounds: u8,
    salt_len: usize,
}

impl Default for IteratedHmacHasher {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            rounds: u8::MAX,
            salt_len: super::DEFAULT_SALT_LEN,
        }
    }
}

impl IteratedHmacHasher {
    /// Build a hasher; `rounds` must be in `1..=255`.
    pub fn new(algorithm: Algorithm, rounds: u32) -> Result<Self> {
        Ok(Self {
            algorithm,
            rounds: check_range("HMAC rounds", rounds, MAX_ROUNDS)?,
            salt_len: super::DEFAULT_SALT_LEN,
        })
    }

    /// Use a different salt length (`1..=1024` bytes).
    pub fn with_salt_len(mut self, salt_len: usize) -> Result<Self> {
        self.salt_len = check_len("salt", salt_len, 1)?;
        Ok(self)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn rounds(&self) -> u8 {
        self.rounds
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len
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
            "iterated HMAC: {}, {} rounds, {}-byte salt",
            self.algorithm, self.rounds, self.salt_len
        );

        let salt = generate_salt(rng, self.salt_len);
        let hash = iterated_hmac(self.algorithm, password, &salt, u32::from(self.rounds))?;

        Ok(format::encode(
            RecordLayout::IteratedHmac,
            self.algorithm,
            u32::from(self.rounds),
            &salt,
            &hash,
        ))
    }

    /// Decode a record into the hasher that produced it.
    pub fn parse(record: &str) -> Result<Parsed<Self>> {
        let decoded = format::decode(RecordLayout::IteratedHmac, record)?;
        let hasher = Self::new(decoded.algorithm, decoded.cost)
            .and_then(|h| h.with_salt_len(decoded.salt.len()))
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
        let hash = iterated_hmac(
            hasher.algorithm,
            password,
            &parsed.salt,
            u32::from(hasher.rounds),
        )?;
        Ok(derived_matches(&hash, &parsed.derived))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PassHashError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quick() -> IteratedHmacHasher {
        IteratedHmacHasher::new(Algorithm::HmacSha256, 16).unwrap()
    }

    #[test]
    fn create_then_check() {
        let record = quick().create(b"hunter2").unwrap();
        assert!(IteratedHmacHasher::check(b"hunter2", &record).unwrap());
        assert!(!IteratedHmacHasher::check(b"hunter3", &record).unwrap());
    }

    #[test]
    fn record_carries_algorithm_and_rounds() {
        let record = quick().create(b"pw").unwrap();
        assert!(record.starts_with("$310$"), "{record}");
    }

    #[test]
    fn parse_reproduces_hasher() {
        let hasher = IteratedHmacHasher::new(Algorithm::HmacSha3_384, 200)
            .unwrap()
            .with_salt_len(24)
            .unwrap();
        let parsed = IteratedHmacHasher::parse(&hasher.create(b"pw").unwrap()).unwrap();
        assert_eq!(parsed.hasher, hasher);
        assert_eq!(parsed.salt.len(), 24);
        assert_eq!(parsed.derived.len(), Algorithm::HmacSha3_384.tag_len());
    }

    #[test]
    fn same_rng_same_record() {
        let a = quick()
            .create_with_rng(b"pw", &mut StdRng::seed_from_u64(7))
            .unwrap();
        let b = quick()
            .create_with_rng(b"pw", &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fresh_salt_every_call() {
        let hasher = quick();
        assert_ne!(hasher.create(b"pw").unwrap(), hasher.create(b"pw").unwrap());
    }

    #[test]
    fn rounds_out_of_range_rejected() {
        for rounds in [0, 256, 1000] {
            assert!(matches!(
                IteratedHmacHasher::new(Algorithm::HmacSha256, rounds),
                Err(PassHashError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn zero_rounds_in_record_is_a_format_error() {
        let record = quick().create(b"pw").unwrap();
        let tampered = record.replacen("$310$", "$300$", 1);
        assert!(matches!(
            IteratedHmacHasher::check(b"pw", &tampered),
            Err(PassHashError::InvalidFormat(_))
        ));
    }

    #[test]
    fn malformed_record_is_an_error_not_a_mismatch() {
        assert!(IteratedHmacHasher::check(b"pw", "$310$abc").is_err());
    }
}

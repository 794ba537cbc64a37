//! Salted password hashing: iterated HMAC, PBKDF2 and scrypt, stored as
//! self-describing `$`-delimited records.
//!
//! ```no_run
//! use passhash::crypto::Algorithm;
//! use passhash::hasher::ScryptHasher;
//!
//! let hasher = ScryptHasher::new(Algorithm::HmacSha256, 14, 8, 1)?;
//! let record = hasher.create(b"correct horse battery staple")?;
//! assert!(ScryptHasher::check(b"correct horse battery staple", &record)?);
//! # Ok::<(), passhash::errors::PassHashError>(())
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod hasher;

//! Cryptographic primitives for passhash.
//!
//! This module provides:
//! - The HMAC algorithm registry and engine abstraction (`algorithm`, `engine`)
//! - Salt-keyed chained HMAC (`iterated`)
//! - PBKDF2 (`pbkdf2`)
//! - scrypt with its Salsa20/8 mixing core (`scrypt`)

pub mod algorithm;
pub mod engine;
pub mod iterated;
pub mod pbkdf2;
pub mod scrypt;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{pbkdf2, scrypt, Algorithm, ...};
pub use algorithm::Algorithm;
pub use engine::HmacEngine;
pub use iterated::iterated_hmac;
pub use pbkdf2::pbkdf2;
pub use scrypt::scrypt;

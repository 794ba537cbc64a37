//! Chained HMAC keyed by the salt.
//!
//! ```text
//! h_0 = HMAC_salt(password)
//! h_i = HMAC_salt(BE32(i) || h_{i-1})     for i in 1..rounds
//! ```

use zeroize::Zeroizing;

use super::algorithm::Algorithm;
use crate::errors::{PassHashError, Result};

/// Run `rounds` chained HMAC computations and return the last tag.
pub fn iterated_hmac(
    algorithm: Algorithm,
    password: &[u8],
    salt: &[u8],
    rounds: u32,
) -> Result<Vec<u8>> {
    if rounds == 0 {
        return Err(PassHashError::InvalidParameter(
            "HMAC rounds must be at least 1".into(),
        ));
    }

    let mut mac = algorithm.engine(salt)?;
    mac.update(password);
    let mut h = Zeroizing::new(mac.finalize());

    for round in 1..rounds {
        mac.update(&round.to_be_bytes());
        mac.update(&h);
        h = Zeroizing::new(mac.finalize());
    }

    Ok(h.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    #[test]
    fn single_round_is_plain_hmac() {
        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(b"salt").unwrap();
        Mac::update(&mut mac, b"password");
        let expected = mac.finalize().into_bytes().to_vec();

        let h = iterated_hmac(Algorithm::HmacSha256, b"password", b"salt", 1).unwrap();
        assert_eq!(h, expected);
    }

    #[test]
    fn second_round_prefixes_counter() {
        let h0 = iterated_hmac(Algorithm::HmacSha256, b"password", b"salt", 1).unwrap();

        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(b"salt").unwrap();
        Mac::update(&mut mac, &1u32.to_be_bytes());
        Mac::update(&mut mac, &h0);
        let expected = mac.finalize().into_bytes().to_vec();

        let h1 = iterated_hmac(Algorithm::HmacSha256, b"password", b"salt", 2).unwrap();
        assert_eq!(h1, expected);
    }

    #[test]
    fn output_is_tag_sized() {
        for alg in Algorithm::ALL {
            let h = iterated_hmac(alg, b"pw", b"salt", 3).unwrap();
            assert_eq!(h.len(), alg.tag_len());
        }
    }

    #[test]
    fn zero_rounds_rejected() {
        assert!(matches!(
            iterated_hmac(Algorithm::HmacSha256, b"pw", b"salt", 0),
            Err(PassHashError::InvalidParameter(_))
        ));
    }
}

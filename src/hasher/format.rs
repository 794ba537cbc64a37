//! Text encoding of a stored password hash.
//!
//! ```text
//! $<params>$<salt>$<hash>            iterated HMAC, PBKDF2
//! $s0$<params>$<salt>$<hash>         scrypt
//! ```
//!
//! - **params**: lower-case hex of the packed parameter word.  The 4-bit
//!   algorithm index sits directly above the scheme's cost bits.
//! - **salt**, **hash**: URL-safe base64 without padding.
//!
//! Neither alphabet contains `$`, so splitting on it is unambiguous.

use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64;
use base64::Engine;

use crate::crypto::algorithm::{Algorithm, MAX_INDEX};
use crate::errors::{PassHashError, Result};

/// Field separator.
pub const DELIMITER: char = '$';

/// Marker field that identifies scrypt records.
pub const SCRYPT_MARKER: &str = "s0";

/// Longest accepted hex parameter word (32 bits).
const MAX_HEX_DIGITS: usize = 8;

/// Per-scheme shape of an encoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// `alg << 8 | rounds`
    IteratedHmac,
    /// `alg << 16 | iterations`
    Pbkdf2,
    /// `alg << 20 | log_n << 16 | r << 8 | p`, preceded by the `s0` marker.
    Scrypt,
}

impl RecordLayout {
    /// Bit position of the algorithm index in the packed word.
    pub const fn algorithm_shift(self) -> u32 {
        match self {
            RecordLayout::IteratedHmac => 8,
            RecordLayout::Pbkdf2 => 16,
            RecordLayout::Scrypt => 20,
        }
    }

    /// Mask selecting the cost bits below the algorithm index.
    pub const fn cost_mask(self) -> u32 {
        (1 << self.algorithm_shift()) - 1
    }

    const fn marker(self) -> Option<&'static str> {
        match self {
            RecordLayout::Scrypt => Some(SCRYPT_MARKER),
            RecordLayout::IteratedHmac | RecordLayout::Pbkdf2 => None,
        }
    }

    /// Number of `$`-separated fields, counting the empty leading one.
    pub const fn field_count(self) -> usize {
        match self.marker() {
            Some(_) => 5,
            None => 4,
        }
    }
}

/// A record split back into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub algorithm: Algorithm,
    /// Cost bits of the packed word, algorithm index removed.
    pub cost: u32,
    pub salt: Vec<u8>,
    pub derived: Vec<u8>,
}

/// Serialize a record.  `cost` must fit below the algorithm index.
pub fn encode(
    layout: RecordLayout,
    algorithm: Algorithm,
    cost: u32,
    salt: &[u8],
    derived: &[u8],
) -> String {
    debug_assert_eq!(cost & !layout.cost_mask(), 0, "cost overlaps algorithm bits");
    let packed = (u32::from(algorithm.index()) << layout.algorithm_shift()) | cost;

    let mut out = String::new();
    if let Some(marker) = layout.marker() {
        out.push(DELIMITER);
        out.push_str(marker);
    }
    out.push(DELIMITER);
    out.push_str(&format!("{packed:x}"));
    out.push(DELIMITER);
    out.push_str(&BASE64.encode(salt));
    out.push(DELIMITER);
    out.push_str(&BASE64.encode(derived));
    out
}

/// Parse a record produced by `encode` with the same layout.
pub fn decode(layout: RecordLayout, text: &str) -> Result<DecodedRecord> {
    let fields: Vec<&str> = text.split(DELIMITER).collect();
    if fields.len() != layout.field_count() {
        return Err(PassHashError::InvalidFormat(format!(
            "expected {} '$'-separated fields, found {}",
            layout.field_count(),
            fields.len()
        )));
    }
    if !fields[0].is_empty() {
        return Err(PassHashError::InvalidFormat(
            "hash must start with '$'".into(),
        ));
    }

    let mut rest = &fields[1..];
    if let Some(marker) = layout.marker() {
        if rest[0] != marker {
            return Err(PassHashError::InvalidFormat(format!(
                "expected scheme marker '{marker}', found '{}'",
                rest[0]
            )));
        }
        rest = &rest[1..];
    }

    let packed = parse_hex_word(rest[0])?;
    let index = packed >> layout.algorithm_shift();
    if index > u32::from(MAX_INDEX) {
        return Err(PassHashError::InvalidFormat(format!(
            "parameter word {packed:#x} has bits above the algorithm index"
        )));
    }
    // Fits in four bits after the check above.
    let algorithm = Algorithm::from_index(index as u8)?;

    let salt = decode_field("salt", rest[1])?;
    let derived = decode_field("hash", rest[2])?;

    Ok(DecodedRecord {
        algorithm,
        cost: packed & layout.cost_mask(),
        salt,
        derived,
    })
}

fn parse_hex_word(field: &str) -> Result<u32> {
    if field.is_empty()
        || field.len() > MAX_HEX_DIGITS
        || !field.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return Err(PassHashError::InvalidFormat(format!(
            "parameter word '{field}' is not a 32-bit hex number"
        )));
    }
    u32::from_str_radix(field, 16).map_err(|e| {
        PassHashError::InvalidFormat(format!("parameter word '{field}': {e}"))
    })
}

fn decode_field(name: &str, field: &str) -> Result<Vec<u8>> {
    let bytes = BASE64
        .decode(field)
        .map_err(|e| PassHashError::InvalidFormat(format!("{name} is not valid base64url: {e}")))?;
    if bytes.is_empty() {
        return Err(PassHashError::InvalidFormat(format!("{name} is empty")));
    }
    Ok(bytes)
}

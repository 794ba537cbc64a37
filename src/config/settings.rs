use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::Algorithm;
use crate::errors::{PassHashError, Result};
use crate::hasher::{
    Hasher, IteratedHmacHasher, Pbkdf2Hasher, Scheme, ScryptHasher, DEFAULT_DERIVED_LEN,
    DEFAULT_SALT_LEN,
};

/// Project-level configuration, loaded from `.passhash.toml`.
///
/// Every field has a sensible default so passhash works out-of-the-box
/// without any config file at all.  Values are validated only when a
/// hasher is built from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Scheme used by `hash` when `--scheme` is not given.
    #[serde(default = "default_scheme")]
    pub default_scheme: String,

    /// HMAC algorithm name (e.g. "hmac-sha256").
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Iterated-HMAC round count (1-255).
    #[serde(default = "default_hmac_rounds")]
    pub hmac_rounds: u32,

    /// PBKDF2 iteration count (1-65535).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// scrypt cost exponent, N = 2^log_n (1-15).
    #[serde(default = "default_scrypt_log_n")]
    pub scrypt_log_n: u32,

    /// scrypt block size multiplier (1-255).
    #[serde(default = "default_scrypt_r")]
    pub scrypt_r: u32,

    /// scrypt parallelization count (1-255).
    #[serde(default = "default_scrypt_p")]
    pub scrypt_p: u32,

    /// Salt length in bytes for every scheme.
    #[serde(default = "default_salt_len")]
    pub salt_len: usize,

    /// Output length in bytes for PBKDF2 and scrypt.
    #[serde(default = "default_derived_len")]
    pub derived_len: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_scheme() -> String {
    "scrypt".to_string()
}

fn default_algorithm() -> String {
    Algorithm::default().name().to_string()
}

fn default_hmac_rounds() -> u32 {
    255
}

fn default_pbkdf2_iterations() -> u32 {
    65_535
}

fn default_scrypt_log_n() -> u32 {
    14 // N = 16384
}

fn default_scrypt_r() -> u32 {
    8
}

fn default_scrypt_p() -> u32 {
    1
}

fn default_salt_len() -> usize {
    DEFAULT_SALT_LEN
}

fn default_derived_len() -> usize {
    DEFAULT_DERIVED_LEN
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_scheme: default_scheme(),
            algorithm: default_algorithm(),
            hmac_rounds: default_hmac_rounds(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            scrypt_log_n: default_scrypt_log_n(),
            scrypt_r: default_scrypt_r(),
            scrypt_p: default_scrypt_p(),
            salt_len: default_salt_len(),
            derived_len: default_derived_len(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".passhash.toml";

    /// Load settings from `<project_dir>/.passhash.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassHashError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// The configured default scheme.
    pub fn scheme(&self) -> Result<Scheme> {
        self.default_scheme
            .parse()
            .map_err(|e| PassHashError::ConfigError(format!("default_scheme: {e}")))
    }

    /// The configured HMAC algorithm.
    pub fn algorithm(&self) -> Result<Algorithm> {
        self.algorithm
            .parse()
            .map_err(|e| PassHashError::ConfigError(format!("algorithm: {e}")))
    }

    /// Build an iterated-HMAC hasher from the settings.
    pub fn hmac_hasher(&self) -> Result<IteratedHmacHasher> {
        IteratedHmacHasher::new(self.algorithm()?, self.hmac_rounds)?.with_salt_len(self.salt_len)
    }

    /// Build a PBKDF2 hasher from the settings.
    pub fn pbkdf2_hasher(&self) -> Result<Pbkdf2Hasher> {
        Pbkdf2Hasher::new(self.algorithm()?, self.pbkdf2_iterations)?
            .with_salt_len(self.salt_len)?
            .with_derived_len(self.derived_len)
    }

    /// Build a scrypt hasher from the settings.
    pub fn scrypt_hasher(&self) -> Result<ScryptHasher> {
        ScryptHasher::new(
            self.algorithm()?,
            self.scrypt_log_n,
            self.scrypt_r,
            self.scrypt_p,
        )?
        .with_salt_len(self.salt_len)?
        .with_derived_len(self.derived_len)
    }

    /// Build the hasher for `scheme`.
    pub fn hasher(&self, scheme: Scheme) -> Result<Hasher> {
        Ok(match scheme {
            Scheme::IteratedHmac => self.hmac_hasher()?.into(),
            Scheme::Pbkdf2 => self.pbkdf2_hasher()?.into(),
            Scheme::Scrypt => self.scrypt_hasher()?.into(),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────

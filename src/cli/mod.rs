//! CLI module: clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod logger;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::Algorithm;
use crate::errors::{PassHashError, Result};
use crate::hasher::Scheme;

/// Environment variable consulted before prompting for a password.
pub const PASSWORD_ENV: &str = "PASSHASH_PASSWORD";

/// passhash CLI: salted password hashing and verification.
#[derive(Parser)]
#[command(
    name = "passhash",
    about = "Salted password hashing with iterated HMAC, PBKDF2 and scrypt",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory containing .passhash.toml (default: current directory)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Hash a password and print the encoded record
    Hash(HashArgs),

    /// Check a password against an encoded record
    Verify {
        /// The encoded record (quote it: it contains '$')
        record: String,

        /// Scheme of the record: hmac, pbkdf2 or scrypt
        #[arg(short, long)]
        scheme: Option<Scheme>,
    },

    /// Show the algorithm and cost parameters stored in a record
    Inspect {
        /// The encoded record (quote it: it contains '$')
        record: String,

        /// Scheme of the record: hmac, pbkdf2 or scrypt
        #[arg(short, long)]
        scheme: Option<Scheme>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// List supported HMAC algorithms and their stored indices
    Algorithms,

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

/// Options for `passhash hash`.  Anything omitted comes from settings.
#[derive(clap::Args)]
pub struct HashArgs {
    /// Scheme: hmac, pbkdf2 or scrypt
    #[arg(short, long)]
    pub scheme: Option<Scheme>,

    /// HMAC algorithm (e.g. hmac-sha256, sha3-512)
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// Iterated-HMAC rounds (1-255)
    #[arg(long)]
    pub rounds: Option<u32>,

    /// PBKDF2 iterations (1-65535)
    #[arg(long)]
    pub iterations: Option<u32>,

    /// scrypt cost exponent, N = 2^log_n (1-15)
    #[arg(long)]
    pub log_n: Option<u32>,

    /// scrypt block size multiplier (1-255)
    #[arg(short)]
    pub r: Option<u32>,

    /// scrypt parallelization (1-255)
    #[arg(short)]
    pub p: Option<u32>,

    /// Salt length in bytes
    #[arg(long)]
    pub salt_len: Option<usize>,

    /// Derived key length in bytes (pbkdf2, scrypt)
    #[arg(short, long)]
    pub length: Option<usize>,
}

impl HashArgs {
    /// Overlay command-line overrides onto loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(algorithm) = self.algorithm {
            settings.algorithm = algorithm.name().to_string();
        }
        if let Some(rounds) = self.rounds {
            settings.hmac_rounds = rounds;
        }
        if let Some(iterations) = self.iterations {
            settings.pbkdf2_iterations = iterations;
        }
        if let Some(log_n) = self.log_n {
            settings.scrypt_log_n = log_n;
        }
        if let Some(r) = self.r {
            settings.scrypt_r = r;
        }
        if let Some(p) = self.p {
            settings.scrypt_p = p;
        }
        if let Some(salt_len) = self.salt_len {
            settings.salt_len = salt_len;
        }
        if let Some(length) = self.length {
            settings.derived_len = length;
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from `--config-dir` or the current directory.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    Settings::load(&dir)
}

/// Get the password to check, trying in order:
/// 1. `PASSHASH_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| PassHashError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a password to hash, with confirmation.
///
/// Also respects `PASSHASH_PASSWORD` for scripted usage.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Password to hash")
        .with_confirmation("Confirm password", "Passwords do not match, try again")
        .interact()
        .map_err(|e| PassHashError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Decide which scheme a record belongs to.
///
/// An explicit `--scheme` wins.  Scrypt records identify themselves.
/// Otherwise the configured default is used, unless that default is
/// scrypt, since the record then cannot be one.
pub fn resolve_scheme(explicit: Option<Scheme>, record: &str, settings: &Settings) -> Result<Scheme> {
    if let Some(scheme) = explicit {
        return Ok(scheme);
    }
    if let Some(scheme) = Scheme::detect(record) {
        return Ok(scheme);
    }
    match settings.scheme()? {
        Scheme::Scrypt => Err(PassHashError::CommandFailed(
            "cannot tell an hmac record from a pbkdf2 record; pass --scheme".into(),
        )),
        scheme => Ok(scheme),
    }
}

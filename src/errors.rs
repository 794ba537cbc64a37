use thiserror::Error;

/// All errors that can occur in passhash.
#[derive(Debug, Error)]
pub enum PassHashError {
    // --- Parameter errors ---
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // --- Record errors ---
    #[error("Invalid hash format: {0}")]
    InvalidFormat(String),

    #[error("Unknown algorithm index {0}")]
    UnknownAlgorithm(u8),

    #[error("Unknown algorithm '{0}' (run `passhash algorithms` for the list)")]
    UnknownAlgorithmName(String),

    // --- Primitive errors ---
    #[error("Cryptographic primitive failed: {0}")]
    Primitive(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Password does not match the stored hash")]
    VerificationFailed,
}

/// Convenience type alias for passhash results.
pub type Result<T> = std::result::Result<T, PassHashError>;

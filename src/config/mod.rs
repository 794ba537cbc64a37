//! Configuration loaded from `.passhash.toml`.

pub mod settings;

pub use settings::Settings;

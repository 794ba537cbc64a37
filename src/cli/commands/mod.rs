//! Command implementations, one module per subcommand.

pub mod algorithms;
pub mod completions;
pub mod hash;
pub mod inspect;
pub mod verify;
pub mod version;

//! `passhash algorithms`: list the HMAC algorithm registry.

use crate::cli::output;
use crate::crypto::Algorithm;
use crate::errors::Result;

/// Execute the `algorithms` command.
pub fn execute() -> Result<()> {
    output::print_algorithms_table(&Algorithm::ALL);
    output::tip("Pass a name to `passhash hash --algorithm <NAME>`.");
    Ok(())
}

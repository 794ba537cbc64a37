//! `passhash verify`: check a password against an encoded record.

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, resolve_scheme, Cli};
use crate::errors::{PassHashError, Result};
use crate::hasher::Scheme;

/// Execute the `verify` command.
///
/// A mismatch is reported as `VerificationFailed` so the process exits
/// non-zero; a malformed record surfaces its own format error.
pub fn execute(cli: &Cli, record: &str, scheme: Option<Scheme>) -> Result<()> {
    let settings = load_settings(cli)?;
    let scheme = resolve_scheme(scheme, record, &settings)?;

    // Parse before prompting so a malformed record fails fast.
    scheme.inspect(record)?;

    let password = prompt_password()?;
    if scheme.check(password.as_bytes(), record)? {
        output::success("Password matches");
        Ok(())
    } else {
        Err(PassHashError::VerificationFailed)
    }
}

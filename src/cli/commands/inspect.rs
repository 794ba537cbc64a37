//! `passhash inspect`: show what a record stores, without a password.

use crate::cli::output;
use crate::cli::{load_settings, resolve_scheme, Cli};
use crate::errors::{PassHashError, Result};
use crate::hasher::Scheme;

/// Execute the `inspect` command.
pub fn execute(cli: &Cli, record: &str, scheme: Option<Scheme>, format: &str) -> Result<()> {
    let settings = load_settings(cli)?;
    let scheme = resolve_scheme(scheme, record, &settings)?;
    let info = scheme.inspect(record)?;

    match format {
        "table" => output::print_hash_info(&info),
        "json" => {
            let json = serde_json::to_string_pretty(&info)
                .map_err(|e| PassHashError::CommandFailed(format!("JSON output: {e}")))?;
            println!("{json}");
        }
        other => {
            return Err(PassHashError::CommandFailed(format!(
                "unknown format '{other}', expected table or json"
            )));
        }
    }

    Ok(())
}

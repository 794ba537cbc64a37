//! `passhash version`: display version and supported schemes.

use console::style;

use crate::errors::Result;
use crate::hasher::Scheme;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");
    println!("passhash {current}");

    let schemes: Vec<&str> = Scheme::ALL.iter().map(|s| s.name()).collect();
    println!("{} {}", style("Schemes:").dim(), schemes.join(", "));

    Ok(())
}

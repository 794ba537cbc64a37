//! `passhash completions`: generate shell completion scripts.
//!
//! Usage:
//!   passhash completions bash > ~/.bash_completion.d/passhash
//!   passhash completions zsh > "${fpath[1]}/_passhash"

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{PassHashError, Result};

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    write_completions(parse_shell(shell)?, &mut io::stdout())
}

fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
    out.flush()?;
    Ok(())
}

/// Parse a shell name, accepting the names clap_complete knows plus `ps`.
fn parse_shell(name: &str) -> Result<Shell> {
    let name = name.trim().to_ascii_lowercase();
    if name == "ps" {
        return Ok(Shell::PowerShell);
    }
    name.parse::<Shell>().map_err(|_| {
        PassHashError::CommandFailed(format!(
            "unknown shell '{name}', supported: bash, zsh, fish, powershell, elvish"
        ))
    })
}

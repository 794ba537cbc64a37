//! `passhash hash`: hash a password and print the encoded record.

use crate::cli::{load_settings, prompt_new_password, Cli, HashArgs};
use crate::errors::Result;

/// Execute the `hash` command.
pub fn execute(cli: &Cli, args: &HashArgs) -> Result<()> {
    // 1. Settings from .passhash.toml, overlaid with command-line options.
    let mut settings = load_settings(cli)?;
    args.apply(&mut settings);

    // 2. Build the hasher first so bad parameters fail before the prompt.
    let scheme = match args.scheme {
        Some(scheme) => scheme,
        None => settings.scheme()?,
    };
    let hasher = settings.hasher(scheme)?;

    // 3. Read the password and hash it.
    let password = prompt_new_password()?;
    let record = hasher.create(password.as_bytes())?;

    // The record is the only thing on stdout so it can be captured.
    println!("{record}");
    Ok(())
}

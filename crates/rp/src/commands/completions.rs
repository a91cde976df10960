//! Shell completions command implementation.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};

use crate::cli::{Cli, Shell};

fn to_clap_shell(shell: &Shell) -> ClapShell {
    match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::Powershell => ClapShell::PowerShell,
    }
}

/// Generate shell completions for the given shell and write to stdout.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn execute(shell: &Shell) -> io::Result<()> {
    let mut cmd = Cli::command();
    generate(to_clap_shell(shell), &mut cmd, "rp", &mut io::stdout());
    Ok(())
}

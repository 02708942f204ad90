//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::{Generator, generate, shells};

use crate::cli::{Cli, CompletionsArgs, Shell};

pub fn execute(args: CompletionsArgs) -> crate::error::CliResult<()> {
    let mut stdout = std::io::stdout();
    match args.shell {
        Shell::Bash => write_to(shells::Bash, &mut stdout),
        Shell::Zsh => write_to(shells::Zsh, &mut stdout),
        Shell::Fish => write_to(shells::Fish, &mut stdout),
        Shell::PowerShell => write_to(shells::PowerShell, &mut stdout),
        Shell::Elvish => write_to(shells::Elvish, &mut stdout),
    }
    Ok(())
}

fn write_to(shell: impl Generator, buf: &mut dyn std::io::Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "dateplus", buf);
}

//! Completions command implementation.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Where the script usually goes, printed as a comment on stderr.
fn install_hint(shell: Shell) -> Option<&'static str> {
    let hint = match shell {
        Shell::Bash => {
            "tablebook completions bash > ~/.local/share/bash-completion/completions/tablebook"
        }
        Shell::Zsh => "tablebook completions zsh > ~/.zsh/completions/_tablebook",
        Shell::Fish => "tablebook completions fish > ~/.config/fish/completions/tablebook.fish",
        Shell::PowerShell => "tablebook completions powershell | Out-String | Invoke-Expression",
        _ => return None,
    };
    Some(hint)
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if !global.quiet {
            if let Some(hint) = install_hint(self.shell) {
                eprintln!("# {hint}");
            }
        }

        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(self.shell, &mut cmd, name, &mut io::stdout());
        Ok(())
    }
}

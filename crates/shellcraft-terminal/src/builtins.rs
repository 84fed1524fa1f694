//! Built-in commands: help, clear-host, leave.

use shellcraft_types::error::Result;

use crate::interpreter::CommandOutput;
use crate::registry::{CommandRegistry, CommandSpec, Handler};

/// Alias of `clear-host`: the platform's usual clear command.
pub const CLEAR_ALIAS: &str = if cfg!(windows) { "cls" } else { "reset" };

/// Commands implemented by the shell itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// List every command with its aliases, parameters and description.
    Help,
    /// Clear the display (not the transcript).
    ClearHost,
    /// Stop the dispatch loop.
    Leave,
}

impl Builtin {
    pub fn run(self, registry: &CommandRegistry) -> CommandOutput {
        match self {
            Builtin::Help => CommandOutput::Text(registry.render_help()),
            Builtin::ClearHost => CommandOutput::Clear,
            Builtin::Leave => CommandOutput::Exit,
        }
    }
}

/// Register the built-in commands. `help` is skipped when `with_help` is
/// false.
pub fn register_builtins(reg: &mut CommandRegistry, with_help: bool) -> Result<()> {
    if with_help {
        reg.register(
            CommandSpec::new("help")
                .alias("?")
                .description("Displays info about terminal commands."),
            Handler::Builtin(Builtin::Help),
        )?;
    }
    reg.register(
        CommandSpec::new("clear-host")
            .alias(CLEAR_ALIAS)
            .description("Reset the display of the terminal."),
        Handler::Builtin(Builtin::ClearHost),
    )?;
    reg.register(
        CommandSpec::new("leave")
            .alias("exit")
            .description("Close the terminal."),
        Handler::Builtin(Builtin::Leave),
    )?;
    Ok(())
}

//! Interactive shell framework.
//!
//! A host registers commands with typed positional parameters into a
//! [`Shell`]. The shell runs a read-eval loop: it reads a line, resolves the
//! first token to a command by name or alias, coerces the remaining tokens to
//! the declared parameter types, invokes the handler, and renders its output
//! through a [`Screen`] that can animate text and keep a daily transcript.

mod builtins;
pub mod coerce;
pub mod console;
mod interpreter;
mod registry;
mod screen;
pub mod transcript;

/// Built-in commands (help, clear-host, leave).
pub use builtins::{Builtin, CLEAR_ALIAS, register_builtins};
/// Typed arguments handed to a handler.
pub use coerce::{Args, BoolMode};
/// Line-oriented terminal abstraction and its implementations.
pub use console::{Console, MemoryConsole, Terminal};
/// Fluent registration binder returned by [`Shell::command`].
pub use interpreter::CommandBuilder;
/// Output produced by a command.
pub use interpreter::CommandOutput;
/// Mutable context passed to every handler.
pub use interpreter::Environment;
/// Whether the dispatch loop keeps running.
pub use interpreter::Flow;
/// The shell: registry plus dispatch loop.
pub use interpreter::Shell;
/// Registered commands and their declarations.
pub use registry::{Command, CommandRegistry, CommandSpec, Handler, HandlerFn, Param};
/// Output/input front end with animation and transcript logging.
pub use screen::{EchoOptions, Screen};
/// Append-only transcript stores.
pub use transcript::{DailyFileTranscript, MemoryTranscript, TranscriptSink};

pub use shellcraft_types::config::ShellConfig;
pub use shellcraft_types::error::{Result, ShellError};
pub use shellcraft_types::value::{Complex, Kind, ParamType, Value};

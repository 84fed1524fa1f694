//! Error types for shellcraft.

use std::io;

use crate::value::Kind;

/// Errors produced by the shellcraft framework.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// An alias being registered is already used by another command.
    #[error("[{command}] alias \"{alias}\" is already used")]
    AliasConflict { command: String, alias: String },

    #[error("invalid command name: {0:?}")]
    InvalidName(String),

    #[error("invalid alias: {0:?}")]
    InvalidAlias(String),

    #[error("invalid parameter type: {0:?}")]
    InvalidType(String),

    /// No alternative of a declared parameter type accepted the token.
    #[error("[{label}] could not convert \"{token}\" to {}", join_kinds(.kinds))]
    TypeCoercion {
        label: String,
        token: String,
        kinds: Vec<Kind>,
    },

    #[error("[{label}] missing argument")]
    MissingArgument { label: String },

    #[error("[{label}] expected {expected}, got {found}")]
    ArgumentType {
        label: String,
        expected: Kind,
        found: Kind,
    },

    /// Failure reported by a host command handler.
    #[error("{0}")]
    Handler(String),

    /// The user aborted the current read (Ctrl-C).
    #[error("input interrupted")]
    Interrupted,

    #[error("transcript error: {0}")]
    Transcript(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShellError {
    /// Build a handler error from any displayable message.
    pub fn handler(msg: impl std::fmt::Display) -> Self {
        Self::Handler(msg.to_string())
    }

    /// Whether this error means the user interrupted input.
    pub fn is_interrupt(&self) -> bool {
        match self {
            Self::Interrupted => true,
            Self::Io(e) => e.kind() == io::ErrorKind::Interrupted,
            _ => false,
        }
    }
}

fn join_kinds(kinds: &[Kind]) -> String {
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;

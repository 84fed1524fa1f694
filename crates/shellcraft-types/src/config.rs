//! Shell configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Message shown when the typed command is not registered.
pub const DEFAULT_NOT_EXIST: &str =
    "This command does not exist.\nDo help to get the list of existing commands.";

/// Constructor-time configuration for a shell.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    /// Text shown before each read.
    pub prompt: String,
    /// Message echoed when a command is not found.
    pub not_exist: String,
    /// Write input and output to the transcript.
    pub logs: bool,
    /// Reveal output character by character.
    pub animation: bool,
    /// Delay between revealed characters, in milliseconds.
    pub cooldown: f64,
    /// Register the built-in `help` command.
    pub help_cmd: bool,
    /// Coerce `bool` parameters from words (`true`/`no`/`1`...) instead of
    /// treating every non-empty token as `true`.
    pub strict_bool: bool,
    /// Directory holding the daily transcript files.
    pub log_dir: PathBuf,
}

impl ShellConfig {
    /// The per-character delay as a [`Duration`]. Negative, NaN and
    /// infinite values mean no delay; values too large for a `Duration`
    /// saturate at [`Duration::MAX`].
    pub fn cooldown_duration(&self) -> Duration {
        if self.cooldown.is_finite() && self.cooldown > 0.0 {
            Duration::try_from_secs_f64(self.cooldown / 1000.0).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "shellcraft> ".to_string(),
            not_exist: DEFAULT_NOT_EXIST.to_string(),
            logs: true,
            animation: true,
            cooldown: 0.1,
            help_cmd: true,
            strict_bool: false,
            log_dir: PathBuf::from("latest"),
        }
    }
}

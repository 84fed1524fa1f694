//! shellcraft demo entry point.
//!
//! Starts an interactive shell on the terminal with a handful of sample
//! commands. Type `help` to list them and `exit` to quit. Ctrl-C abandons
//! the current line.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

use shellcraft_terminal::{DailyFileTranscript, Shell, ShellConfig, Terminal};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config_from_env();
    log::info!(
        "Starting shellcraft (logs: {}, dir: {})",
        config.logs,
        config.log_dir.display()
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("installing Ctrl-C handler")?;

    let transcript = DailyFileTranscript::new(config.log_dir.clone());
    let mut shell = Shell::with_io(
        config,
        Box::new(Terminal::with_interrupt(interrupted)),
        Box::new(transcript),
    )?;
    commands::register_demo_commands(&mut shell)?;

    shell.run()?;
    Ok(())
}

/// Default config with overrides from `SHELLCRAFT_PROMPT`,
/// `SHELLCRAFT_LOG_DIR`, `SHELLCRAFT_NO_ANIMATION` and `SHELLCRAFT_NO_LOGS`.
fn config_from_env() -> ShellConfig {
    let mut config = ShellConfig::default();
    if let Ok(prompt) = std::env::var("SHELLCRAFT_PROMPT") {
        config.prompt = prompt;
    }
    if let Ok(dir) = std::env::var("SHELLCRAFT_LOG_DIR") {
        config.log_dir = PathBuf::from(dir);
    }
    if std::env::var_os("SHELLCRAFT_NO_ANIMATION").is_some() {
        config.animation = false;
    }
    if std::env::var_os("SHELLCRAFT_NO_LOGS").is_some() {
        config.logs = false;
    }
    config
}

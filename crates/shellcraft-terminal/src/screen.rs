//! Output and input front end: animated echo, prompt, transcript logging.

use std::fmt::Display;
use std::thread;
use std::time::Duration;

use shellcraft_types::config::ShellConfig;
use shellcraft_types::error::Result;

use crate::console::Console;
use crate::transcript::TranscriptSink;

/// Options for a single [`Screen::echo_with`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct EchoOptions {
    /// Placed between values.
    pub sep: String,
    /// Written after every output line.
    pub end: String,
    /// Reveal each line character by character.
    pub animation: bool,
    /// Delay between revealed characters.
    pub cooldown: Duration,
    /// Write the whole output as one transcript entry.
    pub logs: bool,
}

impl Default for EchoOptions {
    fn default() -> Self {
        Self {
            sep: " ".to_string(),
            end: "\n".to_string(),
            animation: false,
            cooldown: Duration::ZERO,
            logs: false,
        }
    }
}

/// The shell's display: a [`Console`] plus a [`TranscriptSink`] and the
/// configured animation and logging defaults.
pub struct Screen {
    console: Box<dyn Console>,
    transcript: Box<dyn TranscriptSink>,
    animation: bool,
    cooldown: Duration,
    logs: bool,
}

impl Screen {
    pub fn new(
        console: Box<dyn Console>,
        transcript: Box<dyn TranscriptSink>,
        config: &ShellConfig,
    ) -> Self {
        Self {
            console,
            transcript,
            animation: config.animation,
            cooldown: config.cooldown_duration(),
            logs: config.logs,
        }
    }

    /// Echo options carrying this screen's defaults.
    pub fn options(&self) -> EchoOptions {
        EchoOptions {
            animation: self.animation,
            cooldown: self.cooldown,
            logs: self.logs,
            ..EchoOptions::default()
        }
    }

    /// Echo `text` with the screen's defaults.
    pub fn echo(&mut self, text: &str) -> Result<()> {
        let opts = self.options();
        let values: [&dyn Display; 1] = [&text];
        self.echo_with(&values, &opts)
    }

    /// Join `values` with `opts.sep` and write each resulting line followed
    /// by `opts.end`, revealing it first when animation is on.
    pub fn echo_with(&mut self, values: &[&dyn Display], opts: &EchoOptions) -> Result<()> {
        let output = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(&opts.sep);
        for line in output.split('\n') {
            if opts.animation {
                self.reveal(line, opts.cooldown)?;
            }
            self.console.write(line)?;
            self.console.write(&opts.end)?;
        }
        if opts.logs {
            self.write_log(&output);
        }
        Ok(())
    }

    /// Show `prompt` and read one reply. Returns `Ok(None)` at end of input.
    pub fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        if self.animation {
            for line in prompt.split('\n') {
                self.reveal(line, self.cooldown)?;
            }
        }
        self.console.write(prompt)?;
        let reply = self.console.read_line()?;
        if self.logs
            && let Some(reply) = &reply
        {
            self.write_log(reply);
        }
        Ok(reply)
    }

    /// Write `text` and a newline with no animation and no transcript entry.
    pub fn print(&mut self, text: &str) -> Result<()> {
        self.console.write(text)?;
        self.console.write("\n")?;
        Ok(())
    }

    /// Append a transcript entry. Failures are logged, never raised.
    pub fn write_log(&mut self, text: &str) {
        if let Err(e) = self.transcript.append(text) {
            log::warn!("transcript write failed: {e}");
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.console.clear()?;
        Ok(())
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.transcript.flush() {
            log::warn!("transcript flush failed: {e}");
        }
    }

    /// Redraw growing prefixes of `line`, returning the cursor each time.
    fn reveal(&mut self, line: &str, cooldown: Duration) -> Result<()> {
        let mut shown = String::with_capacity(line.len() + 1);
        for ch in line.chars() {
            shown.push(ch);
            self.console.write(&shown)?;
            self.console.write("\r")?;
            if !cooldown.is_zero() {
                thread::sleep(cooldown);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::MemoryConsole;
    use crate::transcript::MemoryTranscript;

    fn make_screen(
        lines: &[&str],
        animation: bool,
        logs: bool,
    ) -> (Screen, MemoryConsole, MemoryTranscript) {
        let console = MemoryConsole::new(lines.iter().copied());
        let transcript = MemoryTranscript::new();
        let config = ShellConfig {
            animation,
            logs,
            cooldown: 0.0,
            ..ShellConfig::default()
        };
        let screen = Screen::new(
            Box::new(console.clone()),
            Box::new(transcript.clone()),
            &config,
        );
        (screen, console, transcript)
    }

    #[test]
    fn echo_plain() {
        let (mut screen, console, transcript) = make_screen(&[], false, false);
        screen.echo("hello").unwrap();
        assert_eq!(console.written(), "hello\n");
        assert!(transcript.entries().is_empty());
    }

    #[test]
    fn echo_logs_whole_block_once() {
        let (mut screen, console, transcript) = make_screen(&[], false, true);
        screen.echo("a\nb").unwrap();
        assert_eq!(console.written(), "a\nb\n");
        assert_eq!(transcript.entries(), vec!["a\nb"]);
    }

    #[test]
    fn echo_animation_reveals_prefixes() {
        let (mut screen, console, _) = make_screen(&[], true, false);
        screen.echo("abc").unwrap();
        assert_eq!(console.written(), "a\rab\rabc\rabc\n");
    }

    #[test]
    fn echo_with_sep_and_end() {
        let (mut screen, console, transcript) = make_screen(&[], false, false);
        let opts = EchoOptions {
            sep: ", ".to_string(),
            end: "!\n".to_string(),
            logs: true,
            ..EchoOptions::default()
        };
        let values: [&dyn Display; 3] = [&1, &"two", &3.5];
        screen.echo_with(&values, &opts).unwrap();
        assert_eq!(console.written(), "1, two, 3.5!\n");
        assert_eq!(transcript.entries(), vec!["1, two, 3.5"]);
    }

    #[test]
    fn end_applies_to_every_line() {
        let (mut screen, console, _) = make_screen(&[], false, false);
        let opts = EchoOptions {
            end: ";".to_string(),
            ..EchoOptions::default()
        };
        let values: [&dyn Display; 1] = [&"x\ny"];
        screen.echo_with(&values, &opts).unwrap();
        assert_eq!(console.written(), "x;y;");
    }

    #[test]
    fn prompt_reads_and_logs_reply() {
        let (mut screen, console, transcript) = make_screen(&["add 1 2"], false, true);
        let reply = screen.prompt("> ").unwrap();
        assert_eq!(reply.as_deref(), Some("add 1 2"));
        assert_eq!(console.written(), "> ");
        assert_eq!(transcript.entries(), vec!["add 1 2"]);
    }

    #[test]
    fn prompt_animates_before_writing() {
        let (mut screen, console, _) = make_screen(&["x"], true, false);
        screen.prompt(">>").unwrap();
        assert_eq!(console.written(), ">\r>>\r>>");
    }

    #[test]
    fn prompt_at_end_of_input() {
        let (mut screen, _, transcript) = make_screen(&[], false, true);
        assert_eq!(screen.prompt("> ").unwrap(), None);
        assert!(transcript.entries().is_empty());
    }

    #[test]
    fn prompt_interrupt_is_reported() {
        let (mut screen, console, _) = make_screen(&[], false, false);
        console.push_interrupt();
        let err = screen.prompt("> ").unwrap_err();
        assert!(err.is_interrupt());
    }

    #[test]
    fn print_skips_transcript() {
        let (mut screen, console, transcript) = make_screen(&[], true, true);
        screen.print("oops").unwrap();
        assert_eq!(console.written(), "oops\n");
        assert!(transcript.entries().is_empty());
    }

    #[test]
    fn clear_goes_to_console() {
        let (mut screen, console, transcript) = make_screen(&[], false, true);
        screen.echo("x").unwrap();
        screen.clear().unwrap();
        assert_eq!(console.display(), "");
        assert_eq!(console.clear_count(), 1);
        assert_eq!(transcript.entries(), vec!["x"]);
    }
}

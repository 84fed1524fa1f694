//! The shell: registry ownership, registration binder, and the dispatch loop.

use shellcraft_types::config::ShellConfig;
use shellcraft_types::error::Result;
use shellcraft_types::value::ParamType;

use crate::builtins::register_builtins;
use crate::coerce::{Args, BoolMode, coerce_args};
use crate::console::{Console, Terminal};
use crate::registry::{CommandRegistry, CommandSpec, Handler};
use crate::screen::Screen;
use crate::transcript::{DailyFileTranscript, TranscriptSink};

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Text echoed through the screen (animated and logged per config).
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal to clear the display.
    Clear,
    /// Signal to stop the dispatch loop.
    Exit,
}

/// Shared mutable context passed to every handler.
pub struct Environment<'a> {
    /// The shell's display, for handlers that echo or prompt themselves.
    pub screen: &'a mut Screen,
}

impl Environment<'_> {
    /// Echo `text` with the shell's animation and logging settings.
    pub fn echo(&mut self, text: &str) -> Result<()> {
        self.screen.echo(text)
    }

    /// Ask the user a question. `Ok(None)` at end of input.
    pub fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        self.screen.prompt(question)
    }
}

/// Whether the dispatch loop keeps going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// An interactive shell: a command registry plus the read-eval loop.
pub struct Shell {
    config: ShellConfig,
    registry: CommandRegistry,
    screen: Screen,
}

impl Shell {
    /// A shell on stdin/stdout writing its transcript to `config.log_dir`.
    pub fn new(config: ShellConfig) -> Result<Self> {
        let transcript = DailyFileTranscript::new(config.log_dir.clone());
        Self::with_io(config, Box::new(Terminal::new()), Box::new(transcript))
    }

    /// A shell over the given console and transcript sink. Registers the
    /// built-in commands.
    pub fn with_io(
        config: ShellConfig,
        console: Box<dyn Console>,
        transcript: Box<dyn TranscriptSink>,
    ) -> Result<Self> {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry, config.help_cmd)?;
        let screen = Screen::new(console, transcript, &config);
        Ok(Self {
            config,
            registry,
            screen,
        })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn screen(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Start declaring a command called `name`; finish with
    /// [`CommandBuilder::register`].
    pub fn command(&mut self, name: impl Into<String>) -> CommandBuilder<'_> {
        CommandBuilder {
            registry: &mut self.registry,
            spec: CommandSpec::new(name),
        }
    }

    /// Register a fully built declaration with a host handler.
    pub fn register<F>(&mut self, spec: CommandSpec, handler: F) -> Result<()>
    where
        F: Fn(&Args, &mut Environment<'_>) -> Result<CommandOutput> + 'static,
    {
        self.registry.register(spec, Handler::host(handler))
    }

    /// Run the dispatch loop until `leave`/`exit` or end of input.
    ///
    /// Writes the command table to the transcript once on entry when logs
    /// are enabled. Command failures are displayed and never end the loop;
    /// only a failing console read does.
    pub fn run(&mut self) -> Result<()> {
        self.registry.sort_if_dirty();
        log::info!("shell started with {} commands", self.registry.len());
        if self.config.logs {
            let table = serde_json::to_string(&self.registry.specs())?;
            self.screen.write_log(&table);
        }

        let result = loop {
            match self.step() {
                Ok(Flow::Continue) => {},
                Ok(Flow::Exit) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        self.screen.flush();
        log::info!("shell stopped");
        result
    }

    /// One iteration: sort if needed, prompt, read, execute.
    ///
    /// Returns an error only when reading input fails for a reason other
    /// than an interrupt.
    pub fn step(&mut self) -> Result<Flow> {
        self.registry.sort_if_dirty();

        let line = match self.screen.prompt(&self.config.prompt) {
            Ok(Some(line)) => line,
            Ok(None) => {
                log::info!("end of input");
                return Ok(Flow::Exit);
            },
            Err(e) if e.is_interrupt() => {
                log::debug!("read interrupted");
                return Ok(Flow::Continue);
            },
            Err(e) => return Err(e),
        };

        match self.execute(&line) {
            Ok(flow) => Ok(flow),
            Err(e) if e.is_interrupt() => {
                log::debug!("command interrupted");
                Ok(Flow::Continue)
            },
            Err(e) => {
                log::debug!("command failed: {e}");
                if let Err(display_err) = self.screen.print(&e.to_string()) {
                    log::warn!("could not display error: {display_err}");
                }
                Ok(Flow::Continue)
            },
        }
    }

    /// Parse one input line, resolve it and invoke the command.
    ///
    /// The first whitespace-separated token, lowercased, selects the
    /// command; the remaining tokens are coerced to its parameters. An
    /// unknown command echoes the configured not-found message. Errors from
    /// coercion or the handler are returned to the caller.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            return Ok(Flow::Continue);
        };
        let name = first.to_lowercase();
        let raw_args: Vec<&str> = tokens.collect();

        let Some(cmd) = self.registry.lookup(&name) else {
            log::debug!("unknown command: {name}");
            self.screen.echo(&self.config.not_exist)?;
            return Ok(Flow::Continue);
        };

        let bools = if self.config.strict_bool {
            BoolMode::Strict
        } else {
            BoolMode::Truthy
        };
        let args = coerce_args(cmd.spec().params(), &raw_args, bools)?;
        log::debug!("dispatching {} with {} args", cmd.name(), args.len());

        let output = match cmd.handler() {
            Handler::Builtin(builtin) => builtin.run(&self.registry),
            Handler::Host(handler) => handler(
                &args,
                &mut Environment {
                    screen: &mut self.screen,
                },
            )?,
        };
        self.render(output)
    }

    fn render(&mut self, output: CommandOutput) -> Result<Flow> {
        match output {
            CommandOutput::Text(text) => {
                if !text.is_empty() {
                    self.screen.echo(&text)?;
                }
            },
            CommandOutput::None => {},
            CommandOutput::Clear => self.screen.clear()?,
            CommandOutput::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }
}

/// Registration binder returned by [`Shell::command`].
pub struct CommandBuilder<'a> {
    registry: &'a mut CommandRegistry,
    spec: CommandSpec,
}

impl CommandBuilder<'_> {
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.spec = self.spec.description(text);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.spec = self.spec.alias(alias);
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec = self.spec.aliases(aliases);
        self
    }

    pub fn param(mut self, label: impl Into<String>, ty: impl Into<ParamType>) -> Self {
        self.spec = self.spec.param(label, ty);
        self
    }

    /// Bind `handler` and register the command.
    pub fn register<F>(self, handler: F) -> Result<()>
    where
        F: Fn(&Args, &mut Environment<'_>) -> Result<CommandOutput> + 'static,
    {
        self.registry.register(self.spec, Handler::host(handler))
    }
}

//! Command declarations and the registry that holds them.

use std::fmt;

use serde::Serialize;
use shellcraft_types::error::{Result, ShellError};
use shellcraft_types::value::ParamType;

use crate::builtins::Builtin;
use crate::coerce::Args;
use crate::interpreter::{CommandOutput, Environment};

/// Signature of a host command handler.
pub type HandlerFn = dyn Fn(&Args, &mut Environment<'_>) -> Result<CommandOutput>;

/// What runs when a command is invoked.
pub enum Handler {
    /// Implemented by the shell itself (needs registry access).
    Builtin(Builtin),
    /// Host-supplied callable.
    Host(Box<HandlerFn>),
}

impl Handler {
    pub fn host<F>(f: F) -> Self
    where
        F: Fn(&Args, &mut Environment<'_>) -> Result<CommandOutput> + 'static,
    {
        Self::Host(Box::new(f))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(b) => f.debug_tuple("Builtin").field(b).finish(),
            Self::Host(_) => f.write_str("Host(..)"),
        }
    }
}

/// A declared positional parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    /// Shown in help as `[label]`.
    pub label: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

impl Param {
    pub fn new(label: impl Into<String>, ty: impl Into<ParamType>) -> Self {
        Self {
            label: label.into(),
            ty: ty.into(),
        }
    }
}

/// Declaration of a command: name, description, aliases, parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandSpec {
    name: String,
    aliases: Vec<String>,
    params: Vec<Param>,
    description: Option<String>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn param(mut self, label: impl Into<String>, ty: impl Into<ParamType>) -> Self {
        self.params.push(Param::new(label, ty));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases_list(&self) -> &[String] {
        &self.aliases
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether `token` (already lowercased) names this command.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|a| a == token)
    }

    /// `name [p1] [p2]`.
    pub fn usage(&self) -> String {
        let mut out = self.name.clone();
        for p in &self.params {
            out.push_str(&format!(" [{}]", p.label));
        }
        out
    }

    /// One line of `help` output:
    /// `Alias    a, b -> name [p1] [p2] description`.
    pub fn help_line(&self) -> String {
        let mut line = format!("Alias    {} -> {}", self.aliases.join(", "), self.usage());
        if let Some(desc) = self.description.as_deref().filter(|d| !d.is_empty()) {
            line.push(' ');
            line.push_str(desc);
        }
        line
    }

    /// Lowercase the name (spaces become `_`), lowercase and dedupe aliases.
    fn normalized(mut self) -> Result<Self> {
        self.name = normalize_name(&self.name)?;
        let mut aliases: Vec<String> = Vec::with_capacity(self.aliases.len());
        for alias in &self.aliases {
            let alias = alias.to_lowercase();
            if alias.is_empty() || alias.chars().any(char::is_whitespace) {
                return Err(ShellError::InvalidAlias(alias));
            }
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
        self.aliases = aliases;
        Ok(self)
    }
}

/// Normalize a command name: lowercase, spaces replaced with `_`.
pub fn normalize_name(name: &str) -> Result<String> {
    let normalized = name.to_lowercase().replace(' ', "_");
    if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
        return Err(ShellError::InvalidName(name.to_string()));
    }
    Ok(normalized)
}

/// A registered command.
#[derive(Debug)]
pub struct Command {
    spec: CommandSpec,
    handler: Handler,
}

impl Command {
    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }
}

/// Ordered set of commands with unique names and globally unique aliases.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    /// Set by registration; cleared by [`CommandRegistry::sort_if_dirty`].
    dirty: bool,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any existing command with the same
    /// name at its current position.
    ///
    /// Fails without touching the registry if the name is invalid or any
    /// alias is already used by a registered command, including the one
    /// being replaced.
    pub fn register(&mut self, spec: CommandSpec, handler: Handler) -> Result<()> {
        let spec = spec.normalized()?;

        for existing in &self.commands {
            for alias in &spec.aliases {
                if existing.spec.aliases.contains(alias) {
                    return Err(ShellError::AliasConflict {
                        command: existing.spec.name.clone(),
                        alias: alias.clone(),
                    });
                }
            }
        }

        let name = spec.name.clone();
        let command = Command { spec, handler };
        match self.position(&name) {
            Some(idx) => {
                log::debug!("replacing command {name} at {idx}");
                self.commands[idx] = command;
            },
            None => {
                log::debug!("registering command {name}");
                self.commands.push(command);
            },
        }
        self.dirty = true;
        Ok(())
    }

    /// First command, in current order, whose name or alias is `token`.
    pub fn lookup(&self, token: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.spec.matches(token))
    }

    /// Look up by normalized name only.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.spec.name == name)
    }

    /// Current index of the command called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.commands.iter().position(|c| c.spec.name == name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Sort by name if a registration changed the set since the last sort.
    pub fn sort_if_dirty(&mut self) {
        if self.dirty {
            self.commands.sort_by(|a, b| a.spec.name.cmp(&b.spec.name));
            self.dirty = false;
        }
    }

    /// Declarations in current order.
    pub fn specs(&self) -> Vec<&CommandSpec> {
        self.commands.iter().map(|c| &c.spec).collect()
    }

    /// Help text: one line per command, sorted by name.
    pub fn render_help(&self) -> String {
        let mut specs = self.specs();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
            .iter()
            .map(|s| s.help_line())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

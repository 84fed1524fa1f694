//! Sample commands registered by the demo binary.

use shellcraft_terminal::{CommandOutput, Kind, Result, Shell, ShellError, Value};

/// Register the demo command set into `shell`.
pub fn register_demo_commands(shell: &mut Shell) -> Result<()> {
    shell
        .command("add")
        .alias("+")
        .param("a", Kind::Int | Kind::Float)
        .param("b", Kind::Int | Kind::Float)
        .description("Add two numbers.")
        .register(|args, _| {
            let sum = match (args.value(0)?, args.value(1)?) {
                (Value::Int(a), Value::Int(b)) => a
                    .checked_add(*b)
                    .map(Value::Int)
                    .ok_or_else(|| ShellError::handler("integer overflow"))?,
                _ => Value::Float(args.float(0)? + args.float(1)?),
            };
            Ok(CommandOutput::Text(sum.to_string()))
        })?;

    shell
        .command("div")
        .param("a", Kind::Float)
        .param("b", Kind::Float)
        .description("Divide a by b.")
        .register(|args, _| {
            let b = args.float(1)?;
            if b == 0.0 {
                return Err(ShellError::handler("division by zero"));
            }
            Ok(CommandOutput::Text((args.float(0)? / b).to_string()))
        })?;

    shell
        .command("conj")
        .param("z", Kind::Complex)
        .description("Complex conjugate.")
        .register(|args, _| {
            let z = args.complex(0)?;
            let conj = shellcraft_terminal::Complex::new(z.re, -z.im);
            Ok(CommandOutput::Text(conj.to_string()))
        })?;

    shell
        .command("hex")
        .param("data", Kind::Bytes)
        .description("Hex dump of the argument's bytes.")
        .register(|args, _| {
            let hex: Vec<String> = args.bytes(0)?.iter().map(|b| format!("{b:02x}")).collect();
            Ok(CommandOutput::Text(hex.join(" ")))
        })?;

    shell
        .command("flag")
        .param("value", Kind::Bool)
        .description("Show how a token reads as a boolean.")
        .register(|args, _| Ok(CommandOutput::Text(args.bool(0)?.to_string())))?;

    shell
        .command("greet")
        .alias("hello")
        .param("name", Kind::Any)
        .description("Say hello, asking for a name if none is given.")
        .register(|args, env| {
            let name = match args.get(0) {
                Some(v) => v.to_string(),
                None => env.prompt("What's your name? ")?.unwrap_or_default(),
            };
            Ok(CommandOutput::Text(format!("Hello {name}!")))
        })?;

    Ok(())
}

//! Argument kinds, declared parameter types, and coerced values.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{Result, ShellError};

/// A primitive argument kind a parameter can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "complex")]
    Complex,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "bytes")]
    Bytes,
    /// Mutable byte buffer.
    #[serde(rename = "bytearray")]
    ByteBuffer,
    /// Passthrough string.
    #[serde(rename = "str")]
    Any,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 7] = [
        Kind::Int,
        Kind::Float,
        Kind::Complex,
        Kind::Bool,
        Kind::Bytes,
        Kind::ByteBuffer,
        Kind::Any,
    ];

    /// Short name used in help text, errors and the textual type syntax.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Complex => "complex",
            Kind::Bool => "bool",
            Kind::Bytes => "bytes",
            Kind::ByteBuffer => "bytearray",
            Kind::Any => "str",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(Kind::Int),
            "float" => Ok(Kind::Float),
            "complex" => Ok(Kind::Complex),
            "bool" | "boolean" => Ok(Kind::Bool),
            "bytes" => Ok(Kind::Bytes),
            "bytearray" => Ok(Kind::ByteBuffer),
            "str" | "string" | "any" => Ok(Kind::Any),
            _ => Err(ShellError::InvalidType(s.to_string())),
        }
    }
}

/// Declared type of a parameter: an ordered, non-empty alternation of kinds.
///
/// Coercion tries the kinds left to right, so `Kind::Int | Kind::Float`
/// turns `"3"` into an integer and `"3.5"` into a float.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamType {
    kinds: Vec<Kind>,
}

impl ParamType {
    pub fn kinds(&self) -> &[Kind] {
        &self.kinds
    }

    /// Append an alternative unless it is already present.
    fn push(&mut self, kind: Kind) {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }
}

impl Default for ParamType {
    fn default() -> Self {
        Kind::Any.into()
    }
}

impl From<Kind> for ParamType {
    fn from(kind: Kind) -> Self {
        Self { kinds: vec![kind] }
    }
}

impl BitOr for Kind {
    type Output = ParamType;

    fn bitor(self, rhs: Kind) -> ParamType {
        let mut ty = ParamType::from(self);
        ty.push(rhs);
        ty
    }
}

impl BitOr<Kind> for ParamType {
    type Output = ParamType;

    fn bitor(mut self, rhs: Kind) -> ParamType {
        self.push(rhs);
        self
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

impl FromStr for ParamType {
    type Err = ShellError;

    /// Parse the textual form, e.g. `"int | float"`.
    fn from_str(s: &str) -> Result<Self> {
        let mut ty: Option<ParamType> = None;
        for part in s.split('|') {
            let kind: Kind = part.parse().map_err(|_| ShellError::InvalidType(s.to_string()))?;
            match ty.as_mut() {
                Some(t) => t.push(kind),
                None => ty = Some(kind.into()),
            }
        }
        ty.ok_or_else(|| ShellError::InvalidType(s.to_string()))
    }
}

impl Serialize for ParamType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A complex number with `f64` parts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.re == 0.0 && !self.re.is_sign_negative() {
            return write!(f, "{}j", self.im);
        }
        let sign = if self.im.is_sign_negative() { '-' } else { '+' };
        write!(f, "({}{}{}j)", self.re, sign, self.im.abs())
    }
}

impl FromStr for Complex {
    type Err = ShellError;

    /// Parse `a`, `bj`, `a+bj` or `a-bj`, optionally wrapped in parentheses.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ShellError::InvalidType(format!("complex: {s}"));
        let mut body = s.trim();
        if let Some(inner) = body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
            body = inner.trim();
        }
        if body.is_empty() {
            return Err(invalid());
        }

        let Some(imag) = body.strip_suffix(['j', 'J']) else {
            let re = body.parse::<f64>().map_err(|_| invalid())?;
            return Ok(Complex::new(re, 0.0));
        };

        // Split at the last sign that is not an exponent sign.
        let bytes = imag.as_bytes();
        let split = (1..bytes.len()).rev().find(|&i| {
            matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E')
        });
        let (re, im) = match split {
            Some(i) => (
                imag[..i].parse::<f64>().map_err(|_| invalid())?,
                parse_imaginary(&imag[i..]).ok_or_else(invalid)?,
            ),
            None => (0.0, parse_imaginary(imag).ok_or_else(invalid)?),
        };
        Ok(Complex::new(re, im))
    }
}

fn parse_imaginary(s: &str) -> Option<f64> {
    match s {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => s.parse().ok(),
    }
}

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Complex(Complex),
    Bool(bool),
    Bytes(Vec<u8>),
    ByteBuffer(Vec<u8>),
    Str(String),
}

impl Value {
    /// The kind this value was coerced as.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Complex(_) => Kind::Complex,
            Value::Bool(_) => Kind::Bool,
            Value::Bytes(_) => Kind::Bytes,
            Value::ByteBuffer(_) => Kind::ByteBuffer,
            Value::Str(_) => Kind::Any,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Complex(c) => write!(f, "{c}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Bytes(b) | Value::ByteBuffer(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::Str(s) => f.write_str(s),
        }
    }
}

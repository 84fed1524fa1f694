//! Type-directed argument coercion.
//!
//! Each declared parameter type is an ordered alternation of [`Kind`]s. A
//! token is converted by the first kind that accepts it; if none does, the
//! whole invocation is rejected with [`ShellError::TypeCoercion`].

use std::borrow::Cow;

use shellcraft_types::error::{Result, ShellError};
use shellcraft_types::value::{Complex, Kind, Value};

use crate::registry::Param;

/// How `bool` parameters read their token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolMode {
    /// Any non-empty token is `true`, including `"false"` and `"0"`.
    #[default]
    Truthy,
    /// `true/yes/on/1` and `false/no/off/0`, case-insensitive; anything
    /// else is rejected.
    Strict,
}

/// Convert one token as `kind`, or `None` if the kind rejects it.
pub fn convert(kind: Kind, token: &str, bools: BoolMode) -> Option<Value> {
    match kind {
        Kind::Int => parse_int(token).map(Value::Int),
        Kind::Float => parse_float(token).map(Value::Float),
        Kind::Complex => token.parse::<Complex>().ok().map(Value::Complex),
        Kind::Bool => parse_bool(token, bools).map(Value::Bool),
        Kind::Bytes => Some(Value::Bytes(token.as_bytes().to_vec())),
        Kind::ByteBuffer => Some(Value::ByteBuffer(token.as_bytes().to_vec())),
        Kind::Any => Some(Value::Str(token.to_string())),
    }
}

/// Convert `token` for `param`, trying its kinds left to right.
pub fn coerce_token(param: &Param, token: &str, bools: BoolMode) -> Result<Value> {
    let kinds = param.ty.kinds();
    kinds
        .iter()
        .find_map(|&kind| convert(kind, token, bools))
        .ok_or_else(|| ShellError::TypeCoercion {
            label: param.label.clone(),
            token: token.to_string(),
            kinds: kinds.to_vec(),
        })
}

/// Coerce the tokens following a command name against its parameters.
///
/// Tokens past the last parameter are ignored. Fewer tokens than
/// parameters is not an error here; the handler sees the shortfall through
/// [`Args`].
pub fn coerce_args(params: &[Param], tokens: &[&str], bools: BoolMode) -> Result<Args> {
    let values = params
        .iter()
        .zip(tokens)
        .map(|(param, token)| coerce_token(param, token, bools))
        .collect::<Result<Vec<_>>>()?;
    Ok(Args {
        values,
        labels: params.iter().map(|p| p.label.clone()).collect(),
    })
}

fn parse_int(token: &str) -> Option<i64> {
    strip_digit_separators(token)?.parse().ok()
}

fn parse_float(token: &str) -> Option<f64> {
    strip_digit_separators(token)?.parse().ok()
}

fn parse_bool(token: &str, mode: BoolMode) -> Option<bool> {
    match mode {
        BoolMode::Truthy => Some(!token.is_empty()),
        BoolMode::Strict => match token.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
    }
}

/// Remove `_` digit separators. Each one must sit between two ASCII digits.
fn strip_digit_separators(token: &str) -> Option<Cow<'_, str>> {
    if !token.contains('_') {
        return Some(Cow::Borrowed(token));
    }
    let bytes = token.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let before = i.checked_sub(1).map(|j| bytes[j]);
            let after = bytes.get(i + 1).copied();
            let between_digits = before.is_some_and(|c| c.is_ascii_digit())
                && after.is_some_and(|c| c.is_ascii_digit());
            if !between_digits {
                return None;
            }
        }
    }
    Some(Cow::Owned(token.replace('_', "")))
}

/// Positional arguments after coercion.
///
/// Holds at most one value per declared parameter. Accessors fail with
/// [`ShellError::MissingArgument`] when the user supplied fewer tokens, and
/// with [`ShellError::ArgumentType`] when the value has a different kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<Value>,
    labels: Vec<String>,
}

impl Args {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// The value at `index`, or a missing-argument error naming its label.
    pub fn value(&self, index: usize) -> Result<&Value> {
        self.values
            .get(index)
            .ok_or_else(|| ShellError::MissingArgument {
                label: self.label(index),
            })
    }

    pub fn int(&self, index: usize) -> Result<i64> {
        match self.value(index)? {
            Value::Int(n) => Ok(*n),
            other => Err(self.mismatch(index, Kind::Int, other)),
        }
    }

    /// A float; integers are widened.
    pub fn float(&self, index: usize) -> Result<f64> {
        match self.value(index)? {
            Value::Float(x) => Ok(*x),
            Value::Int(n) => Ok(*n as f64),
            other => Err(self.mismatch(index, Kind::Float, other)),
        }
    }

    /// A complex number; integers and floats are widened.
    pub fn complex(&self, index: usize) -> Result<Complex> {
        match self.value(index)? {
            Value::Complex(c) => Ok(*c),
            Value::Float(x) => Ok(Complex::new(*x, 0.0)),
            Value::Int(n) => Ok(Complex::new(*n as f64, 0.0)),
            other => Err(self.mismatch(index, Kind::Complex, other)),
        }
    }

    pub fn bool(&self, index: usize) -> Result<bool> {
        match self.value(index)? {
            Value::Bool(b) => Ok(*b),
            other => Err(self.mismatch(index, Kind::Bool, other)),
        }
    }

    /// The bytes of a `bytes` or `bytearray` argument.
    pub fn bytes(&self, index: usize) -> Result<&[u8]> {
        match self.value(index)? {
            Value::Bytes(b) | Value::ByteBuffer(b) => Ok(b),
            other => Err(self.mismatch(index, Kind::Bytes, other)),
        }
    }

    pub fn str(&self, index: usize) -> Result<&str> {
        match self.value(index)? {
            Value::Str(s) => Ok(s),
            other => Err(self.mismatch(index, Kind::Any, other)),
        }
    }

    fn label(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("#{index}"))
    }

    fn mismatch(&self, index: usize, expected: Kind, found: &Value) -> ShellError {
        ShellError::ArgumentType {
            label: self.label(index),
            expected,
            found: found.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shellcraft_types::value::ParamType;

    fn param(label: &str, ty: impl Into<ParamType>) -> Param {
        Param::new(label, ty)
    }

    #[test]
    fn int_or_float_prefers_int() {
        let p = param("n", Kind::Int | Kind::Float);
        assert_eq!(coerce_token(&p, "3", BoolMode::Truthy).unwrap(), Value::Int(3));
        assert_eq!(
            coerce_token(&p, "3.5", BoolMode::Truthy).unwrap(),
            Value::Float(3.5)
        );
    }

    #[test]
    fn float_or_int_prefers_float() {
        let p = param("n", Kind::Float | Kind::Int);
        assert_eq!(
            coerce_token(&p, "3", BoolMode::Truthy).unwrap(),
            Value::Float(3.0)
        );
    }

    #[test]
    fn int_rejects_word() {
        let p = param("n", Kind::Int);
        match coerce_token(&p, "abc", BoolMode::Truthy) {
            Err(ShellError::TypeCoercion {
                label,
                token,
                kinds,
            }) => {
                assert_eq!(label, "n");
                assert_eq!(token, "abc");
                assert_eq!(kinds, vec![Kind::Int]);
            },
            other => panic!("expected TypeCoercion, got {other:?}"),
        }
    }

    #[test]
    fn error_names_every_attempted_kind() {
        let p = param("n", Kind::Int | Kind::Float | Kind::Complex);
        let err = coerce_token(&p, "x", BoolMode::Truthy).unwrap_err();
        assert!(err.to_string().contains("int or float or complex"));
    }

    #[test]
    fn int_syntax() {
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("-12"), Some(-12));
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("3.0"), None);
        assert_eq!(parse_int("_1"), None);
        assert_eq!(parse_int("1__0"), None);
        assert_eq!(parse_int("1_"), None);
        assert_eq!(parse_int("99999999999999999999"), None);
    }

    #[test]
    fn float_syntax() {
        assert_eq!(parse_float("2.5"), Some(2.5));
        assert_eq!(parse_float("1e3"), Some(1000.0));
        assert_eq!(parse_float("1_0.5"), Some(10.5));
        assert_eq!(parse_float("inf"), Some(f64::INFINITY));
        assert!(parse_float("nan").is_some_and(f64::is_nan));
        assert_eq!(parse_float("1.2.3"), None);
    }

    #[test]
    fn truthy_bool_accepts_any_nonempty_token() {
        let p = param("flag", Kind::Bool);
        for token in ["true", "false", "0", "no", "x"] {
            assert_eq!(
                coerce_token(&p, token, BoolMode::Truthy).unwrap(),
                Value::Bool(true),
                "token {token}"
            );
        }
        assert_eq!(parse_bool("", BoolMode::Truthy), Some(false));
    }

    #[test]
    fn strict_bool_reads_words() {
        let p = param("flag", Kind::Bool);
        assert_eq!(
            coerce_token(&p, "FALSE", BoolMode::Strict).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            coerce_token(&p, "on", BoolMode::Strict).unwrap(),
            Value::Bool(true)
        );
        assert!(coerce_token(&p, "maybe", BoolMode::Strict).is_err());
    }

    #[test]
    fn strict_bool_falls_through_to_next_kind() {
        let p = param("v", Kind::Bool | Kind::Any);
        assert_eq!(
            coerce_token(&p, "maybe", BoolMode::Strict).unwrap(),
            Value::Str("maybe".into())
        );
    }

    #[test]
    fn bytes_and_buffers_take_utf8() {
        assert_eq!(
            convert(Kind::Bytes, "hé", BoolMode::Truthy),
            Some(Value::Bytes("hé".as_bytes().to_vec()))
        );
        assert_eq!(
            convert(Kind::ByteBuffer, "ab", BoolMode::Truthy),
            Some(Value::ByteBuffer(b"ab".to_vec()))
        );
    }

    #[test]
    fn complex_kind() {
        assert_eq!(
            convert(Kind::Complex, "1+2j", BoolMode::Truthy),
            Some(Value::Complex(Complex::new(1.0, 2.0)))
        );
        assert_eq!(convert(Kind::Complex, "one", BoolMode::Truthy), None);
    }

    #[test]
    fn any_passes_through() {
        assert_eq!(
            convert(Kind::Any, "Hello", BoolMode::Truthy),
            Some(Value::Str("Hello".into()))
        );
    }

    #[test]
    fn extra_tokens_are_ignored() {
        let params = vec![param("a", Kind::Int)];
        let args = coerce_args(&params, &["1", "2", "3"], BoolMode::Truthy).unwrap();
        assert_eq!(args.values(), &[Value::Int(1)]);
    }

    #[test]
    fn fewer_tokens_yield_fewer_args() {
        let params = vec![param("a", Kind::Int), param("b", Kind::Int)];
        let args = coerce_args(&params, &["1"], BoolMode::Truthy).unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args.int(0).unwrap(), 1);
        match args.int(1) {
            Err(ShellError::MissingArgument { label }) => assert_eq!(label, "b"),
            other => panic!("expected MissingArgument, got {other:?}"),
        }
    }

    #[test]
    fn first_bad_token_aborts() {
        let params = vec![param("a", Kind::Int), param("b", Kind::Int)];
        let err = coerce_args(&params, &["1", "two"], BoolMode::Truthy).unwrap_err();
        assert!(matches!(err, ShellError::TypeCoercion { ref token, .. } if token == "two"));
    }

    #[test]
    fn no_params_no_args() {
        let args = coerce_args(&[], &["ignored"], BoolMode::Truthy).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn accessors_widen_numbers() {
        let params = vec![param("a", Kind::Int), param("b", Kind::Float)];
        let args = coerce_args(&params, &["2", "0.5"], BoolMode::Truthy).unwrap();
        assert_eq!(args.float(0).unwrap(), 2.0);
        assert_eq!(args.complex(1).unwrap(), Complex::new(0.5, 0.0));
    }

    #[test]
    fn accessor_kind_mismatch() {
        let params = vec![param("name", Kind::Any)];
        let args = coerce_args(&params, &["bob"], BoolMode::Truthy).unwrap();
        assert_eq!(args.str(0).unwrap(), "bob");
        match args.int(0) {
            Err(ShellError::ArgumentType {
                label,
                expected,
                found,
            }) => {
                assert_eq!(label, "name");
                assert_eq!(expected, Kind::Int);
                assert_eq!(found, Kind::Any);
            },
            other => panic!("expected ArgumentType, got {other:?}"),
        }
    }

    #[test]
    fn unlabeled_index_is_numbered() {
        let args = Args::default();
        match args.value(2) {
            Err(ShellError::MissingArgument { label }) => assert_eq!(label, "#2"),
            other => panic!("expected MissingArgument, got {other:?}"),
        }
    }
}

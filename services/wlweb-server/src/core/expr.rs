//! Wolfram Language expression model
//!
//! `Expr` is a small expression tree that renders to single-line,
//! ASCII-only InputForm text suitable for the kernel's text interface.
//!
//! # Example
//!
//! ```
//! use wlweb::core::expr::Expr;
//!
//! let expr = Expr::call("Get", vec![Expr::string("init.wl")]);
//! assert_eq!(expr.to_string(), r#"Get["init.wl"]"#);
//! ```

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// A Wolfram Language expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A symbol such as `Null` or `System`Get`
    Symbol(String),
    /// Machine integer
    Integer(i64),
    /// Machine real
    Real(f64),
    /// String literal
    String(String),
    /// Binary data, rendered as `ByteArray`
    Bytes(Vec<u8>),
    /// Input-form source text, parsed by the kernel
    Raw(String),
    /// `head[args...]`
    Normal { head: Box<Expr>, args: Vec<Expr> },
}

impl Expr {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::String(value.into())
    }

    pub fn integer(value: i64) -> Self {
        Expr::Integer(value)
    }

    pub fn real(value: f64) -> Self {
        Expr::Real(value)
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Expr::Bytes(value.into())
    }

    /// Kernel source text, the equivalent of `wlexpr`
    pub fn raw(source: impl Into<String>) -> Self {
        Expr::Raw(source.into())
    }

    /// `head[args...]` with a symbol head
    pub fn call(head: &str, args: Vec<Expr>) -> Self {
        Expr::Normal {
            head: Box::new(Expr::symbol(head)),
            args,
        }
    }

    /// `head[args...]` with an arbitrary head expression
    pub fn apply(head: Expr, args: Vec<Expr>) -> Self {
        Expr::Normal {
            head: Box::new(head),
            args,
        }
    }

    pub fn list(items: Vec<Expr>) -> Self {
        Expr::call("List", items)
    }

    pub fn rule(key: impl Into<Expr>, value: impl Into<Expr>) -> Self {
        Expr::call("Rule", vec![key.into(), value.into()])
    }

    /// `Association[key -> value, ...]`
    pub fn association<K, V, I>(entries: I) -> Self
    where
        K: Into<Expr>,
        V: Into<Expr>,
        I: IntoIterator<Item = (K, V)>,
    {
        Expr::call(
            "Association",
            entries
                .into_iter()
                .map(|(k, v)| Expr::rule(k, v))
                .collect(),
        )
    }

    /// Name of the head when it is a symbol
    pub fn head_name(&self) -> Option<&str> {
        match self {
            Expr::Normal { head, .. } => match head.as_ref() {
                Expr::Symbol(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    /// Arguments of a normal expression, empty for atoms
    pub fn args(&self) -> &[Expr] {
        match self {
            Expr::Normal { args, .. } => args,
            _ => &[],
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a string key in an `Association` or a list of rules
    pub fn lookup(&self, key: &str) -> Option<&Expr> {
        match self.head_name() {
            Some("Association") | Some("List") => {}
            _ => return None,
        }

        self.args().iter().find_map(|entry| {
            if !matches!(entry.head_name(), Some("Rule") | Some("RuleDelayed")) {
                return None;
            }
            match entry.args() {
                [k, v] if k.as_str() == Some(key) => Some(v),
                _ => None,
            }
        })
    }

    /// Depth-first search for the first subexpression with the given head
    pub fn find_head(&self, name: &str) -> Option<&Expr> {
        if self.head_name() == Some(name) {
            return Some(self);
        }
        if let Expr::Normal { head, args } = self {
            if let Some(found) = head.find_head(name) {
                return Some(found);
            }
            return args.iter().find_map(|arg| arg.find_head(name));
        }
        None
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::String(value.to_string())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::String(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Integer(value)
    }
}

impl From<u16> for Expr {
    fn from(value: u16) -> Self {
        Expr::Integer(i64::from(value))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Real(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::symbol(if value { "True" } else { "False" })
    }
}

/// Write a string literal with InputForm escapes, ASCII only
pub fn write_string_literal(f: &mut impl fmt::Write, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_ascii() && !c.is_ascii_control() => f.write_char(c)?,
            c if (c as u32) <= 0xFFFF => write!(f, "\\:{:04x}", c as u32)?,
            c => write!(f, "\\|{:06x}", c as u32)?,
        }
    }
    f.write_char('"')
}

fn write_real(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("Indeterminate");
    }
    if value.is_infinite() {
        let sign = if value > 0.0 { 1 } else { -1 };
        return write!(f, "DirectedInfinity[{sign}]");
    }

    // Debug keeps a decimal point and round-trips, `e` becomes `*^`
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => write!(f, "{mantissa}*^{exponent}"),
        None => f.write_str(&repr),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Symbol(name) => f.write_str(name),
            Expr::Integer(value) => write!(f, "{value}"),
            Expr::Real(value) => write_real(f, *value),
            Expr::String(value) => write_string_literal(f, value),
            Expr::Bytes(value) if value.is_empty() => f.write_str("ByteArray[{}]"),
            Expr::Bytes(value) => write!(f, "ByteArray[\"{}\"]", STANDARD.encode(value)),
            Expr::Raw(source) => {
                f.write_str("ReleaseHold[ToExpression[")?;
                write_string_literal(f, source)?;
                f.write_str(", InputForm, Hold]]")
            }
            Expr::Normal { head, args } => {
                write!(f, "{head}[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str("]")
            }
        }
    }
}

//! Typed value cells.
//!
//! A [`ValueCell`] owns the current value of one flag together with the rules
//! for parsing raw text into it and formatting it back out. The set of kinds is
//! closed, so the resolver and renderer can treat every flag uniformly through
//! [`set_from_text`](ValueCell::set_from_text) and
//! [`current_text`](ValueCell::current_text).

use std::fmt;
use std::time::Duration;

use crate::tokenize::{self, ListMode};

/// A named integer constant accepted by an enumeration flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub name: String,
    pub value: i64,
}

impl Choice {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Callback fired by a trigger flag.
pub type Callback = Box<dyn FnMut()>;

/// The current value of a flag and how to parse it.
pub enum ValueCell {
    String(String),
    List {
        items: Vec<String>,
        mode: ListMode,
        /// Whether any explicit assignment has replaced the default yet.
        touched: bool,
    },
    Int(i64),
    Bool(bool),
    Duration(Duration),
    Enum {
        current: i64,
        choices: Vec<Choice>,
    },
    Trigger {
        fired: bool,
        callback: Callback,
    },
}

impl fmt::Debug for ValueCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueCell::String(s) => f.debug_tuple("String").field(s).finish(),
            ValueCell::List { items, mode, .. } => f
                .debug_struct("List")
                .field("items", items)
                .field("mode", mode)
                .finish(),
            ValueCell::Int(i) => f.debug_tuple("Int").field(i).finish(),
            ValueCell::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            ValueCell::Duration(d) => f.debug_tuple("Duration").field(d).finish(),
            ValueCell::Enum { current, choices } => f
                .debug_struct("Enum")
                .field("current", current)
                .field("choices", choices)
                .finish(),
            ValueCell::Trigger { fired, .. } => {
                f.debug_struct("Trigger").field("fired", fired).finish()
            }
        }
    }
}

/// Why a raw value could not be applied. The caller attaches the flag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidText(pub String);

impl ValueCell {
    pub fn list(items: Vec<String>, mode: ListMode) -> Self {
        ValueCell::List {
            items,
            mode,
            touched: false,
        }
    }

    /// Apply one raw occurrence.
    ///
    /// Verbatim lists append, except that the first assignment drops the
    /// default items. Comma and file lists replace their items every time.
    pub fn set_from_text(&mut self, raw: &str) -> Result<(), InvalidText> {
        match self {
            ValueCell::String(s) => *s = raw.to_string(),
            ValueCell::List {
                items,
                mode,
                touched,
            } => {
                if mode.replaces_on_set() {
                    *items = tokenize::tokenize_one(*mode, raw);
                } else {
                    if !*touched {
                        items.clear();
                    }
                    items.push(raw.to_string());
                }
                *touched = true;
            }
            ValueCell::Int(i) => {
                *i = parse_int(raw)?;
            }
            ValueCell::Bool(b) => *b = parse_bool(raw)?,
            ValueCell::Duration(d) => *d = parse_duration(raw)?,
            ValueCell::Enum { current, choices } => {
                let choice = choices.iter().find(|c| c.name == raw).ok_or_else(|| {
                    let allowed: Vec<&str> = choices.iter().map(|c| c.name.as_str()).collect();
                    InvalidText(format!("allowed values are {}", allowed.join(", ")))
                })?;
                *current = choice.value;
            }
            ValueCell::Trigger { fired, callback } => {
                if parse_bool(raw)? {
                    *fired = true;
                    callback();
                }
            }
        }
        Ok(())
    }

    /// Replace a list's items wholesale. Used for lists decoded from config files.
    pub fn set_list(&mut self, values: Vec<String>) -> Result<(), InvalidText> {
        match self {
            ValueCell::List { items, touched, .. } => {
                *items = values;
                *touched = true;
                Ok(())
            }
            _ => Err(InvalidText("not a list flag".into())),
        }
    }

    /// The value in its textual form, as used in usage and config output.
    pub fn current_text(&self) -> String {
        match self {
            ValueCell::String(s) => s.clone(),
            ValueCell::List { items, .. } => quoted_list(items),
            ValueCell::Int(i) => i.to_string(),
            ValueCell::Bool(b) => b.to_string(),
            ValueCell::Duration(d) => format_duration(*d),
            ValueCell::Enum { current, choices } => choices
                .iter()
                .find(|c| c.value == *current)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| current.to_string()),
            ValueCell::Trigger { fired, .. } => fired.to_string(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ValueCell::List { .. })
    }

    /// Switches take no argument on the command line.
    pub fn is_switch(&self) -> bool {
        matches!(self, ValueCell::Bool(_) | ValueCell::Trigger { .. })
    }

    pub fn is_trigger(&self) -> bool {
        matches!(self, ValueCell::Trigger { .. })
    }

    /// Type token shown in usage text. Switches have none.
    pub fn type_hint(&self) -> Option<&'static str> {
        match self {
            ValueCell::String(_) => Some("string"),
            ValueCell::List { .. } => Some("string[]"),
            ValueCell::Int(_) => Some("int"),
            ValueCell::Duration(_) => Some("duration"),
            ValueCell::Enum { .. } => Some("value"),
            ValueCell::Bool(_) | ValueCell::Trigger { .. } => None,
        }
    }

    /// Whether the value is the zero value of its kind.
    ///
    /// Enumerations always show their selected name, so they are never zero.
    pub fn is_zero(&self) -> bool {
        match self {
            ValueCell::String(s) => s.is_empty(),
            ValueCell::List { items, .. } => items.is_empty(),
            ValueCell::Int(i) => *i == 0,
            ValueCell::Bool(b) => !*b,
            ValueCell::Duration(d) => d.is_zero(),
            ValueCell::Enum { .. } => false,
            ValueCell::Trigger { .. } => true,
        }
    }

    /// The value as it appears after `(default ...)` in usage text.
    pub fn default_annotation(&self) -> String {
        match self {
            ValueCell::String(s) => quote(s),
            other => other.current_text(),
        }
    }
}

/// Format items as `["a", "b"]`.
pub fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote(s)).collect();
    format!("[{}]", quoted.join(", "))
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

/// Integer literal with an optional sign. `0x`, `0o` and `0b` select a base,
/// a bare leading `0` means octal, and `_` may separate digits.
fn parse_int(raw: &str) -> Result<i64, InvalidText> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (radix, digits, prefixed) = split_radix(unsigned);
    let digits = strip_separators(digits, prefixed)?;
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(InvalidText("invalid digit found in string".into()));
    }
    let magnitude =
        i128::from_str_radix(&digits, radix).map_err(|e| InvalidText(e.to_string()))?;
    let signed = if negative { -magnitude } else { magnitude };
    i64::try_from(signed).map_err(|_| InvalidText("value out of range".into()))
}

fn split_radix(s: &str) -> (u32, &str, bool) {
    match s.as_bytes() {
        [b'0', b'x' | b'X', ..] => (16, &s[2..], true),
        [b'0', b'b' | b'B', ..] => (2, &s[2..], true),
        [b'0', b'o' | b'O', ..] => (8, &s[2..], true),
        [b'0', _, ..] => (8, &s[1..], true),
        _ => (10, s, false),
    }
}

/// Drop `_` separators, which must sit between digits or right after a base
/// prefix.
fn strip_separators(digits: &str, prefixed: bool) -> Result<String, InvalidText> {
    if !digits.contains('_') {
        return Ok(digits.to_string());
    }
    if digits.ends_with('_') || digits.contains("__") || (!prefixed && digits.starts_with('_')) {
        return Err(InvalidText("'_' must separate successive digits".into()));
    }
    Ok(digits.replace('_', ""))
}

/// Accepts the spellings `1 t T TRUE true True 0 f F FALSE false False`.
pub(crate) fn parse_bool(raw: &str) -> Result<bool, InvalidText> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(InvalidText("expected a boolean".into())),
    }
}

fn parse_duration(raw: &str) -> Result<Duration, InvalidText> {
    if raw == "0" {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(raw).map_err(|e| InvalidText(e.to_string()))
}

fn format_duration(d: Duration) -> String {
    if d.is_zero() {
        return "0s".to_string();
    }
    humantime::format_duration(d).to_string()
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar cell. Anything a spreadsheet or CSV file can hold maps onto one
/// of these; a missing cell is `Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl CellValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The value as text.
    ///
    /// `Null` renders as the empty string, floats render the way a
    /// spreadsheet shows them (`3.0` is `"3"`, infinities are `Infinity`).
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            CellValue::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// The text with surrounding whitespace removed.
    ///
    /// This is the form used for key matching and primary-key checks.
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            CellValue::String(s) => s.trim().to_string(),
            other => other.to_string().trim().to_string(),
        }
    }

    /// Infer a typed value from CSV text.
    ///
    /// Blank text is `Null` and `true`/`false` in any case are booleans.
    /// Numbers are only inferred when they render back to the same text, so
    /// `"007"`, `"3.10"` or `"1e3"` stay strings and survive into SQL as typed.
    #[must_use]
    pub fn parse(s: &str) -> CellValue {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }

        let number = if let Ok(i) = trimmed.parse::<i64>() {
            Some(CellValue::Int(i))
        } else {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(CellValue::Float)
        };

        match number {
            Some(value) if value.to_string() == trimmed => value,
            _ => CellValue::String(s.to_string()),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        // Exponent form with an explicit sign, as in "1e+21" and "1.5e-7"
        let text = format!("{f:e}");
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        };
    }
    f.to_string()
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(fl) => f.write_str(&format_float(*fl)),
            CellValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

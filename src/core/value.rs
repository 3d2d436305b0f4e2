/*!
 * Dynamic Argument Values
 *
 * Loosely typed arguments accepted at the API boundary, classified once into
 * a tagged variant and converted with a fixed precedence:
 *
 * 1. Numbers pass through; booleans become 0/1; null becomes 0
 * 2. Strings are parsed (decimal, exponent, `0x`/`0o`/`0b`, `Infinity`)
 * 3. Arrays are joined then parsed, so `[]` is 0 and `[x]` unwraps to `x`
 * 4. Objects convert through their primitive value, if they have one
 * 5. Everything else is NaN (integer writes store NaN as 0)
 *
 * BigInts never convert implicitly.
 */

use std::fmt;

use super::errors::{BufferError, BufferResult};
use super::limits::NUMERIC_SEPARATOR_THRESHOLD;

/// Loosely typed argument value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Array(Vec<JsValue>),
    Object(JsObject),
}

/// Object argument, described by the result of its conversion protocol
///
/// `primitive` is what `valueOf`/`Symbol.toPrimitive` would produce. An object
/// without one converts like `{}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsObject {
    primitive: Option<Box<JsValue>>,
}

impl JsObject {
    /// Plain object with no conversion hook
    pub fn plain() -> Self {
        Self::default()
    }

    /// Object whose conversion protocol yields `value`
    pub fn with_primitive(value: impl Into<JsValue>) -> Self {
        Self {
            primitive: Some(Box::new(value.into())),
        }
    }

    pub fn primitive(&self) -> Option<&JsValue> {
        self.primitive.as_deref()
    }
}

impl JsValue {
    /// `typeof`-style name
    pub fn type_name(&self) -> &'static str {
        match self {
            JsValue::Undefined => "undefined",
            JsValue::Null => "object",
            JsValue::Bool(_) => "boolean",
            JsValue::Number(_) => "number",
            JsValue::BigInt(_) => "bigint",
            JsValue::String(_) => "string",
            JsValue::Array(_) | JsValue::Object(_) => "object",
        }
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined)
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        !matches!(self, JsValue::Array(_) | JsValue::Object(_))
    }

    /// Numeric conversion following the documented tiers
    pub fn to_number(&self) -> BufferResult<f64> {
        match self {
            JsValue::Undefined => Ok(f64::NAN),
            JsValue::Null => Ok(0.0),
            JsValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            JsValue::Number(n) => Ok(*n),
            JsValue::BigInt(_) => Err(BufferError::Coercion(
                "Cannot convert a BigInt value to a number".to_string(),
            )),
            JsValue::String(s) => Ok(parse_js_number(s)),
            JsValue::Array(_) => Ok(parse_js_number(&self.to_js_string()?)),
            JsValue::Object(obj) => match obj.primitive() {
                Some(p) if p.is_primitive() => p.to_number(),
                Some(_) => Err(BufferError::Coercion(
                    "Cannot convert object to primitive value".to_string(),
                )),
                None => Ok(f64::NAN),
            },
        }
    }

    /// String conversion used by array joins and string-hinted conversion
    pub fn to_js_string(&self) -> BufferResult<String> {
        match self {
            JsValue::Undefined => Ok("undefined".to_string()),
            JsValue::Null => Ok("null".to_string()),
            JsValue::Bool(b) => Ok(b.to_string()),
            JsValue::Number(n) => Ok(format_number(*n)),
            JsValue::BigInt(v) => Ok(v.to_string()),
            JsValue::String(s) => Ok(s.clone()),
            JsValue::Array(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        JsValue::Undefined | JsValue::Null => parts.push(String::new()),
                        other => parts.push(other.to_js_string()?),
                    }
                }
                Ok(parts.join(","))
            }
            JsValue::Object(obj) => match obj.primitive() {
                Some(p) if p.is_primitive() => p.to_js_string(),
                Some(_) => Err(BufferError::Coercion(
                    "Cannot convert object to primitive value".to_string(),
                )),
                None => Ok("[object Object]".to_string()),
            },
        }
    }

    /// Rendering used after "Received" in argument type errors
    pub fn describe(&self) -> String {
        match self {
            JsValue::Undefined => "undefined".to_string(),
            JsValue::Null => "null".to_string(),
            JsValue::Array(_) => "an instance of Array".to_string(),
            JsValue::Object(_) => "an instance of Object".to_string(),
            JsValue::String(s) => {
                let shown: String = s.chars().take(25).collect();
                let ellipsis = if s.chars().count() > 25 { "..." } else { "" };
                format!("type string ('{}'{})", shown, ellipsis)
            }
            JsValue::Number(n) => format!("type number ({})", format_number(*n)),
            JsValue::BigInt(v) => format!("type bigint ({}n)", v),
            JsValue::Bool(b) => format!("type boolean ({})", b),
        }
    }

    /// Rendering used after "Received" in range errors
    pub fn describe_range(&self) -> String {
        match self {
            JsValue::Number(n) => format_received_number(*n),
            JsValue::BigInt(v) => format_received_bigint(*v),
            JsValue::String(s) => format!("'{}'", s),
            other => other.describe(),
        }
    }
}

impl fmt::Display for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_js_string() {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "[object Object]"),
        }
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(impl From<$t> for JsValue {
            fn from(v: $t) -> Self {
                JsValue::Number(v as f64)
            }
        })*
    };
}

number_from!(u8, u16, u32, i8, i16, i32, usize, f32, f64);

macro_rules! bigint_from {
    ($($t:ty),*) => {
        $(impl From<$t> for JsValue {
            fn from(v: $t) -> Self {
                JsValue::BigInt(v as i128)
            }
        })*
    };
}

bigint_from!(i64, u64, i128);

impl From<bool> for JsValue {
    fn from(v: bool) -> Self {
        JsValue::Bool(v)
    }
}

impl From<&str> for JsValue {
    fn from(v: &str) -> Self {
        JsValue::String(v.to_string())
    }
}

impl From<String> for JsValue {
    fn from(v: String) -> Self {
        JsValue::String(v)
    }
}

impl From<Vec<JsValue>> for JsValue {
    fn from(v: Vec<JsValue>) -> Self {
        JsValue::Array(v)
    }
}

impl From<JsObject> for JsValue {
    fn from(v: JsObject) -> Self {
        JsValue::Object(v)
    }
}

impl<T: Into<JsValue>> From<Option<T>> for JsValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(JsValue::Undefined)
    }
}

// JS trims Unicode White_Space except NEL, plus the BOM
fn is_js_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{0085}') || c == '\u{FEFF}'
}

/// Parse a string with JS `Number()` semantics
pub fn parse_js_number(input: &str) -> f64 {
    let s = input.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };

    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() {
            return f64::NAN;
        }
        let mut acc = 0.0f64;
        for c in digits.chars() {
            match c.to_digit(radix) {
                Some(d) => acc = acc * radix as f64 + d as f64,
                None => return f64::NAN,
            }
        }
        return acc;
    }

    let (negative, unsigned) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if unsigned == "Infinity" {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // Rust's float grammar also accepts "inf"/"nan"; restrict to JS literals
    let well_formed = unsigned.bytes().any(|b| b.is_ascii_digit())
        && unsigned
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !well_formed {
        return f64::NAN;
    }

    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Format a number the way JS `String(n)` does
///
/// Magnitudes outside `[1e-7, 1e21)` use exponent form with an explicit sign.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-7 {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        }
    } else if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

fn add_numerical_separator(digits: &str) -> String {
    let start = usize::from(digits.starts_with('-'));
    let mut end = digits.len();
    let mut groups = Vec::new();
    while end >= start + 4 {
        groups.push(&digits[end - 3..end]);
        end -= 3;
    }
    let mut out = digits[..end].to_string();
    for group in groups.iter().rev() {
        out.push('_');
        out.push_str(group);
    }
    out
}

/// Number as shown after "Received" in range errors
pub fn format_received_number(n: f64) -> String {
    let text = format_number(n);
    if n.fract() == 0.0 && n.abs() > NUMERIC_SEPARATOR_THRESHOLD && n.abs() < 1e21 {
        add_numerical_separator(&text)
    } else {
        text
    }
}

/// BigInt as shown after "Received" in range errors
pub fn format_received_bigint(v: i128) -> String {
    let text = v.to_string();
    if v.unsigned_abs() > 1u128 << 32 {
        format!("{}n", add_numerical_separator(&text))
    } else {
        format!("{}n", text)
    }
}

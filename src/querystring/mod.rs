/*!
 * Query String Serialization
 *
 * Turns a nested value graph into `key=value` pairs joined by a delimiter.
 * Nesting is expressed in keys: `a[b]=c` for objects, `a[0]=x` for arrays
 * (see [`ArrayFormat`]), or `a.b=c` with `allow_dots`.
 *
 * Arrays and objects are shared handles, so a graph may contain cycles.
 * A value that contains itself fails with [`QueryStringError::Cyclic`].
 */

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use miette::Diagnostic;
use thiserror::Error;

use crate::core::value::format_number;

/// Serialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum QueryStringError {
    #[error("Cyclic object value")]
    #[diagnostic(
        code(querystring::cyclic),
        help("An object or array is reachable from itself.")
    )]
    Cyclic,
}

pub type QsArray = Rc<RefCell<Vec<QsValue>>>;
pub type QsObject = Rc<RefCell<Vec<(String, QsValue)>>>;

/// Serializable value
#[derive(Clone, Default)]
pub enum QsValue {
    /// Skipped entirely
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Array(QsArray),
    /// Insertion-ordered entries
    Object(QsObject),
}

impl QsValue {
    pub fn array(items: Vec<QsValue>) -> Self {
        QsValue::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object<K: Into<String>>(entries: Vec<(K, QsValue)>) -> Self {
        QsValue::Object(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// Append to an array; false for non-arrays
    pub fn push(&self, value: QsValue) -> bool {
        match self {
            QsValue::Array(items) => {
                items.borrow_mut().push(value);
                true
            }
            _ => false,
        }
    }

    /// Set an object entry, keeping the original position of an existing key;
    /// false for non-objects
    pub fn insert(&self, key: impl Into<String>, value: QsValue) -> bool {
        let QsValue::Object(entries) = self else {
            return false;
        };
        let key = key.into();
        let mut entries = entries.borrow_mut();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
        true
    }

    fn identity(&self) -> Option<*const ()> {
        match self {
            QsValue::Array(items) => Some(Rc::as_ptr(items) as *const ()),
            QsValue::Object(entries) => Some(Rc::as_ptr(entries) as *const ()),
            _ => None,
        }
    }

    /// String form of a scalar; containers render like JS `String(x)`
    fn scalar_text(&self) -> String {
        self.text_within(&mut Vec::new())
    }

    // Arrays already being joined render as empty
    fn text_within(&self, joining: &mut Vec<*const ()>) -> String {
        match self {
            QsValue::Undefined | QsValue::Null => String::new(),
            QsValue::Bool(b) => b.to_string(),
            QsValue::Number(n) => format_number(*n),
            QsValue::BigInt(v) => v.to_string(),
            QsValue::String(s) => s.clone(),
            QsValue::Array(items) => {
                let id = Rc::as_ptr(items) as *const ();
                if joining.contains(&id) {
                    return String::new();
                }
                joining.push(id);
                let text = items
                    .borrow()
                    .iter()
                    .map(|item| item.text_within(joining))
                    .collect::<Vec<_>>()
                    .join(",");
                joining.pop();
                text
            }
            QsValue::Object(_) => "[object Object]".to_string(),
        }
    }
}

// Shallow: graphs may be cyclic
impl fmt::Debug for QsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QsValue::Undefined => write!(f, "Undefined"),
            QsValue::Null => write!(f, "Null"),
            QsValue::Bool(b) => write!(f, "Bool({})", b),
            QsValue::Number(n) => write!(f, "Number({})", n),
            QsValue::BigInt(v) => write!(f, "BigInt({})", v),
            QsValue::String(s) => write!(f, "String({:?})", s),
            QsValue::Array(items) => write!(f, "Array(len={})", items.borrow().len()),
            QsValue::Object(entries) => write!(f, "Object(len={})", entries.borrow().len()),
        }
    }
}

impl From<&str> for QsValue {
    fn from(v: &str) -> Self {
        QsValue::String(v.to_string())
    }
}

impl From<String> for QsValue {
    fn from(v: String) -> Self {
        QsValue::String(v)
    }
}

impl From<f64> for QsValue {
    fn from(v: f64) -> Self {
        QsValue::Number(v)
    }
}

impl From<i32> for QsValue {
    fn from(v: i32) -> Self {
        QsValue::Number(v as f64)
    }
}

impl From<bool> for QsValue {
    fn from(v: bool) -> Self {
        QsValue::Bool(v)
    }
}

/// Key shape for array elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayFormat {
    /// `a[0]=x&a[1]=y`
    #[default]
    Indices,
    /// `a[]=x&a[]=y`
    Brackets,
    /// `a=x&a=y`
    Repeat,
    /// `a=x,y`
    Comma,
}

/// Percent-encoding flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Spaces as `%20`
    #[default]
    Rfc3986,
    /// Spaces as `+`
    Rfc1738,
}

/// Serialization options
#[derive(Debug, Clone)]
pub struct StringifyOptions {
    pub delimiter: String,
    /// Percent-encode output
    pub encode: bool,
    /// Encode values but leave keys readable
    pub encode_values_only: bool,
    pub array_format: ArrayFormat,
    /// With `Comma`, single-element arrays get a `[]` suffix
    pub comma_round_trip: bool,
    /// `a.b=c` instead of `a[b]=c`
    pub allow_dots: bool,
    /// Escape dots inside keys as `%2E`; implies `allow_dots`
    pub encode_dot_in_keys: bool,
    /// Emit `a[]` for empty arrays instead of skipping them
    pub allow_empty_arrays: bool,
    pub skip_nulls: bool,
    /// Emit `a` instead of `a=` for nulls
    pub strict_null_handling: bool,
    pub add_query_prefix: bool,
    /// Sort object keys lexicographically
    pub sort: bool,
    pub format: Format,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        Self {
            delimiter: "&".to_string(),
            encode: true,
            encode_values_only: false,
            array_format: ArrayFormat::Indices,
            comma_round_trip: false,
            allow_dots: false,
            encode_dot_in_keys: false,
            allow_empty_arrays: false,
            skip_nulls: false,
            strict_null_handling: false,
            add_query_prefix: false,
            sort: false,
            format: Format::Rfc3986,
        }
    }
}

fn is_unreserved(b: u8, format: Format) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, b'-' | b'.' | b'_' | b'~')
        || (format == Format::Rfc1738 && matches!(b, b'(' | b')'))
}

/// Percent-encode UTF-8 bytes outside the unreserved set
pub fn encode_component(s: &str, format: Format) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_unreserved(b, format) {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

struct Stringifier<'o> {
    opts: &'o StringifyOptions,
    ancestors: Vec<*const ()>,
    pairs: Vec<String>,
}

impl Stringifier<'_> {
    fn allow_dots(&self) -> bool {
        self.opts.allow_dots || self.opts.encode_dot_in_keys
    }

    fn format(&self, s: String) -> String {
        match self.opts.format {
            Format::Rfc3986 => s,
            Format::Rfc1738 => s.replace("%20", "+"),
        }
    }

    fn encode(&self, s: &str) -> String {
        encode_component(s, self.opts.format)
    }

    fn dots(&self, key: &str) -> String {
        if self.allow_dots() && self.opts.encode_dot_in_keys {
            key.replace('.', "%2E")
        } else {
            key.to_string()
        }
    }

    fn push_scalar(&mut self, prefix: &str, text: &str, encoder: bool) {
        let pair = if encoder {
            let key = if self.opts.encode_values_only {
                prefix.to_string()
            } else {
                self.encode(prefix)
            };
            format!("{}={}", self.format(key), self.format(self.encode(text)))
        } else {
            format!("{}={}", self.format(prefix.to_string()), self.format(text.to_string()))
        };
        self.pairs.push(pair);
    }

    fn walk(&mut self, value: &QsValue, prefix: &str, encoder: bool) -> Result<(), QueryStringError> {
        match value {
            QsValue::Undefined => Ok(()),
            QsValue::Null if self.opts.strict_null_handling => {
                let key = if encoder && !self.opts.encode_values_only {
                    self.encode(prefix)
                } else {
                    prefix.to_string()
                };
                self.pairs.push(key);
                Ok(())
            }
            QsValue::Null => {
                self.push_scalar(prefix, "", encoder);
                Ok(())
            }
            QsValue::Bool(_) | QsValue::Number(_) | QsValue::BigInt(_) | QsValue::String(_) => {
                self.push_scalar(prefix, &value.scalar_text(), encoder);
                Ok(())
            }
            QsValue::Array(items) => self.guarded(Rc::as_ptr(items) as *const (), |s| {
                s.walk_array(&items.borrow(), prefix, encoder)
            }),
            QsValue::Object(entries) => self.guarded(Rc::as_ptr(entries) as *const (), |s| {
                s.walk_object(&entries.borrow(), prefix, encoder)
            }),
        }
    }

    /// Run `f` with `id` on the ancestor chain, failing if it is already there
    fn guarded<F>(&mut self, id: *const (), f: F) -> Result<(), QueryStringError>
    where
        F: FnOnce(&mut Self) -> Result<(), QueryStringError>,
    {
        if self.ancestors.contains(&id) {
            return Err(QueryStringError::Cyclic);
        }
        self.ancestors.push(id);
        let result = f(self);
        self.ancestors.pop();
        result
    }

    fn walk_array(&mut self, items: &[QsValue], prefix: &str, encoder: bool) -> Result<(), QueryStringError> {
        let prefix = self.dots(prefix);
        let is_comma = self.opts.array_format == ArrayFormat::Comma;
        let adjusted = if is_comma && self.opts.comma_round_trip && items.len() == 1 {
            format!("{}[]", prefix)
        } else {
            prefix.clone()
        };
        if self.opts.allow_empty_arrays && items.is_empty() {
            self.pairs.push(format!("{}[]", adjusted));
            return Ok(());
        }

        if is_comma {
            if items.is_empty() {
                return Ok(());
            }
            let pre_encode = encoder && self.opts.encode_values_only;
            let joined = items
                .iter()
                .map(|item| {
                    let text = item.scalar_text();
                    if pre_encode {
                        self.encode(&text)
                    } else {
                        text
                    }
                })
                .collect::<Vec<_>>()
                .join(",");
            let value = if joined.is_empty() {
                QsValue::Null
            } else {
                QsValue::String(joined)
            };
            if self.opts.skip_nulls && matches!(value, QsValue::Null) {
                return Ok(());
            }
            return self.walk(&value, &adjusted, encoder && !pre_encode);
        }

        for (index, item) in items.iter().enumerate() {
            if self.opts.skip_nulls && matches!(item, QsValue::Null) {
                continue;
            }
            let key = match self.opts.array_format {
                ArrayFormat::Indices => format!("{}[{}]", adjusted, index),
                ArrayFormat::Brackets => format!("{}[]", adjusted),
                ArrayFormat::Repeat | ArrayFormat::Comma => adjusted.clone(),
            };
            self.walk(item, &key, encoder)?;
        }
        Ok(())
    }

    fn walk_object(
        &mut self,
        entries: &[(String, QsValue)],
        prefix: &str,
        encoder: bool,
    ) -> Result<(), QueryStringError> {
        let prefix = self.dots(prefix);
        for (key, value) in self.ordered(entries) {
            if self.opts.skip_nulls && matches!(value, QsValue::Null) {
                continue;
            }
            let key = self.dots(key);
            let child = if self.allow_dots() {
                format!("{}.{}", prefix, key)
            } else {
                format!("{}[{}]", prefix, key)
            };
            self.walk(value, &child, encoder)?;
        }
        Ok(())
    }

    fn ordered<'e>(&self, entries: &'e [(String, QsValue)]) -> Vec<(&'e String, &'e QsValue)> {
        let mut ordered: Vec<_> = entries.iter().map(|(k, v)| (k, v)).collect();
        if self.opts.sort {
            ordered.sort_by(|a, b| a.0.cmp(b.0));
        }
        ordered
    }
}

/// Serialize `value` into a query string
///
/// Only arrays and objects produce output; a scalar at the top level yields
/// an empty string.
pub fn stringify(value: &QsValue, opts: &StringifyOptions) -> Result<String, QueryStringError> {
    let mut stringifier = Stringifier {
        opts,
        ancestors: Vec::new(),
        pairs: Vec::new(),
    };

    let Some(id) = value.identity() else {
        return Ok(String::new());
    };
    stringifier.ancestors.push(id);
    match value {
        QsValue::Object(entries) => {
            let entries = entries.borrow();
            for (key, child) in stringifier.ordered(&entries) {
                if opts.skip_nulls && matches!(child, QsValue::Null) {
                    continue;
                }
                stringifier.walk(child, key, opts.encode)?;
            }
        }
        QsValue::Array(items) => {
            for (index, child) in items.borrow().iter().enumerate() {
                if opts.skip_nulls && matches!(child, QsValue::Null) {
                    continue;
                }
                stringifier.walk(child, &index.to_string(), opts.encode)?;
            }
        }
        _ => {}
    }

    let joined = stringifier.pairs.join(&opts.delimiter);
    if joined.is_empty() {
        return Ok(joined);
    }
    let prefix = if opts.add_query_prefix { "?" } else { "" };
    Ok(format!("{}{}", prefix, joined))
}

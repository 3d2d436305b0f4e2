/*!
 * Key Generation Types
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::memory::BufferView;

/// Key generation result
pub type KeyGenResult<T> = Result<T, KeyGenError>;

/// Dotted names are properties of an options object, plain names are arguments
fn subject(name: &str) -> &'static str {
    if name.contains('.') {
        "property"
    } else {
        "argument"
    }
}

/// Key generation errors
///
/// Validation errors are produced before the backend is called, so every
/// calling convention reports the same error for the same input.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum KeyGenError {
    #[error("The \"{name}\" {} must be {expected}. Received {received}", subject(.name))]
    #[diagnostic(code(keygen::invalid_arg_type))]
    InvalidArgType {
        name: String,
        expected: String,
        received: String,
    },

    #[error("The {} '{name}' {reason}. Received {received}", subject(.name))]
    #[diagnostic(code(keygen::invalid_arg_value))]
    InvalidArgValue {
        name: String,
        reason: String,
        received: String,
    },

    #[error("{0} is required")]
    #[diagnostic(code(keygen::missing_option))]
    MissingOption(String),

    #[error("Option \"{0}\" cannot be used in combination with option \"{1}\"")]
    #[diagnostic(code(keygen::incompatible_option_pair))]
    IncompatibleOptionPair(String, String),

    #[error("The selected key encoding {encoding} {restriction}.")]
    #[diagnostic(code(keygen::incompatible_key_options))]
    IncompatibleKeyOptions {
        encoding: String,
        restriction: String,
    },

    #[error("Key generation failed: {0}")]
    #[diagnostic(
        code(keygen::backend_failed),
        help("The cryptography backend rejected the parameters or is unavailable.")
    )]
    Backend(String),
}

impl KeyGenError {
    /// Node.js error code
    pub fn code(&self) -> &'static str {
        match self {
            KeyGenError::InvalidArgType { .. } => "ERR_INVALID_ARG_TYPE",
            KeyGenError::InvalidArgValue { .. } => "ERR_INVALID_ARG_VALUE",
            KeyGenError::MissingOption(_) => "ERR_MISSING_OPTION",
            KeyGenError::IncompatibleOptionPair(..) => "ERR_INCOMPATIBLE_OPTION_PAIR",
            KeyGenError::IncompatibleKeyOptions { .. } => "ERR_CRYPTO_INCOMPATIBLE_KEY_OPTIONS",
            KeyGenError::Backend(_) => "ERR_CRYPTO_OPERATION_FAILED",
        }
    }

    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            KeyGenError::InvalidArgType { .. }
                | KeyGenError::InvalidArgValue { .. }
                | KeyGenError::MissingOption(_)
                | KeyGenError::IncompatibleOptionPair(..)
        )
    }
}

/// Asymmetric key algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyType {
    Rsa,
    RsaPss,
    Dsa,
    Ec,
    Ed25519,
    Ed448,
    X25519,
    X448,
    Dh,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Rsa => "rsa",
            KeyType::RsaPss => "rsa-pss",
            KeyType::Dsa => "dsa",
            KeyType::Ec => "ec",
            KeyType::Ed25519 => "ed25519",
            KeyType::Ed448 => "ed448",
            KeyType::X25519 => "x25519",
            KeyType::X448 => "x448",
            KeyType::Dh => "dh",
        }
    }

    pub fn lookup(name: &str) -> Option<KeyType> {
        match name {
            "rsa" => Some(KeyType::Rsa),
            "rsa-pss" => Some(KeyType::RsaPss),
            "dsa" => Some(KeyType::Dsa),
            "ec" => Some(KeyType::Ec),
            "ed25519" => Some(KeyType::Ed25519),
            "ed448" => Some(KeyType::Ed448),
            "x25519" => Some(KeyType::X25519),
            "x448" => Some(KeyType::X448),
            "dh" => Some(KeyType::Dh),
            _ => None,
        }
    }
}

impl FromStr for KeyType {
    type Err = KeyGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| KeyGenError::InvalidArgValue {
            name: "type".to_string(),
            reason: "must be a supported key type".to_string(),
            received: format!("'{}'", s),
        })
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DER structure a key is exported as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEncodingType {
    Spki,
    Pkcs1,
    Pkcs8,
    Sec1,
}

impl KeyEncodingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyEncodingType::Spki => "spki",
            KeyEncodingType::Pkcs1 => "pkcs1",
            KeyEncodingType::Pkcs8 => "pkcs8",
            KeyEncodingType::Sec1 => "sec1",
        }
    }
}

/// Serialized form of an exported key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyFormat {
    Pem,
    Der,
}

/// Requested export of one half of the pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEncoding {
    #[serde(rename = "type")]
    pub kind: KeyEncodingType,
    pub format: KeyFormat,
}

impl KeyEncoding {
    pub fn new(kind: KeyEncodingType, format: KeyFormat) -> Self {
        Self { kind, format }
    }

    pub fn pem(kind: KeyEncodingType) -> Self {
        Self::new(kind, KeyFormat::Pem)
    }

    pub fn der(kind: KeyEncodingType) -> Self {
        Self::new(kind, KeyFormat::Der)
    }
}

/// Algorithm parameters and output encodings
///
/// Field names deserialize from the camelCase option names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyGenOptions {
    pub modulus_length: Option<u32>,
    pub public_exponent: Option<u32>,
    pub hash_algorithm: Option<String>,
    pub mgf1_hash_algorithm: Option<String>,
    pub salt_length: Option<u32>,
    pub divisor_length: Option<u32>,
    pub named_curve: Option<String>,
    pub group: Option<String>,
    pub prime: Option<Vec<u8>>,
    pub prime_length: Option<u32>,
    pub generator: Option<u32>,
    pub public_key_encoding: Option<KeyEncoding>,
    pub private_key_encoding: Option<KeyEncoding>,
}

impl KeyGenOptions {
    pub fn rsa(modulus_length: u32) -> Self {
        Self {
            modulus_length: Some(modulus_length),
            ..Self::default()
        }
    }

    pub fn ec(named_curve: impl Into<String>) -> Self {
        Self {
            named_curve: Some(named_curve.into()),
            ..Self::default()
        }
    }

    pub fn with_public_key_encoding(mut self, encoding: KeyEncoding) -> Self {
        self.public_key_encoding = Some(encoding);
        self
    }

    pub fn with_private_key_encoding(mut self, encoding: KeyEncoding) -> Self {
        self.private_key_encoding = Some(encoding);
        self
    }
}

/// Which half of a pair a handle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyObjectKind {
    Public,
    Private,
}

/// Opaque key owned by the backend
///
/// The payload is whatever the backend needs to find or re-export the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHandle {
    key_type: KeyType,
    kind: KeyObjectKind,
    payload: Arc<[u8]>,
}

impl KeyHandle {
    pub fn new(key_type: KeyType, kind: KeyObjectKind, payload: impl Into<Arc<[u8]>>) -> Self {
        Self {
            key_type,
            kind,
            payload: payload.into(),
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn kind(&self) -> KeyObjectKind {
        self.kind
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// One half of a generated pair, in the requested output form
#[derive(Debug, Clone, PartialEq)]
pub enum KeyMaterial {
    Pem(String),
    Der(BufferView),
    Handle(KeyHandle),
}

impl KeyMaterial {
    pub fn as_pem(&self) -> Option<&str> {
        match self {
            KeyMaterial::Pem(pem) => Some(pem),
            _ => None,
        }
    }

    pub fn as_der(&self) -> Option<&BufferView> {
        match self {
            KeyMaterial::Der(der) => Some(der),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<&KeyHandle> {
        match self {
            KeyMaterial::Handle(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Generated key pair
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPair {
    pub public_key: KeyMaterial,
    pub private_key: KeyMaterial,
}

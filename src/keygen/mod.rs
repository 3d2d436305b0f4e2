/*!
 * Key Pair Generation
 *
 * Validation and output shaping around a system cryptography backend.
 *
 * # Calling Conventions
 *
 * - `generate_key_pair_sync`: returns the result directly
 * - `generate_key_pair`: hands the result to a callback, on tokio's blocking
 *   pool when a runtime is available
 * - `generate_key_pair_async`: resolves a future, backend work runs on the
 *   blocking pool
 *
 * All three run the same validation and produce identical results and errors
 * for identical inputs.
 */

pub mod types;

pub use types::{
    KeyEncoding, KeyEncodingType, KeyFormat, KeyGenError, KeyGenOptions, KeyGenResult, KeyHandle,
    KeyMaterial, KeyObjectKind, KeyPair, KeyType,
};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::limits::PEM_LINE_WIDTH;
use crate::memory::BufferView;

/// Binding to the system cryptography library
pub trait KeyPairBackend: Send + Sync + 'static {
    /// Generate a `(public, private)` pair for validated parameters
    fn generate(&self, key_type: KeyType, options: &KeyGenOptions) -> KeyGenResult<(KeyHandle, KeyHandle)>;

    /// DER bytes of `handle` in the given structure
    fn export(&self, handle: &KeyHandle, encoding: KeyEncodingType) -> KeyGenResult<Vec<u8>>;
}

fn missing(name: &str, expected: &str) -> KeyGenError {
    KeyGenError::InvalidArgType {
        name: name.to_string(),
        expected: expected.to_string(),
        received: "undefined".to_string(),
    }
}

fn validate_parameters(key_type: KeyType, options: &KeyGenOptions) -> KeyGenResult<()> {
    match key_type {
        KeyType::Rsa | KeyType::RsaPss | KeyType::Dsa => {
            if options.modulus_length.is_none() {
                return Err(missing("options.modulusLength", "of type number"));
            }
        }
        KeyType::Ec => {
            if options.named_curve.is_none() {
                return Err(missing("options.namedCurve", "of type string"));
            }
        }
        KeyType::Dh => {
            if options.group.is_some() {
                if options.prime.is_some() {
                    return Err(KeyGenError::IncompatibleOptionPair("group".into(), "prime".into()));
                }
                if options.prime_length.is_some() {
                    return Err(KeyGenError::IncompatibleOptionPair(
                        "group".into(),
                        "primeLength".into(),
                    ));
                }
            } else if options.prime.is_none() && options.prime_length.is_none() {
                return Err(KeyGenError::MissingOption(
                    "At least one of the group, prime, or primeLength options".into(),
                ));
            }
        }
        KeyType::Ed25519 | KeyType::Ed448 | KeyType::X25519 | KeyType::X448 => {}
    }
    Ok(())
}

fn validate_encoding(
    key_type: KeyType,
    encoding: &KeyEncoding,
    object: KeyObjectKind,
) -> KeyGenResult<()> {
    let (name, allowed): (&str, &[KeyEncodingType]) = match object {
        KeyObjectKind::Public => (
            "options.publicKeyEncoding.type",
            &[KeyEncodingType::Spki, KeyEncodingType::Pkcs1],
        ),
        KeyObjectKind::Private => (
            "options.privateKeyEncoding.type",
            &[
                KeyEncodingType::Pkcs1,
                KeyEncodingType::Pkcs8,
                KeyEncodingType::Sec1,
            ],
        ),
    };
    if !allowed.contains(&encoding.kind) {
        return Err(KeyGenError::InvalidArgValue {
            name: name.to_string(),
            reason: "is invalid".to_string(),
            received: format!("'{}'", encoding.kind.as_str()),
        });
    }

    let restriction = match encoding.kind {
        KeyEncodingType::Pkcs1 if key_type != KeyType::Rsa => Some("can only be used for RSA keys"),
        KeyEncodingType::Sec1 if key_type != KeyType::Ec => Some("can only be used for EC keys"),
        _ => None,
    };
    match restriction {
        Some(restriction) => Err(KeyGenError::IncompatibleKeyOptions {
            encoding: encoding.kind.as_str().to_string(),
            restriction: restriction.to_string(),
        }),
        None => Ok(()),
    }
}

/// PEM armor label for a DER structure
pub fn pem_label(encoding: KeyEncodingType, object: KeyObjectKind) -> &'static str {
    match (encoding, object) {
        (KeyEncodingType::Spki, _) => "PUBLIC KEY",
        (KeyEncodingType::Pkcs1, KeyObjectKind::Public) => "RSA PUBLIC KEY",
        (KeyEncodingType::Pkcs1, KeyObjectKind::Private) => "RSA PRIVATE KEY",
        (KeyEncodingType::Pkcs8, _) => "PRIVATE KEY",
        (KeyEncodingType::Sec1, _) => "EC PRIVATE KEY",
    }
}

/// Wrap DER bytes in PEM armor with 64-column base64 lines
pub fn to_pem(der: &[u8], label: &str) -> String {
    let body = STANDARD.encode(der);
    let mut pem = format!("-----BEGIN {}-----\n", label);
    for line in body.as_bytes().chunks(PEM_LINE_WIDTH) {
        // base64 output is ASCII, so every chunk is valid UTF-8
        pem.push_str(&String::from_utf8_lossy(line));
        pem.push('\n');
    }
    pem.push_str(&format!("-----END {}-----\n", label));
    pem
}

/// Key pair generator over a backend
pub struct KeyPairGenerator<B: KeyPairBackend> {
    backend: Arc<B>,
}

impl<B: KeyPairBackend> Clone for KeyPairGenerator<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: KeyPairBackend> KeyPairGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn shape(
        backend: &B,
        handle: KeyHandle,
        encoding: Option<&KeyEncoding>,
        object: KeyObjectKind,
    ) -> KeyGenResult<KeyMaterial> {
        let Some(encoding) = encoding else {
            return Ok(KeyMaterial::Handle(handle));
        };
        let der = backend.export(&handle, encoding.kind)?;
        match encoding.format {
            KeyFormat::Pem => Ok(KeyMaterial::Pem(to_pem(&der, pem_label(encoding.kind, object)))),
            KeyFormat::Der => BufferView::from_bytes(&der)
                .map(KeyMaterial::Der)
                .map_err(|e| KeyGenError::Backend(e.to_string())),
        }
    }

    /// `run` with a backend panic reported as a backend failure
    fn run_guarded(backend: &B, key_type: &str, options: &KeyGenOptions) -> KeyGenResult<KeyPair> {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            Self::run(backend, key_type, options)
        }));
        result.unwrap_or_else(|panic| {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(KeyGenError::Backend(format!("backend panicked: {}", reason)))
        })
    }

    fn run(backend: &B, key_type: &str, options: &KeyGenOptions) -> KeyGenResult<KeyPair> {
        let key_type: KeyType = key_type.parse()?;
        validate_parameters(key_type, options)?;
        if let Some(encoding) = &options.public_key_encoding {
            validate_encoding(key_type, encoding, KeyObjectKind::Public)?;
        }
        if let Some(encoding) = &options.private_key_encoding {
            validate_encoding(key_type, encoding, KeyObjectKind::Private)?;
        }

        debug!(%key_type, "Generating key pair");
        let (public, private) = backend.generate(key_type, options)?;
        let pair = KeyPair {
            public_key: Self::shape(
                backend,
                public,
                options.public_key_encoding.as_ref(),
                KeyObjectKind::Public,
            )?,
            private_key: Self::shape(
                backend,
                private,
                options.private_key_encoding.as_ref(),
                KeyObjectKind::Private,
            )?,
        };
        debug!(%key_type, "Key pair generated");
        Ok(pair)
    }

    /// Generate on the calling thread
    pub fn generate_key_pair_sync(
        &self,
        key_type: &str,
        options: &KeyGenOptions,
    ) -> KeyGenResult<KeyPair> {
        Self::run_guarded(&self.backend, key_type, options)
    }

    /// Generate and deliver the result to `callback`
    ///
    /// Inside a tokio runtime the work is moved to the blocking pool and this
    /// returns immediately; otherwise the callback runs before returning.
    pub fn generate_key_pair<F>(&self, key_type: &str, options: KeyGenOptions, callback: F)
    where
        F: FnOnce(KeyGenResult<KeyPair>) + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let key_type = key_type.to_string();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                // Detached: the callback receives every outcome
                drop(handle.spawn_blocking(move || {
                    callback(Self::run_guarded(&backend, &key_type, &options))
                }));
            }
            Err(_) => callback(Self::run_guarded(&backend, &key_type, &options)),
        }
    }

    /// Generate on tokio's blocking pool
    #[instrument(skip(self, options))]
    pub async fn generate_key_pair_async(
        &self,
        key_type: &str,
        options: KeyGenOptions,
    ) -> KeyGenResult<KeyPair> {
        let backend = Arc::clone(&self.backend);
        let key_type = key_type.to_string();
        tokio::task::spawn_blocking(move || Self::run_guarded(&backend, &key_type, &options))
            .await
            .map_err(|e| KeyGenError::Backend(e.to_string()))?
    }
}

/*!
 * Buffer Configuration
 *
 * Runtime configuration for the pool allocator and diagnostics
 */

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::limits::{DEFAULT_INSPECT_MAX_BYTES, DEFAULT_POOL_SIZE};

/// Buffer subsystem configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Size of each shared pool arena in bytes
    pub pool_size: usize,
    /// Zero-fill `alloc_unsafe`/`alloc_unsafe_slow` results, including views
    /// carved from a rewound arena
    pub zero_fill: bool,
    /// Bytes rendered by `inspect()`
    pub inspect_max_bytes: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            zero_fill: false,
            inspect_max_bytes: DEFAULT_INSPECT_MAX_BYTES,
        }
    }
}

impl BufferConfig {
    /// Configuration with every unsafe allocation zero-filled
    pub fn zero_filled() -> Self {
        Self {
            zero_fill: true,
            ..Self::default()
        }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Build configuration from environment variables
    ///
    /// Environment variables:
    /// - BUFFER_POOL_SIZE: pool arena size in bytes (default: 8192)
    /// - BUFFER_ZERO_FILL: zero-fill unsafe allocations (default: false)
    /// - BUFFER_INSPECT_MAX_BYTES: bytes shown by inspect (default: 50)
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let pool_size = std::env::var("BUFFER_POOL_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.pool_size);

        let zero_fill = std::env::var("BUFFER_ZERO_FILL")
            .map(|v| v == "1" || v == "true")
            .unwrap_or(defaults.zero_fill);

        let inspect_max_bytes = std::env::var("BUFFER_INSPECT_MAX_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.inspect_max_bytes);

        Self {
            pool_size,
            zero_fill,
            inspect_max_bytes,
        }
    }
}

static GLOBAL_CONFIG: OnceLock<BufferConfig> = OnceLock::new();

/// Process-wide configuration, resolved from the environment on first use
pub fn config() -> &'static BufferConfig {
    GLOBAL_CONFIG.get_or_init(BufferConfig::from_env)
}

/// Install an explicit configuration before first use
///
/// Returns the rejected config if one was already resolved.
pub fn set_config(config: BufferConfig) -> Result<(), BufferConfig> {
    GLOBAL_CONFIG.set(config)
}

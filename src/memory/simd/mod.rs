/*!
 * SIMD-Accelerated Byte Scanning
 *
 * Vectorized classifiers with automatic CPU feature detection and a scalar
 * fallback for short inputs and other architectures.
 */

mod ascii;
mod platform;

pub use ascii::is_ascii;
pub use platform::{detect_simd_support, SimdCapabilities};

use std::sync::OnceLock;

/// Global SIMD capabilities
static SIMD_CAPS: OnceLock<SimdCapabilities> = OnceLock::new();

/// Initialize SIMD capabilities detection, logging what was found
pub fn init_simd() -> &'static SimdCapabilities {
    SIMD_CAPS.get_or_init(|| {
        let caps = platform::detect_simd_support();
        tracing::info!(
            sse2 = caps.sse2,
            avx2 = caps.avx2,
            neon = caps.neon,
            max_vector_bytes = caps.max_vector_bytes(),
            "SIMD capabilities detected"
        );
        caps
    })
}

/// Get SIMD capabilities
pub fn capabilities() -> &'static SimdCapabilities {
    SIMD_CAPS.get_or_init(platform::detect_simd_support)
}

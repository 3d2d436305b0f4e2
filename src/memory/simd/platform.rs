/*!
 * Platform-specific SIMD Detection
 * Detects the instruction sets used by the byte scanners
 */

/// SIMD capabilities available on the platform
#[derive(Debug, Clone, Copy, Default)]
pub struct SimdCapabilities {
    /// SSE2 support (baseline on x86_64)
    pub sse2: bool,
    /// AVX2 support (x86_64)
    pub avx2: bool,
    /// NEON support (ARM)
    pub neon: bool,
}

impl SimdCapabilities {
    /// Widest vector register usable by the scanners, in bytes
    pub fn max_vector_bytes(&self) -> usize {
        if self.avx2 {
            32
        } else if self.sse2 || self.neon {
            16
        } else {
            8
        }
    }
}

/// Detect available SIMD instruction sets
pub fn detect_simd_support() -> SimdCapabilities {
    #[cfg(target_arch = "x86_64")]
    {
        SimdCapabilities {
            sse2: is_x86_feature_detected!("sse2"),
            avx2: is_x86_feature_detected!("avx2"),
            neon: false,
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        SimdCapabilities {
            sse2: false,
            avx2: false,
            neon: std::arch::is_aarch64_feature_detected!("neon"),
        }
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        SimdCapabilities::default()
    }
}

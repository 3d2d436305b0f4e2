/*!
 * Vectorized ASCII Classification
 */

use crate::core::limits::SIMD_ASCII_THRESHOLD;

/// Check that every byte is <= 0x7F
pub fn is_ascii(data: &[u8]) -> bool {
    if data.len() < SIMD_ASCII_THRESHOLD {
        return is_ascii_scalar(data);
    }

    #[cfg(target_arch = "x86_64")]
    {
        let caps = super::capabilities();
        if caps.avx2 {
            unsafe {
                return is_ascii_avx2(data);
            }
        }
        if caps.sse2 {
            unsafe {
                return is_ascii_sse2(data);
            }
        }
    }

    // Fallback
    is_ascii_scalar(data)
}

#[inline]
fn is_ascii_scalar(data: &[u8]) -> bool {
    data.chunks(8)
        .all(|chunk| chunk.iter().fold(0u8, |acc, &b| acc | b) < 0x80)
}

// x86_64 AVX2 implementation: the movemask of a vector is the set of its sign bits
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn is_ascii_avx2(data: &[u8]) -> bool {
    use std::arch::x86_64::*;

    let mut offset = 0;
    while offset + 32 <= data.len() {
        let chunk = _mm256_loadu_si256(data.as_ptr().add(offset) as *const __m256i);
        if _mm256_movemask_epi8(chunk) != 0 {
            return false;
        }
        offset += 32;
    }

    is_ascii_scalar(&data[offset..])
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn is_ascii_sse2(data: &[u8]) -> bool {
    use std::arch::x86_64::*;

    let mut offset = 0;
    while offset + 16 <= data.len() {
        let chunk = _mm_loadu_si128(data.as_ptr().add(offset) as *const __m128i);
        if _mm_movemask_epi8(chunk) != 0 {
            return false;
        }
        offset += 16;
    }

    is_ascii_scalar(&data[offset..])
}

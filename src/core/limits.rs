/*!
 * Buffer Limits and Constants
 *
 * Centralized location for sizes, thresholds and widths used across the
 * buffer core. Grouped by subsystem.
 */

// =============================================================================
// ALLOCATION
// =============================================================================

/// Default size of the shared pool arena (8KB)
/// Requests smaller than half of this are carved from the arena
pub const DEFAULT_POOL_SIZE: usize = 8 * 1024;

/// Pool offsets are rounded up to this boundary after each carve
/// [PERF] Keeps 8-byte numeric fields of pooled views naturally aligned
pub const POOL_ALIGNMENT: usize = 8;

/// Largest buffer that can be allocated (4GB)
pub const MAX_LENGTH: usize = 1 << 32;

// =============================================================================
// CODECS
// =============================================================================

/// Widest field accepted by the variable-width `Int`/`UInt` family
pub const MAX_VARIABLE_INT_WIDTH: usize = 6;

/// Minimum input size before the vectorized ASCII scan is used
/// [PERF] Below this, the scalar word loop wins
pub const SIMD_ASCII_THRESHOLD: usize = 32;

/// Line width of base64 bodies inside PEM armor
pub const PEM_LINE_WIDTH: usize = 64;

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Bytes shown by `inspect()` before the "... N more bytes" suffix
pub const DEFAULT_INSPECT_MAX_BYTES: usize = 50;

/// Integers above this magnitude are printed with `_` separators in errors
pub const NUMERIC_SEPARATOR_THRESHOLD: f64 = 4_294_967_296.0;

/*!
 * AI-OS Buffer Library
 * Node.js-compatible binary buffers: aliasable views over shared regions,
 * numeric codecs and string transcoders
 */

pub mod buffer;
pub mod codec;
pub mod compare;
pub mod core;
pub mod keygen;
pub mod memory;
pub mod querystring;
pub mod source;

// Re-exports
pub use codec::{ByteOrder, Encoding};
pub use crate::core::{init_tracing, BufferConfig, BufferError, BufferResult, ErrorKind, JsObject, JsValue};
pub use keygen::{KeyPairBackend, KeyPairGenerator};
pub use memory::{BufferView, FillValue, MemoryRegion, Needle, PoolAllocator};
pub use querystring::{stringify, QsValue, StringifyOptions};
pub use source::{BufferSource, ElementKind, TypedArray};

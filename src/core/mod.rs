/*!
 * Core Buffer Infrastructure
 *
 * Shared building blocks for every subsystem:
 * - Error taxonomy with Node-compatible codes
 * - Limits and runtime configuration
 * - Dynamic argument values and their numeric conversion
 * - Tracing setup
 */

pub mod config;
pub mod errors;
pub mod limits;
pub mod tracer;
pub mod value;

pub use config::{config, set_config, BufferConfig};
pub use errors::{BufferError, BufferResult, ErrorKind};
pub use tracer::init_tracing;
pub use value::{format_number, parse_js_number, JsObject, JsValue};

//! Pure text processing for generated and encyclopedia text
//!
//! No I/O here. Both modules are total functions over `&str`.

pub mod field_parser;
pub mod normalizer;

pub use field_parser::{parse, parse_lenient, parse_strict};
pub use normalizer::{genus, normalize};

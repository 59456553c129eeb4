//! Declaration-level Go syntax tree consumed by `go125_sema`.
//!
//! - `ast` holds the arena-allocated nodes and the `ParsedFile` boundary type.
//! - `builder` assembles files programmatically (parser adapters, tests).

pub mod ast;
pub mod builder;

// Re-exports for convenience
pub use ast::ParsedFile;
pub use builder::{FileBuilder, ParamDecl};

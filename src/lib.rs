//! Semantic model of Go packages built from parsed declaration trees.
//!
//! - An [`Environment`] registers packages, translates their files and owns
//!   the shared [`TypeGraph`].
//! - Type names used before their declaration resolve to placeholders that
//!   the declaration binds later, across files and packages.
//! - [`TypeGraph::implements`] checks structural interface satisfaction.

pub mod builtin;
pub mod compat;
pub mod config;
pub mod env;
pub mod error;
pub mod listener;
pub mod locator;
pub mod model;
pub mod package;
pub mod source;
pub mod tags;
pub mod types;

mod translate;

// Re-exports for convenience
pub use config::EnvConfig;
pub use env::Environment;
pub use error::{Error, Result};
pub use listener::{AfterFile, BeforeFile, FileAction, FileListener};
pub use locator::{FsLocator, PackageLocator, PackageMeta};
pub use package::{Package, PackageId};
pub use source::SourceParser;
pub use tags::{StructTagDecoder, TagDecoder, TagError};
pub use types::{RefId, TypeGraph, TypeId};

pub use go125_syntax as syntax;

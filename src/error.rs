use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tags::TagError;

/// Every failure the model can report while building the environment.
///
/// None of these are recovered inside a file: the first one aborts the
/// translation of the file and is handed back to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("type not found: {0}")]
    TypeNotFound(String),

    #[error("builtin package not found")]
    BuiltInNotFound,

    #[error("package alias not found: {0}")]
    PackageAliasNotFound(String),

    #[error("unexpected selector identifier in {0}")]
    UnexpectedSelector(String),

    #[error("unexpected expression type: {0}")]
    UnexpectedExpressionType(&'static str),

    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    #[error("invalid tag `{raw}`: {source}")]
    TagDecode {
        raw: String,
        #[source]
        source: TagError,
    },

    #[error("cannot find package \"{import_path}\": {reason}")]
    PackageLocate { import_path: String, reason: String },

    #[error("package \"{0}\" is already registered")]
    DuplicatePackage(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Aborted(String),
}

impl Error {
    #[inline]
    pub fn locate(import_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::PackageLocate {
            import_path: import_path.into(),
            reason: reason.into(),
        }
    }

    /// Maps an io error on `path` to `FileNotFound` or `FileRead`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Error::FileNotFound(path)
        } else {
            Error::FileRead { path, source }
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

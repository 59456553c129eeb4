use std::path::Path;

use go125_syntax::ParsedFile;

use crate::error::Result;

/// Front-end turning a source file into a declaration tree.
///
/// No implementation ships with this crate: [`crate::Environment::import`]
/// and [`crate::Environment::parse_dir`] read Go files only through the
/// parser handed to [`crate::Environment::new`]. Any function
/// `Fn(&Path) -> Result<ParsedFile>` works, for example one wrapping an
/// external Go parser and filling a [`go125_syntax::FileBuilder`].
///
/// Read failures map to [`crate::Error::FileNotFound`] or
/// [`crate::Error::FileRead`].
pub trait SourceParser {
    fn parse_file(&self, path: &Path) -> Result<ParsedFile>;
}

impl<F> SourceParser for F
where
    F: Fn(&Path) -> Result<ParsedFile>,
{
    fn parse_file(&self, path: &Path) -> Result<ParsedFile> {
        self(path)
    }
}

//! Hooks around the translation of each file of a package.

use std::path::Path;

use crate::error::{Error, Result};
use crate::package::Package;

/// What to do with a file a [`FileListener`] was told about.
#[derive(Debug)]
pub enum FileAction {
    Continue,
    /// Leave the file out; the package is still marked explored
    Skip,
    /// Stop translating the package with this error
    Abort(Error),
}

/// Observer of per-file translation.
///
/// Both hooks default to doing nothing.
pub trait FileListener {
    fn before_file(&mut self, _package: &Package, _path: &Path) -> FileAction {
        FileAction::Continue
    }

    /// Called with the outcome of every file that was not skipped.
    ///
    /// Returning an error stops the package with that error. A file that
    /// failed stops the package even when this returns `Ok`.
    fn after_file(&mut self, _package: &Package, _path: &Path, _result: &Result<()>) -> Result<()> {
        Ok(())
    }
}

/// [`FileListener`] running a closure before each file.
pub struct BeforeFile<F>(pub F);

impl<F> FileListener for BeforeFile<F>
where
    F: FnMut(&Package, &Path) -> FileAction,
{
    fn before_file(&mut self, package: &Package, path: &Path) -> FileAction {
        (self.0)(package, path)
    }
}

/// [`FileListener`] running a closure after each file.
pub struct AfterFile<F>(pub F);

impl<F> FileListener for AfterFile<F>
where
    F: FnMut(&Package, &Path, &Result<()>) -> Result<()>,
{
    fn after_file(&mut self, package: &Package, path: &Path, result: &Result<()>) -> Result<()> {
        (self.0)(package, path, result)
    }
}

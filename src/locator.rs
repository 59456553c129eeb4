//! Mapping import paths to package directories and their source files.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// What a locator knows about a package before it is translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMeta {
    pub name: String,
    pub import_path: String,
    pub dir: PathBuf,
    /// Source files in translation order
    pub files: Vec<PathBuf>,
}

pub trait PackageLocator {
    /// Finds the package imported as `import_path` from `from_dir`.
    fn locate(&self, import_path: &str, from_dir: &Path) -> Result<PackageMeta>;

    /// Describes the package stored in `dir`.
    fn locate_dir(&self, dir: &Path) -> Result<PackageMeta>;
}

/// Locator over `GOROOT`/`GOPATH` style source trees.
///
/// An import path `a/b` is looked up as `<root>/a/b` in each root in turn;
/// paths starting with `./` or `../` are taken relative to `from_dir`. The
/// files of a package are the `.go` files directly inside its directory,
/// tests excluded, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct FsLocator {
    roots: Vec<PathBuf>,
}

impl FsLocator {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    /// Roots from `$GOROOT/src` and every `$GOPATH` entry's `src`.
    pub fn from_env() -> Self {
        let mut roots = Vec::new();
        if let Some(goroot) = std::env::var_os("GOROOT").filter(|v| !v.is_empty()) {
            roots.push(PathBuf::from(goroot).join("src"));
        }
        if let Some(gopath) = std::env::var_os("GOPATH") {
            roots.extend(std::env::split_paths(&gopath).map(|p| p.join("src")));
        }
        tracing::debug!(?roots, "source roots");
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn scan(&self, import_path: &str, dir: &Path) -> Result<PackageMeta> {
        if !dir.is_dir() {
            return Err(Error::locate(
                import_path,
                format!("{} is not a directory", dir.display()),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::locate(import_path, e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if name.ends_with(".go") && !name.ends_with("_test.go") {
                files.push(entry.into_path());
            }
        }

        let Some(first) = files.first() else {
            return Err(Error::locate(
                import_path,
                format!("no Go files in {}", dir.display()),
            ));
        };
        let name = package_clause(first)?.ok_or_else(|| {
            Error::locate(
                import_path,
                format!("no package clause in {}", first.display()),
            )
        })?;

        tracing::trace!(import_path, %name, files = files.len(), "located package");
        Ok(PackageMeta {
            name,
            import_path: import_path.to_owned(),
            dir: dir.to_path_buf(),
            files,
        })
    }
}

impl PackageLocator for FsLocator {
    fn locate(&self, import_path: &str, from_dir: &Path) -> Result<PackageMeta> {
        if is_local_import(import_path) {
            return self.scan(import_path, &from_dir.join(import_path));
        }

        for root in &self.roots {
            let dir = root.join(import_path);
            if dir.is_dir() {
                return self.scan(import_path, &dir);
            }
        }

        Err(Error::locate(
            import_path,
            format!("not found in any of {} source roots", self.roots.len()),
        ))
    }

    fn locate_dir(&self, dir: &Path) -> Result<PackageMeta> {
        let import_path = self
            .roots
            .iter()
            .find_map(|root| dir.strip_prefix(root).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|| dir.to_string_lossy().into_owned());
        self.scan(&import_path, dir)
    }
}

#[inline]
fn is_local_import(path: &str) -> bool {
    path == "." || path == ".." || path.starts_with("./") || path.starts_with("../")
}

/// Name from the `package` clause of a file.
fn package_clause(path: &Path) -> Result<Option<String>> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(package_name(&text).map(str::to_owned))
}

/// Identifier following the `package` keyword, which must be the first
/// token of `text` once comments are skipped.
fn package_name(text: &str) -> Option<&str> {
    let rest = skip_trivia(text).strip_prefix("package")?;
    let name = skip_trivia(rest);
    if name.len() == rest.len() {
        // `packagefoo`
        return None;
    }
    let end = name
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(name.len());
    (end > 0).then(|| &name[..end])
}

/// Drops leading whitespace, line comments and block comments.
fn skip_trivia(mut text: &str) -> &str {
    loop {
        text = text.trim_start();
        if let Some(rest) = text.strip_prefix("//") {
            text = rest.find('\n').map_or("", |end| &rest[end..]);
        } else if let Some(rest) = text.strip_prefix("/*") {
            match rest.find("*/") {
                Some(end) => text = &rest[end + 2..],
                None => return "",
            }
        } else {
            return text;
        }
    }
}

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use go125_sema::syntax::ParsedFile;
use go125_sema::{EnvConfig, Environment, Error, PackageLocator, PackageMeta, Result, SourceParser};
use tracing_subscriber::EnvFilter;

/// Logs to the test writer when `GO125_LOG` is set.
pub fn init_tracing() {
    if let Ok(filter) = EnvFilter::try_from_env("GO125_LOG") {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

type FileFn = Box<dyn Fn() -> ParsedFile>;

/// In-memory packages: metadata for the locator, file builders for the
/// parser.
#[derive(Default)]
pub struct Workspace {
    metas: Vec<PackageMeta>,
    files: HashMap<PathBuf, FileFn>,
    parses: Rc<Cell<usize>>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `file_name` to the package at `import_path`, creating the
    /// package on first use. Files keep the order they were added in.
    pub fn add_file(
        &mut self,
        import_path: &str,
        package: &str,
        file_name: &str,
        file: impl Fn() -> ParsedFile + 'static,
    ) -> PathBuf {
        let dir = Path::new("/src").join(import_path);
        let path = dir.join(file_name);
        match self.metas.iter_mut().find(|m| m.import_path == import_path) {
            Some(meta) => meta.files.push(path.clone()),
            None => self.metas.push(PackageMeta {
                name: package.to_owned(),
                import_path: import_path.to_owned(),
                dir,
                files: vec![path.clone()],
            }),
        }
        self.files.insert(path.clone(), Box::new(file));
        path
    }

    /// Counter of `parse_file` calls, shared with the environment.
    pub fn parses(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.parses)
    }

    pub fn into_env(self) -> Environment {
        init_tracing();
        let locator = MemoryLocator { metas: self.metas };
        let parser = MemoryParser {
            files: self.files,
            parses: self.parses,
        };
        Environment::new(EnvConfig::default(), locator, parser).expect("environment")
    }
}

pub struct MemoryLocator {
    metas: Vec<PackageMeta>,
}

impl PackageLocator for MemoryLocator {
    fn locate(&self, import_path: &str, _from_dir: &Path) -> Result<PackageMeta> {
        self.metas
            .iter()
            .find(|m| m.import_path == import_path)
            .cloned()
            .ok_or_else(|| Error::locate(import_path, "not in workspace"))
    }

    fn locate_dir(&self, dir: &Path) -> Result<PackageMeta> {
        self.metas
            .iter()
            .find(|m| m.dir == dir)
            .cloned()
            .ok_or_else(|| Error::locate(dir.display().to_string(), "not in workspace"))
    }
}

pub struct MemoryParser {
    files: HashMap<PathBuf, FileFn>,
    parses: Rc<Cell<usize>>,
}

impl SourceParser for MemoryParser {
    fn parse_file(&self, path: &Path) -> Result<ParsedFile> {
        self.parses.set(self.parses.get() + 1);
        self.files
            .get(path)
            .map(|build| build())
            .ok_or_else(|| Error::FileNotFound(path.to_path_buf()))
    }
}

/// Environment without any package besides `builtin`.
pub fn empty_env() -> Environment {
    Workspace::new().into_env()
}

/// Registers a bare package and returns its id.
pub fn new_package(env: &mut Environment, name: &str) -> go125_sema::PackageId {
    env.append_package(go125_sema::Package::new(name, name))
        .expect("fresh package")
}

/// Translates `file` into a new package named after its package clause.
pub fn translate(env: &mut Environment, file: ParsedFile) -> go125_sema::PackageId {
    let pkg = new_package(env, file.package_name());
    env.translate_file(pkg, Path::new("file.go"), &file)
        .expect("translation");
    pkg
}

use std::path::{Path, PathBuf};

/// Settings of one analysis session.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Directory imports are resolved from; the process directory when unset.
    pub current_dir: Option<PathBuf>,
    /// Logs every parsed tree at `trace` level before it is translated.
    pub dump_ast: bool,
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn with_dump_ast(mut self, dump: bool) -> Self {
        self.dump_ast = dump;
        self
    }

    /// The `from_dir` handed to the package locator.
    pub fn import_root(&self) -> &Path {
        self.current_dir.as_deref().unwrap_or(Path::new("."))
    }
}

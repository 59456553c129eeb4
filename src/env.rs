use std::fmt;
use std::path::Path;

use go125_syntax::ParsedFile;
use la_arena::Arena;
use rustc_hash::FxHashMap;

use crate::builtin::{self, BUILTIN_IMPORT_PATH};
use crate::config::EnvConfig;
use crate::error::{Error, Result};
use crate::listener::{FileAction, FileListener};
use crate::locator::{PackageLocator, PackageMeta};
use crate::package::{Package, PackageId};
use crate::source::SourceParser;
use crate::tags::{StructTagDecoder, TagDecoder};
use crate::translate::{FileScope, Translator};
use crate::types::{RefId, TypeGraph, TypeId};

/// Every package seen during one analysis session and the type graph they
/// share.
pub struct Environment {
    pub(crate) config: EnvConfig,
    pub(crate) graph: TypeGraph,
    pub(crate) packages: Arena<Package>,
    by_import_path: FxHashMap<String, PackageId>,
    builtin: Option<PackageId>,
    pub(crate) locator: Box<dyn PackageLocator>,
    parser: Box<dyn SourceParser>,
    pub(crate) tags: Box<dyn TagDecoder>,
    listener: Option<Box<dyn FileListener>>,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("config", &self.config)
            .field("packages", &self.by_import_path.len())
            .field("types", &self.graph.type_count())
            .finish_non_exhaustive()
    }
}

impl Environment {
    /// Creates an environment with the `builtin` package already in place.
    pub fn new(
        config: EnvConfig,
        locator: impl PackageLocator + 'static,
        parser: impl SourceParser + 'static,
    ) -> Result<Self> {
        let mut env = Self {
            config,
            graph: TypeGraph::new(),
            packages: Arena::new(),
            by_import_path: FxHashMap::default(),
            builtin: None,
            locator: Box::new(locator),
            parser: Box::new(parser),
            tags: Box::new(StructTagDecoder),
            listener: None,
        };

        let id = env.append_package(builtin::new_package())?;
        builtin::populate(&mut env.graph, id, &mut env.packages[id]);

        env.builtin = env
            .package_by_import_path(BUILTIN_IMPORT_PATH)
            .filter(|&id| builtin::is_complete(&env.packages[id]));
        env.builtin()?;
        Ok(env)
    }

    pub fn set_listener(&mut self, listener: impl FileListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn set_tag_decoder(&mut self, decoder: impl TagDecoder + 'static) {
        self.tags = Box::new(decoder);
    }

    #[inline]
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    #[inline]
    pub fn types(&self) -> &TypeGraph {
        &self.graph
    }

    pub fn builtin(&self) -> Result<PackageId> {
        self.builtin.ok_or(Error::BuiltInNotFound)
    }

    // ---------------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------------

    #[inline]
    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id]
    }

    #[inline]
    pub fn package_mut(&mut self, id: PackageId) -> &mut Package {
        &mut self.packages[id]
    }

    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &Package)> + '_ {
        self.packages.iter()
    }

    #[inline]
    pub fn package_by_import_path(&self, import_path: &str) -> Option<PackageId> {
        self.by_import_path.get(import_path).copied()
    }

    /// Registers `package` under its import path and links it to the
    /// package one path segment up, in both directions, when present.
    pub fn append_package(&mut self, package: Package) -> Result<PackageId> {
        if self.by_import_path.contains_key(&package.import_path) {
            return Err(Error::DuplicatePackage(package.import_path));
        }

        let import_path = package.import_path.clone();
        let id = self.packages.alloc(package);
        self.by_import_path.insert(import_path.clone(), id);

        if let Some(parent) = import_path
            .rsplit_once('/')
            .and_then(|(parent, _)| self.package_by_import_path(parent))
        {
            self.packages[id].parent = Some(parent);
            self.packages[parent].subpackages.push(id);
        }
        let prefix = format!("{import_path}/");
        let children: Vec<_> = self
            .packages
            .iter()
            .filter(|(_, p)| {
                p.parent.is_none()
                    && p.import_path
                        .strip_prefix(&prefix)
                        .is_some_and(|rest| !rest.contains('/'))
            })
            .map(|(child, _)| child)
            .collect();
        for child in children {
            self.packages[child].parent = Some(id);
            self.packages[id].subpackages.push(child);
        }

        tracing::debug!(%import_path, "package registered");
        Ok(id)
    }

    /// Package for `meta`, registered on first sight.
    pub(crate) fn register_meta(&mut self, meta: &PackageMeta) -> Result<PackageId> {
        match self.package_by_import_path(&meta.import_path) {
            Some(id) => Ok(id),
            None => self.append_package(Package::from_meta(meta)),
        }
    }

    /// Named reference `name` of package `pkg`, created as an unresolved
    /// placeholder when the package does not know it yet.
    ///
    /// The flag tells whether the reference already existed.
    pub fn ensure_ref_type(&mut self, pkg: PackageId, name: &str) -> (RefId, bool) {
        if let Some(r) = self.packages[pkg].ref_type_by_name(name) {
            return (r, true);
        }
        let r = self.graph.placeholder(Some(pkg), name);
        self.packages[pkg].register_ref_type(name, r);
        tracing::trace!(package = %self.packages[pkg].name, name, "placeholder created");
        (r, false)
    }

    /// Method `name` in the method set of `ty`.
    pub fn method_by_name(&self, ty: TypeId, name: &str) -> Option<TypeId> {
        self.graph.methods_of(ty)?.get(name)
    }

    #[inline]
    pub fn implements(&self, ty: TypeId, iface: TypeId) -> bool {
        self.graph.implements(ty, iface)
    }

    /// Stores on every struct of `pkg` the interfaces of `pkg` it
    /// implements. Returns how many new pairs were recorded.
    pub fn record_implementations(&mut self, pkg: PackageId) -> usize {
        let package = &self.packages[pkg];
        let interfaces = package.interfaces.clone();
        let mut recorded = 0;

        for &ty in &package.structs {
            let found: Vec<_> = interfaces
                .iter()
                .copied()
                .filter(|&iface| self.graph.implements(ty, iface))
                .collect();
            let Some(st) = self.graph.struct_type_mut(ty) else {
                continue;
            };
            for iface in found {
                if !st.interfaces.contains(&iface) {
                    st.interfaces.push(iface);
                    recorded += 1;
                }
            }
        }
        recorded
    }

    // ---------------------------------------------------------------------
    // Translation
    // ---------------------------------------------------------------------

    /// Translates one parsed file into package `pkg`.
    ///
    /// Stops at the first error; whatever was declared before it stays in
    /// the registry.
    #[tracing::instrument(level = "debug", skip(self, path, file), fields(path = %path.display()))]
    pub fn translate_file(&mut self, pkg: PackageId, path: &Path, file: &ParsedFile) -> Result<()> {
        if self.config.dump_ast {
            tracing::trace!(ast = ?file.root, "parsed file");
        }

        let builtin = self.builtin()?;
        let mut scope = FileScope::new(pkg);
        if pkg != builtin {
            scope.dot_imports.push(builtin);
        }

        if let Some(doc) = file.root.doc {
            let lines = file.comment_lines(doc);
            self.packages[pkg].doc.comments.extend(lines);
        }

        Translator::new(self, file, scope).run()
    }

    /// Translates every file of `pkg` unless it was explored already.
    #[tracing::instrument(level = "debug", skip(self), fields(package = %self.packages[pkg].import_path))]
    pub fn translate_package(&mut self, pkg: PackageId) -> Result<()> {
        if self.packages[pkg].is_explored() {
            tracing::trace!("already explored");
            return Ok(());
        }

        let files = self.packages[pkg].files.clone();
        for path in &files {
            if let Some(listener) = self.listener.as_mut() {
                match listener.before_file(&self.packages[pkg], path) {
                    FileAction::Continue => {}
                    FileAction::Skip => {
                        tracing::debug!(path = %path.display(), "file skipped");
                        continue;
                    }
                    FileAction::Abort(err) => return Err(err),
                }
            }

            let result = self
                .parser
                .parse_file(path)
                .and_then(|file| self.translate_file(pkg, path, &file));

            if let Some(listener) = self.listener.as_mut() {
                listener.after_file(&self.packages[pkg], path, &result)?;
            }
            result?;
        }

        self.packages[pkg].mark_explored();
        tracing::debug!(files = files.len(), "package translated");
        Ok(())
    }

    /// Locates `import_path` from the configured directory, registers it and
    /// translates it unless it was explored.
    pub fn import(&mut self, import_path: &str) -> Result<PackageId> {
        if let Some(id) = self
            .package_by_import_path(import_path)
            .filter(|&id| self.packages[id].is_explored())
        {
            return Ok(id);
        }

        let meta = self.locator.locate(import_path, self.config.import_root())?;
        let id = self.register_meta(&meta)?;
        self.translate_package(id)?;
        Ok(id)
    }

    /// Same as [`Environment::import`] for the package stored in `dir`.
    pub fn parse_dir(&mut self, dir: &Path) -> Result<PackageId> {
        let meta = self.locator.locate_dir(dir)?;
        let id = self.register_meta(&meta)?;
        self.translate_package(id)?;
        Ok(id)
    }
}

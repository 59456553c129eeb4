//! # Declaration translator
//!
//! Walks the top-level declarations of one [`ParsedFile`] in source order
//! and records them in the environment:
//!
//! - **types**: structs, interfaces and other defined types bind the named
//!   reference of their package, creating it if no earlier use did
//! - **imports**: locate and register the package, then fill the file's
//!   alias map or wildcard list
//! - **values**: `var` and `const` with a declared or inferred type
//! - **functions**: free functions go to the package, methods to the named
//!   reference of their receiver
//!
//! Name lookup order for an unqualified type name is: type parameters in
//! scope, the current package, then the wildcard imports in import order
//! (`builtin` first). A name found nowhere becomes a placeholder in the
//! current package, bound later by its declaration.

mod decls;
mod resolve;

use go125_syntax::ParsedFile;
use go125_syntax::ast::{CommentGroupId, GenDecl, GenDeclKind, Spec, TopLevelDecl, ValueSpec};
use rustc_hash::FxHashMap;

use crate::env::Environment;
use crate::error::Result;
use crate::model::Doc;
use crate::package::{Package, PackageId};
use crate::types::RefId;

/// Name resolution context of one file.
#[derive(Debug)]
pub(crate) struct FileScope {
    pub package: PackageId,
    /// Packages imported with `.`, searched in order after the current one
    pub dot_imports: Vec<PackageId>,
    pub aliases: FxHashMap<String, PackageId>,
}

impl FileScope {
    pub fn new(package: PackageId) -> Self {
        Self {
            package,
            dot_imports: Vec::new(),
            aliases: FxHashMap::default(),
        }
    }
}

pub(crate) struct Translator<'env, 'file> {
    env: &'env mut Environment,
    file: &'file ParsedFile,
    scope: FileScope,
    /// Type parameters of the declaration being translated
    type_params: Vec<(String, RefId)>,
}

impl<'env, 'file> Translator<'env, 'file> {
    pub fn new(env: &'env mut Environment, file: &'file ParsedFile, scope: FileScope) -> Self {
        Self {
            env,
            file,
            scope,
            type_params: Vec::new(),
        }
    }

    pub fn run(mut self) -> Result<()> {
        let file = self.file;
        for decl in &file.root.decls {
            self.type_params.clear();
            match decl {
                TopLevelDecl::Gen(decl) => self.gen_decl(decl)?,
                TopLevelDecl::Func(decl) => self.func_decl(decl)?,
            }
        }
        tracing::debug!(
            package = %self.env.packages[self.scope.package].name,
            decls = file.root.decls.len(),
            "file translated"
        );
        Ok(())
    }

    fn gen_decl(&mut self, decl: &'file GenDecl) -> Result<()> {
        // a const spec without type and values repeats the previous one
        let mut previous: Option<&'file ValueSpec> = None;

        for spec in &decl.specs {
            self.type_params.clear();
            match spec {
                Spec::Import(spec) => self.import_spec(spec)?,
                Spec::Type(spec) => self.type_spec(spec, decl.doc)?,
                Spec::Value(spec) => {
                    let source = match previous {
                        Some(prev)
                            if decl.kind == GenDeclKind::Const
                                && spec.typ.is_none()
                                && spec.values.is_empty() =>
                        {
                            prev
                        }
                        _ => spec,
                    };
                    self.value_spec(spec, source, decl.kind, decl.doc)?;
                    previous = Some(source);
                }
            }
        }
        Ok(())
    }

    fn doc(&self, group: Option<CommentGroupId>) -> Doc {
        group
            .map(|g| Doc::new(self.file.comment_lines(g)))
            .unwrap_or_default()
    }

    #[inline]
    fn package(&mut self) -> &mut Package {
        &mut self.env.packages[self.scope.package]
    }
}

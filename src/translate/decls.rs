use go125_syntax::ast::{
    self, CommentGroupId, FieldId, FuncDecl, GenDeclKind, IdentName, ImportName, ImportSpec,
    InterfaceElem, SignatureId, Type, TypeSpec, ValueSpec,
};

use super::Translator;
use crate::error::{Error, Result};
use crate::model::{
    Doc, Field, InterfaceType, MethodArgument, MethodDescriptor, StructType, Tag, Variable,
};
use crate::types::{TypeData, TypeId, TypeKind};

/// Name given to struct types declared inline.
pub(super) const ANONYMOUS_STRUCT: &str = "struct{...}";

impl<'file> Translator<'_, 'file> {
    // ---------------------------------------------------------------------
    // Imports
    // ---------------------------------------------------------------------

    pub(super) fn import_spec(&mut self, spec: &ImportSpec) -> Result<()> {
        let file = self.file;
        let path = file.string_value(spec.path);
        let meta = self
            .env
            .locator
            .locate(path, self.env.config.import_root())?;
        let pkg = self.env.register_meta(&meta)?;

        match spec.name {
            None => {
                let alias = self.env.packages[pkg].name.clone();
                tracing::trace!(path, %alias, "import");
                self.scope.aliases.insert(alias, pkg);
            }
            Some(ImportName::Name(alias)) => {
                let alias = file.name(alias);
                tracing::trace!(path, alias, "aliased import");
                self.scope.aliases.insert(alias.to_owned(), pkg);
            }
            Some(ImportName::Dot(_)) => {
                tracing::trace!(path, "wildcard import");
                self.env.translate_package(pkg)?;
                if !self.scope.dot_imports.contains(&pkg) {
                    self.scope.dot_imports.push(pkg);
                }
            }
            Some(ImportName::Blank(_)) => tracing::trace!(path, "blank import"),
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Types
    // ---------------------------------------------------------------------

    pub(super) fn type_spec(&mut self, spec: &TypeSpec, group_doc: Option<CommentGroupId>) -> Result<()> {
        let file = self.file;
        let name = file.name(spec.name);
        let doc = self.doc(spec.doc.or(group_doc));
        self.enter_type_params(
            spec.type_params
                .iter()
                .flat_map(|&f| file.arena.fields[f].names.iter().copied()),
        );
        tracing::trace!(name, alias = spec.alias, "type declaration");

        if spec.alias {
            return self.declare_alias(name, spec.typ);
        }
        match &file.arena.types[spec.typ] {
            Type::Struct { fields } => self.declare_struct(name, doc, fields),
            Type::Interface { elems } => self.declare_interface(name, doc, elems),
            _ => {
                self.declare(name, TypeKind::Base);
                Ok(())
            }
        }
    }

    /// Allocates a type named `name`, binds the package's reference of that
    /// name to it and registers it in the package lists.
    fn declare(&mut self, name: &str, kind: TypeKind) -> TypeId {
        let pkg = self.scope.package;
        let ty = self
            .env
            .graph
            .alloc_type(TypeData::new(name, Some(pkg), kind));
        let (r, _) = self.env.ensure_ref_type(pkg, name);
        self.env.graph.bind(r, ty);

        let package = &mut self.env.packages[pkg];
        match &self.env.graph.type_data(ty).kind {
            TypeKind::Struct(_) => package.append_struct(name, ty),
            TypeKind::Interface(_) => package.append_interface(name, ty),
            _ => package.append_type(name, ty),
        }
        ty
    }

    /// `type A = T` gives the reference of `T` a second name. A placeholder
    /// left by an earlier use of `A` turns into an alias of it.
    fn declare_alias(&mut self, name: &str, typ: ast::TypeId) -> Result<()> {
        let pkg = self.scope.package;
        let target = self.resolve_type(typ)?;
        if let Some(existing) = self.env.packages[pkg].ref_type_by_name(name) {
            if !self.env.graph.alias(existing, target) {
                return Err(Error::Unsupported("recursive type alias"));
            }
        }
        self.env.packages[pkg].register_ref_type(name, target);
        Ok(())
    }

    fn declare_struct(&mut self, name: &str, doc: Doc, fields: &'file [FieldId]) -> Result<()> {
        let ty = self.declare(
            name,
            TypeKind::Struct(StructType {
                doc,
                ..Default::default()
            }),
        );
        self.struct_fields(ty, fields)
    }

    pub(super) fn struct_fields(&mut self, ty: TypeId, fields: &'file [FieldId]) -> Result<()> {
        for &field in fields {
            let translated = self.field(field)?;
            if let Some(st) = self.env.graph.struct_type_mut(ty) {
                st.fields.extend(translated);
            }
        }
        Ok(())
    }

    /// One model field per declared name; an embedded field is named after
    /// its type.
    fn field(&mut self, id: FieldId) -> Result<Vec<Field>> {
        let file = self.file;
        let field = &file.arena.fields[id];
        let ref_type = self.resolve_type(field.typ)?;
        let doc = self.doc(field.doc);
        let tag = match field.tag {
            Some(lit) => self.tag(file.string_value(lit))?,
            None => Tag::default(),
        };

        if field.is_embedded() {
            return Ok(vec![Field {
                name: self.env.graph.ref_name(ref_type).to_owned(),
                ref_type,
                tag,
                doc,
                embedded: true,
            }]);
        }

        Ok(field
            .names
            .iter()
            .map(|&n| Field {
                name: file.name(n).to_owned(),
                ref_type,
                tag: tag.clone(),
                doc: doc.clone(),
                embedded: false,
            })
            .collect())
    }

    fn tag(&self, raw: &str) -> Result<Tag> {
        let mut tag = Tag::new(raw);
        if raw.is_empty() {
            return Ok(tag);
        }

        let params = self.env.tags.decode(raw).map_err(|source| Error::TagDecode {
            raw: raw.to_owned(),
            source,
        })?;
        for param in params {
            let key = param.name.clone();
            if !tag.push(param) {
                tracing::trace!(%key, "duplicate tag key ignored");
            }
        }
        Ok(tag)
    }

    fn declare_interface(&mut self, name: &str, doc: Doc, elems: &'file [InterfaceElem]) -> Result<()> {
        let file = self.file;
        let ty = self.declare(name, TypeKind::Interface(InterfaceType::new(doc)));

        for elem in elems {
            match elem {
                InterfaceElem::Method { name, sig } => {
                    let method_name = file.name(*name);
                    let method = self.method_type(method_name, Doc::default(), None, *sig)?;
                    if let Some(iface) = self.env.graph.interface_type_mut(ty) {
                        iface.push_method(method_name, method);
                    }
                }
                // TODO: merge the method sets of embedded interfaces
                InterfaceElem::Embedded(_) => {
                    return Err(Error::Unsupported("embedded interfaces"));
                }
                InterfaceElem::Union(_) => {
                    return Err(Error::Unsupported("type constraint unions"));
                }
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Values
    // ---------------------------------------------------------------------

    /// `spec` names the values; `source` carries the type and initializers,
    /// which differ only for const specs that repeat the previous line.
    pub(super) fn value_spec(
        &mut self,
        spec: &ValueSpec,
        source: &ValueSpec,
        kind: GenDeclKind,
        group_doc: Option<CommentGroupId>,
    ) -> Result<()> {
        let file = self.file;
        let declared = source.typ.map(|t| self.resolve_type(t)).transpose()?;
        let doc = self.doc(spec.doc.or(group_doc));

        for (i, &ident) in spec.names.iter().enumerate() {
            let name = file.name(ident);
            if name == "_" {
                continue;
            }

            let ref_type = match declared {
                Some(r) => Some(r),
                None => match source.values.get(i).or_else(|| source.values.first()) {
                    Some(&value) => self.infer_value_type(value)?,
                    None => None,
                },
            };

            tracing::trace!(name, typed = ref_type.is_some(), ?kind, "value declaration");
            let variable = Variable {
                name: name.to_owned(),
                ref_type,
                doc: doc.clone(),
            };
            match kind {
                GenDeclKind::Const => self.package().append_constant(variable),
                _ => self.package().append_variable(variable),
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Functions
    // ---------------------------------------------------------------------

    pub(super) fn func_decl(&mut self, decl: &FuncDecl) -> Result<()> {
        let file = self.file;
        let name = file.name(decl.name);
        let doc = self.doc(decl.doc);

        let mut params: Vec<IdentName> = decl
            .type_params
            .iter()
            .flat_map(|&f| file.arena.fields[f].names.iter().copied())
            .collect();

        let recv = match decl.recv {
            Some(id) => {
                let field = &file.arena.fields[id];
                params.extend(self.receiver_type_params(field.typ));
                self.enter_type_params(params);
                let ref_type = self.resolve_type(field.typ)?;
                let recv_name = field.names.first().map(|&n| file.name(n)).unwrap_or_default();
                Some(MethodArgument::new(recv_name, ref_type))
            }
            None => {
                self.enter_type_params(params);
                None
            }
        };
        tracing::trace!(name, method = recv.is_some(), "function declaration");

        let owner = recv.as_ref().map(|r| r.ref_type);
        let method = self.method_type(name, doc, recv, decl.sig)?;
        match owner {
            Some(owner) => {
                self.env.graph.add_method(owner, method);
            }
            None => self.package().append_function(name, method),
        }
        Ok(())
    }

    /// Method descriptor for `sig`, allocated in the current package.
    pub(super) fn method_type(
        &mut self,
        name: &str,
        doc: Doc,
        recv: Option<MethodArgument>,
        sig: SignatureId,
    ) -> Result<TypeId> {
        let (arguments, results) = self.signature(sig)?;
        let descriptor = MethodDescriptor {
            doc,
            recv,
            arguments,
            results,
            tag: Tag::default(),
        };
        Ok(self.env.graph.alloc_type(TypeData::new(
            name,
            Some(self.scope.package),
            TypeKind::Method(descriptor),
        )))
    }

    pub(super) fn signature(&mut self, sig: SignatureId) -> Result<(Vec<MethodArgument>, Vec<MethodArgument>)> {
        let file = self.file;
        let sig = &file.arena.signatures[sig];
        Ok((self.arguments(&sig.params)?, self.arguments(&sig.results)?))
    }

    /// One argument per declared name, a single unnamed one otherwise. Names
    /// sharing a type share its reference.
    fn arguments(&mut self, fields: &[FieldId]) -> Result<Vec<MethodArgument>> {
        let file = self.file;
        let mut out = Vec::with_capacity(fields.len());
        for &id in fields {
            let field = &file.arena.fields[id];
            let ref_type = self.resolve_type(field.typ)?;
            if field.names.is_empty() {
                out.push(MethodArgument::new("", ref_type));
            } else {
                out.extend(
                    field
                        .names
                        .iter()
                        .map(|&n| MethodArgument::new(file.name(n), ref_type)),
                );
            }
        }
        Ok(out)
    }
}

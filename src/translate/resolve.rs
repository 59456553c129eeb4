use go125_syntax::ast::{self, BasicLitKind, Expr, ExprId, FieldId, IdentName, Type, UnaryOp};

use super::Translator;
use super::decls::ANONYMOUS_STRUCT;
use crate::error::{Error, Result};
use crate::model::StructType;
use crate::types::{RefId, TypeData, TypeKind};

/// Builtin type a literal of `kind` defaults to.
fn literal_type(kind: BasicLitKind) -> &'static str {
    match kind {
        BasicLitKind::Int => "int",
        BasicLitKind::Float => "float64",
        BasicLitKind::Imag => "complex128",
        BasicLitKind::Rune => "rune",
        BasicLitKind::String => "string",
    }
}

impl<'file> Translator<'_, 'file> {
    /// Reference for a type expression.
    pub(super) fn resolve_type(&mut self, typ: ast::TypeId) -> Result<RefId> {
        let file = self.file;
        match &file.arena.types[typ] {
            // instantiation arguments do not take part in identity
            Type::Named { name, .. } => self.resolve_name(file.name(*name)),
            Type::Selector { base, sel, .. } => self.resolve_qualified(*base, file.name(*sel)),
            Type::Pointer { elem } => {
                let inner = self.resolve_type(*elem)?;
                Ok(self.env.graph.pointer_of(inner))
            }
            Type::Slice { elem } | Type::Array { elem, .. } => {
                let inner = self.resolve_type(*elem)?;
                Ok(self.env.graph.array_of(inner))
            }
            Type::Chan { elem, .. } => {
                let inner = self.resolve_type(*elem)?;
                Ok(self.env.graph.channel_of(inner))
            }
            Type::Ellipsis { elem } => {
                let inner = self.resolve_type(*elem)?;
                Ok(self.env.graph.ellipsis_of(inner))
            }
            Type::Map { key, val } => {
                let key = self.resolve_type(*key)?;
                let value = self.resolve_type(*val)?;
                Ok(self.env.graph.map_of(Some(self.scope.package), key, value))
            }
            Type::Func { sig } => {
                let pkg = self.scope.package;
                let ty = self.method_type("", Default::default(), None, *sig)?;
                Ok(self.env.graph.fresh(Some(pkg), "", ty))
            }
            Type::Interface { .. } => Ok(self.env.graph.empty_interface()),
            Type::Struct { fields } => self.anonymous_struct(fields),
            Type::Paren { typ } => self.resolve_type(*typ),
            Type::Bad(_) => Err(Error::UnexpectedExpressionType("bad type expression")),
        }
    }

    /// Unqualified name: type parameters, the current package, then the
    /// wildcard imports in order. Unknown names become placeholders in the
    /// current package.
    pub(super) fn resolve_name(&mut self, name: &str) -> Result<RefId> {
        if name.is_empty() || name == "_" {
            return Err(Error::TypeNotFound(name.to_owned()));
        }
        if let Some(&(_, r)) = self.type_params.iter().find(|(n, _)| n == name) {
            return Ok(r);
        }

        let packages = &self.env.packages;
        let found = std::iter::once(self.scope.package)
            .chain(self.scope.dot_imports.iter().copied())
            .find_map(|pkg| packages[pkg].ref_type_by_name(name));
        if let Some(r) = found {
            return Ok(r);
        }

        Ok(self.env.ensure_ref_type(self.scope.package, name).0)
    }

    /// `alias.Name`, looked up or created in the aliased package.
    fn resolve_qualified(&mut self, base: ExprId, name: &str) -> Result<RefId> {
        let file = self.file;
        let Expr::Ident(qualifier) = file.arena.exprs[base] else {
            return Err(Error::UnexpectedSelector(format!("(...).{name}")));
        };
        let alias = file.name(qualifier);
        let pkg = self
            .scope
            .aliases
            .get(alias)
            .copied()
            .ok_or_else(|| Error::PackageAliasNotFound(alias.to_owned()))?;
        Ok(self.env.ensure_ref_type(pkg, name).0)
    }

    fn anonymous_struct(&mut self, fields: &'file [FieldId]) -> Result<RefId> {
        let pkg = self.scope.package;
        let ty = self.env.graph.alloc_type(TypeData::new(
            ANONYMOUS_STRUCT,
            Some(pkg),
            TypeKind::Struct(StructType::default()),
        ));
        let r = self.env.graph.fresh(Some(pkg), ANONYMOUS_STRUCT, ty);
        self.struct_fields(ty, fields)?;
        Ok(r)
    }

    /// Type of an initializer when it is evident from its shape: basic
    /// literals, `true`/`false`, composite literals and their address.
    pub(super) fn infer_value_type(&mut self, expr: ExprId) -> Result<Option<RefId>> {
        let file = self.file;
        match file.arena.exprs[expr] {
            Expr::BasicLit(lit) => self.resolve_name(literal_type(lit.kind)).map(Some),
            Expr::Ident(ident) => match file.name(ident) {
                "true" | "false" => self.resolve_name("bool").map(Some),
                "iota" => self.resolve_name("int").map(Some),
                _ => Ok(None),
            },
            Expr::CompositeLit { typ: Some(typ) } => self.resolve_type(typ).map(Some),
            Expr::Unary {
                op: UnaryOp::Addr,
                expr,
            } => Ok(self
                .infer_value_type(expr)?
                .map(|inner| self.env.graph.pointer_of(inner))),
            Expr::Unary {
                op: UnaryOp::Add | UnaryOp::Sub | UnaryOp::Xor | UnaryOp::Not,
                expr,
            }
            | Expr::Paren(expr) => self.infer_value_type(expr),
            _ => Ok(None),
        }
    }

    /// Names bound by the instantiation of a receiver type, `T` in
    /// `func (l *List[T]) ...`.
    pub(super) fn receiver_type_params(&self, typ: ast::TypeId) -> Vec<IdentName> {
        let arena = &self.file.arena;
        match &arena.types[typ] {
            Type::Pointer { elem } | Type::Paren { typ: elem } => self.receiver_type_params(*elem),
            Type::Named { args, .. } => args
                .iter()
                .filter_map(|&arg| match arena.types[arg] {
                    Type::Named { name, .. } => Some(name),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Makes `names` resolvable as type parameters for the declaration being
    /// translated.
    pub(super) fn enter_type_params(&mut self, names: impl IntoIterator<Item = IdentName>) {
        let file = self.file;
        let pkg = self.scope.package;
        self.type_params.clear();
        for ident in names {
            let name = file.name(ident);
            let ty = self
                .env
                .graph
                .alloc_type(TypeData::new(name, Some(pkg), TypeKind::Base));
            let r = self.env.graph.fresh(Some(pkg), name, ty);
            self.type_params.push((name.to_owned(), r));
        }
    }
}

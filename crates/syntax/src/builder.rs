//! Programmatic construction of [`ParsedFile`]s.
//!
//! Parser front-ends and tests use [`FileBuilder`] to assemble a file node by
//! node. Literal and comment text is appended to the file's text buffer so
//! spans stay valid; the buffer is a token pool, not formatted Go.

use smallvec::SmallVec;

use crate::ast::{
    self, BasicLit, BasicLitKind, ChanDir, Comment, CommentGroup, CommentGroupId, CommentKind,
    Expr, ExprId, Field, FieldId, FuncDecl, GenDecl, GenDeclKind, IdentName, ImportName,
    ImportSpec, InterfaceElem, ParsedFile, Signature, SignatureId, SourceFile, Span, Spec,
    StringLit, TopLevelDecl, Type, TypeId, TypeSpec, UnaryOp, ValueSpec,
};

/// One parameter group as it comes out of a parameter list, before names
/// that only precede a type are merged into the following group.
#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub names: Vec<IdentName>,
    pub typ: Option<TypeId>,
}

#[derive(Debug)]
pub struct FileBuilder {
    arena: ast::AstArena,
    interner: ast::Interner,
    text: String,
    name: IdentName,
    doc: Option<CommentGroupId>,
    decls: Vec<TopLevelDecl>,
    comments: Vec<CommentGroupId>,
    pending_doc: Option<CommentGroupId>,
}

impl FileBuilder {
    /// Starts a file whose package clause names `package`.
    pub fn new(package: &str) -> Self {
        let mut b = Self {
            arena: ast::AstArena::new(),
            interner: ast::Interner::new(),
            text: String::new(),
            name: IdentName {
                sym: ast::Symbol::from_raw(0),
                pos: Span::default(),
            },
            doc: None,
            decls: Vec::new(),
            comments: Vec::new(),
            pending_doc: None,
        };
        b.name = b.ident(package);
        b
    }

    fn push_text(&mut self, s: &str) -> Span {
        let start = self.text.len();
        self.text.push_str(s);
        let span = Span::new(start, self.text.len());
        self.text.push('\n');
        span
    }

    pub fn ident(&mut self, name: &str) -> IdentName {
        let pos = self.push_text(name);
        IdentName {
            sym: self.interner.intern(name),
            pos,
        }
    }

    /// Allocates a comment group; `/*` prefixed lines become block comments.
    pub fn comment_group(&mut self, lines: &[&str]) -> CommentGroupId {
        let comments = lines
            .iter()
            .map(|line| Comment {
                kind: if line.starts_with("/*") {
                    CommentKind::Block
                } else {
                    CommentKind::Line
                },
                span: self.push_text(line),
            })
            .collect();
        let id = self.arena.comment_groups.alloc(CommentGroup { comments });
        self.comments.push(id);
        id
    }

    /// Sets the package doc comment.
    pub fn package_doc(&mut self, lines: &[&str]) -> &mut Self {
        self.doc = Some(self.comment_group(lines));
        self
    }

    /// Doc comment attached to the next declaration added.
    pub fn doc(&mut self, lines: &[&str]) -> &mut Self {
        self.pending_doc = Some(self.comment_group(lines));
        self
    }

    // ---------------------------------------------------------------------
    // Types
    // ---------------------------------------------------------------------

    fn alloc_type(&mut self, typ: Type) -> TypeId {
        self.arena.types.alloc(typ)
    }

    pub fn named(&mut self, name: &str) -> TypeId {
        let name = self.ident(name);
        self.alloc_type(Type::Named {
            name,
            args: Vec::new(),
        })
    }

    /// `Name[args...]`
    pub fn generic(&mut self, name: &str, args: Vec<TypeId>) -> TypeId {
        let name = self.ident(name);
        self.alloc_type(Type::Named { name, args })
    }

    /// `pkg.Name`
    pub fn qualified(&mut self, pkg: &str, name: &str) -> TypeId {
        let base = self.ident_expr(pkg);
        self.selector_type(base, name)
    }

    /// `<expr>.Name`, for qualifiers that are not plain identifiers.
    pub fn selector_type(&mut self, base: ExprId, name: &str) -> TypeId {
        let sel = self.ident(name);
        self.alloc_type(Type::Selector {
            base,
            sel,
            args: Vec::new(),
        })
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.alloc_type(Type::Pointer { elem })
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.alloc_type(Type::Slice { elem })
    }

    pub fn array(&mut self, len: &str, elem: TypeId) -> TypeId {
        let len = self.lit(BasicLitKind::Int, len);
        self.alloc_type(Type::Array { len, elem })
    }

    pub fn ellipsis(&mut self, elem: TypeId) -> TypeId {
        self.alloc_type(Type::Ellipsis { elem })
    }

    pub fn map(&mut self, key: TypeId, val: TypeId) -> TypeId {
        self.alloc_type(Type::Map { key, val })
    }

    pub fn chan(&mut self, dir: ChanDir, elem: TypeId) -> TypeId {
        self.alloc_type(Type::Chan { dir, elem })
    }

    pub fn func_type(&mut self, sig: SignatureId) -> TypeId {
        self.alloc_type(Type::Func { sig })
    }

    pub fn struct_type(&mut self, fields: Vec<FieldId>) -> TypeId {
        self.alloc_type(Type::Struct { fields })
    }

    pub fn interface_type(&mut self, elems: Vec<InterfaceElem>) -> TypeId {
        self.alloc_type(Type::Interface { elems })
    }

    /// `interface{}`
    pub fn empty_interface(&mut self) -> TypeId {
        self.interface_type(Vec::new())
    }

    pub fn paren(&mut self, typ: TypeId) -> TypeId {
        self.alloc_type(Type::Paren { typ })
    }

    pub fn bad_type(&mut self) -> TypeId {
        let span = self.push_text("<bad>");
        self.alloc_type(Type::Bad(span))
    }

    // ---------------------------------------------------------------------
    // Fields and signatures
    // ---------------------------------------------------------------------

    /// Field sharing one type across `names`; no names means an anonymous
    /// parameter or an embedded struct field.
    pub fn field(&mut self, names: &[&str], typ: TypeId) -> FieldId {
        let names = names.iter().map(|n| self.ident(n)).collect();
        self.arena.fields.alloc(Field {
            names,
            typ,
            tag: None,
            doc: None,
            comment: None,
        })
    }

    /// Struct field with a tag literal, delimiters included (`` `json:"id"` ``).
    pub fn tagged_field(&mut self, names: &[&str], typ: TypeId, tag: &str) -> FieldId {
        let id = self.field(names, typ);
        let raw = self.push_text(tag);
        self.arena.fields[id].tag = Some(StringLit { raw });
        id
    }

    /// Attaches a leading doc comment to a field.
    pub fn field_doc(&mut self, field: FieldId, lines: &[&str]) -> FieldId {
        let group = self.comment_group(lines);
        self.arena.fields[field].doc = Some(group);
        field
    }

    /// Merges name-only groups into the next typed group, the way
    /// `func(a, b int)` lists are written; trailing name-only groups are
    /// types of their own (`func(int, string)`).
    pub fn params(&mut self, params: Vec<ParamDecl>) -> Vec<FieldId> {
        let mut out = Vec::new();
        let mut pending_names: Vec<IdentName> = Vec::new();

        for param in params {
            if let Some(typ) = param.typ {
                let mut names: SmallVec<[IdentName; 1]> = SmallVec::new();
                names.extend(pending_names.drain(..));
                names.extend(param.names);
                out.push(self.arena.fields.alloc(Field {
                    names,
                    typ,
                    tag: None,
                    doc: None,
                    comment: None,
                }));
            } else {
                pending_names.extend(param.names);
            }
        }

        for name in pending_names {
            let typ = self.alloc_type(Type::Named {
                name,
                args: Vec::new(),
            });
            out.push(self.arena.fields.alloc(Field {
                names: SmallVec::new(),
                typ,
                tag: None,
                doc: None,
                comment: None,
            }));
        }

        out
    }

    pub fn signature(&mut self, params: Vec<FieldId>, results: Vec<FieldId>) -> SignatureId {
        self.arena.signatures.alloc(Signature { params, results })
    }

    pub fn method_elem(&mut self, name: &str, sig: SignatureId) -> InterfaceElem {
        InterfaceElem::Method {
            name: self.ident(name),
            sig,
        }
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    pub fn lit(&mut self, kind: BasicLitKind, raw: &str) -> ExprId {
        let raw = self.push_text(raw);
        self.arena.exprs.alloc(Expr::BasicLit(BasicLit { kind, raw }))
    }

    pub fn ident_expr(&mut self, name: &str) -> ExprId {
        let name = self.ident(name);
        self.arena.exprs.alloc(Expr::Ident(name))
    }

    pub fn selector_expr(&mut self, expr: ExprId, sel: &str) -> ExprId {
        let sel = self.ident(sel);
        self.arena.exprs.alloc(Expr::Selector { expr, sel })
    }

    /// `T{}`
    pub fn composite(&mut self, typ: TypeId) -> ExprId {
        self.arena
            .exprs
            .alloc(Expr::CompositeLit { typ: Some(typ) })
    }

    pub fn unary(&mut self, op: UnaryOp, expr: ExprId) -> ExprId {
        self.arena.exprs.alloc(Expr::Unary { op, expr })
    }

    pub fn call(&mut self, func: ExprId) -> ExprId {
        self.arena.exprs.alloc(Expr::Call { func })
    }

    pub fn other_expr(&mut self, text: &str) -> ExprId {
        let span = self.push_text(text);
        self.arena.exprs.alloc(Expr::Other(span))
    }

    // ---------------------------------------------------------------------
    // Declarations
    // ---------------------------------------------------------------------

    fn gen_decl(&mut self, kind: GenDeclKind, specs: Vec<Spec>) -> &mut Self {
        let doc = self.pending_doc.take();
        self.decls.push(TopLevelDecl::Gen(GenDecl { doc, kind, specs }));
        self
    }

    fn import_spec(&mut self, name: Option<ImportName>, path: &str) -> &mut Self {
        let raw = self.push_text(&format!("\"{path}\""));
        let spec = ImportSpec {
            doc: None,
            name,
            path: StringLit { raw },
        };
        self.gen_decl(GenDeclKind::Import, vec![Spec::Import(spec)])
    }

    /// `import "path"`
    pub fn import(&mut self, path: &str) -> &mut Self {
        self.import_spec(None, path)
    }

    /// `import alias "path"`
    pub fn import_as(&mut self, alias: &str, path: &str) -> &mut Self {
        let alias = self.ident(alias);
        self.import_spec(Some(ImportName::Name(alias)), path)
    }

    /// `import . "path"`
    pub fn import_dot(&mut self, path: &str) -> &mut Self {
        let dot = self.push_text(".");
        self.import_spec(Some(ImportName::Dot(dot)), path)
    }

    /// `import _ "path"`
    pub fn import_blank(&mut self, path: &str) -> &mut Self {
        let blank = self.push_text("_");
        self.import_spec(Some(ImportName::Blank(blank)), path)
    }

    /// `type name <typ>`
    pub fn type_decl(&mut self, name: &str, typ: TypeId) -> &mut Self {
        let name = self.ident(name);
        let spec = TypeSpec {
            doc: None,
            name,
            type_params: Vec::new(),
            typ,
            alias: false,
        };
        self.gen_decl(GenDeclKind::Type, vec![Spec::Type(spec)])
    }

    /// `type name = <typ>`
    pub fn alias_decl(&mut self, name: &str, typ: TypeId) -> &mut Self {
        let name = self.ident(name);
        let spec = TypeSpec {
            doc: None,
            name,
            type_params: Vec::new(),
            typ,
            alias: true,
        };
        self.gen_decl(GenDeclKind::Type, vec![Spec::Type(spec)])
    }

    /// `type name[type_params] <typ>`
    pub fn generic_type_decl(&mut self, name: &str, type_params: Vec<FieldId>, typ: TypeId) -> &mut Self {
        let name = self.ident(name);
        let spec = TypeSpec {
            doc: None,
            name,
            type_params,
            typ,
            alias: false,
        };
        self.gen_decl(GenDeclKind::Type, vec![Spec::Type(spec)])
    }

    fn value_spec(&mut self, names: &[&str], typ: Option<TypeId>, values: Vec<ExprId>) -> Spec {
        let names = names.iter().map(|n| self.ident(n)).collect();
        Spec::Value(ValueSpec {
            doc: None,
            names,
            typ,
            values,
        })
    }

    /// `var names [typ] [= values]`
    pub fn var_decl(&mut self, names: &[&str], typ: Option<TypeId>, values: Vec<ExprId>) -> &mut Self {
        let spec = self.value_spec(names, typ, values);
        self.gen_decl(GenDeclKind::Var, vec![spec])
    }

    /// `const names [typ] = values`
    pub fn const_decl(&mut self, names: &[&str], typ: Option<TypeId>, values: Vec<ExprId>) -> &mut Self {
        let spec = self.value_spec(names, typ, values);
        self.gen_decl(GenDeclKind::Const, vec![spec])
    }

    /// Grouped declaration, `var ( ... )` and friends.
    pub fn group(&mut self, kind: GenDeclKind, specs: Vec<Spec>) -> &mut Self {
        self.gen_decl(kind, specs)
    }

    /// Builds a value spec for [`FileBuilder::group`].
    pub fn spec_value(&mut self, names: &[&str], typ: Option<TypeId>, values: Vec<ExprId>) -> Spec {
        self.value_spec(names, typ, values)
    }

    /// `func name<sig> { ... }`
    pub fn func(&mut self, name: &str, sig: SignatureId) -> &mut Self {
        let name = self.ident(name);
        let doc = self.pending_doc.take();
        self.decls.push(TopLevelDecl::Func(FuncDecl {
            doc,
            recv: None,
            name,
            type_params: Vec::new(),
            sig,
            has_body: true,
        }));
        self
    }

    /// `func (recv_name recv_type) name<sig> { ... }`
    pub fn method(&mut self, recv_name: &str, recv_type: TypeId, name: &str, sig: SignatureId) -> &mut Self {
        let recv = self.field(&[recv_name], recv_type);
        let name = self.ident(name);
        let doc = self.pending_doc.take();
        self.decls.push(TopLevelDecl::Func(FuncDecl {
            doc,
            recv: Some(recv),
            name,
            type_params: Vec::new(),
            sig,
            has_body: true,
        }));
        self
    }

    pub fn finish(self) -> ParsedFile {
        ParsedFile {
            arena: self.arena,
            interner: self.interner,
            text: self.text,
            root: SourceFile {
                name: self.name,
                doc: self.doc,
                decls: self.decls,
                comments: self.comments,
            },
        }
    }
}

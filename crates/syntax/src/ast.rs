//! # Declaration-level Go syntax tree
//!
//! This is the tree the semantic model consumes. It keeps everything a
//! declaration carries (names, type expressions, parameter lists, struct tags,
//! doc comments) and drops statement bodies, which the model never inspects.
//!
//! ## Architecture
//!
//! - **Nodes**: type expressions, fields, signatures, expressions and comment
//!   groups live in typed `la_arena` arenas inside [`AstArena`]
//! - **Symbols**: identifiers are interned once in an [`Interner`]
//! - **Text**: literals and comments are stored as spans into
//!   [`ParsedFile::text`], the raw text is recovered on demand
//!
//! A file handed over by a parser is a [`ParsedFile`]: arena, interner, text
//! and the [`SourceFile`] root.

use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};

use la_arena::{Arena, Idx};
use smallvec::SmallVec;

// =============================================================================
// Core Foundation Types
// =============================================================================

/// Byte range into [`ParsedFile::text`].
///
/// Positions are stored as `u32` to save memory, limiting file size to 4GB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Creates a new span from usize positions.
    ///
    /// # Panics
    /// In debug builds, panics if positions exceed `u32::MAX`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Interned string symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

/// Type alias for identifier symbols.
pub type Ident = Symbol;

impl Symbol {
    #[inline]
    pub const fn from_raw(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identifier occurrence (interned symbol + source position).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentName {
    pub sym: Ident,
    pub pos: Span,
}

/// Identity hasher for u64 values (used for symbol hash buckets).
#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, _b: &[u8]) {
        unreachable!("U64IdentityHasher only supports write_u64")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

/// String interner.
///
/// Strings are stored once and looked up via hash buckets keyed by a seeded
/// hash of the text.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

impl Interner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a string and returns its symbol.
    ///
    /// If the string already exists, returns the existing symbol.
    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.state.hash_one(s);
        let entry = self.buckets.entry(h).or_default();

        for &sym in entry.iter() {
            if self.strings[sym.0 as usize].as_ref() == s {
                return sym;
            }
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        entry.push(sym);
        sym
    }

    /// Looks a string up without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        let h = self.state.hash_one(s);
        self.buckets
            .get(&h)?
            .iter()
            .copied()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
    }

    /// Resolves a symbol back to its string.
    ///
    /// # Panics
    /// Panics if the symbol was not produced by this interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.strings
            .get(sym.0 as usize)
            .expect("invalid symbol")
            .as_ref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Arena
// =============================================================================

pub type ExprId = Idx<Expr>;
pub type TypeId = Idx<Type>;
pub type FieldId = Idx<Field>;
pub type SignatureId = Idx<Signature>;
pub type CommentGroupId = Idx<CommentGroup>;

/// Central arena holding every node of one file.
#[derive(Debug, Default)]
pub struct AstArena {
    pub exprs: Arena<Expr>,
    pub types: Arena<Type>,
    pub fields: Arena<Field>,
    pub signatures: Arena<Signature>,
    pub comment_groups: Arena<CommentGroup>,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

/// Comment token (text is recovered from the file text via span).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub span: Span,
}

/// Group of adjacent comments (doc, directives, etc.).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: SmallVec<[Comment; 2]>,
}

// =============================================================================
// Source File (Root Node)
// =============================================================================

/// A complete Go source file, declarations in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Package clause name
    pub name: IdentName,
    /// Optional file/package doc comment group
    pub doc: Option<CommentGroupId>,
    /// All top-level declarations in source order
    pub decls: Vec<TopLevelDecl>,
    /// All comment groups in this file
    pub comments: Vec<CommentGroupId>,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevelDecl {
    Gen(GenDecl),
    Func(FuncDecl),
}

/// Generic declaration (import, const, type, var).
///
/// ```text
/// Declaration   = ConstDecl | TypeDecl | VarDecl
/// TopLevelDecl  = Declaration | FunctionDecl | MethodDecl
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenDecl {
    pub doc: Option<CommentGroupId>,
    pub kind: GenDeclKind,
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GenDeclKind {
    Import,
    Const,
    Type,
    Var,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

/// `ImportSpec = [ "." | PackageName ] ImportPath`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSpec {
    pub doc: Option<CommentGroupId>,
    pub name: Option<ImportName>,
    pub path: StringLit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportName {
    /// Dot import: `import . "pkg"`
    Dot(Span),
    /// Blank import: `import _ "pkg"`
    Blank(Span),
    /// Named import: `import name "pkg"`
    Name(IdentName),
}

/// `VarSpec = IdentifierList ( Type [ "=" ExpressionList ] | "=" ExpressionList )`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub doc: Option<CommentGroupId>,
    pub names: SmallVec<[IdentName; 2]>,
    pub typ: Option<TypeId>,
    pub values: Vec<ExprId>,
}

/// `TypeSpec = AliasDecl | TypeDef`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub doc: Option<CommentGroupId>,
    pub name: IdentName,
    /// Type parameter declarations, empty when the type is not generic
    pub type_params: Vec<FieldId>,
    pub typ: TypeId,
    /// True for `type A = B`
    pub alias: bool,
}

/// Function or method declaration.
///
/// ```text
/// FunctionDecl = "func" FunctionName [ TypeParameters ] Signature [ FunctionBody ]
/// MethodDecl   = "func" Receiver MethodName Signature [ FunctionBody ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub doc: Option<CommentGroupId>,
    /// Receiver (present only for methods)
    pub recv: Option<FieldId>,
    pub name: IdentName,
    pub type_params: Vec<FieldId>,
    pub sig: SignatureId,
    /// False for declarations without a body (assembly-backed functions)
    pub has_body: bool,
}

// =============================================================================
// Signatures and Fields
// =============================================================================

/// `Signature = Parameters [ Result ]`
///
/// A single unnamed result is stored as one unnamed field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    pub params: Vec<FieldId>,
    pub results: Vec<FieldId>,
}

/// Field in a parameter list, result list or struct.
///
/// `ParameterDecl = [ IdentifierList ] [ "..." ] Type`; the variadic form is
/// carried by a [`Type::Ellipsis`] node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field names (empty for anonymous parameters and embedded fields)
    pub names: SmallVec<[IdentName; 1]>,
    pub typ: TypeId,
    /// Struct tag literal, quotes included (struct fields only)
    pub tag: Option<StringLit>,
    /// Leading doc comment group
    pub doc: Option<CommentGroupId>,
    /// Trailing line comment group
    pub comment: Option<CommentGroupId>,
}

impl Field {
    #[inline]
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Unqualified named type, `Name` or `Name[T]`
    Named { name: IdentName, args: Vec<TypeId> },

    /// Qualified type `x.Name`; the qualifier is kept as an expression, a
    /// well-formed file only ever has an identifier there
    Selector {
        base: ExprId,
        sel: IdentName,
        args: Vec<TypeId>,
    },

    /// `*T`
    Pointer { elem: TypeId },

    /// `[N]T`
    Array { len: ExprId, elem: TypeId },

    /// `[]T`
    Slice { elem: TypeId },

    /// `...T` in a variadic parameter
    Ellipsis { elem: TypeId },

    /// `map[K]V`
    Map { key: TypeId, val: TypeId },

    /// `chan T`, `<-chan T`, `chan<- T`
    Chan { dir: ChanDir, elem: TypeId },

    /// `func(...) ...`
    Func { sig: SignatureId },

    /// `struct { ... }`
    Struct { fields: Vec<FieldId> },

    /// `interface { ... }`
    Interface { elems: Vec<InterfaceElem> },

    /// `(T)`
    Paren { typ: TypeId },

    /// Bad type (error recovery)
    Bad(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElem {
    /// `Method(...) ...`
    Method { name: IdentName, sig: SignatureId },

    /// Embedded interface: `io.Reader`
    Embedded(TypeId),

    /// Constraint union: `~int | string`
    Union(Vec<TypeTerm>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTerm {
    pub tilde: bool,
    pub typ: TypeId,
}

// =============================================================================
// Expressions
// =============================================================================

/// Expression node.
///
/// Only the shapes that appear as initializers of package-level values or as
/// type qualifiers are modeled; everything else is [`Expr::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expr {
    Ident(IdentName),

    BasicLit(BasicLit),

    /// `T{...}`, the type is absent for elided inner literals
    CompositeLit { typ: Option<TypeId> },

    /// `x.y`
    Selector { expr: ExprId, sel: IdentName },

    /// `f(...)`
    Call { func: ExprId },

    /// `+x`, `-x`, `!x`, `^x`, `*x`, `&x`, `<-x`
    Unary { op: UnaryOp, expr: ExprId },

    /// `(x)`
    Paren(ExprId),

    /// Any other expression (binary, index, func literal...)
    Other(Span),

    /// Bad expression (error recovery)
    Bad(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: BasicLitKind,
    pub raw: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BasicLitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

/// String literal, quotes included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLit {
    pub raw: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Add,   // +
    Sub,   // -
    Not,   // !
    Xor,   // ^
    Deref, // *
    Addr,  // &
    Recv,  // <-
}

// =============================================================================
// Parsed file
// =============================================================================

/// One parsed source file: the unit handed from a parser to the model.
#[derive(Debug)]
pub struct ParsedFile {
    pub arena: AstArena,
    pub interner: Interner,
    /// Text the spans of this file point into
    pub text: String,
    pub root: SourceFile,
}

impl ParsedFile {
    #[inline]
    pub fn text(&self, span: Span) -> &str {
        &self.text[span.range()]
    }

    #[inline]
    pub fn name(&self, ident: IdentName) -> &str {
        self.interner.resolve(ident.sym)
    }

    /// Package clause name.
    #[inline]
    pub fn package_name(&self) -> &str {
        self.name(self.root.name)
    }

    /// Contents of a string literal with its delimiters removed.
    ///
    /// Interpreted (`"..."`) literals are returned as written, escapes are
    /// left for the consumer.
    pub fn string_value(&self, lit: StringLit) -> &str {
        let raw = self.text(lit.raw);
        let mut chars = raw.chars();
        match (chars.next(), chars.next_back()) {
            (Some(open @ ('"' | '`')), Some(close)) if open == close => &raw[1..raw.len() - 1],
            _ => raw,
        }
    }

    /// Raw text of every comment in a group, markers included.
    pub fn comment_lines(&self, group: CommentGroupId) -> Vec<String> {
        self.arena.comment_groups[group]
            .comments
            .iter()
            .map(|c| self.text(c.span).to_owned())
            .collect()
    }
}

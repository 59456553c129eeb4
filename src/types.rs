//! # Type graph
//!
//! Every type reference handed out by the model is a [`RefId`], a stable
//! index into the [`TypeGraph`]. A reference is either a named entry or a
//! decorator (pointer, array, channel, ellipsis) around another reference.
//!
//! Named entries start as placeholders when a name is used before its
//! declaration and are bound to a [`TypeId`] exactly when the declaration is
//! translated. Methods are attached to the named entry itself, so anything
//! recorded against a placeholder is still there after binding.
//!
//! Decorators report the name, package and resolved type of the entry they
//! wrap: `*T` and `T` both answer `"T"`. An alias entry (`type A = T`) is
//! transparent the same way and stands for `T` in identity comparisons.

use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;

use crate::model::{InterfaceType, MapType, MethodDescriptor, StructType};
use crate::package::PackageId;

pub type RefId = Idx<RefEntry>;
pub type TypeId = Idx<TypeData>;

/// Name of the shared `interface{}` reference.
pub const EMPTY_INTERFACE: &str = "interface{}";

// =============================================================================
// Reference entries
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Unresolved,
    Resolved(TypeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decorator {
    Pointer,
    Array,
    Channel,
    Ellipsis,
}

#[derive(Debug)]
pub enum RefEntry {
    Named(NamedRef),
    Decorated { decorator: Decorator, inner: RefId },
    /// Placeholder later declared as `type A = T`
    Alias(RefId),
}

#[derive(Debug)]
pub struct NamedRef {
    pub name: String,
    pub package: Option<PackageId>,
    pub resolution: Resolution,
    pub methods: MethodSet,
}

impl NamedRef {
    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self.resolution, Resolution::Resolved(_))
    }
}

/// Methods in declaration order with a name index.
///
/// Inserting a name that is already present replaces the method in place:
/// the last registration wins and keeps the original slot.
#[derive(Debug, Clone, Default)]
pub struct MethodSet {
    entries: Vec<(String, TypeId)>,
    index: FxHashMap<String, usize>,
}

impl MethodSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the method that was replaced, if any.
    pub fn insert(&mut self, name: &str, method: TypeId) -> Option<TypeId> {
        match self.index.get(name) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].1, method)),
            None => {
                self.index.insert(name.to_owned(), self.entries.len());
                self.entries.push((name.to_owned(), method));
                None
            }
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<TypeId> {
        self.index.get(name).map(|&slot| self.entries[slot].1)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeId)> + '_ {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug)]
pub struct TypeData {
    pub name: String,
    pub package: Option<PackageId>,
    pub kind: TypeKind,
    /// Named entry this type was bound into, the owner of its method set.
    pub declared_by: Option<RefId>,
}

impl TypeData {
    pub fn new(name: impl Into<String>, package: Option<PackageId>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            package,
            kind,
            declared_by: None,
        }
    }
}

#[derive(Debug)]
pub enum TypeKind {
    /// Builtins and defined types that are neither structs nor interfaces
    Base,
    Struct(StructType),
    Interface(InterfaceType),
    /// Method, free function or function type
    Method(MethodDescriptor),
    Map(MapType),
}

impl TypeKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TypeKind::Base => "base",
            TypeKind::Struct(_) => "struct",
            TypeKind::Interface(_) => "interface",
            TypeKind::Method(_) => "method",
            TypeKind::Map(_) => "map",
        }
    }
}

// =============================================================================
// Graph
// =============================================================================

/// Owner of every reference entry and type of an environment.
#[derive(Debug)]
pub struct TypeGraph {
    refs: Arena<RefEntry>,
    types: Arena<TypeData>,
    empty_interface: RefId,
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeGraph {
    pub fn new() -> Self {
        let mut types = Arena::new();
        let mut refs = Arena::new();
        let iface = types.alloc(TypeData::new(
            EMPTY_INTERFACE,
            None,
            TypeKind::Interface(InterfaceType::default()),
        ));
        let empty_interface = refs.alloc(RefEntry::Named(NamedRef {
            name: EMPTY_INTERFACE.to_owned(),
            package: None,
            resolution: Resolution::Resolved(iface),
            methods: MethodSet::new(),
        }));
        Self {
            refs,
            types,
            empty_interface,
        }
    }

    /// The one reference every inline interface literal resolves to.
    #[inline]
    pub fn empty_interface(&self) -> RefId {
        self.empty_interface
    }

    // ---------------------------------------------------------------------
    // Allocation
    // ---------------------------------------------------------------------

    #[inline]
    pub fn alloc_type(&mut self, data: TypeData) -> TypeId {
        self.types.alloc(data)
    }

    /// Unresolved named entry. Registration in a package table is the
    /// caller's business.
    pub fn placeholder(&mut self, package: Option<PackageId>, name: &str) -> RefId {
        self.refs.alloc(RefEntry::Named(NamedRef {
            name: name.to_owned(),
            package,
            resolution: Resolution::Unresolved,
            methods: MethodSet::new(),
        }))
    }

    /// Resolved named entry that no package table knows about.
    pub fn fresh(&mut self, package: Option<PackageId>, name: &str, ty: TypeId) -> RefId {
        self.refs.alloc(RefEntry::Named(NamedRef {
            name: name.to_owned(),
            package,
            resolution: Resolution::Resolved(ty),
            methods: MethodSet::new(),
        }))
    }

    #[inline]
    fn decorate(&mut self, decorator: Decorator, inner: RefId) -> RefId {
        self.refs.alloc(RefEntry::Decorated { decorator, inner })
    }

    pub fn pointer_of(&mut self, inner: RefId) -> RefId {
        self.decorate(Decorator::Pointer, inner)
    }

    pub fn array_of(&mut self, inner: RefId) -> RefId {
        self.decorate(Decorator::Array, inner)
    }

    pub fn channel_of(&mut self, inner: RefId) -> RefId {
        self.decorate(Decorator::Channel, inner)
    }

    pub fn ellipsis_of(&mut self, inner: RefId) -> RefId {
        self.decorate(Decorator::Ellipsis, inner)
    }

    /// Synthesizes `map[K]V` as a new concrete type behind a fresh reference.
    pub fn map_of(&mut self, package: Option<PackageId>, key: RefId, value: RefId) -> RefId {
        let name = format!("map[{}]{}", self.ref_name(key), self.ref_name(value));
        let ty = self.alloc_type(TypeData::new(
            name.as_str(),
            package,
            TypeKind::Map(MapType { key, value }),
        ));
        self.fresh(package, &name, ty)
    }

    // ---------------------------------------------------------------------
    // Binding
    // ---------------------------------------------------------------------

    /// Installs `ty` into the named entry behind `r`.
    ///
    /// Binding an already resolved entry replaces the previous type. Methods
    /// attached to the entry are kept either way. Returns the type that was
    /// bound before, if any.
    pub fn bind(&mut self, r: RefId, ty: TypeId) -> Option<TypeId> {
        let root = self.named_root(r);
        let previous = {
            let named = self.named_mut(root);
            std::mem::replace(&mut named.resolution, Resolution::Resolved(ty))
        };

        let previous = match previous {
            Resolution::Unresolved => None,
            Resolution::Resolved(prev) => {
                tracing::warn!(
                    name = %self.ref_name(root),
                    previous = %self.types[prev].name,
                    "rebinding an already resolved type"
                );
                Some(prev)
            }
        };

        let data = &mut self.types[ty];
        if matches!(data.kind, TypeKind::Struct(_) | TypeKind::Base) {
            data.declared_by = Some(root);
        }
        previous
    }

    /// Attaches `method` to the method set of the named entry behind `r`,
    /// keyed by the method's name.
    pub fn add_method(&mut self, r: RefId, method: TypeId) -> Option<TypeId> {
        let root = self.named_root(r);
        let name = self.types[method].name.clone();
        let replaced = self.named_mut(root).methods.insert(&name, method);
        if replaced.is_some() {
            tracing::debug!(%name, owner = %self.ref_name(root), "method redeclared, last one wins");
        }
        replaced
    }

    /// Turns the named entry behind `r` into an alias of `target`.
    ///
    /// Methods attached to `r` move to the entry behind `target`. Returns
    /// `false` and leaves `r` untouched when `target` leads back to `r`.
    pub fn alias(&mut self, r: RefId, target: RefId) -> bool {
        let root = self.named_root(r);
        if self.named_root(target) == root {
            return false;
        }

        if let RefEntry::Named(named) = std::mem::replace(&mut self.refs[root], RefEntry::Alias(target)) {
            if named.is_resolved() {
                tracing::warn!(name = %named.name, "resolved type redeclared as an alias");
            }
            for (_, method) in named.methods.iter() {
                self.add_method(target, method);
            }
        }
        true
    }

    // ---------------------------------------------------------------------
    // Reference accessors
    // ---------------------------------------------------------------------

    #[inline]
    pub fn entry(&self, r: RefId) -> &RefEntry {
        &self.refs[r]
    }

    /// Follows aliases to the reference they stand for.
    pub fn canonical(&self, mut r: RefId) -> RefId {
        while let RefEntry::Alias(target) = self.refs[r] {
            r = target;
        }
        r
    }

    /// Whether `a` and `b` are the same reference once aliases are followed.
    #[inline]
    pub fn same_ref(&self, a: RefId, b: RefId) -> bool {
        a == b || self.canonical(a) == self.canonical(b)
    }

    /// Follows decorators and aliases down to the named entry.
    pub fn named_root(&self, mut r: RefId) -> RefId {
        loop {
            match &self.refs[r] {
                RefEntry::Named(_) => return r,
                RefEntry::Decorated { inner, .. } | RefEntry::Alias(inner) => r = *inner,
            }
        }
    }

    pub fn named(&self, r: RefId) -> &NamedRef {
        match &self.refs[self.named_root(r)] {
            RefEntry::Named(named) => named,
            _ => unreachable!("named_root always lands on a named entry"),
        }
    }

    fn named_mut(&mut self, r: RefId) -> &mut NamedRef {
        let root = self.named_root(r);
        match &mut self.refs[root] {
            RefEntry::Named(named) => named,
            _ => unreachable!("named_root always lands on a named entry"),
        }
    }

    /// Outermost decorator of `r` and the reference it wraps.
    pub fn decorator(&self, r: RefId) -> Option<(Decorator, RefId)> {
        match self.refs[self.canonical(r)] {
            RefEntry::Decorated { decorator, inner } => Some((decorator, inner)),
            _ => None,
        }
    }

    /// Decorators of `r`, outermost first.
    pub fn decorators(&self, mut r: RefId) -> Vec<Decorator> {
        let mut out = Vec::new();
        while let Some((decorator, inner)) = self.decorator(r) {
            out.push(decorator);
            r = inner;
        }
        out
    }

    #[inline]
    pub fn ref_name(&self, r: RefId) -> &str {
        &self.named(r).name
    }

    #[inline]
    pub fn ref_package(&self, r: RefId) -> Option<PackageId> {
        self.named(r).package
    }

    #[inline]
    pub fn resolved(&self, r: RefId) -> Option<TypeId> {
        match self.named(r).resolution {
            Resolution::Resolved(ty) => Some(ty),
            Resolution::Unresolved => None,
        }
    }

    #[inline]
    pub fn is_resolved(&self, r: RefId) -> bool {
        self.named(r).is_resolved()
    }

    /// Methods attached to the named entry behind `r`.
    #[inline]
    pub fn ref_methods(&self, r: RefId) -> &MethodSet {
        &self.named(r).methods
    }

    // ---------------------------------------------------------------------
    // Type accessors
    // ---------------------------------------------------------------------

    #[inline]
    pub fn type_data(&self, ty: TypeId) -> &TypeData {
        &self.types[ty]
    }

    #[inline]
    pub fn type_name(&self, ty: TypeId) -> &str {
        &self.types[ty].name
    }

    #[inline]
    pub fn type_package(&self, ty: TypeId) -> Option<PackageId> {
        self.types[ty].package
    }

    pub fn struct_type(&self, ty: TypeId) -> Option<&StructType> {
        match &self.types[ty].kind {
            TypeKind::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn struct_type_mut(&mut self, ty: TypeId) -> Option<&mut StructType> {
        match &mut self.types[ty].kind {
            TypeKind::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn interface_type(&self, ty: TypeId) -> Option<&InterfaceType> {
        match &self.types[ty].kind {
            TypeKind::Interface(i) => Some(i),
            _ => None,
        }
    }

    pub fn interface_type_mut(&mut self, ty: TypeId) -> Option<&mut InterfaceType> {
        match &mut self.types[ty].kind {
            TypeKind::Interface(i) => Some(i),
            _ => None,
        }
    }

    pub fn method(&self, ty: TypeId) -> Option<&MethodDescriptor> {
        match &self.types[ty].kind {
            TypeKind::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn map_type(&self, ty: TypeId) -> Option<&MapType> {
        match &self.types[ty].kind {
            TypeKind::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Method set of a type: the signature list of an interface, or the
    /// methods attached to the entry a struct/base type was declared by.
    pub fn methods_of(&self, ty: TypeId) -> Option<&MethodSet> {
        let data = &self.types[ty];
        match &data.kind {
            TypeKind::Interface(i) => Some(i.methods()),
            TypeKind::Struct(_) | TypeKind::Base => data.declared_by.map(|r| self.ref_methods(r)),
            TypeKind::Method(_) | TypeKind::Map(_) => None,
        }
    }

    /// Number of reference entries, decorators included.
    #[inline]
    pub fn ref_count(&self) -> usize {
        self.refs.len()
    }

    #[inline]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

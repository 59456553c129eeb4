//! Descriptors stored behind [`TypeId`]s and in package tables.

use crate::types::{MethodSet, RefId, TypeId};

/// Raw comment lines of a declaration, markers included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doc {
    pub comments: Vec<String>,
}

impl Doc {
    pub fn new(comments: Vec<String>) -> Self {
        Self { comments }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

// =============================================================================
// Tags
// =============================================================================

/// One `key:"name,opt1,opt2"` entry of a struct tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagParam {
    pub name: String,
    pub value: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    /// Tag text without its delimiters
    pub raw: String,
    pub params: Vec<TagParam>,
}

impl Tag {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            params: Vec::new(),
        }
    }

    /// Appends `param` unless a param with the same key is already present;
    /// the first occurrence of a key is the one that counts.
    pub fn push(&mut self, param: TagParam) -> bool {
        if self.param_by_name(&param.name).is_some() {
            return false;
        }
        self.params.push(param);
        true
    }

    pub fn param_by_name(&self, name: &str) -> Option<&TagParam> {
        self.params.iter().find(|p| p.name == name)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.params.is_empty()
    }
}

// =============================================================================
// Structs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ref_type: RefId,
    pub tag: Tag,
    pub doc: Doc,
    /// Declared without a name; `name` is then the name of the type
    pub embedded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StructType {
    pub doc: Doc,
    pub fields: Vec<Field>,
    /// Interfaces recorded as implemented
    pub interfaces: Vec<TypeId>,
}

impl StructType {
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

// =============================================================================
// Interfaces
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct InterfaceType {
    pub doc: Doc,
    methods: MethodSet,
}

impl InterfaceType {
    pub fn new(doc: Doc) -> Self {
        Self {
            doc,
            methods: MethodSet::new(),
        }
    }

    #[inline]
    pub fn methods(&self) -> &MethodSet {
        &self.methods
    }

    pub fn push_method(&mut self, name: &str, method: TypeId) -> Option<TypeId> {
        self.methods.insert(name, method)
    }

    #[inline]
    pub fn method_by_name(&self, name: &str) -> Option<TypeId> {
        self.methods.get(name)
    }
}

// =============================================================================
// Methods and functions
// =============================================================================

/// Parameter, result or receiver. Unnamed entries carry an empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodArgument {
    pub name: String,
    pub ref_type: RefId,
}

impl MethodArgument {
    pub fn new(name: impl Into<String>, ref_type: RefId) -> Self {
        Self {
            name: name.into(),
            ref_type,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MethodDescriptor {
    pub doc: Doc,
    pub recv: Option<MethodArgument>,
    pub arguments: Vec<MethodArgument>,
    pub results: Vec<MethodArgument>,
    pub tag: Tag,
}

impl MethodDescriptor {
    #[inline]
    pub fn is_method(&self) -> bool {
        self.recv.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapType {
    pub key: RefId,
    pub value: RefId,
}

// =============================================================================
// Values
// =============================================================================

/// Package-level `var` or `const`.
///
/// `ref_type` stays `None` when neither a declared type nor a recognizable
/// initializer is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ref_type: Option<RefId>,
    pub doc: Doc,
}

use std::path::PathBuf;

use la_arena::Idx;
use rustc_hash::FxHashMap;

use crate::locator::PackageMeta;
use crate::model::{Doc, Variable};
use crate::types::{RefId, TypeId};

pub type PackageId = Idx<Package>;

/// Declarations of one package plus its table of named references.
///
/// Every list keeps declaration order and the name indexes point into it. A
/// redeclared name replaces the earlier entry in its slot.
#[derive(Debug, Default)]
pub struct Package {
    pub name: String,
    pub import_path: String,
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub doc: Doc,

    pub functions: Vec<TypeId>,
    pub structs: Vec<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub variables: Vec<Variable>,
    pub constants: Vec<Variable>,
    /// Every declared type: structs, interfaces and base types
    pub types: Vec<TypeId>,

    pub parent: Option<PackageId>,
    pub subpackages: Vec<PackageId>,

    explored: bool,
    ref_types: FxHashMap<String, RefId>,
    function_index: FxHashMap<String, TypeId>,
    struct_index: FxHashMap<String, TypeId>,
    interface_index: FxHashMap<String, TypeId>,
    type_index: FxHashMap<String, TypeId>,
    variable_index: FxHashMap<String, usize>,
    constant_index: FxHashMap<String, usize>,
}

impl Package {
    pub fn new(name: impl Into<String>, import_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            import_path: import_path.into(),
            ..Default::default()
        }
    }

    pub fn from_meta(meta: &PackageMeta) -> Self {
        Self {
            name: meta.name.clone(),
            import_path: meta.import_path.clone(),
            dir: meta.dir.clone(),
            files: meta.files.clone(),
            ..Default::default()
        }
    }

    /// All files of the package went through translation.
    #[inline]
    pub fn is_explored(&self) -> bool {
        self.explored
    }

    #[inline]
    pub fn mark_explored(&mut self) {
        self.explored = true;
    }

    // ---------------------------------------------------------------------
    // Reference table
    // ---------------------------------------------------------------------

    #[inline]
    pub fn ref_type_by_name(&self, name: &str) -> Option<RefId> {
        self.ref_types.get(name).copied()
    }

    /// Registers `r` under `name`, replacing whatever was there.
    pub fn register_ref_type(&mut self, name: &str, r: RefId) -> Option<RefId> {
        self.ref_types.insert(name.to_owned(), r)
    }

    pub fn ref_types(&self) -> impl Iterator<Item = (&str, RefId)> + '_ {
        self.ref_types.iter().map(|(name, r)| (name.as_str(), *r))
    }

    // ---------------------------------------------------------------------
    // Declarations
    // ---------------------------------------------------------------------

    pub fn append_function(&mut self, name: &str, method: TypeId) {
        match self.function_index.insert(name.to_owned(), method) {
            None => self.functions.push(method),
            // redeclared: last one wins, one slot
            Some(previous) => replace_slot(&mut self.functions, previous, method),
        }
    }

    pub fn append_struct(&mut self, name: &str, ty: TypeId) {
        match self.struct_index.insert(name.to_owned(), ty) {
            None => self.structs.push(ty),
            Some(previous) => replace_slot(&mut self.structs, previous, ty),
        }
        self.append_type(name, ty);
    }

    pub fn append_interface(&mut self, name: &str, ty: TypeId) {
        match self.interface_index.insert(name.to_owned(), ty) {
            None => self.interfaces.push(ty),
            Some(previous) => replace_slot(&mut self.interfaces, previous, ty),
        }
        self.append_type(name, ty);
    }

    /// Adds `ty` to the declared types; a redeclared name takes the slot of
    /// the previous declaration.
    pub fn append_type(&mut self, name: &str, ty: TypeId) {
        match self.type_index.insert(name.to_owned(), ty) {
            None => self.types.push(ty),
            Some(previous) => replace_slot(&mut self.types, previous, ty),
        }
    }

    pub fn append_variable(&mut self, variable: Variable) {
        match self.variable_index.get(&variable.name) {
            Some(&slot) => self.variables[slot] = variable,
            None => {
                self.variable_index
                    .insert(variable.name.clone(), self.variables.len());
                self.variables.push(variable);
            }
        }
    }

    pub fn append_constant(&mut self, constant: Variable) {
        match self.constant_index.get(&constant.name) {
            Some(&slot) => self.constants[slot] = constant,
            None => {
                self.constant_index
                    .insert(constant.name.clone(), self.constants.len());
                self.constants.push(constant);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------

    /// Free function by name. Methods with a receiver live on their type.
    #[inline]
    pub fn method_by_name(&self, name: &str) -> Option<TypeId> {
        self.function_index.get(name).copied()
    }

    #[inline]
    pub fn struct_by_name(&self, name: &str) -> Option<TypeId> {
        self.struct_index.get(name).copied()
    }

    #[inline]
    pub fn interface_by_name(&self, name: &str) -> Option<TypeId> {
        self.interface_index.get(name).copied()
    }

    pub fn variable_by_name(&self, name: &str) -> Option<&Variable> {
        self.variable_index.get(name).map(|&i| &self.variables[i])
    }

    pub fn constant_by_name(&self, name: &str) -> Option<&Variable> {
        self.constant_index.get(name).map(|&i| &self.constants[i])
    }
}

fn replace_slot(list: &mut [TypeId], previous: TypeId, ty: TypeId) {
    if let Some(slot) = list.iter().position(|t| *t == previous) {
        list[slot] = ty;
    }
}

//! The synthetic `builtin` package every file sees without importing it.

use crate::model::{InterfaceType, MethodArgument, MethodDescriptor};
use crate::package::{Package, PackageId};
use crate::types::{TypeData, TypeGraph, TypeKind};

pub const BUILTIN_IMPORT_PATH: &str = "builtin";

const BASE_TYPES: &[&str] = &[
    "bool",
    "byte",
    "complex64",
    "complex128",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    "comparable",
];

pub(crate) fn new_package() -> Package {
    Package::new(BUILTIN_IMPORT_PATH, BUILTIN_IMPORT_PATH)
}

/// Declares the predeclared types of the language in `package`.
pub(crate) fn populate(graph: &mut TypeGraph, id: PackageId, package: &mut Package) {
    for &name in BASE_TYPES {
        let r = graph.placeholder(Some(id), name);
        let ty = graph.alloc_type(TypeData::new(name, Some(id), TypeKind::Base));
        graph.bind(r, ty);
        package.register_ref_type(name, r);
        package.append_type(name, ty);
    }

    package.register_ref_type("any", graph.empty_interface());

    // type error interface { Error() string }
    let error = graph.placeholder(Some(id), "error");
    let iface = graph.alloc_type(TypeData::new(
        "error",
        Some(id),
        TypeKind::Interface(InterfaceType::default()),
    ));
    graph.bind(error, iface);
    package.register_ref_type("error", error);
    package.append_interface("error", iface);

    if let Some(string) = package.ref_type_by_name("string") {
        let method = graph.alloc_type(TypeData::new(
            "Error",
            Some(id),
            TypeKind::Method(MethodDescriptor {
                results: vec![MethodArgument::new("", string)],
                ..Default::default()
            }),
        ));
        if let Some(iface) = graph.interface_type_mut(iface) {
            iface.push_method("Error", method);
        }
    }

    package.mark_explored();
    tracing::debug!(types = package.types.len(), "builtin package ready");
}

/// Whether `package` carries what the translator relies on.
pub(crate) fn is_complete(package: &Package) -> bool {
    ["string", "int", "bool", "error"]
        .iter()
        .all(|name| package.ref_type_by_name(name).is_some())
}

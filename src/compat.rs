//! Structural method compatibility and interface satisfaction.

use crate::model::{MethodArgument, MethodDescriptor};
use crate::types::{TypeGraph, TypeId};

fn same_types(graph: &TypeGraph, a: &[MethodArgument], b: &[MethodArgument]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| graph.same_ref(x.ref_type, y.ref_type))
}

impl MethodDescriptor {
    /// Two signatures are compatible when their parameter and result lists
    /// have the same length and the same reference at every position, aliases
    /// followed.
    ///
    /// Receivers and argument names do not take part.
    pub fn compatible(&self, other: &MethodDescriptor, graph: &TypeGraph) -> bool {
        same_types(graph, &self.arguments, &other.arguments)
            && same_types(graph, &self.results, &other.results)
    }
}

impl TypeGraph {
    /// Whether every method of interface `iface` has a compatible method of
    /// the same name in the method set of `ty`.
    ///
    /// Returns `false` when `iface` is not an interface or `ty` has no
    /// method set. Stops at the first missing or incompatible method.
    pub fn implements(&self, ty: TypeId, iface: TypeId) -> bool {
        let Some(iface_type) = self.interface_type(iface) else {
            return false;
        };
        let Some(own) = self.methods_of(ty) else {
            return false;
        };

        for (name, wanted) in iface_type.methods().iter() {
            let Some(found) = own.get(name) else {
                tracing::trace!(method = name, "missing method");
                return false;
            };
            match (self.method(found), self.method(wanted)) {
                (Some(a), Some(b)) if a.compatible(b, self) => {}
                _ => {
                    tracing::trace!(method = name, "incompatible signature");
                    return false;
                }
            }
        }
        true
    }

    /// Compatibility of two method types; `false` if either is not a method.
    pub fn compatible(&self, a: TypeId, b: TypeId) -> bool {
        match (self.method(a), self.method(b)) {
            (Some(a), Some(b)) => a.compatible(b, self),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InterfaceType;
    use crate::types::{TypeData, TypeKind};

    fn method(graph: &mut TypeGraph, name: &str, args: &[(&str, crate::types::RefId)]) -> TypeId {
        let arguments = args
            .iter()
            .map(|(n, r)| MethodArgument::new(*n, *r))
            .collect();
        graph.alloc_type(TypeData::new(
            name,
            None,
            TypeKind::Method(MethodDescriptor {
                arguments,
                ..Default::default()
            }),
        ))
    }

    #[test]
    fn argument_names_do_not_matter() {
        let mut graph = TypeGraph::new();
        let string = graph.placeholder(None, "string");
        let a = method(&mut graph, "SetName", &[("name", string)]);
        let b = method(&mut graph, "SetName", &[("n", string)]);
        assert!(graph.compatible(a, b));
    }

    #[test]
    fn decorated_references_are_distinct() {
        let mut graph = TypeGraph::new();
        let string = graph.placeholder(None, "string");
        let p1 = graph.pointer_of(string);
        let p2 = graph.pointer_of(string);
        let a = method(&mut graph, "Set", &[("v", p1)]);
        let b = method(&mut graph, "Set", &[("v", p2)]);
        assert!(!graph.compatible(a, b));
    }

    #[test]
    fn empty_interface_is_implemented_by_everything_with_methods() {
        let mut graph = TypeGraph::new();
        let owner = graph.placeholder(None, "T");
        let ty = graph.alloc_type(TypeData::new("T", None, TypeKind::Base));
        graph.bind(owner, ty);
        let iface = graph.alloc_type(TypeData::new(
            "I",
            None,
            TypeKind::Interface(InterfaceType::default()),
        ));
        assert!(graph.implements(ty, iface));
        assert!(!graph.implements(iface, ty));
    }
}

//! Hierarchy analysis over a set of type descriptors.
//!
//! This crate owns the "extends" graph restricted to the input set: building
//! it, finding the unique local root, and computing per-type sets of
//! reachable concrete descendants. Everything downstream (parameter bounds,
//! dispatch chains) is derived from these three queries.
//!
//! All collections are `BTreeMap`/`BTreeSet` and every exposed set is sorted
//! before it leaves this crate: generated output must be byte-stable across
//! runs, so iteration order is part of the contract, not an accident.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use revisitor_model::{QualifiedName, TypeDescriptor};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// Two descriptors in the input set share one type identity. The source
    /// design left this undefined; here it is rejected before any edge is
    /// recorded.
    #[error("duplicate type identity in input set: {name}")]
    DuplicateIdentity { name: QualifiedName },

    /// Zero or more than one type without an in-set supertype. Generation
    /// needs exactly one local root and aborts without emitting anything.
    #[error("ambiguous hierarchy: expected exactly one local root, found {}: [{}]", .candidates.len(), join_names(.candidates))]
    AmbiguousHierarchy { candidates: Vec<QualifiedName> },
}

fn join_names(names: &[QualifiedName]) -> String {
    names
        .iter()
        .map(QualifiedName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sort order used everywhere a list of types becomes generated output:
/// simple name first (what the emitted parameter and method names are built
/// from), full qualified name as tiebreak.
pub fn type_name_order(a: &QualifiedName, b: &QualifiedName) -> Ordering {
    a.simple_name()
        .cmp(b.simple_name())
        .then_with(|| a.cmp(b))
}

/// Directed "extends" graph restricted to the input set.
///
/// An edge `parent -> child` exists iff the child's declared supertype is,
/// by qualified-name identity, a member of the set. A type whose supertype
/// lies outside the set contributes no edge and so becomes a local root.
#[derive(Debug, Clone, Default)]
pub struct HierarchyGraph {
    nodes: BTreeMap<QualifiedName, TypeDescriptor>,
    children: BTreeMap<QualifiedName, BTreeSet<QualifiedName>>,
}

impl HierarchyGraph {
    /// Builds the restricted graph. Pure; the only failure is a duplicate
    /// identity in the input.
    pub fn build(
        descriptors: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Result<Self, HierarchyError> {
        let mut nodes = BTreeMap::new();
        for descriptor in descriptors {
            let name = descriptor.qualified_name.clone();
            if nodes.insert(name.clone(), descriptor).is_some() {
                return Err(HierarchyError::DuplicateIdentity { name });
            }
        }

        let mut children: BTreeMap<QualifiedName, BTreeSet<QualifiedName>> = BTreeMap::new();
        for (name, descriptor) in &nodes {
            let Some(supertype) = &descriptor.supertype else {
                continue;
            };
            if !nodes.contains_key(supertype) {
                // Real supertype outside scope: no edge, `name` may be the
                // local root.
                continue;
            }
            trace!(parent = %supertype, child = %name, "hierarchy edge");
            children
                .entry(supertype.clone())
                .or_default()
                .insert(name.clone());
        }

        Ok(Self { nodes, children })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&TypeDescriptor> {
        self.nodes.get(name)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.nodes.values()
    }

    /// Direct children of `name` in the restricted graph.
    pub fn children_of(&self, name: &QualifiedName) -> impl Iterator<Item = &QualifiedName> {
        self.children.get(name).into_iter().flatten()
    }

    /// A branch type has at least one descendant in the set and therefore
    /// gets a generated dispatch method.
    pub fn is_branch(&self, name: &QualifiedName) -> bool {
        self.children.get(name).is_some_and(|c| !c.is_empty())
    }

    /// The in-set supertype of `name`, if its declared supertype is a member
    /// of the set.
    pub fn in_set_supertype(&self, name: &QualifiedName) -> Option<&QualifiedName> {
        let supertype = self.nodes.get(name)?.supertype.as_ref()?;
        self.nodes.contains_key(supertype).then_some(supertype)
    }

    /// Finds the unique local root and the concrete types.
    ///
    /// Concreteness comes from the descriptor flag, not from graph degree: a
    /// concrete type with descendants is degenerate but tolerated, and shows
    /// up both here and in its ancestors' dispatch candidates.
    ///
    /// Must not be called on an empty graph; the empty input set is handled
    /// by the generation entry point as a valid degenerate case.
    pub fn classify(&self) -> Result<Classification, HierarchyError> {
        let mut roots: Vec<QualifiedName> = self
            .nodes
            .keys()
            .filter(|name| self.in_set_supertype(name).is_none())
            .cloned()
            .collect();

        if roots.len() != 1 {
            roots.sort_by(type_name_order);
            return Err(HierarchyError::AmbiguousHierarchy { candidates: roots });
        }
        let root = roots.remove(0);

        let mut concrete: Vec<QualifiedName> = self
            .nodes
            .values()
            .filter(|d| !d.is_abstract)
            .map(|d| d.qualified_name.clone())
            .collect();
        concrete.sort_by(type_name_order);

        Ok(Classification { root, concrete })
    }

    /// All concrete types reachable from `start` over zero or more child
    /// edges, `start` itself included when concrete. Sorted by
    /// [`type_name_order`]; this order is the dispatch tie-break order, so
    /// it is a correctness property, not cosmetics.
    pub fn reachable_concrete(&self, start: &QualifiedName) -> Vec<QualifiedName> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start.clone());
        queue.push_back(start.clone());

        let mut result = Vec::new();
        while let Some(current) = queue.pop_front() {
            if self.nodes.get(&current).is_some_and(|d| !d.is_abstract) {
                result.push(current.clone());
            }
            for child in self.children_of(&current) {
                if seen.insert(child.clone()) {
                    queue.push_back(child.clone());
                }
            }
        }

        result.sort_by(type_name_order);
        result
    }
}

/// Output of [`HierarchyGraph::classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub root: QualifiedName,
    /// All concrete types in the set, sorted by [`type_name_order`].
    pub concrete: Vec<QualifiedName>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use revisitor_model::TypeDescriptor;

    use super::*;

    fn name(s: &str) -> QualifiedName {
        QualifiedName::new(s)
    }

    fn expr_hierarchy() -> HierarchyGraph {
        HierarchyGraph::build([
            TypeDescriptor::abstract_class("expr.Expr"),
            TypeDescriptor::concrete("expr.Lit").extending("expr.Expr"),
            TypeDescriptor::abstract_class("expr.Binary").extending("expr.Expr"),
            TypeDescriptor::concrete("expr.Plus").extending("expr.Binary"),
            TypeDescriptor::concrete("expr.Minus").extending("expr.Binary"),
        ])
        .expect("well-formed hierarchy")
    }

    #[test]
    fn builds_edges_for_in_set_supertypes_only() {
        let graph = HierarchyGraph::build([
            TypeDescriptor::abstract_class("a.Root").extending("java.lang.Object"),
            TypeDescriptor::concrete("a.Child").extending("a.Root"),
        ])
        .expect("well-formed hierarchy");

        // Object is outside the set, so Root has no in-set supertype.
        assert_eq!(graph.in_set_supertype(&name("a.Root")), None);
        assert_eq!(
            graph.in_set_supertype(&name("a.Child")),
            Some(&name("a.Root"))
        );
        assert!(graph.is_branch(&name("a.Root")));
        assert!(!graph.is_branch(&name("a.Child")));
    }

    #[test]
    fn rejects_duplicate_identity() {
        let err = HierarchyGraph::build([
            TypeDescriptor::concrete("a.Foo"),
            TypeDescriptor::abstract_class("a.Foo"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            HierarchyError::DuplicateIdentity { name: name("a.Foo") }
        );
    }

    #[test]
    fn classify_finds_root_and_concrete_types() {
        let classification = expr_hierarchy().classify().expect("single root");
        assert_eq!(classification.root, name("expr.Expr"));
        assert_eq!(
            classification.concrete,
            vec![name("expr.Lit"), name("expr.Minus"), name("expr.Plus")]
        );
    }

    #[test]
    fn classify_reports_multiple_roots() {
        let graph = HierarchyGraph::build([
            TypeDescriptor::abstract_class("a.First"),
            TypeDescriptor::abstract_class("a.Second"),
            TypeDescriptor::concrete("a.Child").extending("a.First"),
        ])
        .expect("builds fine; ambiguity is a classification error");

        let err = graph.classify().unwrap_err();
        assert_eq!(
            err,
            HierarchyError::AmbiguousHierarchy {
                candidates: vec![name("a.First"), name("a.Second")],
            }
        );
    }

    #[test]
    fn reachable_is_transitive_not_one_hop() {
        let graph = expr_hierarchy();
        // Plus and Minus are two hops below Expr, behind the abstract Binary.
        assert_eq!(
            graph.reachable_concrete(&name("expr.Expr")),
            vec![name("expr.Lit"), name("expr.Minus"), name("expr.Plus")]
        );
        assert_eq!(
            graph.reachable_concrete(&name("expr.Binary")),
            vec![name("expr.Minus"), name("expr.Plus")]
        );
    }

    #[test]
    fn reachable_includes_start_when_concrete() {
        let graph = HierarchyGraph::build([
            TypeDescriptor::concrete("a.Base"),
            TypeDescriptor::concrete("a.Special").extending("a.Base"),
        ])
        .expect("well-formed hierarchy");

        // Degenerate but tolerated: a concrete branch dispatches to itself too.
        assert_eq!(
            graph.reachable_concrete(&name("a.Base")),
            vec![name("a.Base"), name("a.Special")]
        );
    }

    #[test]
    fn abstract_start_is_not_its_own_candidate() {
        let graph = expr_hierarchy();
        assert!(!graph
            .reachable_concrete(&name("expr.Binary"))
            .contains(&name("expr.Binary")));
    }

    #[test]
    fn sort_order_falls_back_to_qualified_name() {
        let mut names = vec![name("b.Node"), name("a.Node"), name("a.Leaf")];
        names.sort_by(type_name_order);
        assert_eq!(names, vec![name("a.Leaf"), name("a.Node"), name("b.Node")]);
    }
}

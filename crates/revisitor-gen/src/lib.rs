//! Revisitor interface generation.
//!
//! Takes a flat set of [`TypeDescriptor`]s describing one closed class
//! hierarchy and synthesizes a generic visitor-style interface for it: one
//! covariantly bounded type parameter per type, one abstract visit method
//! per concrete type, and one default dispatch method per branch type that
//! routes a runtime value to the visit method for its exact type.
//!
//! The output is the structured [`GeneratedInterface`] value; [`render_java`]
//! turns it into Java interface source text. Writing that text anywhere is
//! the caller's concern.

use revisitor_hierarchy::{type_name_order, HierarchyError, HierarchyGraph};
use revisitor_model::{
    DispatchMethod, GeneratedInterface, QualifiedName, TypeDescriptor, TypeParameter, VisitMethod,
};
use tracing::debug;

mod render;

pub use render::render_java;

/// Name of the generated dispatch methods. Historical: the Java processor
/// emitted them as `$` so hand-written visit methods can never collide.
pub const DISPATCH_METHOD_NAME: &str = "$";

/// Interface name and package used when the input set is empty and there is
/// no root to derive them from.
const FALLBACK_INTERFACE_NAME: &str = "Revisitor";
const FALLBACK_PACKAGE: &str = "revisitor";

/// One type parameter per type in the graph, named `<SimpleName>T` and
/// bounded by the in-set supertype's parameter when there is one. Emitted
/// sorted by type name regardless of input order.
pub fn type_parameters(graph: &HierarchyGraph) -> Vec<TypeParameter> {
    let mut names: Vec<&QualifiedName> = graph
        .descriptors()
        .map(|d| &d.qualified_name)
        .collect();
    names.sort_by(|a, b| type_name_order(a, b));

    names
        .into_iter()
        .map(|name| TypeParameter {
            name: parameter_name(name),
            bound: graph.in_set_supertype(name).map(parameter_name),
        })
        .collect()
}

/// Synthesizes the full interface for one descriptor set.
///
/// Structural errors (duplicate identity, zero or multiple local roots)
/// abort generation entirely; no partial artifact is ever returned. The
/// empty set is valid and yields an interface with no parameters and no
/// methods.
pub fn generate(
    descriptors: impl IntoIterator<Item = TypeDescriptor>,
) -> Result<GeneratedInterface, HierarchyError> {
    let graph = HierarchyGraph::build(descriptors)?;

    if graph.is_empty() {
        return Ok(GeneratedInterface {
            name: FALLBACK_INTERFACE_NAME.to_string(),
            package: FALLBACK_PACKAGE.to_string(),
            type_parameters: Vec::new(),
            visit_methods: Vec::new(),
            dispatch_methods: Vec::new(),
        });
    }

    let classification = graph.classify()?;
    let root = &classification.root;

    let type_parameters = type_parameters(&graph);

    let visit_methods: Vec<VisitMethod> = classification
        .concrete
        .iter()
        .map(|name| VisitMethod {
            name: visit_method_name(name),
            param_type: name.clone(),
            return_type: parameter_name(name),
        })
        .collect();

    // One dispatch method per branch type, the root included when it has
    // descendants. A branch with a single candidate still gets the full
    // method; uniformity over special-casing.
    let mut branches: Vec<&QualifiedName> = graph
        .descriptors()
        .map(|d| &d.qualified_name)
        .filter(|name| graph.is_branch(name))
        .collect();
    branches.sort_by(|a, b| type_name_order(a, b));

    let dispatch_methods: Vec<DispatchMethod> = branches
        .into_iter()
        .map(|name| DispatchMethod {
            name: DISPATCH_METHOD_NAME.to_string(),
            param_type: name.clone(),
            return_type: parameter_name(name),
            candidates: graph.reachable_concrete(name),
        })
        .collect();

    debug!(
        root = %root,
        types = graph.len(),
        visit_methods = visit_methods.len(),
        dispatch_methods = dispatch_methods.len(),
        "synthesized revisitor interface"
    );

    Ok(GeneratedInterface {
        name: root.simple_name().to_string(),
        package: interface_package(root),
        type_parameters,
        visit_methods,
        dispatch_methods,
    })
}

/// `expr.Lit` gets the parameter `LitT`.
fn parameter_name(name: &QualifiedName) -> String {
    format!("{}T", name.simple_name())
}

/// `expr.Lit` gets the abstract method `_lit`. The underscore keeps the
/// generated names out of the way of anything hand-written.
fn visit_method_name(name: &QualifiedName) -> String {
    format!("_{}", decapitalize(name.simple_name()))
}

/// The generated interface lives next to the hierarchy it covers:
/// `expr.Expr` produces package `expr.revisitor`, a default-package root
/// produces plain `revisitor`.
fn interface_package(root: &QualifiedName) -> String {
    let base = root.package();
    if base.is_empty() {
        FALLBACK_PACKAGE.to_string()
    } else {
        format!("{base}.{FALLBACK_PACKAGE}")
    }
}

fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

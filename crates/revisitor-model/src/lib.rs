//! Shared data model for the revisitor generator.
//!
//! The input side (`TypeDescriptor`) is produced by an external discovery
//! collaborator (annotation scanning, package listing, ...) and consumed
//! read-only by the hierarchy and generation crates. The output side
//! (`GeneratedInterface`) is the structured artifact handed back to the
//! writer collaborator, which owns turning it into a source file.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dot-separated fully qualified Java type name, e.g. `expr.Lit`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedName(String);

impl QualifiedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The segment after the last dot, or the whole name when there is none.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Everything before the last dot; empty for default-package types.
    pub fn package(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedName({})", self.0)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for QualifiedName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One type in the input hierarchy, as collected by the discovery
/// collaborator. Immutable once collected.
///
/// `supertype` is the declared direct supertype by emitted type identity.
/// A supertype outside the collected set still appears here; whether it
/// contributes a hierarchy edge is decided by the graph builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub qualified_name: QualifiedName,
    pub supertype: Option<QualifiedName>,
    pub is_abstract: bool,
}

impl TypeDescriptor {
    pub fn concrete(name: impl Into<QualifiedName>) -> Self {
        Self {
            qualified_name: name.into(),
            supertype: None,
            is_abstract: false,
        }
    }

    pub fn abstract_class(name: impl Into<QualifiedName>) -> Self {
        Self {
            qualified_name: name.into(),
            supertype: None,
            is_abstract: true,
        }
    }

    pub fn extending(mut self, supertype: impl Into<QualifiedName>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    pub fn simple_name(&self) -> &str {
        self.qualified_name.simple_name()
    }
}

/// One generic parameter of the generated interface, e.g. `LitT extends ExprT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameter {
    pub name: String,
    /// The supertype's parameter name, when the type has an in-set supertype.
    pub bound: Option<String>,
}

/// An abstract visit method the implementer must supply, one per concrete
/// type: `LitT _lit(expr.Lit it)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitMethod {
    pub name: String,
    pub param_type: QualifiedName,
    /// Name of the type parameter this method returns.
    pub return_type: String,
}

/// A generated default method performing ordered runtime-type dispatch over
/// the branch type's concrete descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchMethod {
    pub name: String,
    pub param_type: QualifiedName,
    /// Name of the type parameter this method returns.
    pub return_type: String,
    /// Concrete candidate types, sorted; this order is the tested order.
    pub candidates: Vec<QualifiedName>,
}

/// The output artifact: a generic interface description, constructed in one
/// pass and handed to the writer collaborator as a value.
///
/// All lists are sorted by type name, so two artifacts built from the same
/// descriptor set compare equal regardless of input iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedInterface {
    pub name: String,
    pub package: String,
    pub type_parameters: Vec<TypeParameter>,
    pub visit_methods: Vec<VisitMethod>,
    pub dispatch_methods: Vec<DispatchMethod>,
}

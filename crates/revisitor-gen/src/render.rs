//! Rendering of a [`GeneratedInterface`] into Java interface source text.
//!
//! This reproduces the shape the original annotation processor emitted:
//! qualified type names throughout, `java.util.Objects.equals(K.class,
//! it.getClass())` dispatch chains with a cast-and-delegate body. The one
//! deliberate departure is the fall-through: an uncovered runtime type
//! throws instead of returning null, so a hierarchy extended behind the
//! generator's back fails at the dispatch site and not three calls later.
//!
//! Where this text ends up is the caller's business; nothing here touches
//! the filesystem.

use std::fmt::Write;

use revisitor_model::GeneratedInterface;

use crate::visit_method_name;

pub fn render_java(interface: &GeneratedInterface) -> String {
    let mut out = String::new();

    if !interface.package.is_empty() {
        let _ = writeln!(out, "package {};", interface.package);
        out.push('\n');
    }

    let _ = write!(out, "public interface {}", interface.name);
    if !interface.type_parameters.is_empty() {
        let params = interface
            .type_parameters
            .iter()
            .map(|p| match &p.bound {
                Some(bound) => format!("{} extends {}", p.name, bound),
                None => p.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "<{params}>");
    }
    out.push_str(" {\n");

    for method in &interface.visit_methods {
        let _ = writeln!(
            out,
            "    {} {}({} it);",
            method.return_type, method.name, method.param_type
        );
    }

    for method in &interface.dispatch_methods {
        out.push('\n');
        let _ = writeln!(
            out,
            "    default {} {}({} it) {{",
            method.return_type, method.name, method.param_type
        );
        for candidate in &method.candidates {
            let _ = writeln!(
                out,
                "        if (java.util.Objects.equals({candidate}.class, it.getClass())) return {}(({candidate}) it);",
                visit_method_name(candidate)
            );
        }
        out.push_str(
            "        throw new IllegalArgumentException(\"type outside closed hierarchy: \" + it.getClass().getName());\n",
        );
        out.push_str("    }\n");
    }

    out.push_str("}\n");
    out
}

//! Mapping-entry synthesis: turns one cube mapping entry into the source of a
//! callable that the generated program evaluates at runtime.
//!
//! The produced lambda first binds every required variable by name from the
//! runtime `VariableMap`, shadowing any outer scope, so the authored
//! expressions can refer to those variables directly. Each axis expression is
//! wrapped in a zero-argument closure returning its value, and the three
//! `(x, y)` pairs are combined into one ordered triple.
//!
//! Expressions are opaque fragments of the output language. Nothing here
//! parses or validates them; an invalid expression surfaces when the emitted
//! output is compiled downstream.

use crate::compile::types::{Expr, MappingEntry};
use std::fmt::Write;

/// Render the inner zero-argument closure for one axis expression.
fn wrap_expression(expr: &Expr) -> String {
    format!("[=]() -> int {{\n        return {};\n    }}", expr)
}

/// Render the variable bindings that precede the pair evaluation.
fn render_bindings(required_variables: &[String]) -> String {
    let mut bindings = String::new();
    for name in required_variables {
        let _ = writeln!(
            bindings,
            "[[maybe_unused]] auto {0} = variable_map.get_variable_ref(\"{0}\");",
            name
        );
    }
    bindings
}

/// Synthesize the callable source for one mapping entry.
pub fn synthesize(entry: &MappingEntry) -> String {
    let bindings = render_bindings(&entry.required_variables);

    let mut pairs = String::new();
    for (x, y) in &entry.axis_expressions {
        let _ = write!(
            pairs,
            "        std::tuple<int, int>{{ {}(), {}() }},\n",
            wrap_expression(x),
            wrap_expression(y)
        );
    }

    format!(
        "[]([[maybe_unused]] const VariableMap& variable_map) \
         -> std::array<std::tuple<int, int>, 3> {{\n    {}\n    return {{\n{}    }};\n}}",
        bindings, pairs
    )
}

//! CSS tokenizing and selector scoping (spec.md C5).

/// The CSS token stream and its token kinds.
pub mod tokenizer;
/// Selector-list rewriting for scoped `<style>` blocks.
pub mod scoper;

pub use scoper::scope_css;
pub use tokenizer::{tokenize, CssToken, CssTokenKind};

/// Extract the `define:vars={...}` expression text from a `<style>`
/// tag's attributes, if present (spec.md §4.3 "`define:vars` extraction").
/// The returned text is the raw JS object-expression source, to be
/// emitted into the generated module as the argument to `$definedVars`.
pub fn define_vars_expression(attributes: &[astro_compiler_core::Attribute]) -> Option<&str> {
    attributes.iter().find(|a| a.name == "define:vars").and_then(|a| match &a.value {
        astro_compiler_core::AttributeValue::Expression { expr } => Some(expr.as_str()),
        _ => None,
    })
}

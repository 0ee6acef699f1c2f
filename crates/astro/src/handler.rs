//! The façade (C9): `transform`, `parse`, and `preprocess_styles` — the
//! three entry points every FFI binding wraps (spec.md §4.7).
//!
//! Stays entirely synchronous. A host whose own `resolve_path`/style
//! preprocessor is async runs that work *before* calling in here and
//! passes the results through [`crate::options::TransformOptions::preprocessed_styles`]
//! (spec.md §9 "Callback dispatch across the FFI boundary").

use crate::hash::scope_hash;
use crate::options::{ConvertToTsxOptions, ParseOptions, PreprocessOptions, TransformOptions};
use crate::printer;
use crate::result::{ConvertToTsxResult, ParseResult, PreprocessStylesResult, TransformResult};
use crate::transform;
use crate::tsx;
use astro_compiler_core::{DiagnosticSink, LineIndex, Node, Parser, SourceMap};

/// Parse and fully transform one `.astro` source file into a JS module
/// plus its extracted CSS/scripts/diagnostics (spec.md §4.7 "transform").
///
/// Never panics on malformed input: every recoverable condition becomes a
/// diagnostic. `code` is left empty only when an `Error`-severity
/// diagnostic was recorded (spec.md §7 "fatal makes code absent, not a
/// thrown exception").
pub fn transform(source: &str, options: &TransformOptions) -> TransformResult {
    log::trace!("transforming {:?} ({} bytes)", options.filename, source.len());
    let parsed = Parser::new(source, &options.filename).parse();
    let mut diagnostics = DiagnosticSink::new();
    for d in parsed.diagnostics {
        diagnostics.push(d);
    }

    let line_index = LineIndex::new(source);
    let frontmatter_text = frontmatter_of(&parsed.root);
    let imports = transform::find_imports(&frontmatter_text);
    let analysis = transform::analyze(&parsed.root, &imports, &options.filename, &line_index, source, &mut diagnostics);

    let needs_scope = document_needs_scope(&parsed.root);
    let script_texts = collect_non_inline_script_texts(&parsed.root);
    let scope = if needs_scope {
        let template_fingerprint = fingerprint_template(&parsed.root);
        Some(scope_hash(&options.normalized_filename, &template_fingerprint, script_texts.iter().map(String::as_str)))
    } else {
        None
    };

    let printed = printer::print(&parsed.root, options, scope.as_deref(), parsed.saw_head, source, &mut diagnostics);

    if diagnostics.has_fatal() {
        log::warn!("{:?} produced a fatal diagnostic; code is empty", options.filename);
    }
    let code = if diagnostics.has_fatal() { String::new() } else { printed.code };
    let map = if options.sourcemap && !code.is_empty() {
        let source_map = SourceMap::new(&format!("{}.js", options.filename), &options.filename, source, &printed.mappings);
        Some(source_map.to_json())
    } else {
        None
    };

    let to_hydrated = |u: &transform::ComponentUsage| crate::result::TransformResultHydratedComponent {
        export_name: u.export_name.clone(),
        local_name: u.local_name.clone(),
        specifier: u.specifier.clone(),
        resolved_path: options.resolve_path.resolve(&u.specifier, &options.filename),
        directive: u.client_directive.clone(),
    };

    TransformResult {
        code,
        map,
        css: printed.css,
        scripts: printed.scripts,
        hydrated_components: analysis.hydrated.iter().map(to_hydrated).collect(),
        client_only_components: analysis.client_only.iter().map(to_hydrated).collect(),
        server_components: analysis.server_deferred.iter().map(to_hydrated).collect(),
        contains_head: printed.contains_head,
        diagnostics: diagnostics.into_messages(),
        scope,
        propagation: analysis.propagation,
        style_error: printed.style_errors,
    }
}

/// Parse a source file and return its AST as JSON, without running the
/// semantic transform or code generator (spec.md §4.7 "parse").
pub fn parse(source: &str, options: &ParseOptions) -> ParseResult {
    let parsed = Parser::new(source, &options.filename).parse();
    let ast = node_to_json(&parsed.root);
    ParseResult {
        ast,
        diagnostics: parsed.diagnostics,
    }
}

/// Run the host's preprocessor callback over every `<style>` block found
/// in `source`, in source order (spec.md §4.7 "preprocessStyles").
pub fn preprocess_styles(source: &str, options: &PreprocessOptions) -> PreprocessStylesResult {
    let parsed = Parser::new(source, &options.filename).parse();
    let mut styles = Vec::new();
    collect_style_blocks(&parsed.root, &mut |tag| {
        let content: String = tag
            .children
            .iter()
            .filter_map(|c| if let Node::Text { value, .. } = c { Some(value.as_str()) } else { None })
            .collect();
        let lang = tag.attribute("lang").and_then(|a| a.literal_value()).unwrap_or("css");
        styles.push(options.preprocessor.preprocess(&content, lang, &options.filename));
    });
    log::debug!("preprocessed {} style block(s) in {:?}", styles.len(), options.filename);
    PreprocessStylesResult {
        styles,
        diagnostics: parsed.diagnostics,
    }
}

/// Render a `.tsx` surface over the template for editor/language-service
/// type-checking, without running the semantic transform or code generator
/// (spec.md §2 "C9", table row "convertToTSX").
pub fn convert_to_tsx(source: &str, options: &ConvertToTsxOptions) -> ConvertToTsxResult {
    let parsed = Parser::new(source, &options.filename).parse();
    let mut diagnostics = DiagnosticSink::new();
    for d in parsed.diagnostics {
        diagnostics.push(d);
    }
    let out = tsx::convert(&parsed.root, &options.filename, &mut diagnostics);
    ConvertToTsxResult {
        code: out.code,
        diagnostics: diagnostics.into_messages(),
    }
}

fn frontmatter_of(root: &Node) -> String {
    for child in root.children() {
        if let Node::Frontmatter { value, .. } = child {
            return value.clone();
        }
    }
    String::new()
}

fn document_needs_scope(root: &Node) -> bool {
    let mut found = false;
    walk(root, &mut |node| {
        if let Node::Element(tag) = node {
            if tag.name.eq_ignore_ascii_case("style") && tag.attribute("is:global").is_none() {
                found = true;
            }
        }
    });
    found
}

fn collect_non_inline_script_texts(root: &Node) -> Vec<String> {
    let mut out = Vec::new();
    walk(root, &mut |node| {
        if let Node::Element(tag) = node {
            if tag.name.eq_ignore_ascii_case("script")
                && tag.attribute("src").is_none()
                && tag.attribute("is:inline").is_none()
            {
                let content: String = tag
                    .children
                    .iter()
                    .filter_map(|c| if let Node::Text { value, .. } = c { Some(value.as_str()) } else { None })
                    .collect();
                out.push(content);
            }
        }
    });
    out
}

/// A content-only textual fingerprint of the template (everything but the
/// frontmatter): tag names, attribute names/values, and text, with no
/// byte offsets. Used for the scope hash so that frontmatter whitespace
/// changes — which shift every downstream [`astro_compiler_core::loc::Position`]
/// without changing what renders — never perturb it (spec.md §8).
fn fingerprint_template(root: &Node) -> String {
    let mut out = String::new();
    for child in root.children() {
        if matches!(child, Node::Frontmatter { .. }) {
            continue;
        }
        fingerprint_node(child, &mut out);
    }
    out
}

fn fingerprint_node(node: &Node, out: &mut String) {
    use std::fmt::Write as _;
    match node {
        Node::Root { children } | Node::Expression { children, .. } => {
            for child in children {
                fingerprint_node(child, out);
            }
        }
        Node::Frontmatter { .. } => {}
        Node::Text { value, .. } => out.push_str(value),
        Node::Comment { value, .. } => {
            let _ = write!(out, "<!--{value}-->");
        }
        Node::Doctype { value, .. } => {
            let _ = write!(out, "<!{value}>");
        }
        Node::Element(tag) | Node::Component(tag) | Node::CustomElement(tag) | Node::Fragment(tag) => {
            let _ = write!(out, "<{}", tag.name);
            for attr in &tag.attributes {
                let _ = write!(out, " {}={:?}", attr.name, attr.value);
            }
            out.push('>');
            for child in &tag.children {
                fingerprint_node(child, out);
            }
            let _ = write!(out, "</{}>", tag.name);
        }
    }
}

fn collect_style_blocks(node: &Node, f: &mut impl FnMut(&astro_compiler_core::Tag)) {
    if let Node::Element(tag) = node {
        if tag.name.eq_ignore_ascii_case("style") {
            f(tag);
        }
    }
    for child in node.children() {
        collect_style_blocks(child, f);
    }
}

fn walk(node: &Node, f: &mut impl FnMut(&Node)) {
    f(node);
    for child in node.children() {
        walk(child, f);
    }
}

/// Serialize a node tree into a generic JSON value (used by `parse`; the
/// façade never exposes the Rust [`Node`] enum shape directly to hosts).
fn node_to_json(node: &Node) -> serde_json::Value {
    use serde_json::json;
    match node {
        Node::Root { children } => json!({ "type": "root", "children": children.iter().map(node_to_json).collect::<Vec<_>>() }),
        Node::Frontmatter { value, .. } => json!({ "type": "frontmatter", "value": value }),
        Node::Text { value, .. } => json!({ "type": "text", "value": value }),
        Node::Comment { value, .. } => json!({ "type": "comment", "value": value }),
        Node::Doctype { value, .. } => json!({ "type": "doctype", "value": value }),
        Node::Expression { children, .. } => {
            json!({ "type": "expression", "children": children.iter().map(node_to_json).collect::<Vec<_>>() })
        }
        Node::Element(tag) => tag_to_json("element", tag),
        Node::Component(tag) => tag_to_json("component", tag),
        Node::CustomElement(tag) => tag_to_json("custom-element", tag),
        Node::Fragment(tag) => tag_to_json("fragment", tag),
    }
}

fn tag_to_json(kind: &str, tag: &astro_compiler_core::Tag) -> serde_json::Value {
    use serde_json::json;
    json!({
        "type": kind,
        "name": tag.name,
        "attributes": tag.attributes.iter().map(|a| json!({ "name": a.name })).collect::<Vec<_>>(),
        "children": tag.children.iter().map(node_to_json).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PreprocessStyle;

    struct UppercasePreprocessor;

    impl PreprocessStyle for UppercasePreprocessor {
        fn preprocess(&self, content: &str, lang: &str, _filename: &str) -> Option<String> {
            if lang == "css" {
                Some(content.to_uppercase())
            } else {
                None
            }
        }
    }

    #[test]
    fn parse_returns_ast_json_and_diagnostics() {
        let options = ParseOptions {
            filename: "Hello.astro".to_string(),
        };
        let result = parse("<h1>Hi</h1>", &options);
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.ast["type"], "root");
    }

    #[test]
    fn preprocess_styles_runs_callback_per_block() {
        let options = PreprocessOptions {
            filename: "Hello.astro".to_string(),
            preprocessor: Box::new(UppercasePreprocessor),
        };
        let result = preprocess_styles("<style>.a{color:red}</style>", &options);
        assert_eq!(result.styles, vec![Some(".A{COLOR:RED}".to_string())]);
    }

    #[test]
    fn transform_blanks_code_on_fatal_diagnostic() {
        let options = TransformOptions::new("Bad.astro");
        let result = transform("<Unknown />", &options);
        assert!(result.code.is_empty());
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn transform_reports_propagation_and_style_error() {
        let options = TransformOptions::new("Widget.astro").with_preprocessed_styles(vec![Some(String::new())]);
        let result = transform("<div transition:name=\"x\"><style>.a{color:red}</style></div>", &options);
        assert!(result.propagation);
        assert_eq!(result.style_error.len(), 1);
    }

    #[test]
    fn convert_to_tsx_wraps_template_as_jsx() {
        let options = ConvertToTsxOptions {
            filename: "Hello.astro".to_string(),
        };
        let result = convert_to_tsx("<h1>Hello</h1>", &options);
        assert!(result.code.contains("export default function"));
        assert!(result.code.contains("<h1>"));
        assert!(result.diagnostics.is_empty());
    }
}

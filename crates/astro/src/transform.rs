//! Semantic transform (C6): resolves component imports against their
//! usages in the template, classifies hydration/server-defer directives,
//! and validates directive/slot usage (spec.md §4.4).

use astro_compiler_core::{scanner, DiagnosticCode, DiagnosticMessage, DiagnosticSink, LineIndex, Node, Range};
use std::collections::HashMap;

const HYDRATION_DIRECTIVES: &[&str] = &["load", "idle", "visible", "media", "only"];
const DEPRECATED_DIRECTIVES: &[&str] = &["client:component-hydration"];
const IGNORED_DIRECTIVES: &[&str] = &["client:component-export"];

/// One `import` binding discovered in frontmatter, found with the
/// lexical scanner rather than a full JS parser (spec Non-goals).
#[derive(Debug, Clone)]
pub struct ImportBinding {
    /// The local name the import is bound to.
    pub local_name: String,
    /// The module specifier it was imported from.
    pub specifier: String,
}

/// Scan frontmatter for top-level `import` statements, extracting a
/// best-effort `(local_name, specifier)` binding for each default,
/// namespace, or named import clause.
pub fn find_imports(frontmatter: &str) -> Vec<ImportBinding> {
    let mut out = Vec::new();
    for (start, end) in scanner::find_import_export_statements(frontmatter) {
        let stmt = &frontmatter[start..end];
        if !stmt.trim_start().starts_with("import") {
            continue;
        }
        let Some(from_idx) = find_top_level_from(stmt) else {
            continue;
        };
        let clause = stmt["import".len()..from_idx].trim();
        let specifier = extract_specifier(&stmt[from_idx + 4..]);
        let Some(specifier) = specifier else { continue };

        if let Some(namespace) = clause.strip_prefix("* as ") {
            out.push(ImportBinding {
                local_name: namespace.trim().to_string(),
                specifier: specifier.clone(),
            });
            continue;
        }

        if let Some(brace_start) = clause.find('{') {
            let default_part = clause[..brace_start].trim().trim_end_matches(',').trim();
            if !default_part.is_empty() {
                out.push(ImportBinding {
                    local_name: default_part.to_string(),
                    specifier: specifier.clone(),
                });
            }
            if let Some(brace_end) = clause.find('}') {
                let named = &clause[brace_start + 1..brace_end];
                for item in named.split(',') {
                    let item = item.trim();
                    if item.is_empty() {
                        continue;
                    }
                    let local = item.split(" as ").last().unwrap_or(item).trim();
                    out.push(ImportBinding {
                        local_name: local.to_string(),
                        specifier: specifier.clone(),
                    });
                }
            }
            continue;
        }

        let default_name = clause.trim();
        if !default_name.is_empty() {
            out.push(ImportBinding {
                local_name: default_name.to_string(),
                specifier: specifier.clone(),
            });
        }
    }
    out
}

fn find_top_level_from(stmt: &str) -> Option<usize> {
    let bytes = stmt.as_bytes();
    let mut i = 0;
    while i + 4 <= bytes.len() {
        if &stmt[i..i + 4] == "from" && scanner::is_word_boundary_match(stmt, i, "from") {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn extract_specifier(tail: &str) -> Option<String> {
    let trimmed = tail.trim().trim_end_matches(';').trim();
    let quote = trimmed.chars().next()?;
    if quote != '\'' && quote != '"' {
        return None;
    }
    let rest = &trimmed[1..];
    let end = rest.find(quote)?;
    Some(rest[..end].to_string())
}

/// A use of an imported component in the template, with its classified
/// hydration behavior.
#[derive(Debug, Clone)]
pub struct ComponentUsage {
    /// The tag name as written in the template.
    pub export_name: String,
    /// The frontmatter-local binding it resolved to.
    pub local_name: String,
    /// The import specifier it came from.
    pub specifier: String,
    /// The `client:*` directive name, if any (without the `client:` prefix).
    pub client_directive: Option<String>,
    /// Whether `server:defer` was present.
    pub server_defer: bool,
}

/// Output of walking the template to collect hydration/server-defer
/// component usages, plus any validation diagnostics raised along the way.
#[derive(Debug, Clone, Default)]
pub struct TransformAnalysis {
    /// Components with a recognized `client:*` directive.
    pub hydrated: Vec<ComponentUsage>,
    /// Components specifically using `client:only`.
    pub client_only: Vec<ComponentUsage>,
    /// Components using `server:defer`.
    pub server_deferred: Vec<ComponentUsage>,
    /// Whether any tag in the document carries a `transition:*` directive.
    pub propagation: bool,
}

/// Walk the parsed document, validating directive usage and collecting
/// hydration metadata (spec.md §4.4).
pub fn analyze(
    root: &Node,
    imports: &[ImportBinding],
    file: &str,
    line_index: &LineIndex,
    source: &str,
    diagnostics: &mut DiagnosticSink,
) -> TransformAnalysis {
    let by_local_name: HashMap<&str, &ImportBinding> =
        imports.iter().map(|i| (i.local_name.as_str(), i)).collect();
    let mut analysis = TransformAnalysis::default();
    walk(root, &by_local_name, file, line_index, source, diagnostics, &mut analysis, false);
    analysis
}

fn walk(
    node: &Node,
    imports: &HashMap<&str, &ImportBinding>,
    file: &str,
    line_index: &LineIndex,
    source: &str,
    diagnostics: &mut DiagnosticSink,
    analysis: &mut TransformAnalysis,
    has_component_ancestor: bool,
) {
    if let Node::Component(tag) | Node::CustomElement(tag) | Node::Element(tag) = node {
        validate_tag(
            tag,
            imports,
            file,
            line_index,
            source,
            diagnostics,
            analysis,
            matches!(node, Node::Component(_)),
            has_component_ancestor,
        );
    }
    let child_ancestor = has_component_ancestor || matches!(node, Node::Component(_) | Node::CustomElement(_));
    for child in node.children() {
        walk(child, imports, file, line_index, source, diagnostics, analysis, child_ancestor);
    }
}

fn validate_tag(
    tag: &astro_compiler_core::Tag,
    imports: &HashMap<&str, &ImportBinding>,
    file: &str,
    line_index: &LineIndex,
    source: &str,
    diagnostics: &mut DiagnosticSink,
    analysis: &mut TransformAnalysis,
    is_component: bool,
    has_component_ancestor: bool,
) {
    let mut client_directive = None;
    let mut server_defer = false;

    for attr in &tag.attributes {
        let Some(prefix) = attr.directive_prefix() else {
            continue;
        };
        let name = attr.name.split_once(':').map(|(_, n)| n).unwrap_or("");

        match prefix {
            "client" => {
                if HYDRATION_DIRECTIVES.contains(&name) {
                    client_directive = Some(name.to_string());
                } else if DEPRECATED_DIRECTIVES.contains(&attr.name.as_str()) {
                    push(diagnostics, file, line_index, source, attr.position.to_range(), DiagnosticCode::WarningDeprecatedDirective, format!("directive `{}` is deprecated", attr.name));
                } else if IGNORED_DIRECTIVES.contains(&attr.name.as_str()) {
                    push(diagnostics, file, line_index, source, attr.position.to_range(), DiagnosticCode::WarningIgnoredDirective, format!("directive `{}` has no effect and is ignored", attr.name));
                }
            }
            "server" if name == "defer" => server_defer = true,
            "slot" => {
                if !has_component_ancestor {
                    push(diagnostics, file, line_index, source, attr.position.to_range(), DiagnosticCode::ErrorUnsupportedSlotAttribute, "`slot` has no enclosing component or custom element to fill".to_string());
                }
            }
            "transition" => analysis.propagation = true,
            "define" if name == "vars" => {
                if tag.name != "style" {
                    push(diagnostics, file, line_index, source, attr.position.to_range(), DiagnosticCode::WarningCannotDefineVars, "`define:vars` is only supported on `<style>`".to_string());
                }
            }
            _ => {}
        }

        if matches!(attr.value, astro_compiler_core::AttributeValue::Spread { .. }) && !attr.name.is_empty() {
            push(diagnostics, file, line_index, source, attr.position.to_range(), DiagnosticCode::WarningInvalidSpread, "spread attributes cannot carry a name".to_string());
        }
    }

    if !is_component {
        return;
    }

    let Some(binding) = imports.get(tag.name.as_str()) else {
        if tag.name.contains('.') {
            let root_name = tag.name.split('.').next().unwrap_or(&tag.name);
            if imports.contains_key(root_name) {
                return;
            }
        }
        push(
            diagnostics,
            file,
            line_index,
            source,
            tag.position.to_range(),
            DiagnosticCode::ErrorUnmatchedImport,
            format!("`{}` is used as a component but has no matching import", tag.name),
        );
        return;
    };

    let usage = ComponentUsage {
        export_name: tag.name.clone(),
        local_name: binding.local_name.clone(),
        specifier: binding.specifier.clone(),
        client_directive: client_directive.clone(),
        server_defer,
    };

    if server_defer {
        analysis.server_deferred.push(usage);
    } else if let Some(directive) = client_directive {
        if directive == "only" {
            analysis.client_only.push(usage.clone());
        }
        analysis.hydrated.push(usage);
    }
}

fn push(
    diagnostics: &mut DiagnosticSink,
    file: &str,
    line_index: &LineIndex,
    source: &str,
    range: Range,
    code: DiagnosticCode,
    text: String,
) {
    diagnostics.push(DiagnosticMessage::at(code, text, file, source, line_index, range));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_default_import() {
        let imports = find_imports("import Foo from '../Foo.astro';\n");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].local_name, "Foo");
        assert_eq!(imports[0].specifier, "../Foo.astro");
    }

    #[test]
    fn finds_named_imports() {
        let imports = find_imports("import { A, B as C } from 'lib';\n");
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].local_name, "A");
        assert_eq!(imports[1].local_name, "C");
    }

    #[test]
    fn finds_namespace_import() {
        let imports = find_imports("import * as Icons from './icons';\n");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].local_name, "Icons");
    }

    fn run_analyze(source: &str) -> (TransformAnalysis, DiagnosticSink) {
        let parsed = astro_compiler_core::Parser::new(source, "test.astro").parse();
        let line_index = LineIndex::new(source);
        let mut diagnostics = DiagnosticSink::new();
        let analysis = analyze(&parsed.root, &[], "test.astro", &line_index, source, &mut diagnostics);
        (analysis, diagnostics)
    }

    #[test]
    fn slot_outside_component_ancestor_is_an_error() {
        let (_, diagnostics) = run_analyze("<div slot=\"a\">hi</div>");
        assert!(diagnostics.into_messages().iter().any(|m| m.code == DiagnosticCode::ErrorUnsupportedSlotAttribute as i32));
    }

    #[test]
    fn slot_inside_component_ancestor_is_fine() {
        let (_, diagnostics) = run_analyze("<Foo><div slot=\"a\">hi</div></Foo>");
        assert!(!diagnostics.into_messages().iter().any(|m| m.code == DiagnosticCode::ErrorUnsupportedSlotAttribute as i32));
    }

    #[test]
    fn transition_directive_sets_propagation() {
        let (analysis, _) = run_analyze("<div transition:name=\"x\">hi</div>");
        assert!(analysis.propagation);
    }

    #[test]
    fn no_transition_directive_leaves_propagation_false() {
        let (analysis, _) = run_analyze("<div>hi</div>");
        assert!(!analysis.propagation);
    }
}

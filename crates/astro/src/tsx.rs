//! `convertToTSX` (C9): renders the parsed document as a `.tsx` surface a
//! TypeScript language service can type-check, without producing anything
//! meant to run. Mirrors [`crate::printer`]'s single left-to-right tree
//! walk, swapping the tagged-template render body for JSX.

use astro_compiler_core::{AttributeValue, DiagnosticSink, Node, Tag};
use std::fmt::Write as _;

/// Output of a `convert_to_tsx` call.
pub struct TsxOutput {
    /// The generated `.tsx` text.
    pub code: String,
}

/// Render `root` as a `.tsx` module named after `filename`.
pub fn convert(root: &Node, filename: &str, _diagnostics: &mut DiagnosticSink) -> TsxOutput {
    let mut frontmatter = String::new();
    let mut body_nodes: Vec<&Node> = Vec::new();
    for child in root.children() {
        match child {
            Node::Frontmatter { value, .. } => frontmatter.push_str(value),
            other => body_nodes.push(other),
        }
    }

    let component_name = component_name(filename);

    let mut code = String::new();
    let _ = writeln!(code, "import {{ Fragment }} from 'astro/jsx-runtime';");
    code.push('\n');
    code.push_str(frontmatter.trim_end());
    code.push('\n');
    let _ = writeln!(code, "export default function {component_name}(_props: Record<string, any>) {{");
    code.push_str("  return (<Fragment>\n");
    for node in &body_nodes {
        print_node(node, &mut code, 4);
    }
    code.push_str("  </Fragment>);\n");
    code.push_str("}\n");

    TsxOutput { code }
}

fn component_name(filename: &str) -> String {
    let base = filename.rsplit('/').next().unwrap_or(filename);
    let base = base.strip_suffix(".astro").unwrap_or(base);
    let mut out = String::from("__AstroComponent_");
    for ch in base.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push(' ');
    }
}

fn print_node(node: &Node, out: &mut String, depth: usize) {
    match node {
        Node::Root { children } => {
            for child in children {
                print_node(child, out, depth);
            }
        }
        Node::Frontmatter { .. } => {}
        Node::Text { value, .. } => {
            if !value.trim().is_empty() {
                indent(out, depth);
                let _ = writeln!(out, "{}", escape_text(value));
            }
        }
        Node::Comment { value, .. } => {
            indent(out, depth);
            let _ = writeln!(out, "{{/* {value} */}}");
        }
        Node::Doctype { .. } => {}
        Node::Expression { children, .. } => {
            indent(out, depth);
            out.push_str("{<>\n");
            for child in children {
                print_node(child, out, depth + 2);
            }
            indent(out, depth);
            out.push_str("</>}\n");
        }
        Node::Element(tag) | Node::Component(tag) | Node::CustomElement(tag) | Node::Fragment(tag) => {
            print_tag(tag, out, depth);
        }
    }
}

fn print_tag(tag: &Tag, out: &mut String, depth: usize) {
    let name = if tag.name.is_empty() { "Fragment" } else { tag.name.as_str() };
    indent(out, depth);
    let _ = write!(out, "<{name}");
    print_attributes(tag, out);
    if tag.children.is_empty() {
        out.push_str(" />\n");
        return;
    }
    out.push_str(">\n");
    for child in &tag.children {
        print_node(child, out, depth + 2);
    }
    indent(out, depth);
    let _ = writeln!(out, "</{name}>");
}

fn print_attributes(tag: &Tag, out: &mut String) {
    // The parser already resolves duplicate-key precedence; guard against a
    // spread reintroducing a name a literal attribute already emitted.
    let mut already_emitted = std::collections::HashSet::new();
    for attr in &tag.attributes {
        if !attr.name.is_empty() && !already_emitted.insert(attr.name.clone()) {
            continue;
        }
        out.push(' ');
        match &attr.value {
            AttributeValue::Quoted { value, .. } => {
                let _ = write!(out, "{}=\"{}\"", attr.name, value.replace('"', "&quot;"));
            }
            AttributeValue::Empty => {
                let _ = write!(out, "{}={{true}}", attr.name);
            }
            AttributeValue::Shorthand => {
                let _ = write!(out, "{}={{{}}}", attr.name, attr.name);
            }
            AttributeValue::Expression { expr } => {
                let _ = write!(out, "{}={{{expr}}}", attr.name);
            }
            AttributeValue::Spread { expr } => {
                out.pop();
                let _ = write!(out, " {{...{expr}}}");
            }
            AttributeValue::TemplateLiteral { raw } => {
                let _ = write!(out, "{}={{{raw}}}", attr.name);
            }
        }
    }
}

fn escape_text(value: &str) -> String {
    value.replace('{', "&#123;").replace('}', "&#125;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use astro_compiler_core::Parser;

    #[test]
    fn wraps_template_in_fragment_function() {
        let parsed = Parser::new("<h1>Hello</h1>", "Hello.astro").parse();
        let mut diagnostics = DiagnosticSink::new();
        let out = convert(&parsed.root, "Hello.astro", &mut diagnostics);
        assert!(out.code.contains("export default function __AstroComponent_Hello"));
        assert!(out.code.contains("<h1>"));
        assert!(out.code.contains("Hello"));
    }

    #[test]
    fn frontmatter_emitted_verbatim_above_component() {
        let source = "---\nconst name = \"World\";\n---\n<p>{name}</p>";
        let parsed = Parser::new(source, "Greeting.astro").parse();
        let mut diagnostics = DiagnosticSink::new();
        let out = convert(&parsed.root, "Greeting.astro", &mut diagnostics);
        assert!(out.code.contains("const name = \"World\";"));
        assert!(out.code.find("const name").unwrap() < out.code.find("export default").unwrap());
    }

    #[test]
    fn expression_attribute_stays_an_expression_in_jsx() {
        let parsed = Parser::new("<div id={foo} />", "X.astro").parse();
        let mut diagnostics = DiagnosticSink::new();
        let out = convert(&parsed.root, "X.astro", &mut diagnostics);
        assert!(out.code.contains("id={foo}"));
    }
}

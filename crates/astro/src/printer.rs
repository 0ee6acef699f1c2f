//! Code generator (C8): turns the parsed document into a JS/TS module
//! whose render function calls the runtime prelude (spec.md §4.6).
//!
//! The generated module always has the same shape: imports, the
//! frontmatter body verbatim, hoisted style/script imports, then a
//! `default async function $$render($$result) { ... }`-style export
//! whose body is a single tagged-template call to `$render` built up by
//! walking the template tree once, left to right.

use crate::css::scope_css;
use crate::options::TransformOptions;
use crate::result::{HoistedScriptType, TransformResultCssModule, TransformResultHoistedScript};
use astro_compiler_core::{AttributeValue, DiagnosticSink, LineIndex, MappingsBuilder, Node, Tag, TagClass};
use std::fmt::Write as _;

/// The exact text preceding the interpolated render body in the generated
/// module (see [`print`]), needed to translate the printer's body-relative
/// mapping coordinates into final generated-file coordinates.
const RETURN_LINE_PREFIX: &str = "    return `";

/// Runtime symbol names imported from the internal server runtime
/// (spec.md §4.6 "module prelude").
struct RuntimeSymbols;

impl RuntimeSymbols {
    const RENDER: &'static str = "$$render";
    const CREATE_COMPONENT: &'static str = "$$createComponent";
    const RENDER_COMPONENT: &'static str = "$$renderComponent";
    const MAYBE_RENDER_HEAD: &'static str = "$$maybeRenderHead";
    const RENDER_HEAD: &'static str = "$$renderHead";
    const RENDER_SLOT: &'static str = "$$renderSlot";
    const RENDER_SCRIPT: &'static str = "$$renderScript";
    const ADD_ATTRIBUTE: &'static str = "$$addAttribute";
    const SPREAD_ATTRIBUTES: &'static str = "$$spreadAttributes";
    const DEFINED_VARS: &'static str = "$$definedVars";
    const CREATE_ASTRO: &'static str = "$$createAstro";
    const METADATA: &'static str = "$$metadata";
}

/// Everything the printer produced from one document.
pub struct PrinterOutput {
    /// The full generated module source.
    pub code: String,
    /// CSS extracted from `<style>` blocks, scoped, in source order.
    pub css: Vec<TransformResultCssModule>,
    /// Scripts hoisted out of the template, in source order.
    pub scripts: Vec<TransformResultHoistedScript>,
    /// True if a `<head>` element was found anywhere in the template.
    pub contains_head: bool,
    /// Generated-to-source position mappings, already translated into
    /// final-file coordinates; empty unless the caller wants a source map
    /// (building it is cheap enough to always do — see spec.md §4.5).
    pub mappings: MappingsBuilder,
    /// One message per `<style>` block whose preprocessing failed.
    pub style_errors: Vec<String>,
}

/// Print `root` into a complete module. `scope_hash` is `None` when the
/// component has no scoped styles or `define:vars` (no class/attribute is
/// then attached to any element). `source` is the original file text, used
/// only to resolve source-map line/column positions.
pub fn print(
    root: &Node,
    options: &TransformOptions,
    scope_hash: Option<&str>,
    saw_head: bool,
    source: &str,
    _diagnostics: &mut DiagnosticSink,
) -> PrinterOutput {
    let mut printer = Printer {
        options,
        scope_hash,
        saw_head,
        css: Vec::new(),
        scripts: Vec::new(),
        style_index: 0,
        script_index: 0,
        contains_head: false,
        line_index: LineIndex::new(source),
        mappings: MappingsBuilder::new(),
        style_errors: Vec::new(),
    };

    let mut frontmatter_text = String::new();
    let mut body = String::new();

    for child in root.children() {
        if let Node::Frontmatter { value, .. } = child {
            frontmatter_text.push_str(value);
            continue;
        }
        printer.print_node(child, true, &mut body);
    }

    let mut code = String::new();
    let _ = writeln!(
        code,
        "import {{ {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {} }} from {:?};",
        RuntimeSymbols::RENDER,
        RuntimeSymbols::CREATE_COMPONENT,
        RuntimeSymbols::RENDER_COMPONENT,
        RuntimeSymbols::MAYBE_RENDER_HEAD,
        RuntimeSymbols::RENDER_HEAD,
        RuntimeSymbols::RENDER_SLOT,
        RuntimeSymbols::RENDER_SCRIPT,
        RuntimeSymbols::ADD_ATTRIBUTE,
        RuntimeSymbols::SPREAD_ATTRIBUTES,
        RuntimeSymbols::DEFINED_VARS,
        RuntimeSymbols::CREATE_ASTRO,
        RuntimeSymbols::METADATA,
        options.internal_url,
    );

    for (i, css) in printer.css.iter().enumerate() {
        let _ = writeln!(code, "import {:?}; // style {i}", css.virtual_module);
    }

    if !frontmatter_text.trim().is_empty() {
        code.push_str(frontmatter_text.trim_end());
        code.push('\n');
    }

    let _ = writeln!(code, "const {} = {:?};", RuntimeSymbols::METADATA, options.filename);
    let _ = writeln!(
        code,
        "export default {}(async ($$result) => {{",
        RuntimeSymbols::CREATE_COMPONENT
    );
    let _ = writeln!(code, "  const Astro = {}($$result, {});", RuntimeSymbols::CREATE_ASTRO, options.astro_global_args.clone().unwrap_or_else(|| "{}".to_string()));
    let _ = writeln!(code, "  return {}($$result, {:?}, {}, async ($$result) => {{", RuntimeSymbols::RENDER, scope_hash.unwrap_or(""), "{}");

    let prefix_lines_before_body = code.matches('\n').count() as u32;
    code.push_str(RETURN_LINE_PREFIX);
    code.push_str(&body);
    code.push_str("`;\n");

    let _ = writeln!(code, "  }});");
    let _ = writeln!(code, "}});");

    let body_start_col = RETURN_LINE_PREFIX.len() as u32;
    let mut mappings = MappingsBuilder::new();
    for (gen_line, gen_col, source_line, source_col) in printer.mappings.into_segments() {
        let final_line = prefix_lines_before_body + gen_line;
        let final_col = if gen_line == 0 { body_start_col + gen_col } else { gen_col };
        mappings.add_mapping(final_line, final_col, source_line, source_col);
    }

    PrinterOutput {
        code,
        css: printer.css,
        scripts: printer.scripts,
        contains_head: printer.contains_head,
        mappings,
        style_errors: printer.style_errors,
    }
}

struct Printer<'a> {
    options: &'a TransformOptions,
    scope_hash: Option<&'a str>,
    saw_head: bool,
    css: Vec<TransformResultCssModule>,
    scripts: Vec<TransformResultHoistedScript>,
    style_index: usize,
    script_index: usize,
    contains_head: bool,
    line_index: LineIndex,
    mappings: MappingsBuilder,
    style_errors: Vec<String>,
}

impl<'a> Printer<'a> {
    /// Record a mapping from the current end of `out` to `source_loc`,
    /// the byte offset in the original file this node begins at.
    fn mark(&mut self, out: &str, source_loc: astro_compiler_core::Loc) {
        let (gen_line, gen_col) = generated_position(out);
        let lc = self.line_index.line_col(source_loc);
        self.mappings.add_mapping(gen_line, gen_col, lc.line - 1, lc.column);
    }

    /// `is_root_child` is true only for nodes that are direct children of
    /// the document root (through transparent `Root`/`Fragment` wrappers);
    /// only those `<style>`/`<script>` tags are hoistable. Anything deeper
    /// renders in place as if it carried `is:inline` (spec.md §4.6
    /// "hoisting only applies at the top level").
    fn print_node(&mut self, node: &Node, is_root_child: bool, out: &mut String) {
        match node {
            Node::Text { value, position } => {
                self.mark(out, position.start);
                out.push_str(&escape_template_text(value));
            }
            Node::Comment { value, position } => {
                self.mark(out, position.start);
                let _ = write!(out, "<!--{value}-->");
            }
            Node::Doctype { value, position } => {
                self.mark(out, position.start);
                let _ = write!(out, "<!{value}>");
            }
            Node::Expression { children, position } => {
                self.mark(out, position.start);
                out.push_str("${");
                for child in children {
                    self.print_node(child, false, out);
                }
                out.push('}');
            }
            Node::Element(tag) if is_root_child && tag.name.eq_ignore_ascii_case("style") => {
                self.hoist_style(tag);
            }
            Node::Element(tag) if is_root_child && tag.name.eq_ignore_ascii_case("script") => {
                self.hoist_script(tag, out);
            }
            Node::Element(tag) => {
                self.contains_head |= tag.name.eq_ignore_ascii_case("head");
                let render_head_first = tag.name.eq_ignore_ascii_case("body") && self.saw_head;
                self.print_tag(tag, TagClass::Element, render_head_first, out);
            }
            Node::Component(tag) => self.print_component(tag, out),
            Node::CustomElement(tag) => self.print_tag(tag, TagClass::CustomElement, false, out),
            Node::Fragment(tag) => {
                for child in &tag.children {
                    self.print_node(child, is_root_child, out);
                }
            }
            Node::Root { children } => {
                for child in children {
                    self.print_node(child, is_root_child, out);
                }
            }
            Node::Frontmatter { .. } => {}
        }
    }

    fn print_tag(&mut self, tag: &Tag, class: TagClass, render_head_first: bool, out: &mut String) {
        self.mark(out, tag.position.start);
        let _ = write!(out, "<{}", tag.name);
        self.print_attributes(tag, class, out);
        out.push('>');

        if render_head_first {
            let _ = write!(out, "${{{}($$result)}}", RuntimeSymbols::MAYBE_RENDER_HEAD);
        }

        if tag.name.eq_ignore_ascii_case("head") {
            let _ = write!(out, "${{{}($$result)}}", RuntimeSymbols::RENDER_HEAD);
        }

        if astro_compiler_core::ast::VOID_ELEMENTS.contains(tag.name.to_ascii_lowercase().as_str()) {
            return;
        }

        let set_directive = tag.attribute("set:html").or_else(|| tag.attribute("set:text"));
        if let Some(attr) = set_directive {
            if let AttributeValue::Expression { expr } = &attr.value {
                let _ = write!(out, "${{{expr}}}");
            }
        } else {
            for child in &tag.children {
                self.print_node(child, false, out);
            }
        }

        let _ = write!(out, "</{}>", tag.name);
    }

    fn print_component(&mut self, tag: &Tag, out: &mut String) {
        self.mark(out, tag.position.start);
        let _ = write!(out, "${{{}($$result, {:?}, {}, {{", RuntimeSymbols::RENDER_COMPONENT, tag.name, tag.name);
        for (i, attr) in tag.attributes.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.print_attribute_entry(attr, out);
        }
        out.push_str("}, () => `");
        for child in &tag.children {
            self.print_node(child, false, out);
        }
        out.push_str("`)}");
    }

    fn print_attributes(&mut self, tag: &Tag, class: TagClass, out: &mut String) {
        // The parser already resolves duplicate-key precedence (last wins),
        // but a spread can still reintroduce a name a later literal
        // attribute overrides; skip an already-emitted name rather than
        // emit it twice.
        let mut already_emitted = std::collections::HashSet::new();
        for attr in &tag.attributes {
            if !attr.name.is_empty() && !already_emitted.insert(attr.name.clone()) {
                continue;
            }
            if attr.name == "set:html" || attr.name == "set:text" || attr.is_directive() {
                continue;
            }
            out.push(' ');
            match &attr.value {
                AttributeValue::Quoted { value, .. } => {
                    let _ = write!(out, "{}={:?}", attr.name, value);
                }
                AttributeValue::Empty => {
                    out.push_str(&attr.name);
                }
                AttributeValue::Shorthand => {
                    let _ = write!(out, "${{{}({:?}, {})}}", RuntimeSymbols::ADD_ATTRIBUTE, attr.name, attr.name);
                }
                AttributeValue::Expression { expr } => {
                    let _ = write!(out, "${{{}({:?}, {expr})}}", RuntimeSymbols::ADD_ATTRIBUTE, attr.name);
                }
                AttributeValue::Spread { expr } => {
                    let _ = write!(out, "${{{}({expr})}}", RuntimeSymbols::SPREAD_ATTRIBUTES);
                }
                AttributeValue::TemplateLiteral { raw } => {
                    let _ = write!(out, "${{{}({:?}, {raw})}}", RuntimeSymbols::ADD_ATTRIBUTE, attr.name);
                }
            }
        }
        if matches!(class, TagClass::Element) {
            if let Some(hash) = self.scope_hash {
                let _ = write!(out, " data-astro-cid-{hash}");
            }
        }
        if self.options.annotate_source_file {
            let loc = tag.position.start.as_usize();
            let _ = write!(
                out,
                " data-astro-source-file={:?} data-astro-source-loc={:?}",
                self.options.filename, loc
            );
        }
    }

    fn print_attribute_entry(&mut self, attr: &astro_compiler_core::Attribute, out: &mut String) {
        match &attr.value {
            AttributeValue::Quoted { value, .. } => {
                let _ = write!(out, "{:?}:{:?}", attr.name, value);
            }
            AttributeValue::Empty => {
                let _ = write!(out, "{:?}:true", attr.name);
            }
            AttributeValue::Shorthand => {
                let _ = write!(out, "{:?}:{}", attr.name, attr.name);
            }
            AttributeValue::Expression { expr } => {
                let _ = write!(out, "{:?}:{expr}", attr.name);
            }
            AttributeValue::Spread { expr } => {
                let _ = write!(out, "...({expr})");
            }
            AttributeValue::TemplateLiteral { raw } => {
                let _ = write!(out, "{:?}:{raw}", attr.name);
            }
        }
    }

    fn hoist_style(&mut self, tag: &Tag) {
        let idx = self.style_index;
        self.style_index += 1;

        let content: String = tag
            .children
            .iter()
            .filter_map(|c| if let Node::Text { value, .. } = c { Some(value.as_str()) } else { None })
            .collect();

        // A missing (or explicitly absent) preprocessed entry means the
        // block wasn't sent out for preprocessing; an empty one means
        // preprocessing ran and failed, and this style block is dropped
        // entirely rather than emitted with its original, unprocessed CSS.
        let source_css = match self.options.preprocessed_styles.get(idx).cloned() {
            None | Some(None) => content,
            Some(Some(s)) if s.is_empty() => {
                self.style_errors.push(format!("style preprocessing failed for block {idx}"));
                return;
            }
            Some(Some(s)) => s,
        };

        let is_global = tag.attribute("is:global").is_some();
        let scoped = match (is_global, self.scope_hash) {
            (true, _) | (_, None) => source_css,
            (false, Some(hash)) => scope_css(&source_css, hash, self.options.scoped_style_strategy),
        };

        let virtual_module = format!(
            "{}?astro&type=style&index={idx}&lang.css",
            self.options.normalized_filename
        );
        self.css.push(TransformResultCssModule { virtual_module, code: scoped });
    }

    fn hoist_script(&mut self, tag: &Tag, out: &mut String) {
        let idx = self.script_index;
        self.script_index += 1;

        if tag.attribute("is:inline").is_some() {
            let content: String = tag
                .children
                .iter()
                .filter_map(|c| if let Node::Text { value, .. } = c { Some(value.as_str()) } else { None })
                .collect();
            let _ = write!(out, "<script>{content}</script>");
            return;
        }

        if matches!(tag.attribute("src").map(|a| &a.value), Some(AttributeValue::Expression { .. })) {
            // `src={expr}` can't be hoisted to a static import path; render
            // the tag in place instead, like `is:inline`.
            self.print_tag(tag, TagClass::Element, false, out);
            return;
        }

        if let Some(src) = tag.attribute("src").and_then(|a| a.literal_value()) {
            self.scripts.push(TransformResultHoistedScript {
                kind: HoistedScriptType::External,
                src: Some(src.to_string()),
                virtual_module: None,
                code: None,
            });
        } else {
            let content: String = tag
                .children
                .iter()
                .filter_map(|c| if let Node::Text { value, .. } = c { Some(value.as_str()) } else { None })
                .collect();
            let virtual_module = format!(
                "{}?astro&type=script&index={}&lang.ts",
                self.options.normalized_filename, idx
            );
            self.scripts.push(TransformResultHoistedScript {
                kind: HoistedScriptType::Inline,
                src: None,
                virtual_module: Some(virtual_module),
                code: Some(content),
            });
        }

        let _ = write!(out, "${{{}($$result, {idx})}}", RuntimeSymbols::RENDER_SCRIPT);
    }
}

/// The 0-based (line, column) of the end of `out`, in generated-output
/// coordinates, matching the convention [`MappingsBuilder::add_mapping`]
/// expects.
fn generated_position(out: &str) -> (u32, u32) {
    let line = out.matches('\n').count() as u32;
    let col = match out.rfind('\n') {
        Some(idx) => (out.len() - idx - 1) as u32,
        None => out.len() as u32,
    };
    (line, col)
}

fn escape_template_text(value: &str) -> String {
    value.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}

#[cfg(test)]
mod tests {
    use super::*;
    use astro_compiler_core::Parser;

    fn print_source(source: &str, options: &TransformOptions) -> PrinterOutput {
        let parsed = Parser::new(source, &options.filename).parse();
        let mut sink = DiagnosticSink::new();
        print(&parsed.root, options, None, parsed.saw_head, source, &mut sink)
    }

    #[test]
    fn prints_minimal_element() {
        let options = TransformOptions::new("Hello.astro");
        let out = print_source("<h1>Hello</h1>", &options);
        assert!(out.code.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn hoists_inline_script_and_leaves_render_call() {
        let options = TransformOptions::new("Widget.astro");
        let out = print_source("<script>console.log(1)</script>", &options);
        assert_eq!(out.scripts.len(), 1);
        assert!(out.code.contains("$$renderScript"));
    }

    #[test]
    fn extracts_style_block_as_css_module() {
        let options = TransformOptions::new("Widget.astro");
        let out = print_source("<style>.a { color: red; }</style>", &options);
        assert_eq!(out.css.len(), 1);
        assert!(out.css[0].virtual_module.contains("type=style"));
    }

    #[test]
    fn failed_preprocessing_drops_style_and_records_error() {
        let options = TransformOptions::new("Widget.astro").with_preprocessed_styles(vec![Some(String::new())]);
        let out = print_source("<style>.a { color: red; }</style>", &options);
        assert!(out.css.is_empty());
        assert!(!out.code.contains("<style"));
        assert_eq!(out.style_errors.len(), 1);
    }

    #[test]
    fn missing_preprocessed_entry_keeps_original_css() {
        let options = TransformOptions::new("Widget.astro");
        let out = print_source("<style>.a { color: red; }</style>", &options);
        assert!(out.style_errors.is_empty());
        assert!(out.css[0].code.contains("color: red"));
    }

    #[test]
    fn nested_style_is_rendered_inline_not_hoisted() {
        let options = TransformOptions::new("Widget.astro");
        let out = print_source("<div><style>.a { color: red; }</style></div>", &options);
        assert!(out.css.is_empty());
        assert!(out.code.contains("<style"));
    }

    #[test]
    fn nested_script_is_rendered_inline_not_hoisted() {
        let options = TransformOptions::new("Widget.astro");
        let out = print_source("<div><script>console.log(1)</script></div>", &options);
        assert!(out.scripts.is_empty());
        assert!(out.code.contains("<script>console.log(1)</script>"));
    }

    #[test]
    fn expression_src_script_stays_inline() {
        let options = TransformOptions::new("Widget.astro");
        let out = print_source("---\nconst url = '/a.js';\n---\n<script src={url}></script>", &options);
        assert!(out.scripts.is_empty());
        assert!(out.code.contains("$$addAttribute"));
    }
}

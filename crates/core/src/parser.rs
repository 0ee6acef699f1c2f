//! The tree-construction parser (C4): drives the [`Tokenizer`] and builds
//! the AST, applying a simplified HTML5 insertion-mode state machine
//! extended for frontmatter, expressions, and fragments (spec.md §4.2).
//!
//! Active-formatting-element reconstruction is intentionally not
//! implemented: expressions form a lexical scope boundary (spec.md
//! invariant, "Expressions form a lexical scope") so an element left open
//! across a `{` never gets implicitly reopened inside it.

use crate::ast::{classify_tag_name, Attribute, Node, Tag, TagClass};
use crate::diagnostic::{DiagnosticCode, DiagnosticMessage, DiagnosticSink};
use crate::loc::{LineIndex, Position, Range};
use crate::token::{AttributeToken, AttributeValue as TokenAttributeValue, Token, TokenErrorKind};
use crate::tokenizer::{is_raw_text_element, Tokenizer};

/// One entry in the parser's open-element stack.
struct OpenElement {
    class: TagClass,
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
    start: Range,
    self_closed: bool,
    /// True for a `{` frame pushed by [`Token::StartExpression`], which
    /// closes on `}` rather than a named end tag and is never itself a
    /// candidate for `tag_matches_close`.
    is_expression: bool,
}

/// Parses a single `.astro` source file into an [`Node::Root`].
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    source: &'a str,
    file: String,
    line_index: LineIndex,
    diagnostics: DiagnosticSink,
    stack: Vec<OpenElement>,
    frontmatter: Option<Node>,
    root_children: Vec<Node>,
    /// Set once `<head>` has been opened and closed, so the printer/
    /// transform can tell whether a synthetic head needs to be assumed
    /// (spec.md §4.4 "containsHead tracking").
    saw_head: bool,
}

/// The result of parsing one source file.
pub struct ParseResult {
    /// The document root node. Its first child is the `Frontmatter` node
    /// if one was present.
    pub root: Node,
    /// Whether a `<head>` element was encountered anywhere in the document.
    pub saw_head: bool,
    /// Diagnostics collected during parsing, in source order.
    pub diagnostics: Vec<DiagnosticMessage>,
}

impl<'a> Parser<'a> {
    /// Build a parser over `source`, reporting diagnostics against `file`.
    pub fn new(source: &'a str, file: &str) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            source,
            file: file.to_string(),
            line_index: LineIndex::new(source),
            diagnostics: DiagnosticSink::new(),
            stack: Vec::new(),
            frontmatter: None,
            root_children: Vec::new(),
            saw_head: false,
        }
    }

    /// Run the parser to completion.
    pub fn parse(mut self) -> ParseResult {
        log::trace!("parsing {:?} ({} bytes)", self.file, self.source.len());
        loop {
            let tok = self.tokenizer.next_token();
            if matches!(tok, Token::Eof { .. }) {
                break;
            }
            self.dispatch(tok);
        }
        self.close_unclosed_elements();

        let mut children = Vec::new();
        if let Some(fm) = self.frontmatter.take() {
            children.push(fm);
        }
        children.append(&mut self.root_children);

        if !self.diagnostics.is_empty() {
            log::debug!("parsed {:?} with {} diagnostics", self.file, self.diagnostics.len());
        }

        ParseResult {
            root: Node::Root { children },
            saw_head: self.saw_head,
            diagnostics: self.diagnostics.into_messages(),
        }
    }

    fn dispatch(&mut self, tok: Token) {
        match tok {
            Token::Frontmatter { range, value } => {
                self.frontmatter = Some(Node::Frontmatter {
                    value,
                    position: Position::from_range(range),
                });
            }
            Token::Text { range, value } => self.push_child(Node::Text {
                value,
                position: Position::from_range(range),
            }),
            Token::Comment { range, value } => self.push_child(Node::Comment {
                value,
                position: Position::from_range(range),
            }),
            Token::Doctype { range, value } => self.push_child(Node::Doctype {
                value,
                position: Position::from_range(range),
            }),
            Token::StartExpression { range } => {
                self.stack.push(OpenElement {
                    class: TagClass::Fragment, // placeholder class, never read for expressions
                    name: String::new(),
                    attributes: Vec::new(),
                    children: Vec::new(),
                    start: range,
                    self_closed: false,
                    is_expression: true,
                });
            }
            Token::EndExpression { range } => self.close_expression(range),
            Token::StartTag { range, name, attributes } => {
                self.open_tag(range, name, attributes, false);
            }
            Token::SelfClosingTag { range, name, attributes } => {
                self.open_tag(range, name, attributes, true);
            }
            Token::EndTag { range, name } => self.close_tag(range, name),
            Token::Error { range, kind } => self.report_token_error(range, kind),
            Token::Eof { .. } => {}
        }
    }

    fn report_token_error(&mut self, range: Range, kind: TokenErrorKind) {
        let (code, text, hint) = match kind {
            TokenErrorKind::UnterminatedJsComment => (
                DiagnosticCode::ErrorUnterminatedJsComment,
                "unterminated JS comment".to_string(),
                None,
            ),
            TokenErrorKind::UnterminatedHtmlComment => (
                DiagnosticCode::WarningUnterminatedHtmlComment,
                "unterminated HTML comment".to_string(),
                None,
            ),
            TokenErrorKind::FragmentShorthandAttrs => (
                DiagnosticCode::ErrorFragmentShorthandAttrs,
                "fragments cannot have attributes".to_string(),
                None,
            ),
            TokenErrorKind::FrontmatterFenceUnpaired => (
                DiagnosticCode::ErrorFrontmatterFenceUnpaired,
                "`---` fence found with no matching opening fence".to_string(),
                Some("add an opening `---` fence before this line"),
            ),
        };
        let mut message = DiagnosticMessage::at(code, text, &self.file, self.source, &self.line_index, range);
        if let Some(hint) = hint {
            message = message.with_hint(hint);
        }
        self.diagnostics.push(message);
    }

    fn resolve_attributes(&self, tokens: Vec<AttributeToken>) -> Vec<Attribute> {
        // Last-occurrence-wins dedup, preserving the position of whichever
        // slot (named or spread) the winning value occupies so spread
        // ordering relative to named attributes survives (spec.md
        // invariant 3 "duplicate attribute keys ... spreads retain
        // position").
        let mut result: Vec<Attribute> = Vec::with_capacity(tokens.len());
        for tok in tokens {
            let attr = Attribute {
                name: tok.name.clone(),
                value: convert_value(tok.value),
                position: Position::from_range(tok.range),
            };
            if !attr.name.is_empty() {
                if let Some(existing) = result.iter_mut().find(|a| a.name == attr.name) {
                    *existing = attr;
                    continue;
                }
            }
            result.push(attr);
        }
        result
    }

    fn open_tag(&mut self, range: Range, name: String, attributes: Vec<AttributeToken>, self_closed_tag: bool) {
        let class = classify_tag_name(&name);
        let attrs = self.resolve_attributes(attributes);
        let name_lower = name.to_ascii_lowercase();
        let is_void = crate::ast::VOID_ELEMENTS.contains(name_lower.as_str());
        let self_closed = self_closed_tag || (is_void && matches!(class, TagClass::Element));

        if name_lower == "head" {
            self.saw_head = true;
        }

        if self_closed {
            let node = self.finish_tag(class, name, attrs, Vec::new(), range, true);
            self.push_child(node);
            return;
        }

        if matches!(class, TagClass::Element) && is_raw_text_element(&name_lower) {
            self.tokenizer.enter_raw_text(name_lower);
        }

        self.stack.push(OpenElement {
            class,
            name,
            attributes: attrs,
            children: Vec::new(),
            start: range,
            self_closed: false,
            is_expression: false,
        });
    }

    fn close_tag(&mut self, range: Range, name: String) {
        let name_lower = name.to_ascii_lowercase();
        // Find the nearest open element with a matching name (HTML5's
        // "generate implied end tags" simplified down to: anything opened
        // after the match gets force-closed, spec.md §4.2 "Error recovery").
        let pos = self
            .stack
            .iter()
            .rposition(|el| tag_matches_close(el, &name_lower));

        match pos {
            Some(idx) => {
                while self.stack.len() > idx + 1 {
                    let unclosed = self.stack.pop().unwrap();
                    log::warn!("recovering from unclosed element <{}> in {:?}", unclosed.name, self.file);
                    self.diagnostics.push(DiagnosticMessage::at(
                        DiagnosticCode::WarningUnclosedHtmlTag,
                        format!("element <{}> was never closed", unclosed.name),
                        &self.file,
                        self.source,
                        &self.line_index,
                        unclosed.start,
                    ));
                    let node = self.finish_tag(
                        unclosed.class,
                        unclosed.name,
                        unclosed.attributes,
                        unclosed.children,
                        unclosed.start,
                        unclosed.self_closed,
                    );
                    self.append_to_parent(node);
                }
                let el = self.stack.pop().unwrap();
                let full_range = el.start.merge(&range);
                let node = self.finish_tag(el.class, el.name, el.attributes, el.children, full_range, false);
                self.append_to_parent(node);
            }
            None => {
                if crate::ast::VOID_ELEMENTS.contains(name_lower.as_str()) {
                    // Closing tag for a void element is simply ignored.
                    return;
                }
                // No matching open element at all: an orphan close tag is
                // dropped, matching HTML5's "stack of open elements" miss
                // behavior for an unmatched end tag.
            }
        }
    }

    fn close_expression(&mut self, range: Range) {
        if let Some(pos) = self.stack.iter().rposition(|el| el.is_expression) {
            while self.stack.len() > pos + 1 {
                let unclosed = self.stack.pop().unwrap();
                self.diagnostics.push(DiagnosticMessage::at(
                    DiagnosticCode::WarningUnclosedHtmlTag,
                    format!("element <{}> was never closed", unclosed.name),
                    &self.file,
                    self.source,
                    &self.line_index,
                    unclosed.start,
                ));
                let node = self.finish_tag(
                    unclosed.class,
                    unclosed.name,
                    unclosed.attributes,
                    unclosed.children,
                    unclosed.start,
                    unclosed.self_closed,
                );
                self.append_to_parent(node);
            }
            let el = self.stack.pop().unwrap();
            let full_range = el.start.merge(&range);
            self.push_child(Node::Expression {
                children: el.children,
                position: Position::from_range(full_range),
            });
        }
        // An unmatched `}` cannot reach here: the tokenizer only emits
        // `EndExpression` when `expr_depth > 0`, and every `StartExpression`
        // pushes exactly one stack frame recognized by the predicate above.
    }

    fn finish_tag(
        &mut self,
        class: TagClass,
        name: String,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
        range: Range,
        self_closed: bool,
    ) -> Node {
        let tag = Tag {
            name,
            attributes,
            children,
            position: Position::from_range(range),
            self_closed,
        };
        match class {
            TagClass::Element => Node::Element(tag),
            TagClass::Component => Node::Component(tag),
            TagClass::CustomElement => Node::CustomElement(tag),
            TagClass::Fragment => Node::Fragment(tag),
        }
    }

    fn push_child(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(top) => top.children.push(node),
            None => self.root_children.push(node),
        }
    }

    fn append_to_parent(&mut self, node: Node) {
        self.push_child(node);
    }

    fn close_unclosed_elements(&mut self) {
        while let Some(el) = self.stack.pop() {
            if el.is_expression {
                // An unterminated expression: close it off at EOF.
                let node = Node::Expression {
                    children: el.children,
                    position: Position::from_range(el.start),
                };
                self.push_child(node);
                continue;
            }
            self.diagnostics.push(DiagnosticMessage::at(
                DiagnosticCode::WarningUnclosedHtmlTag,
                format!("element <{}> was never closed", el.name),
                &self.file,
                self.source,
                &self.line_index,
                el.start,
            ));
            let node = self.finish_tag(el.class, el.name, el.attributes, el.children, el.start, el.self_closed);
            self.push_child(node);
        }
    }
}

fn tag_matches_close(el: &OpenElement, close_name_lower: &str) -> bool {
    if el.is_expression {
        return false;
    }
    if el.name.is_empty() {
        return close_name_lower.is_empty(); // `<>` closed by `</>`
    }
    match el.class {
        TagClass::Element => el.name.eq_ignore_ascii_case(close_name_lower),
        _ => el.name == close_name_lower || el.name.to_ascii_lowercase() == close_name_lower,
    }
}

fn convert_value(value: TokenAttributeValue) -> TokenAttributeValue {
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseResult {
        Parser::new(source, "test.astro").parse()
    }

    #[test]
    fn parses_simple_element_with_text() {
        let result = parse("<h1>Hello</h1>");
        assert_eq!(result.diagnostics.len(), 0);
        let Node::Root { children } = result.root else { panic!() };
        assert_eq!(children.len(), 1);
        assert!(matches!(&children[0], Node::Element(tag) if tag.name == "h1"));
        assert!(matches!(&children[0].children()[0], Node::Text { value, .. } if value == "Hello"));
    }

    #[test]
    fn frontmatter_becomes_first_child() {
        let result = parse("---\nconst x = 1;\n---\n<h1 />");
        let Node::Root { children } = result.root else { panic!() };
        assert!(matches!(&children[0], Node::Frontmatter { value, .. } if value == "const x = 1;\n"));
    }

    #[test]
    fn classifies_component_and_custom_element() {
        let result = parse("<MyComponent /><my-el></my-el>");
        let Node::Root { children } = result.root else { panic!() };
        assert!(matches!(&children[0], Node::Component(_)));
        assert!(matches!(&children[1], Node::CustomElement(_)));
    }

    #[test]
    fn unclosed_tag_recovers_with_warning() {
        let result = parse("<div><span>text</div>");
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.code == DiagnosticCode::WarningUnclosedHtmlTag.as_i32()));
        let Node::Root { children } = result.root else { panic!() };
        assert_eq!(children.len(), 1);
        let Node::Element(div) = &children[0] else { panic!() };
        assert_eq!(div.name, "div");
        assert!(matches!(&div.children[0], Node::Element(span) if span.name == "span"));
    }

    #[test]
    fn nested_expression_with_markup() {
        let result = parse("<div>{items.map(i => <li>{i}</li>)}</div>");
        let Node::Root { children } = result.root else { panic!() };
        let Node::Element(div) = &children[0] else { panic!() };
        assert!(matches!(&div.children[0], Node::Expression { .. }));
        let Node::Expression { children: expr_children, .. } = &div.children[0] else { panic!() };
        assert!(expr_children.iter().any(|c| matches!(c, Node::Element(t) if t.name == "li")));
    }

    #[test]
    fn duplicate_attribute_last_wins() {
        let result = parse(r#"<div a="1" a="2" />"#);
        let Node::Root { children } = result.root else { panic!() };
        let Node::Element(div) = &children[0] else { panic!() };
        assert_eq!(div.attributes.len(), 1);
        assert_eq!(div.attribute("a").unwrap().literal_value(), Some("2"));
    }

    #[test]
    fn fragment_shorthand_is_tracked() {
        let result = parse("<>hello</>");
        let Node::Root { children } = result.root else { panic!() };
        assert!(matches!(&children[0], Node::Fragment(tag) if tag.name.is_empty()));
    }

    #[test]
    fn head_detection_sets_saw_head() {
        let result = parse("<html><head></head></html>");
        assert!(result.saw_head);
    }

    #[test]
    fn void_element_self_closes_without_consuming_following_sibling() {
        let result = parse("<br><p>after</p>");
        let Node::Root { children } = result.root else { panic!() };
        assert_eq!(children.len(), 2);
        assert!(matches!(&children[0], Node::Element(tag) if tag.name == "br" && tag.children.is_empty()));
    }
}

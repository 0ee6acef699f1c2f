//! AST node types produced by the tree-construction parser (C4).
//!
//! The redesign note in spec.md §9 ("Tree parent links") replaces the
//! source's linked-child-plus-parent-backpointer shape with plain owned
//! child vectors; callers that need a parent recover it from explicit
//! traversal state (see [`crate::parser::Parser`]'s open-element stack),
//! never from a back-edge stored on the node itself.

use crate::loc::Position;
use crate::token::{AttributeValue as TokenAttributeValue, QuoteKind};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// The fixed set of HTML void elements (spec.md §4.2 "Void and raw
/// policy"): these never carry children, and a closing tag for one is
/// ignored with a warning.
pub static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// Elements whose text content is raw (not re-tokenized as markup).
pub static RAW_TEXT_ELEMENTS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["script", "style", "textarea", "title"].into_iter().collect());

/// An attribute attached to an element-like node, with duplicate-key
/// resolution already applied by the parser (spec.md invariant 3: last
/// occurrence wins, spread attributes retain position).
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The attribute name; empty for a spread.
    pub name: String,
    /// The attribute's value flavor, copied from the token representation.
    pub value: TokenAttributeValue,
    /// Source position of this attribute (the *last* occurrence's position
    /// when a key was overridden, since that's the value actually used).
    pub position: Position,
}

impl Attribute {
    /// Returns true if this is a `prefix:name`-shaped directive
    /// (spec.md §3 "Each parent-like node carries ... directives").
    pub fn is_directive(&self) -> bool {
        self.directive_prefix().is_some()
    }

    /// The `prefix` of a `prefix:name` directive attribute, if any.
    pub fn directive_prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// The literal string value, if this attribute has one (quoted or
    /// unquoted). Expression/shorthand/spread/template attributes have no
    /// single literal string and return `None`.
    pub fn literal_value(&self) -> Option<&str> {
        match &self.value {
            TokenAttributeValue::Quoted { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Whether this attribute's value was written unquoted.
    pub fn is_unquoted(&self) -> bool {
        matches!(
            &self.value,
            TokenAttributeValue::Quoted {
                quote: QuoteKind::Unquoted,
                ..
            }
        )
    }
}

/// Shared shape for every element-like node (`Element`, `Component`,
/// `CustomElement`, `Fragment`): a tag name, attributes, and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// Tag name. Case-normalized to lowercase for `Element`s; case-preserved
    /// for `Component`/`CustomElement` (spec.md invariant 2).
    pub name: String,
    /// Attributes in source order, after duplicate-key resolution.
    pub attributes: Vec<Attribute>,
    /// Child nodes, in source order.
    pub children: Vec<Node>,
    /// Source position, spanning the opening tag through the closing tag
    /// (or just the tag itself, for self-closing/void elements).
    pub position: Position,
    /// Whether the source wrote this as a self-closing tag (`<Foo />`).
    pub self_closed: bool,
}

impl Tag {
    /// Look up the effective value of `key`, honoring right-biased
    /// deduplication (the parser already resolves this at construction, so
    /// this simply finds the attribute by name).
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == key)
    }

    /// All directive attributes (`prefix:name`) on this node.
    pub fn directives(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_directive())
    }
}

/// A parsed AST node. See spec.md §3 "AST nodes (produced by C4)".
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// The document root; its children are the top-level nodes.
    Root {
        /// Top-level children in source order.
        children: Vec<Node>,
    },
    /// The verbatim frontmatter body between `---` fences.
    Frontmatter {
        /// The literal JS/TS text.
        value: String,
        /// Source position of the interior text (excluding fences).
        position: Position,
    },
    /// A known HTML element (lowercase tag name, not a component or
    /// custom element).
    Element(Tag),
    /// A component reference: uppercase-leading, dotted (`Ns.Comp`), or a
    /// name the classifier otherwise recognizes as component-shaped.
    Component(Tag),
    /// A custom element: a tag name containing `-` not on the HTML
    /// element allow-list.
    CustomElement(Tag),
    /// `<>…</>` or `<Fragment>…</Fragment>`.
    Fragment(Tag),
    /// `{ … }` — a lazily-parsed JS expression whose children are AST
    /// nodes recursively produced by tokenizing the interior as markup.
    Expression {
        /// Child nodes found inside the braces.
        children: Vec<Node>,
        /// Source position, including the braces.
        position: Position,
    },
    /// A literal run of character data.
    Text {
        /// The text value (already stripped of `\0` bytes).
        value: String,
        /// Source position.
        position: Position,
    },
    /// `<!-- … -->`.
    Comment {
        /// The comment's interior text.
        value: String,
        /// Source position, including the delimiters.
        position: Position,
    },
    /// `<!DOCTYPE …>`.
    Doctype {
        /// The doctype's interior text.
        value: String,
        /// Source position, including the angle brackets.
        position: Position,
    },
}

impl Node {
    /// This node's source position.
    pub fn position(&self) -> Position {
        match self {
            Node::Root { .. } => Position {
                start: crate::loc::Loc::ZERO,
                end: crate::loc::Loc::ZERO,
            },
            Node::Frontmatter { position, .. }
            | Node::Expression { position, .. }
            | Node::Text { position, .. }
            | Node::Comment { position, .. }
            | Node::Doctype { position, .. } => *position,
            Node::Element(tag) | Node::Component(tag) | Node::CustomElement(tag) | Node::Fragment(tag) => {
                tag.position
            }
        }
    }

    /// This node's children, if it has any (every variant but `Text`,
    /// `Comment`, `Doctype`, `Frontmatter`).
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Root { children } | Node::Expression { children, .. } => children,
            Node::Element(tag) | Node::Component(tag) | Node::CustomElement(tag) | Node::Fragment(tag) => {
                &tag.children
            }
            Node::Frontmatter { .. } | Node::Text { .. } | Node::Comment { .. } | Node::Doctype { .. } => &[],
        }
    }

    /// Mutable access to this node's children vector, if it has one.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root { children } | Node::Expression { children, .. } => Some(children),
            Node::Element(tag) | Node::Component(tag) | Node::CustomElement(tag) | Node::Fragment(tag) => {
                Some(&mut tag.children)
            }
            Node::Frontmatter { .. } | Node::Text { .. } | Node::Comment { .. } | Node::Doctype { .. } => None,
        }
    }

    /// The tag name, for element-like nodes.
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Node::Element(tag) | Node::Component(tag) | Node::CustomElement(tag) | Node::Fragment(tag) => {
                Some(&tag.name)
            }
            _ => None,
        }
    }

    /// Whether this node (or, for elements, its tag) is a `<head>` element.
    pub fn is_head_element(&self) -> bool {
        matches!(self, Node::Element(tag) if tag.name.eq_ignore_ascii_case("head"))
    }
}

/// Classification of a tag name into the AST node kind it should become
/// (spec.md §3 "AST nodes"). `known_html_tags` is the fixed set of element
/// names that should be classified as `Element` rather than `Component`
/// even if case doesn't disambiguate (e.g. all-lowercase custom words are
/// `CustomElement` only when they contain a hyphen).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    /// A plain HTML element.
    Element,
    /// A component reference.
    Component,
    /// A custom element (hyphenated, not a known HTML tag).
    CustomElement,
    /// A fragment shorthand or `<Fragment>`.
    Fragment,
}

/// Classify a tag name per spec.md §3's AST node rules.
pub fn classify_tag_name(name: &str) -> TagClass {
    if name.is_empty() {
        return TagClass::Fragment;
    }
    if name == "Fragment" {
        return TagClass::Fragment;
    }
    if VOID_ELEMENTS.contains(name.to_ascii_lowercase().as_str()) || is_known_html_tag(name) {
        if name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            return TagClass::Component;
        }
        return TagClass::Element;
    }
    if name.contains('-') {
        return TagClass::CustomElement;
    }
    if name.contains('.') || name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        return TagClass::Component;
    }
    TagClass::Element
}

/// The fixed set of standard HTML element names recognized for
/// classification purposes. Not exhaustive of every HTML tag ever
/// standardized, but covers the common document/flow/sectioning/embedded
/// vocabulary a `.astro` template is expected to use.
pub static KNOWN_HTML_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "html", "head", "body", "title", "base", "link", "meta", "style", "script", "noscript",
        "template", "div", "span", "p", "a", "ul", "ol", "li", "dl", "dt", "dd", "h1", "h2", "h3",
        "h4", "h5", "h6", "header", "footer", "main", "section", "article", "aside", "nav",
        "figure", "figcaption", "table", "thead", "tbody", "tfoot", "tr", "td", "th", "caption",
        "colgroup", "col", "form", "input", "button", "select", "option", "optgroup", "textarea",
        "label", "fieldset", "legend", "datalist", "output", "progress", "meter", "img", "picture",
        "source", "video", "audio", "track", "canvas", "svg", "iframe", "embed", "object", "param",
        "b", "i", "u", "em", "strong", "small", "s", "mark", "sub", "sup", "code", "pre", "kbd",
        "samp", "var", "blockquote", "q", "cite", "abbr", "address", "time", "data", "br", "hr",
        "wbr", "area", "map", "details", "summary", "dialog", "slot",
    ]
    .into_iter()
    .collect()
});

fn is_known_html_tag(name: &str) -> bool {
    KNOWN_HTML_TAGS.contains(name.to_ascii_lowercase().as_str()) && name == name.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_plain_element() {
        assert_eq!(classify_tag_name("div"), TagClass::Element);
    }

    #[test]
    fn classifies_component_by_uppercase() {
        assert_eq!(classify_tag_name("MyComponent"), TagClass::Component);
    }

    #[test]
    fn classifies_component_by_dotted_name() {
        assert_eq!(classify_tag_name("a.b.c.d"), TagClass::Component);
    }

    #[test]
    fn classifies_custom_element_by_hyphen() {
        assert_eq!(classify_tag_name("my-element"), TagClass::CustomElement);
    }

    #[test]
    fn classifies_fragment() {
        assert_eq!(classify_tag_name(""), TagClass::Fragment);
        assert_eq!(classify_tag_name("Fragment"), TagClass::Fragment);
    }

    #[test]
    fn void_elements_never_classified_as_custom() {
        assert_eq!(classify_tag_name("br"), TagClass::Element);
    }
}

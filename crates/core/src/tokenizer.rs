//! The tokenizer (C3): a hand-written state machine that turns raw source
//! bytes into a stream of [`Token`]s, recognizing HTML token shapes,
//! template-expression boundaries, and the various attribute flavors.
//!
//! The tokenizer is pull-based: the parser (C4) drives it one token at a
//! time via [`Tokenizer::next_token`], and tells it when to switch into
//! raw-text mode (for `script`/`style`/`textarea`/`title`) or to jump its
//! cursor past a recursively-parsed expression body.

use crate::loc::Range;
use crate::scanner;
use crate::token::{AttributeToken, AttributeValue, QuoteKind, Token, TokenErrorKind};

/// The set of elements whose content is raw text: everything up to the
/// matching end tag is literal character data, not markup (spec.md §4.1).
pub fn is_raw_text_element(tag_name_lower: &str) -> bool {
    matches!(tag_name_lower, "script" | "style" | "textarea" | "title")
}

/// Pull-based tokenizer over a single source string.
pub struct Tokenizer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// When `Some`, the tokenizer is scanning raw text until the matching
    /// case-insensitive end tag for this element name.
    raw_text_tag: Option<String>,
    emitted_frontmatter: bool,
    /// Nesting depth of template-level `{ … }` expressions currently open.
    /// A bare `}` only closes an expression (emitting [`Token::EndExpression`])
    /// when this is greater than zero; otherwise it is ordinary text,
    /// matching spec.md §4.2's lexical-scope invariant for nested
    /// expressions ("Expressions form a lexical scope").
    expr_depth: u32,
}

impl<'a> Tokenizer<'a> {
    /// Build a tokenizer over `source`, starting at byte 0.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            raw_text_tag: None,
            emitted_frontmatter: false,
            expr_depth: 0,
        }
    }

    /// Current byte cursor.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The full source this tokenizer was built over.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Tell the tokenizer that the next text run is raw text terminated by
    /// `</tag_name>` (case-insensitive), per spec.md §4.1.
    pub fn enter_raw_text(&mut self, tag_name_lower: String) {
        self.raw_text_tag = Some(tag_name_lower);
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Produce the next token, advancing the cursor.
    pub fn next_token(&mut self) -> Token {
        if !self.emitted_frontmatter {
            self.emitted_frontmatter = true;
            if let Some(tok) = self.try_scan_frontmatter() {
                return tok;
            }
        }

        if let Some(tag) = self.raw_text_tag.clone() {
            return self.scan_raw_text(&tag);
        }

        if self.at_eof() {
            return Token::Eof {
                range: Range::new(self.pos, self.pos),
            };
        }

        match self.peek(0).unwrap() {
            b'<' => self.scan_markup(),
            b'{' => self.scan_start_expression(),
            b'}' if self.expr_depth > 0 => self.scan_end_expression(),
            _ => self.scan_text(),
        }
    }

    /// Detect a leading frontmatter block: after skipping leading blank
    /// lines, a line containing only `---` opens it; the next `---` line
    /// closes it (spec.md §4.2 "Frontmatter extraction").
    fn try_scan_frontmatter(&mut self) -> Option<Token> {
        let mut i = 0usize;
        // Skip leading blank lines (whitespace-only lines).
        loop {
            let line_end = self.source[i..].find('\n').map(|n| i + n + 1).unwrap_or(self.source.len());
            let line = &self.source[i..line_end];
            if line.trim().is_empty() && line_end < self.source.len() {
                i = line_end;
                continue;
            }
            break;
        }
        let line_end = self.source[i..].find('\n').map(|n| i + n).unwrap_or(self.source.len());
        if self.source[i..line_end].trim_end_matches('\r') != "---" {
            return Self::scan_unpaired_frontmatter_fence(self.source);
        }
        let body_start = (line_end + 1).min(self.source.len());
        // Scan forward for the next line that is exactly "---".
        let mut j = body_start;
        loop {
            if j >= self.source.len() {
                // Unterminated frontmatter: treat the rest of the document
                // as the frontmatter body (best-effort recovery, §7 kind 1).
                self.pos = self.source.len();
                return Some(Token::Frontmatter {
                    range: Range::new(body_start, self.source.len()),
                    value: self.source[body_start..].to_string(),
                });
            }
            let next_nl = self.source[j..].find('\n').map(|n| j + n).unwrap_or(self.source.len());
            if self.source[j..next_nl].trim_end_matches('\r') == "---" {
                let body_end = j;
                let after = (next_nl + 1).min(self.source.len());
                self.pos = after;
                return Some(Token::Frontmatter {
                    range: Range::new(body_start, body_end),
                    value: self.source[body_start..body_end].to_string(),
                });
            }
            j = if next_nl >= self.source.len() { self.source.len() } else { next_nl + 1 };
            if j > self.source.len() {
                break;
            }
            if next_nl >= self.source.len() {
                break;
            }
        }
        None
    }

    /// No opening fence was found at document start; if a stray `---` line
    /// appears anyway later in the document, that's diagnostic 1006 rather
    /// than silence (spec.md §4.2). Doesn't move the cursor: the document
    /// is tokenized normally afterward, with the fence line as ordinary
    /// content.
    fn scan_unpaired_frontmatter_fence(source: &str) -> Option<Token> {
        let mut j = 0usize;
        while j < source.len() {
            let line_end = source[j..].find('\n').map(|n| j + n).unwrap_or(source.len());
            if source[j..line_end].trim_end_matches('\r') == "---" {
                return Some(Token::Error {
                    range: Range::new(j, line_end),
                    kind: TokenErrorKind::FrontmatterFenceUnpaired,
                });
            }
            j = if line_end >= source.len() { source.len() } else { line_end + 1 };
        }
        None
    }

    fn scan_text(&mut self) -> Token {
        let start = self.pos;
        let mut buf = String::new();
        if self.expr_depth > 0 {
            // Inside a template-level expression body: only a `{`/`}`/`<`
            // seen in plain JS code context closes or nests the expression;
            // one inside a string/template/comment/regex is just more text
            // (spec.md §9 "uses the JS scanner only to find the matching `}`").
            let mut js = scanner::JsScanner::new();
            while let Some(b) = self.peek(0) {
                if js.in_code() && matches!(b, b'<' | b'{' | b'}') {
                    break;
                }
                if b == 0 {
                    self.pos += 1;
                    continue;
                }
                let step = js.advance(self.bytes, self.pos).max(utf8_len(b));
                buf.push_str(&self.source[self.pos..self.pos + step]);
                self.pos += step;
            }
        } else {
            while let Some(b) = self.peek(0) {
                if b == b'<' || b == b'{' {
                    break;
                }
                if b == 0 {
                    // spec.md §4.1: `\x00` is never re-emitted into output.
                    self.pos += 1;
                    continue;
                }
                let ch_len = utf8_len(b);
                buf.push_str(&self.source[self.pos..self.pos + ch_len]);
                self.pos += ch_len;
            }
        }
        Token::Text {
            range: Range::new(start, self.pos),
            value: buf,
        }
    }

    fn scan_raw_text(&mut self, tag_name_lower: &str) -> Token {
        let start = self.pos;
        let closer = format!("</{tag_name_lower}");
        loop {
            match self.source[self.pos..].find("</") {
                Some(rel) => {
                    let candidate_start = self.pos + rel;
                    let candidate = &self.source[candidate_start..];
                    if candidate.len() >= closer.len()
                        && candidate[..closer.len()].eq_ignore_ascii_case(&closer)
                        && candidate[closer.len()..]
                            .chars()
                            .next()
                            .map(|c| c == '>' || c.is_whitespace() || c == '/')
                            .unwrap_or(true)
                    {
                        let text = self.source[start..candidate_start].to_string();
                        self.pos = candidate_start;
                        self.raw_text_tag = None;
                        return Token::Text {
                            range: Range::new(start, candidate_start),
                            value: text,
                        };
                    } else {
                        self.pos = candidate_start + 2;
                    }
                }
                None => {
                    let text = self.source[start..].to_string();
                    self.pos = self.source.len();
                    self.raw_text_tag = None;
                    return Token::Text {
                        range: Range::new(start, self.pos),
                        value: text,
                    };
                }
            }
        }
    }

    fn scan_start_expression(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        self.expr_depth += 1;
        Token::StartExpression {
            range: Range::new(start, self.pos),
        }
    }

    fn scan_end_expression(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        self.expr_depth = self.expr_depth.saturating_sub(1);
        Token::EndExpression {
            range: Range::new(start, self.pos),
        }
    }

    fn scan_markup(&mut self) -> Token {
        let start = self.pos;
        if self.source[self.pos..].len() >= 4
            && self.source[self.pos..].get(0..4).map(|s| s.eq_ignore_ascii_case("<!--")) == Some(true)
        {
            return self.scan_comment(start);
        }
        if self.source[self.pos..]
            .get(0..9)
            .map(|s| s.eq_ignore_ascii_case("<!doctype"))
            == Some(true)
        {
            return self.scan_doctype(start);
        }
        if self.peek(1) == Some(b'/') {
            return self.scan_end_tag(start);
        }
        // `<` followed by whitespace, or a lone `<` before EOF/another `<`,
        // is text unless it opens a fragment (`<>`, `</>`); fragments are
        // handled by the end/start-tag scanners when the name is empty.
        if matches!(self.peek(1), Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')) {
            // `< attrs>` with no tag name: syntax error, fragments cannot
            // carry attributes (spec.md §4.2 "Fragment rule").
            if self.looks_like_bare_fragment_with_attrs() {
                return self.scan_fragment_error(start);
            }
            self.pos += 1;
            return Token::Text {
                range: Range::new(start, self.pos),
                value: "<".to_string(),
            };
        }
        self.scan_start_tag(start)
    }

    fn looks_like_bare_fragment_with_attrs(&self) -> bool {
        // `< ` followed eventually by an `=` before the next `>`, with no
        // tag name between `<` and the whitespace, indicates
        // `ERROR_FRAGMENT_SHORTHAND_ATTRS` (spec.md §4.2 "Fragment rule").
        let rest = &self.source[self.pos + 1..];
        let end = rest.find('>').unwrap_or(rest.len());
        rest[..end].contains('=')
    }

    fn scan_fragment_error(&mut self, start: usize) -> Token {
        let end = self.source[self.pos..].find('>').map(|n| self.pos + n + 1).unwrap_or(self.source.len());
        self.pos = end;
        Token::Error {
            range: Range::new(start, end),
            kind: TokenErrorKind::FragmentShorthandAttrs,
        }
    }

    fn scan_comment(&mut self, start: usize) -> Token {
        self.pos += 4; // `<!--`
        match self.source[self.pos..].find("-->") {
            Some(rel) => {
                let content_end = self.pos + rel;
                let value = self.source[self.pos..content_end].to_string();
                self.pos = content_end + 3;
                Token::Comment {
                    range: Range::new(start, self.pos),
                    value,
                }
            }
            None => {
                self.pos = self.source.len();
                // EOF inside a comment: recoverable warning (spec.md §4.1).
                Token::Error {
                    range: Range::new(start, self.pos),
                    kind: TokenErrorKind::UnterminatedHtmlComment,
                }
            }
        }
    }

    fn scan_doctype(&mut self, start: usize) -> Token {
        match self.source[self.pos..].find('>') {
            Some(rel) => {
                let end = self.pos + rel + 1;
                let value = self.source[self.pos + 2..end - 1].to_string();
                self.pos = end;
                Token::Doctype {
                    range: Range::new(start, end),
                    value,
                }
            }
            None => {
                let value = self.source[self.pos..].to_string();
                self.pos = self.source.len();
                Token::Doctype {
                    range: Range::new(start, self.pos),
                    value,
                }
            }
        }
    }

    fn scan_tag_name(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek(0) {
            if b.is_ascii_whitespace() || b == b'>' || b == b'/' {
                break;
            }
            let len = utf8_len(b);
            self.pos += len;
        }
        self.source[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(0), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn scan_start_tag(&mut self, start: usize) -> Token {
        self.pos += 1; // `<`
        let name = self.scan_tag_name();
        let attributes = self.scan_attributes();
        self.skip_whitespace();
        let self_closing = self.peek(0) == Some(b'/') && self.peek(1) == Some(b'>');
        if self_closing {
            self.pos += 2;
        } else if self.peek(0) == Some(b'>') {
            self.pos += 1;
        } else {
            // Unclosed tag at EOF; recover by treating what we have as the tag.
            self.pos = self.source.len();
        }
        let range = Range::new(start, self.pos);
        if self_closing {
            Token::SelfClosingTag { range, name, attributes }
        } else {
            Token::StartTag { range, name, attributes }
        }
    }

    fn scan_end_tag(&mut self, start: usize) -> Token {
        self.pos += 2; // `</`
        let name = self.scan_tag_name();
        self.skip_whitespace();
        if self.peek(0) == Some(b'>') {
            self.pos += 1;
        } else {
            self.pos = self.source.len();
        }
        Token::EndTag {
            range: Range::new(start, self.pos),
            name,
        }
    }

    fn scan_attributes(&mut self) -> Vec<AttributeToken> {
        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek(0) {
                None | Some(b'>') => break,
                Some(b'/') if self.peek(1) == Some(b'>') => break,
                Some(b'{') => {
                    if let Some(attr) = self.scan_brace_attribute() {
                        attrs.push(attr);
                    } else {
                        break;
                    }
                }
                Some(_) => {
                    if let Some(attr) = self.scan_named_attribute() {
                        attrs.push(attr);
                    } else {
                        break;
                    }
                }
            }
        }
        attrs
    }

    /// `{name}` (shorthand) or `{...rest}` (spread).
    fn scan_brace_attribute(&mut self) -> Option<AttributeToken> {
        let start = self.pos;
        let close = match scanner::find_matching_brace(self.source, self.pos) {
            Ok(c) => c,
            Err(_) => {
                self.pos = self.source.len();
                return None;
            }
        };
        let inner = &self.source[self.pos + 1..close - 1];
        self.pos = close;
        let range = Range::new(start, self.pos);
        if let Some(rest) = inner.trim_start().strip_prefix("...") {
            Some(AttributeToken {
                range,
                name: String::new(),
                value: AttributeValue::Spread {
                    expr: rest.trim().to_string(),
                },
            })
        } else {
            Some(AttributeToken {
                range,
                name: inner.trim().to_string(),
                value: AttributeValue::Shorthand,
            })
        }
    }

    fn scan_attribute_name(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek(0) {
            if b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/') {
                break;
            }
            let len = utf8_len(b);
            self.pos += len;
        }
        self.source[start..self.pos].to_string()
    }

    fn scan_named_attribute(&mut self) -> Option<AttributeToken> {
        let start = self.pos;
        let name = self.scan_attribute_name();
        if name.is_empty() {
            // Stray character we don't recognize; consume it to avoid
            // looping forever and keep going.
            self.pos += 1;
            return None;
        }
        self.skip_whitespace();
        if self.peek(0) != Some(b'=') {
            let range = Range::new(start, self.pos);
            return Some(AttributeToken {
                range,
                name,
                value: AttributeValue::Empty,
            });
        }
        self.pos += 1; // `=`
        self.skip_whitespace();
        match self.peek(0) {
            Some(b'"') => self.scan_quoted_attribute(start, name, b'"', QuoteKind::Double),
            Some(b'\'') => self.scan_quoted_attribute(start, name, b'\'', QuoteKind::Single),
            Some(b'{') => self.scan_expression_attribute(start, name),
            Some(b'`') => self.scan_template_attribute(start, name),
            _ => self.scan_unquoted_attribute(start, name),
        }
    }

    fn scan_quoted_attribute(
        &mut self,
        start: usize,
        name: String,
        quote: u8,
        kind: QuoteKind,
    ) -> Option<AttributeToken> {
        self.pos += 1;
        let value_start = self.pos;
        while let Some(b) = self.peek(0) {
            if b == quote {
                break;
            }
            self.pos += utf8_len(b);
        }
        let value = self.source[value_start..self.pos].to_string();
        if self.peek(0) == Some(quote) {
            self.pos += 1;
        }
        Some(AttributeToken {
            range: Range::new(start, self.pos),
            name,
            value: AttributeValue::Quoted { value, quote: kind },
        })
    }

    fn scan_unquoted_attribute(&mut self, start: usize, name: String) -> Option<AttributeToken> {
        let value_start = self.pos;
        while let Some(b) = self.peek(0) {
            if b.is_ascii_whitespace() || b == b'>' {
                break;
            }
            self.pos += utf8_len(b);
        }
        let value = self.source[value_start..self.pos].to_string();
        Some(AttributeToken {
            range: Range::new(start, self.pos),
            name,
            value: AttributeValue::Quoted {
                value,
                quote: QuoteKind::Unquoted,
            },
        })
    }

    fn scan_expression_attribute(&mut self, start: usize, name: String) -> Option<AttributeToken> {
        let open = self.pos;
        let close = match scanner::find_matching_brace(self.source, open) {
            Ok(c) => c,
            Err(_) => {
                self.pos = self.source.len();
                return None;
            }
        };
        let expr = self.source[open + 1..close - 1].to_string();
        self.pos = close;
        Some(AttributeToken {
            range: Range::new(start, self.pos),
            name,
            value: AttributeValue::Expression { expr },
        })
    }

    fn scan_template_attribute(&mut self, start: usize, name: String) -> Option<AttributeToken> {
        let open = self.pos;
        let close = match scanner::find_template_literal_end(self.source, open) {
            Ok(c) => c,
            Err(_) => {
                self.pos = self.source.len();
                return None;
            }
        };
        let raw = self.source[open..close].to_string();
        self.pos = close;
        Some(AttributeToken {
            range: Range::new(start, self.pos),
            name,
            value: AttributeValue::TemplateLiteral { raw },
        })
    }
}

fn utf8_len(first_byte: u8) -> usize {
    if first_byte & 0b1000_0000 == 0 {
        1
    } else if first_byte & 0b1110_0000 == 0b1100_0000 {
        2
    } else if first_byte & 0b1111_0000 == 0b1110_0000 {
        3
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        let mut t = Tokenizer::new(source);
        let mut out = Vec::new();
        loop {
            let tok = t.next_token();
            let is_eof = matches!(tok, Token::Eof { .. });
            out.push(tok);
            if is_eof {
                break;
            }
        }
        out
    }

    #[test]
    fn tokenizes_simple_element() {
        let toks = tokens("<h1>Hello</h1>");
        assert!(matches!(&toks[0], Token::StartTag { name, .. } if name == "h1"));
        assert!(matches!(&toks[1], Token::Text { value, .. } if value == "Hello"));
        assert!(matches!(&toks[2], Token::EndTag { name, .. } if name == "h1"));
    }

    #[test]
    fn tokenizes_frontmatter() {
        let source = "---\nconst x = 1;\n---\n<h1 />";
        let toks = tokens(source);
        assert!(matches!(&toks[0], Token::Frontmatter { value, .. } if value == "const x = 1;\n"));
        assert!(matches!(&toks[1], Token::Text { value, .. } if value == "\n"));
        assert!(matches!(&toks[2], Token::SelfClosingTag { name, .. } if name == "h1"));
    }

    #[test]
    fn tokenizes_quoted_attribute_dedup_order() {
        let toks = tokens(r#"<div a="1" a="2" />"#);
        if let Token::SelfClosingTag { attributes, .. } = &toks[0] {
            assert_eq!(attributes.len(), 2);
            assert_eq!(attributes[0].name, "a");
            assert_eq!(attributes[1].name, "a");
        } else {
            panic!("expected self closing tag");
        }
    }

    #[test]
    fn tokenizes_expression_attribute() {
        let toks = tokens(r#"<div class={active ? "a" : "b"} />"#);
        if let Token::SelfClosingTag { attributes, .. } = &toks[0] {
            assert_eq!(attributes[0].name, "class");
            assert!(matches!(&attributes[0].value, AttributeValue::Expression { expr } if expr == "active ? \"a\" : \"b\""));
        } else {
            panic!("expected self closing tag");
        }
    }

    #[test]
    fn tokenizes_shorthand_and_spread() {
        let toks = tokens("<Foo {bar} {...rest} />");
        if let Token::SelfClosingTag { attributes, .. } = &toks[0] {
            assert_eq!(attributes[0].name, "bar");
            assert!(matches!(attributes[0].value, AttributeValue::Shorthand));
            assert!(matches!(&attributes[1].value, AttributeValue::Spread { expr } if expr == "rest"));
        } else {
            panic!("expected self closing tag");
        }
    }

    #[test]
    fn tokenizes_raw_text_script() {
        let mut t = Tokenizer::new("<script>if (a < b) {}</script>");
        let start = t.next_token();
        assert!(matches!(&start, Token::StartTag { name, .. } if name == "script"));
        t.enter_raw_text("script".to_string());
        let text = t.next_token();
        assert!(matches!(&text, Token::Text { value, .. } if value == "if (a < b) {}"));
        let end = t.next_token();
        assert!(matches!(&end, Token::EndTag { name, .. } if name == "script"));
    }

    #[test]
    fn fragment_with_attrs_is_error() {
        let toks = tokens("< data-x=\"y\"></>");
        assert!(matches!(&toks[0], Token::Error { kind: TokenErrorKind::FragmentShorthandAttrs, .. }));
    }

    #[test]
    fn unterminated_html_comment_is_error() {
        let toks = tokens("<!-- unterminated");
        assert!(matches!(&toks[0], Token::Error { kind: TokenErrorKind::UnterminatedHtmlComment, .. }));
    }

    #[test]
    fn doctype_is_case_insensitive() {
        let toks = tokens("<!DOCTYPE html>");
        assert!(matches!(&toks[0], Token::Doctype { value, .. } if value == " html"));
    }

    #[test]
    fn template_literal_attribute() {
        let toks = tokens("<div class=`foo ${bar}`></div>");
        if let Token::StartTag { attributes, .. } = &toks[0] {
            assert!(matches!(&attributes[0].value, AttributeValue::TemplateLiteral { raw } if raw == "`foo ${bar}`"));
        } else {
            panic!("expected start tag");
        }
    }

    #[test]
    fn null_byte_is_dropped() {
        let toks = tokens("a\0b");
        assert!(matches!(&toks[0], Token::Text { value, .. } if value == "ab"));
    }

    #[test]
    fn brace_inside_string_literal_does_not_close_expression() {
        // `}` inside the string literal must not be treated as the
        // expression's closing brace.
        let toks = tokens(r#"<p>{"}"}</p>"#);
        let start = toks.iter().position(|t| matches!(t, Token::StartExpression { .. })).unwrap();
        assert!(matches!(&toks[start + 1], Token::Text { value, .. } if value == "\"}\""));
        assert!(matches!(&toks[start + 2], Token::EndExpression { .. }));
    }

    #[test]
    fn angle_bracket_inside_expression_string_is_not_markup() {
        let toks = tokens(r#"<p>{"<div>"}</p>"#);
        let start = toks.iter().position(|t| matches!(t, Token::StartExpression { .. })).unwrap();
        assert!(matches!(&toks[start + 1], Token::Text { value, .. } if value == "\"<div>\""));
    }

    #[test]
    fn stray_frontmatter_fence_is_diagnosed() {
        let toks = tokens("<h1>Hi</h1>\n---\n<p>after</p>");
        assert!(toks.iter().any(|t| matches!(t, Token::Error { kind: TokenErrorKind::FrontmatterFenceUnpaired, .. })));
    }

    #[test]
    fn no_stray_fence_error_without_a_bare_dash_line() {
        let toks = tokens("<h1>Hi -- there</h1>");
        assert!(!toks.iter().any(|t| matches!(t, Token::Error { kind: TokenErrorKind::FrontmatterFenceUnpaired, .. })));
    }
}

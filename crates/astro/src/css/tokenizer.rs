//! A minimal CSS tokenizer covering the token classes the scoper needs to
//! find selector boundaries and `@`-rule bodies (spec.md §4.3 "CSS
//! tokenizer").
//!
//! This is not a full CSS Syntax Module Level 3 tokenizer — it doesn't
//! need to be, since the scoper only ever rewrites selector lists, never
//! declaration values. Strings, comments, and `url(...)` contents are
//! tokenized just far enough to be skipped over intact.

use astro_compiler_core::{Loc, Range};

/// A single CSS token with its source range.
#[derive(Debug, Clone, PartialEq)]
pub struct CssToken {
    /// Byte range of this token in the style block's source.
    pub range: Range,
    /// The token's kind and payload.
    pub kind: CssTokenKind,
}

/// CSS token kinds (CSS Syntax Module Level 3 §4, trimmed to what the
/// scoper consumes).
#[derive(Debug, Clone, PartialEq)]
pub enum CssTokenKind {
    /// An identifier, keyword, or tag-selector name.
    Ident(String),
    /// A `#hash` token (an id selector or hex color).
    Hash(String),
    /// A quoted string's interior text (delimiters stripped).
    String(String),
    /// A numeric literal, verbatim.
    Number(String),
    /// A number immediately followed by a unit, e.g. `10px`.
    Dimension(String),
    /// An `@`-keyword, e.g. `@media`.
    AtKeyword(String),
    /// A `function-name(` token; the name excludes the paren.
    Function(String),
    /// `url(` ... `)`, interior text verbatim (unquoted form only; quoted
    /// `url("...")` tokenizes as `Function("url")` + `String` + `)`).
    Url(String),
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// A run of whitespace.
    Whitespace,
    /// A `/* ... */` comment.
    Comment,
    /// Any other single delimiter character (combinators, `.`, `*`, `&`,
    /// etc.), kept verbatim so the scoper can reassemble selectors
    /// byte-for-byte outside the parts it rewrites.
    Delim(char),
}

/// Tokenize a complete CSS source string (the content of one `<style>`
/// block).
pub fn tokenize(source: &str) -> Vec<CssToken> {
    let bytes = source.as_bytes();
    let mut pos = 0usize;
    let mut tokens = Vec::new();

    while pos < bytes.len() {
        let start = pos;
        let c = bytes[pos] as char;

        if c.is_whitespace() {
            while pos < bytes.len() && (bytes[pos] as char).is_whitespace() {
                pos += 1;
            }
            tokens.push(tok(start, pos, CssTokenKind::Whitespace));
            continue;
        }

        if c == '/' && bytes.get(pos + 1) == Some(&b'*') {
            pos += 2;
            while pos < bytes.len() && !(bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b'/')) {
                pos += 1;
            }
            pos = (pos + 2).min(bytes.len());
            tokens.push(tok(start, pos, CssTokenKind::Comment));
            continue;
        }

        if c == '"' || c == '\'' {
            let quote = bytes[pos];
            pos += 1;
            let str_start = pos;
            while pos < bytes.len() && bytes[pos] != quote {
                if bytes[pos] == b'\\' {
                    pos += 1;
                }
                pos += 1;
            }
            let value = source[str_start..pos.min(bytes.len())].to_string();
            pos = (pos + 1).min(bytes.len());
            tokens.push(tok(start, pos, CssTokenKind::String(value)));
            continue;
        }

        if c == '#' {
            pos += 1;
            let ident_start = pos;
            while pos < bytes.len() && is_ident_byte(bytes[pos]) {
                pos += 1;
            }
            tokens.push(tok(start, pos, CssTokenKind::Hash(source[ident_start..pos].to_string())));
            continue;
        }

        if c == '@' {
            pos += 1;
            let ident_start = pos;
            while pos < bytes.len() && is_ident_byte(bytes[pos]) {
                pos += 1;
            }
            tokens.push(tok(start, pos, CssTokenKind::AtKeyword(source[ident_start..pos].to_string())));
            continue;
        }

        if c.is_ascii_digit() || (c == '-' && bytes.get(pos + 1).is_some_and(|b| (*b as char).is_ascii_digit())) {
            pos += 1;
            while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                pos += 1;
            }
            let num_end = pos;
            while pos < bytes.len() && is_ident_byte(bytes[pos]) {
                pos += 1;
            }
            if pos > num_end {
                tokens.push(tok(start, pos, CssTokenKind::Dimension(source[start..pos].to_string())));
            } else {
                tokens.push(tok(start, pos, CssTokenKind::Number(source[start..num_end].to_string())));
            }
            continue;
        }

        if is_ident_start_byte(bytes[pos]) {
            pos += 1;
            while pos < bytes.len() && is_ident_byte(bytes[pos]) {
                pos += 1;
            }
            let name = &source[start..pos];
            if bytes.get(pos) == Some(&b'(') {
                pos += 1;
                if name.eq_ignore_ascii_case("url") {
                    let url_start = pos;
                    while pos < bytes.len() && bytes[pos] != b')' {
                        pos += 1;
                    }
                    let value = source[url_start..pos].to_string();
                    pos = (pos + 1).min(bytes.len());
                    tokens.push(tok(start, pos, CssTokenKind::Url(value)));
                } else {
                    tokens.push(tok(start, pos, CssTokenKind::Function(name.to_string())));
                }
            } else {
                tokens.push(tok(start, pos, CssTokenKind::Ident(name.to_string())));
            }
            continue;
        }

        pos += 1;
        let kind = match c {
            '(' => CssTokenKind::LeftParen,
            ')' => CssTokenKind::RightParen,
            '{' => CssTokenKind::LeftBrace,
            '}' => CssTokenKind::RightBrace,
            '[' => CssTokenKind::LeftBracket,
            ']' => CssTokenKind::RightBracket,
            ',' => CssTokenKind::Comma,
            ';' => CssTokenKind::Semicolon,
            ':' => CssTokenKind::Colon,
            other => CssTokenKind::Delim(other),
        };
        tokens.push(tok(start, pos, kind));
    }

    tokens
}

fn tok(start: usize, end: usize, kind: CssTokenKind) -> CssToken {
    CssToken {
        range: Range::new(Loc::from(start), Loc::from(end)),
        kind,
    }
}

fn is_ident_start_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'-' || b >= 0x80
}

fn is_ident_byte(b: u8) -> bool {
    is_ident_start_byte(b) || b.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<CssTokenKind> {
        tokenize(source)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !matches!(k, CssTokenKind::Whitespace))
            .collect()
    }

    #[test]
    fn tokenizes_simple_rule() {
        let k = kinds(".foo { color: red; }");
        assert!(matches!(k[0], CssTokenKind::Delim('.')));
        assert!(matches!(&k[1], CssTokenKind::Ident(s) if s == "foo"));
        assert!(matches!(k[2], CssTokenKind::LeftBrace));
    }

    #[test]
    fn tokenizes_at_media() {
        let k = kinds("@media (min-width: 10px) { a { color: blue } }");
        assert!(matches!(&k[0], CssTokenKind::AtKeyword(s) if s == "media"));
    }

    #[test]
    fn tokenizes_hash_and_string() {
        let k = kinds("#id { content: \"hi\" }");
        assert!(matches!(&k[0], CssTokenKind::Hash(s) if s == "id"));
        let has_string = k.iter().any(|t| matches!(t, CssTokenKind::String(s) if s == "hi"));
        assert!(has_string);
    }

    #[test]
    fn tokenizes_url_unquoted() {
        let k = kinds("div { background: url(foo.png) }");
        assert!(k.iter().any(|t| matches!(t, CssTokenKind::Url(s) if s == "foo.png")));
    }

    #[test]
    fn tokenizes_dimension() {
        let k = kinds("div { width: 10px }");
        assert!(k.iter().any(|t| matches!(t, CssTokenKind::Dimension(s) if s == "10px")));
    }

    #[test]
    fn skips_comments() {
        let k = kinds("/* hi */ .a {}");
        assert!(matches!(k[0], CssTokenKind::Delim('.')));
    }
}

//! JS-aware scanner helpers.
//!
//! The compiler is not a JavaScript parser (spec Non-goals): it scans JS
//! only far enough to skip over strings, regex literals, and comments, and
//! to find matching braces/brackets/parens. This mirrors how the teacher's
//! `code_fence` module walks markdown lines one token of state at a time,
//! generalized here to a single-pass byte scanner over JS source.

/// Tracks whether the scanner is inside a string, template literal,
/// regex literal, or comment, so that brace/paren matching and
/// expression-boundary detection never misfires on `"}"` inside a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum JsContext {
    #[default]
    Code,
    SingleQuote,
    DoubleQuote,
    Template,
    /// Inside a `${ ... }` interpolation within a template literal; stores
    /// the brace-nesting depth so we know when the interpolation ends.
    TemplateInterpolation(u32),
    LineComment,
    BlockComment,
    Regex,
}

/// A single-pass tracker of JS lexical context, advanced one byte at a time.
///
/// Used by the tokenizer (C3) to find the matching `}` of an expression or
/// attribute-expression without allocating or re-tokenizing the JS.
#[derive(Debug, Clone, Default)]
pub struct JsScanner {
    context: JsContext,
    /// Byte of the previous non-whitespace, non-comment token; used to
    /// disambiguate `/` as division vs. the start of a regex literal.
    prev_significant: Option<u8>,
}

/// Outcome of terminating a brace/bracket/paren scan early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// EOF reached while inside a block comment (`ERROR_UNTERMINATED_JS_COMMENT`).
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    /// EOF reached before the matching closer was found.
    #[error("unterminated brace, bracket, or paren")]
    UnterminatedBrace,
}

impl JsScanner {
    /// Create a scanner starting in plain-code context.
    pub fn new() -> Self {
        Self::default()
    }

    fn char_starts_regex(prev: Option<u8>) -> bool {
        match prev {
            None => true,
            Some(b) => !matches!(
                b,
                b')' | b']' | b'}' | b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'$'
            ),
        }
    }

    /// Advance the scanner over a single byte of `src` at `i`, returning the
    /// number of bytes to skip (normally 1, but 2 for two-byte lookaheads
    /// such as `//`, `/*`, `${`).
    fn step(&mut self, src: &[u8], i: usize) -> usize {
        let b = src[i];
        match self.context {
            JsContext::Code => {
                if b == b'/' && src.get(i + 1) == Some(&b'/') {
                    self.context = JsContext::LineComment;
                    return 2;
                }
                if b == b'/' && src.get(i + 1) == Some(&b'*') {
                    self.context = JsContext::BlockComment;
                    return 2;
                }
                if b == b'/' && Self::char_starts_regex(self.prev_significant) {
                    self.context = JsContext::Regex;
                    self.prev_significant = Some(b);
                    return 1;
                }
                match b {
                    b'\'' => self.context = JsContext::SingleQuote,
                    b'"' => self.context = JsContext::DoubleQuote,
                    b'`' => self.context = JsContext::Template,
                    _ => {}
                }
                if !b.is_ascii_whitespace() {
                    self.prev_significant = Some(b);
                }
                1
            }
            JsContext::SingleQuote => {
                if b == b'\\' {
                    return 2;
                }
                if b == b'\'' {
                    self.context = JsContext::Code;
                }
                1
            }
            JsContext::DoubleQuote => {
                if b == b'\\' {
                    return 2;
                }
                if b == b'"' {
                    self.context = JsContext::Code;
                }
                1
            }
            JsContext::Template => {
                if b == b'\\' {
                    return 2;
                }
                if b == b'`' {
                    self.context = JsContext::Code;
                    return 1;
                }
                if b == b'$' && src.get(i + 1) == Some(&b'{') {
                    self.context = JsContext::TemplateInterpolation(0);
                    return 2;
                }
                1
            }
            JsContext::TemplateInterpolation(depth) => {
                match b {
                    b'{' => self.context = JsContext::TemplateInterpolation(depth + 1),
                    b'}' if depth == 0 => self.context = JsContext::Template,
                    b'}' => self.context = JsContext::TemplateInterpolation(depth - 1),
                    b'\'' => self.context = JsContext::SingleQuote,
                    b'"' => self.context = JsContext::DoubleQuote,
                    b'`' => self.context = JsContext::Template,
                    _ => {}
                }
                1
            }
            JsContext::LineComment => {
                if b == b'\n' {
                    self.context = JsContext::Code;
                }
                1
            }
            JsContext::BlockComment => {
                if b == b'*' && src.get(i + 1) == Some(&b'/') {
                    self.context = JsContext::Code;
                    return 2;
                }
                1
            }
            JsContext::Regex => {
                if b == b'\\' {
                    return 2;
                }
                if b == b'/' {
                    self.context = JsContext::Code;
                    self.prev_significant = Some(b);
                }
                1
            }
        }
    }

    /// Whether the scanner currently sits inside a block comment (used to
    /// detect `ERROR_UNTERMINATED_JS_COMMENT` at EOF).
    pub fn in_block_comment(&self) -> bool {
        matches!(self.context, JsContext::BlockComment)
    }

    /// Whether the scanner currently sits in plain-code context, outside
    /// any string, template, comment, or regex literal.
    pub fn in_code(&self) -> bool {
        matches!(self.context, JsContext::Code)
    }

    /// Advance the scanner over `src[i]`, returning how many bytes were
    /// consumed (normally 1, but 2 for two-byte lookaheads such as `//`,
    /// `/*`, `${`, or an escape sequence).
    pub fn advance(&mut self, src: &[u8], i: usize) -> usize {
        self.step(src, i)
    }
}

/// Find the byte offset just past the matching closer for an opener at
/// `src[open_idx]`, honoring JS string/regex/comment/template context.
///
/// `opener`/`closer` are typically `(`/`)`, `[`/`]`, or `{`/`}`. Returns
/// `None` if EOF is reached first (an unterminated construct); the caller
/// is expected to surface a diagnostic in that case.
pub fn find_matching(src: &str, open_idx: usize, opener: u8, closer: u8) -> Result<usize, ScanError> {
    let bytes = src.as_bytes();
    debug_assert_eq!(bytes[open_idx], opener);
    let mut depth: i32 = 0;
    let mut scanner = JsScanner::new();
    let mut i = open_idx;
    while i < bytes.len() {
        let in_code = matches!(scanner.context, JsContext::Code);
        if in_code {
            if bytes[i] == opener {
                depth += 1;
            } else if bytes[i] == closer {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
        }
        let step = scanner.step(bytes, i);
        i += step;
    }
    if scanner.in_block_comment() {
        Err(ScanError::UnterminatedBlockComment)
    } else {
        Err(ScanError::UnterminatedBrace)
    }
}

/// Find the end of the matching `}` for a `{` at `open_idx`. Convenience
/// wrapper used throughout the tokenizer/parser for expression boundaries.
pub fn find_matching_brace(src: &str, open_idx: usize) -> Result<usize, ScanError> {
    find_matching(src, open_idx, b'{', b'}')
}

/// Find the byte offset just past the closing backtick of a template
/// literal starting at `start_idx`, honoring nested `${ ... }`
/// interpolations (which may themselves contain further template literals,
/// strings, or braces).
pub fn find_template_literal_end(src: &str, start_idx: usize) -> Result<usize, ScanError> {
    let bytes = src.as_bytes();
    debug_assert_eq!(bytes[start_idx], b'`');
    let mut scanner = JsScanner::new();
    let mut i = start_idx;
    let mut started = false;
    while i < bytes.len() {
        let step = scanner.step(bytes, i);
        i += step;
        if started && matches!(scanner.context, JsContext::Code) {
            return Ok(i);
        }
        started = true;
    }
    if scanner.in_block_comment() {
        Err(ScanError::UnterminatedBlockComment)
    } else {
        Err(ScanError::UnterminatedBrace)
    }
}

/// Scan forward from `start` to find the next top-level (non-string,
/// non-comment) occurrence of `needle`, honoring JS lexical context. Used to
/// locate `import`/`export` boundaries and statement terminators without a
/// full JS parser.
pub fn find_top_level(src: &str, start: usize, needle: u8) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut scanner = JsScanner::new();
    let mut i = start;
    while i < bytes.len() {
        if matches!(scanner.context, JsContext::Code) && bytes[i] == needle {
            return Some(i);
        }
        let step = scanner.step(bytes, i);
        i += step;
    }
    None
}

/// Returns true if `word` appears at `idx` as a standalone identifier: not
/// preceded or followed by an identifier character. Used to detect
/// `import`/`export` keywords without false-positiving on `reimport` etc.
pub fn is_word_boundary_match(src: &str, idx: usize, word: &str) -> bool {
    let bytes = src.as_bytes();
    if !src[idx..].starts_with(word) {
        return false;
    }
    let before_ok = idx == 0 || !is_ident_byte(bytes[idx - 1]);
    let after_idx = idx + word.len();
    let after_ok = after_idx >= bytes.len() || !is_ident_byte(bytes[after_idx]);
    before_ok && after_ok
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Scan frontmatter text for `import`/`export` statement boundaries,
/// returning the byte ranges of each top-level statement. Used by the
/// semantic transform (C6) to resolve component imports without a full JS
/// parser, per spec.md Non-goals.
pub fn find_import_export_statements(src: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut scanner = JsScanner::new();
    let bytes = src.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if matches!(scanner.context, JsContext::Code)
            && (is_word_boundary_match(src, i, "import") || is_word_boundary_match(src, i, "export"))
        {
            let stmt_start = i;
            // Find the terminating `;` or newline-at-top-level.
            let mut j = i;
            let mut local = JsScanner::new();
            let mut end = bytes.len();
            while j < bytes.len() {
                if matches!(local.context, JsContext::Code) {
                    if bytes[j] == b';' {
                        end = j + 1;
                        break;
                    }
                    if bytes[j] == b'\n' {
                        // Only end-of-statement if the next significant char
                        // isn't a continuation token (`from`, etc. are on
                        // the same line in the vast majority of cases).
                        end = j;
                        break;
                    }
                }
                let step = local.step(bytes, j);
                j += step;
            }
            out.push((stmt_start, end));
            i = end;
            scanner = JsScanner::new();
            continue;
        }
        let step = scanner.step(bytes, i);
        i += step;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_simple_braces() {
        let src = "{ a + b }";
        assert_eq!(find_matching_brace(src, 0), Ok(src.len()));
    }

    #[test]
    fn ignores_braces_in_strings() {
        let src = r#"{ "}" + '}' }"#;
        assert_eq!(find_matching_brace(src, 0), Ok(src.len()));
    }

    #[test]
    fn ignores_braces_in_template_literal() {
        let src = "{ `a${ 1 }b}` }";
        assert_eq!(find_matching_brace(src, 0), Ok(src.len()));
    }

    #[test]
    fn ignores_braces_in_line_comment() {
        let src = "{ // }\n1 }";
        assert_eq!(find_matching_brace(src, 0), Ok(src.len()));
    }

    #[test]
    fn ignores_braces_in_block_comment() {
        let src = "{ /* } */ 1 }";
        assert_eq!(find_matching_brace(src, 0), Ok(src.len()));
    }

    #[test]
    fn unterminated_block_comment_reports_error() {
        let src = "{ /* unterminated";
        assert_eq!(find_matching_brace(src, 0), Err(ScanError::UnterminatedBlockComment));
    }

    #[test]
    fn unterminated_brace_reports_error() {
        let src = "{ a + b";
        assert_eq!(find_matching_brace(src, 0), Err(ScanError::UnterminatedBrace));
    }

    #[test]
    fn regex_literal_does_not_confuse_braces() {
        let src = r#"{ /\}/.test(x) }"#;
        assert_eq!(find_matching_brace(src, 0), Ok(src.len()));
    }

    #[test]
    fn nested_braces() {
        let src = "{ a + { b + c } }";
        assert_eq!(find_matching_brace(src, 0), Ok(src.len()));
    }

    #[test]
    fn word_boundary_match() {
        assert!(is_word_boundary_match("import foo", 0, "import"));
        assert!(!is_word_boundary_match("reimport foo", 2, "import"));
        assert!(!is_word_boundary_match("importer foo", 0, "import"));
    }

    #[test]
    fn template_literal_end_simple() {
        let src = "`hello`";
        assert_eq!(find_template_literal_end(src, 0), Ok(src.len()));
    }

    #[test]
    fn template_literal_end_with_interpolation() {
        let src = "`a${ `}` }b`";
        assert_eq!(find_template_literal_end(src, 0), Ok(src.len()));
    }

    #[test]
    fn finds_import_export_statements() {
        let src = "import a from 'a';\nconst x = 1;\nexport const y = 2;\n";
        let stmts = find_import_export_statements(src);
        assert_eq!(stmts.len(), 2);
        assert_eq!(&src[stmts[0].0..stmts[0].1], "import a from 'a';");
        assert!(src[stmts[1].0..stmts[1].1].starts_with("export const y = 2"));
    }
}

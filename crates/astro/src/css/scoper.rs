//! Selector scoping for `<style>` blocks (spec.md §4.3 "Scoping
//! strategies", "`:global(...)` opts a selector out").
//!
//! Rewrites every selector in a stylesheet to carry the component's scope
//! hash, using the tokenizer only to find rule/at-rule boundaries; the
//! selector text itself is rewritten with plain string splitting, since a
//! selector list's internal structure (attribute selectors, `:pseudo(...)`)
//! only needs balanced-delimiter tracking, not full tokenization.

use crate::css::tokenizer::{tokenize, CssToken, CssTokenKind};
use crate::options::ScopedStyleStrategy;

const CONDITIONAL_GROUP_RULES: &[&str] = &["media", "supports", "container", "layer", "document"];

/// Rewrite every selector in `source` (a `<style>` block's content) to
/// carry the scope hash, per `strategy`. Returns the rewritten CSS.
pub fn scope_css(source: &str, hash: &str, strategy: ScopedStyleStrategy) -> String {
    let tokens = tokenize(source);
    let mut output = String::with_capacity(source.len() + 32);
    process(&tokens, 0, source, &mut output, hash, strategy, true);
    output
}

/// Walk tokens starting at `i`, copying verbatim except selector preludes
/// (when `expect_selectors`), until a matching `}` or end of input.
/// Returns the index just past the consumed `}` (or token length at EOF).
fn process(
    tokens: &[CssToken],
    mut i: usize,
    source: &str,
    output: &mut String,
    hash: &str,
    strategy: ScopedStyleStrategy,
    expect_selectors: bool,
) -> usize {
    while i < tokens.len() {
        if matches!(tokens[i].kind, CssTokenKind::RightBrace) {
            output.push('}');
            return i + 1;
        }

        let prelude_start = i;
        let mut depth = 0i32;
        let mut at_keyword: Option<String> = None;
        while i < tokens.len() {
            match &tokens[i].kind {
                CssTokenKind::LeftParen | CssTokenKind::LeftBracket => depth += 1,
                CssTokenKind::RightParen | CssTokenKind::RightBracket => depth -= 1,
                CssTokenKind::LeftBrace if depth == 0 => break,
                CssTokenKind::Semicolon if depth == 0 => break,
                CssTokenKind::RightBrace if depth == 0 => break,
                CssTokenKind::AtKeyword(name) if at_keyword.is_none() => {
                    at_keyword = Some(name.clone());
                }
                _ => {}
            }
            i += 1;
        }
        let prelude_end = i;
        let prelude_text = slice_of(source, tokens, prelude_start, prelude_end);

        if i >= tokens.len() {
            output.push_str(&prelude_text);
            return i;
        }

        match &tokens[i].kind {
            CssTokenKind::Semicolon => {
                output.push_str(&prelude_text);
                output.push(';');
                i += 1;
            }
            CssTokenKind::RightBrace => {
                output.push_str(&prelude_text);
                output.push('}');
                return i + 1;
            }
            CssTokenKind::LeftBrace => {
                output.push('{');
                i += 1;
                let should_rewrite_prelude_as_selectors = expect_selectors && at_keyword.is_none();
                let nested_expect_selectors = match at_keyword.as_deref() {
                    Some(name) if CONDITIONAL_GROUP_RULES.contains(&name) => true,
                    Some(_) => false,
                    None => false,
                };

                if should_rewrite_prelude_as_selectors {
                    output.push_str(&rewrite_selector_list(&prelude_text, hash, strategy));
                } else {
                    output.push_str(&prelude_text);
                }

                i = process(tokens, i, source, output, hash, strategy, nested_expect_selectors);
            }
            _ => unreachable!("loop above only stops at `{{`, `;`, `}}`, or EOF"),
        }
    }
    i
}

fn slice_of(source: &str, tokens: &[CssToken], start: usize, end: usize) -> String {
    if start >= end {
        return String::new();
    }
    let byte_start = tokens[start].range.start.as_usize();
    let byte_end = tokens[end - 1].range.end().as_usize();
    source[byte_start..byte_end].to_string()
}

/// Split `selectors` on top-level commas and rewrite each.
fn rewrite_selector_list(selectors: &str, hash: &str, strategy: ScopedStyleStrategy) -> String {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    let bytes = selectors.as_bytes();
    for (idx, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(&selectors[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&selectors[start..]);

    parts
        .iter()
        .enumerate()
        .map(|(idx, part)| {
            let sep = if idx == 0 { "" } else { "," };
            format!("{sep}{}", rewrite_one_selector(part, hash, strategy))
        })
        .collect()
}

fn rewrite_one_selector(selector: &str, hash: &str, strategy: ScopedStyleStrategy) -> String {
    let leading_ws: String = selector.chars().take_while(|c| c.is_whitespace()).collect();
    let trailing_ws: String = selector.chars().rev().take_while(|c| c.is_whitespace()).collect::<String>();
    let trimmed = selector.trim();

    if trimmed.is_empty() {
        return selector.to_string();
    }

    if let Some(inner) = strip_global_wrapper(trimmed) {
        return format!("{leading_ws}{inner}{trailing_ws}");
    }

    let suffix = match strategy {
        ScopedStyleStrategy::Where => format!(":where(.astro-{hash})"),
        ScopedStyleStrategy::Class => format!(".astro-{hash}"),
        ScopedStyleStrategy::Attribute => format!("[data-astro-hash-{hash}]"),
    };
    format!("{leading_ws}{trimmed}{suffix}{trailing_ws}")
}

/// If `selector` is exactly `:global(...)`, return its unwrapped interior
/// (left entirely unscoped, per spec.md's `:global()` escape hatch).
fn strip_global_wrapper(selector: &str) -> Option<&str> {
    let rest = selector.strip_prefix(":global(")?;
    let inner = rest.strip_suffix(')')?;
    Some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_simple_class_selector() {
        let out = scope_css(".foo { color: red; }", "abcd1234", ScopedStyleStrategy::Where);
        assert_eq!(out, ".foo:where(.astro-abcd1234) { color: red; }");
    }

    #[test]
    fn scopes_each_selector_in_a_list() {
        let out = scope_css("h1, h2 { margin: 0; }", "abcd1234", ScopedStyleStrategy::Class);
        assert_eq!(out, "h1.astro-abcd1234, h2.astro-abcd1234 { margin: 0; }");
    }

    #[test]
    fn global_selector_is_left_unscoped() {
        let out = scope_css(":global(.foo) { color: red; }", "abcd1234", ScopedStyleStrategy::Where);
        assert_eq!(out, ".foo { color: red; }");
    }

    #[test]
    fn recurses_into_media_query_bodies() {
        let out = scope_css("@media (min-width: 1px) { .a { color: red; } }", "hhhhhhhh", ScopedStyleStrategy::Attribute);
        assert_eq!(
            out,
            "@media (min-width: 1px) { .a[data-astro-hash-hhhhhhhh] { color: red; } }"
        );
    }

    #[test]
    fn does_not_rewrite_keyframes_selectors() {
        let out = scope_css("@keyframes spin { 0% { opacity: 0 } 100% { opacity: 1 } }", "hhhhhhhh", ScopedStyleStrategy::Where);
        assert_eq!(out, "@keyframes spin { 0% { opacity: 0 } 100% { opacity: 1 } }");
    }

    #[test]
    fn attribute_strategy_uses_data_attribute() {
        let out = scope_css("a { color: blue }", "zzzzzzzz", ScopedStyleStrategy::Attribute);
        assert_eq!(out, "a[data-astro-hash-zzzzzzzz] { color: blue }");
    }
}

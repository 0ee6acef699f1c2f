//! Deterministic per-component scope hash (spec.md §6 "Scope hash
//! format", §8 "content-addressed, not identity-addressed").
//!
//! The hash must be a pure function of content that actually affects the
//! rendered output: the normalized filename, the final template text, and
//! the concatenated text of every non-`is:inline` script. Frontmatter
//! whitespace and comments never enter the hash, since they cannot affect
//! what a browser sees (spec.md §8, scenario "scope hash is identical
//! across repeated runs of the same input").
//!
//! Uses [`DefaultHasher`] rather than any `Random`-seeded hasher: a
//! per-process random seed would make the same component hash
//! differently across two compiler invocations, which spec.md's
//! determinism property explicitly forbids.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Compute the 8-character base-36 scope hash for a component.
///
/// `normalized_filename` participates so that two components with
/// byte-identical templates still scope independently; `template_text` is
/// the printer's rendered template body (not the raw source, so that
/// purely cosmetic source formatting that the printer itself normalizes
/// away doesn't perturb the hash); `script_texts` is the content of every
/// hoisted, non-`is:inline` script, in source order.
pub fn scope_hash<'a>(
    normalized_filename: &str,
    template_text: &str,
    script_texts: impl IntoIterator<Item = &'a str>,
) -> String {
    let mut hasher = DefaultHasher::new();
    normalized_filename.hash(&mut hasher);
    template_text.hash(&mut hasher);
    for script in script_texts {
        script.hash(&mut hasher);
    }
    encode_base36(hasher.finish())
}

fn encode_base36(mut value: u64) -> String {
    if value == 0 {
        return "00000000".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    let mut s = String::from_utf8(digits).expect("base36 alphabet is ASCII");
    // Pad or truncate to a stable 8 characters: spec.md's example
    // (`"bqati2k5"`) is 8 chars, and callers (attribute names, virtual
    // module query strings) assume a fixed width.
    if s.len() < 8 {
        let pad = "0".repeat(8 - s.len());
        s = pad + &s;
    } else if s.len() > 8 {
        s = s[s.len() - 8..].to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_hashes_identically() {
        let a = scope_hash("Foo.astro", "<div>hi</div>", std::iter::empty());
        let b = scope_hash("Foo.astro", "<div>hi</div>", std::iter::empty());
        assert_eq!(a, b);
    }

    #[test]
    fn hash_is_eight_base36_chars() {
        let h = scope_hash("Foo.astro", "<div>hi</div>", std::iter::empty());
        assert_eq!(h.len(), 8);
        assert!(h.chars().all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn different_filename_changes_hash() {
        let a = scope_hash("Foo.astro", "<div>hi</div>", std::iter::empty());
        let b = scope_hash("Bar.astro", "<div>hi</div>", std::iter::empty());
        assert_ne!(a, b);
    }

    #[test]
    fn different_template_changes_hash() {
        let a = scope_hash("Foo.astro", "<div>hi</div>", std::iter::empty());
        let b = scope_hash("Foo.astro", "<div>bye</div>", std::iter::empty());
        assert_ne!(a, b);
    }

    #[test]
    fn script_content_participates() {
        let a = scope_hash("Foo.astro", "<div/>", ["console.log(1)"]);
        let b = scope_hash("Foo.astro", "<div/>", ["console.log(2)"]);
        assert_ne!(a, b);
    }
}

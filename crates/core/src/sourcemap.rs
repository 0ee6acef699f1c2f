//! Source Map v3 generation: a VLQ-encoded `mappings` string built
//! incrementally as the printer (C8) walks the transformed tree.

use serde::Serialize;

const BASE64_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn encode_vlq(value: i64, out: &mut String) {
    let mut n = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };
    loop {
        let mut digit = (n & 0b11111) as u8;
        n >>= 5;
        if n > 0 {
            digit |= 0b100000;
        }
        out.push(BASE64_ALPHABET[digit as usize] as char);
        if n == 0 {
            break;
        }
    }
}

/// One generated-position → original-position mapping, before encoding.
#[derive(Debug, Clone, Copy)]
struct Mapping {
    generated_line: u32,
    generated_col: u32,
    source_index: u32,
    source_line: u32,
    source_col: u32,
}

/// Accumulates mappings in emission order and encodes them into the
/// Source Map v3 `mappings` string. Chunks are concatenable: each node's
/// printer contribution appends mappings with correctly accumulated state
/// (spec.md §4.5), since `finish` tracks running deltas across the whole
/// sequence rather than per-chunk.
#[derive(Debug, Clone, Default)]
pub struct MappingsBuilder {
    mappings: Vec<Mapping>,
    current_generated_line: u32,
}

impl MappingsBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mapping from a position in the generated output to a
    /// position in the original source. `generated_line`/`generated_col`
    /// are 0-based, matching the Source Map v3 convention (distinct from
    /// the 1-based `LineCol` used in diagnostics).
    pub fn add_mapping(
        &mut self,
        generated_line: u32,
        generated_col: u32,
        source_line: u32,
        source_col: u32,
    ) {
        self.current_generated_line = self.current_generated_line.max(generated_line);
        self.mappings.push(Mapping {
            generated_line,
            generated_col,
            source_index: 0,
            source_line,
            source_col,
        });
    }

    /// Advance the generated-line cursor without adding a mapping, used
    /// when the printer emits a literal newline with no corresponding
    /// source position (e.g. inside generated boilerplate).
    pub fn advance_line(&mut self, to_line: u32) {
        self.current_generated_line = self.current_generated_line.max(to_line);
    }

    /// Merge another builder's mappings into this one, preserving order.
    /// Used to splice a node's self-contained mapping chunk into the
    /// module-level builder.
    pub fn append(&mut self, mut other: MappingsBuilder) {
        self.mappings.append(&mut other.mappings);
    }

    /// Drain the accumulated mappings as plain
    /// `(generated_line, generated_col, source_line, source_col)` tuples,
    /// in recorded order. Used by a printer that needs to translate this
    /// builder's coordinates into another coordinate space (e.g. the
    /// Astro printer splicing a body-relative builder into the final
    /// generated file) before re-adding them to a fresh builder.
    pub fn into_segments(&self) -> Vec<(u32, u32, u32, u32)> {
        self.mappings
            .iter()
            .map(|m| (m.generated_line, m.generated_col, m.source_line, m.source_col))
            .collect()
    }

    /// Encode the accumulated mappings into the VLQ `mappings` string.
    pub fn encode(&self) -> String {
        let mut sorted = self.mappings.clone();
        sorted.sort_by_key(|m| (m.generated_line, m.generated_col));

        let mut out = String::new();
        let mut prev_generated_line = 0u32;
        let mut prev_generated_col = 0i64;
        let mut prev_source_index = 0i64;
        let mut prev_source_line = 0i64;
        let mut prev_source_col = 0i64;
        let mut first_on_line = true;

        for m in &sorted {
            while prev_generated_line < m.generated_line {
                out.push(';');
                prev_generated_line += 1;
                prev_generated_col = 0;
                first_on_line = true;
            }
            if !first_on_line {
                out.push(',');
            }
            first_on_line = false;

            encode_vlq(m.generated_col as i64 - prev_generated_col, &mut out);
            encode_vlq(m.source_index as i64 - prev_source_index, &mut out);
            encode_vlq(m.source_line as i64 - prev_source_line, &mut out);
            encode_vlq(m.source_col as i64 - prev_source_col, &mut out);

            prev_generated_col = m.generated_col as i64;
            prev_source_index = m.source_index as i64;
            prev_source_line = m.source_line as i64;
            prev_source_col = m.source_col as i64;
        }
        out
    }
}

/// A Source Map v3 document.
#[derive(Debug, Clone, Serialize)]
pub struct SourceMap {
    /// Always `3`.
    pub version: u8,
    /// Source file paths referenced by this map (just the one input file).
    pub sources: Vec<String>,
    /// Original source contents, in the same order as `sources`.
    #[serde(rename = "sourcesContent", skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<String>>,
    /// Names table (unused by this compiler; always empty).
    pub names: Vec<String>,
    /// The VLQ-encoded mappings string.
    pub mappings: String,
    /// The generated output's logical file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl SourceMap {
    /// Build a v3 map from an accumulated [`MappingsBuilder`].
    pub fn new(file: &str, source: &str, source_text: &str, builder: &MappingsBuilder) -> Self {
        Self {
            version: 3,
            sources: vec![source.to_string()],
            sources_content: Some(vec![source_text.to_string()]),
            names: Vec::new(),
            mappings: builder.encode(),
            file: Some(file.to_string()),
        }
    }

    /// Serialize to the JSON string embedded in `TransformResult::map`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Render as an inline `//# sourceMappingURL=` data URL comment,
    /// appended to generated code when `sourcemap: inline` is requested.
    pub fn to_inline_comment(&self) -> String {
        use std::fmt::Write as _;
        let json = self.to_json();
        let encoded = base64_encode(json.as_bytes());
        let mut out = String::new();
        write!(
            out,
            "//# sourceMappingURL=data:application/json;base64,{encoded}"
        )
        .ok();
        out
    }
}

fn base64_encode(bytes: &[u8]) -> String {
    const TABLE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied();
        let b2 = chunk.get(2).copied();
        out.push(TABLE[(b0 >> 2) as usize] as char);
        out.push(TABLE[(((b0 & 0x03) << 4) | (b1.unwrap_or(0) >> 4)) as usize] as char);
        if let Some(b1) = b1 {
            out.push(TABLE[(((b1 & 0x0f) << 2) | (b2.unwrap_or(0) >> 6)) as usize] as char);
        } else {
            out.push('=');
        }
        if let Some(b2) = b2 {
            out.push(TABLE[(b2 & 0x3f) as usize] as char);
        } else {
            out.push('=');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_single_mapping_as_aaaa() {
        let mut b = MappingsBuilder::new();
        b.add_mapping(0, 0, 0, 0);
        assert_eq!(b.encode(), "AAAA");
    }

    #[test]
    fn encodes_multiple_segments_on_one_line() {
        let mut b = MappingsBuilder::new();
        b.add_mapping(0, 0, 0, 0);
        b.add_mapping(0, 2, 0, 2);
        // second segment: generated col delta = 2, source line delta = 0, source col delta = 2
        let encoded = b.encode();
        assert!(encoded.starts_with("AAAA,"));
    }

    #[test]
    fn semicolon_per_generated_line() {
        let mut b = MappingsBuilder::new();
        b.add_mapping(0, 0, 0, 0);
        b.add_mapping(1, 0, 1, 0);
        let encoded = b.encode();
        assert_eq!(encoded.matches(';').count(), 1);
    }

    #[test]
    fn source_map_json_roundtrip() {
        let mut b = MappingsBuilder::new();
        b.add_mapping(0, 0, 0, 0);
        let map = SourceMap::new("test.astro.js", "test.astro", "<h1></h1>", &b);
        let json = map.to_json();
        assert!(json.contains("\"version\":3"));
        assert!(json.contains("\"mappings\":\"AAAA\""));
    }

    #[test]
    fn inline_comment_is_base64_data_url() {
        let b = MappingsBuilder::new();
        let map = SourceMap::new("a.js", "a.astro", "", &b);
        let comment = map.to_inline_comment();
        assert!(comment.starts_with("//# sourceMappingURL=data:application/json;base64,"));
    }
}

#![deny(missing_docs)]
//! Compiler front-end primitives shared by the `.astro` pipeline: source
//! locations, the JS-aware lexical scanner, the tokenizer, the
//! tree-construction parser, diagnostics, and source map generation.
//!
//! Domain-specific semantics (CSS scoping, the hydration/semantic
//! transform, and code generation) live in the sibling `astro` crate,
//! which consumes the [`ast::Node`] tree this crate produces.

/// AST node types produced by the tree-construction parser.
pub mod ast;
/// Typed diagnostics with stable error codes and byte-range locations.
pub mod diagnostic;
/// Byte-offset location primitives and the line/column index.
pub mod loc;
/// The tree-construction parser.
pub mod parser;
/// A hand-written JS-aware lexical scanner for brace/paren matching and
/// import/export statement discovery.
pub mod scanner;
/// Source Map v3 generation.
pub mod sourcemap;
/// Token types emitted by the tokenizer.
pub mod token;
/// The tokenizer state machine.
pub mod tokenizer;

pub use ast::{classify_tag_name, Attribute, Node, Tag, TagClass};
pub use diagnostic::{DiagnosticCode, DiagnosticLocation, DiagnosticMessage, DiagnosticSink, Severity};
pub use loc::{LineCol, LineIndex, Loc, Position, Range};
pub use parser::{ParseResult, Parser};
pub use sourcemap::{MappingsBuilder, SourceMap};
pub use token::{AttributeToken, AttributeValue, QuoteKind, Token, TokenErrorKind};
pub use tokenizer::Tokenizer;

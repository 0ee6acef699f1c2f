//! Typed diagnostics with stable error codes and byte-range locations.
//!
//! Generalizes the teacher's `ParseWarning`/`RecoverableError` enum-plus-
//! `Display` pattern (`core/src/error.rs`) into the fixed code list from
//! spec.md §6. Diagnostics are always collected, never thrown: no `Result`
//! crosses a component boundary for a recoverable condition (spec.md §7).

use crate::loc::{LineIndex, Loc, Range};
use serde::{Deserialize, Serialize};

/// Diagnostic severity, matching spec.md §6 exactly (`Error=1` .. `Hint=4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum Severity {
    /// A fatal condition; `TransformResult::code` will be empty (spec.md §7).
    Error = 1,
    /// A recoverable condition; compilation continues.
    Warning = 2,
    /// Informational only.
    Information = 3,
    /// A hint, usually accompanying another diagnostic's `hint` field.
    Hint = 4,
}

/// Stable diagnostic codes. Never renumber these — tooling depends on the
/// literal integers (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum DiagnosticCode {
    /// Generic error, no specific code assigned.
    Error = 1000,
    /// EOF reached inside an unterminated JS block comment.
    ErrorUnterminatedJsComment = 1001,
    /// A fragment (`<>`) was given attributes, which is illegal.
    ErrorFragmentShorthandAttrs = 1002,
    /// A `client:only` component has no matching frontmatter import.
    ErrorUnmatchedImport = 1003,
    /// A `slot` attribute was used outside of a component/custom-element child.
    ErrorUnsupportedSlotAttribute = 1004,
    /// A closing `---` fence was found with no matching opening fence.
    ErrorFrontmatterFenceUnpaired = 1006,
    /// Generic warning, no specific code assigned.
    Warning = 2000,
    /// EOF reached inside an unterminated HTML comment.
    WarningUnterminatedHtmlComment = 2001,
    /// An HTML tag was opened but never closed.
    WarningUnclosedHtmlTag = 2002,
    /// A directive that has been removed is still present in the source.
    WarningDeprecatedDirective = 2003,
    /// A directive that is a documented no-op in this context.
    WarningIgnoredDirective = 2004,
    /// An expression appears somewhere it cannot be rendered.
    WarningUnsupportedExpression = 2005,
    /// `set:html`/`set:text` used alongside explicit children.
    WarningSetWithChildren = 2006,
    /// `define:vars` applied to a `<style>` with no real root element.
    WarningCannotDefineVars = 2007,
    /// A bare `...rest` spread was used without enclosing braces.
    WarningInvalidSpread = 2008,
    /// `transition:*` used on an external-module `<script>`.
    WarningTransitionExternalRerun = 2010,
    /// Generic informational diagnostic.
    Info = 3000,
    /// Generic hint diagnostic.
    Hint = 4000,
}

impl DiagnosticCode {
    /// The stable integer for this code.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// The severity this code reports at by default.
    pub fn default_severity(self) -> Severity {
        use DiagnosticCode::*;
        match self {
            Error | ErrorUnterminatedJsComment | ErrorFragmentShorthandAttrs
            | ErrorUnmatchedImport | ErrorUnsupportedSlotAttribute
            | ErrorFrontmatterFenceUnpaired => Severity::Error,
            Warning | WarningUnterminatedHtmlComment | WarningUnclosedHtmlTag
            | WarningDeprecatedDirective | WarningIgnoredDirective
            | WarningUnsupportedExpression | WarningSetWithChildren
            | WarningCannotDefineVars | WarningInvalidSpread
            | WarningTransitionExternalRerun => Severity::Warning,
            Info => Severity::Information,
            Hint => Severity::Hint,
        }
    }
}

/// A file/line/column/excerpt location attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticLocation {
    /// Source file path (or `<stdin>`).
    pub file: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    /// Byte length of the offending span.
    pub length: u32,
    /// The full text of the offending line, for display.
    pub line_text: String,
}

/// A single structured diagnostic, as returned in `TransformResult::diagnostics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// The stable integer code (see [`DiagnosticCode`]).
    pub code: i32,
    /// Human-readable message text.
    pub text: String,
    /// An optional suggestion for how to fix the issue.
    pub hint: Option<String>,
    /// Where in the source this diagnostic applies, if known.
    pub location: Option<DiagnosticLocation>,
}

impl DiagnosticMessage {
    /// Build a diagnostic located at `range`, resolving line/column/excerpt
    /// via `line_index`.
    pub fn at(
        code: DiagnosticCode,
        text: impl Into<String>,
        file: &str,
        source: &str,
        line_index: &LineIndex,
        range: Range,
    ) -> Self {
        let lc = line_index.line_col(range.start);
        Self {
            severity: code.default_severity(),
            code: code.as_i32(),
            text: text.into(),
            hint: None,
            location: Some(DiagnosticLocation {
                file: file.to_string(),
                line: lc.line,
                column: lc.column + 1,
                length: range.len,
                line_text: line_index.line_text(source, range.start).to_string(),
            }),
        }
    }

    /// Build a diagnostic with no known location (internal invariant
    /// violations, §7 kind 3).
    pub fn without_location(code: DiagnosticCode, text: impl Into<String>) -> Self {
        Self {
            severity: code.default_severity(),
            code: code.as_i32(),
            text: text.into(),
            hint: None,
            location: None,
        }
    }

    /// Attach a hint string, builder-style.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Override the severity, builder-style (used for the severity-1
    /// "internal invariant violation" wrapper, §7 kind 3).
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Accumulates diagnostics in source order across a single compilation.
///
/// Mirrors the teacher's `ParseDiagnostics` accumulator (`core/src/error.rs`)
/// but carries the richer [`DiagnosticMessage`] shape required by spec.md §6.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    messages: Vec<DiagnosticMessage>,
}

impl DiagnosticSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a diagnostic.
    pub fn push(&mut self, message: DiagnosticMessage) {
        self.messages.push(message);
    }

    /// Whether any `Severity::Error` diagnostic was recorded — the signal
    /// the handler uses to blank out `TransformResult::code` (spec.md §7).
    pub fn has_fatal(&self) -> bool {
        self.messages.iter().any(|m| m.severity == Severity::Error)
    }

    /// Number of diagnostics recorded so far.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no diagnostics have been recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Consume the sink, returning diagnostics in the order they were added
    /// (which is source order, since every phase emits in a single forward
    /// pass over the source).
    pub fn into_messages(self) -> Vec<DiagnosticMessage> {
        self.messages
    }

    /// Borrow the diagnostics recorded so far.
    pub fn messages(&self) -> &[DiagnosticMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_code_values_match_spec() {
        assert_eq!(DiagnosticCode::Error.as_i32(), 1000);
        assert_eq!(DiagnosticCode::ErrorUnterminatedJsComment.as_i32(), 1001);
        assert_eq!(DiagnosticCode::ErrorFragmentShorthandAttrs.as_i32(), 1002);
        assert_eq!(DiagnosticCode::ErrorUnmatchedImport.as_i32(), 1003);
        assert_eq!(DiagnosticCode::ErrorUnsupportedSlotAttribute.as_i32(), 1004);
        assert_eq!(DiagnosticCode::ErrorFrontmatterFenceUnpaired.as_i32(), 1006);
        assert_eq!(DiagnosticCode::Warning.as_i32(), 2000);
        assert_eq!(DiagnosticCode::WarningUnterminatedHtmlComment.as_i32(), 2001);
        assert_eq!(DiagnosticCode::WarningUnclosedHtmlTag.as_i32(), 2002);
        assert_eq!(DiagnosticCode::WarningDeprecatedDirective.as_i32(), 2003);
        assert_eq!(DiagnosticCode::WarningIgnoredDirective.as_i32(), 2004);
        assert_eq!(DiagnosticCode::WarningUnsupportedExpression.as_i32(), 2005);
        assert_eq!(DiagnosticCode::WarningSetWithChildren.as_i32(), 2006);
        assert_eq!(DiagnosticCode::WarningCannotDefineVars.as_i32(), 2007);
        assert_eq!(DiagnosticCode::WarningInvalidSpread.as_i32(), 2008);
        assert_eq!(DiagnosticCode::WarningTransitionExternalRerun.as_i32(), 2010);
        assert_eq!(DiagnosticCode::Info.as_i32(), 3000);
        assert_eq!(DiagnosticCode::Hint.as_i32(), 4000);
    }

    #[test]
    fn sink_tracks_fatal() {
        let mut sink = DiagnosticSink::new();
        assert!(!sink.has_fatal());
        sink.push(DiagnosticMessage::without_location(
            DiagnosticCode::WarningIgnoredDirective,
            "ignored",
        ));
        assert!(!sink.has_fatal());
        sink.push(DiagnosticMessage::without_location(
            DiagnosticCode::ErrorUnmatchedImport,
            "unmatched",
        ));
        assert!(sink.has_fatal());
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn diagnostic_at_resolves_location() {
        let source = "<h1>\n< data-x=\"y\"></>\n";
        let idx = LineIndex::new(source);
        let range = Range::new(5, 7);
        let msg = DiagnosticMessage::at(
            DiagnosticCode::ErrorFragmentShorthandAttrs,
            "fragments cannot carry attributes",
            "test.astro",
            source,
            &idx,
            range,
        );
        let loc = msg.location.unwrap();
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);
        assert_eq!(loc.line_text, "< data-x=\"y\"></>");
    }
}

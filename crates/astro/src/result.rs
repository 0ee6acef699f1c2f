//! Public result types returned by [`crate::handler::transform`] (C9).
//!
//! Shapes mirror the JSON the façade returns across the FFI boundary:
//! field names here are written exactly as they serialize, since the
//! `napi`/`wasm` bridge crates pass these straight through `serde_json`.

use astro_compiler_core::DiagnosticMessage;
use serde::Serialize;

/// The kind of hoisted `<script>` a component carries (spec.md §4.6
/// "script hoisting").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoistedScriptType {
    /// An external script (`<script src="...">`).
    External,
    /// An inline module script bundled via its virtual specifier.
    Inline,
}

/// One hoisted `<script>`, extracted from the template body and replaced
/// there with a `$renderScript` call.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResultHoistedScript {
    /// Whether this script was external or inline.
    #[serde(rename = "type")]
    pub kind: HoistedScriptType,
    /// The script's `src` attribute, for an external script.
    pub src: Option<String>,
    /// The virtual module specifier generated for an inline script, e.g.
    /// `"Foo.astro?astro&type=script&index=0&lang.ts"`.
    pub virtual_module: Option<String>,
    /// Verbatim script text, for an inline script not marked `is:inline`.
    pub code: Option<String>,
}

/// A component reference the transform classified as requiring a
/// client-side hydration island, or deferred server rendering.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResultHydratedComponent {
    /// The name the component is referenced by in the template.
    pub export_name: String,
    /// The local binding name it was imported as in frontmatter.
    pub local_name: String,
    /// The import specifier it was imported from.
    pub specifier: String,
    /// The specifier resolved via the handler's `resolve_path` callback,
    /// if one was supplied and the component needed resolution.
    pub resolved_path: Option<String>,
    /// The `client:*` directive name (`load`, `idle`, `visible`, `media`,
    /// `only`), absent for a `server:defer` component.
    pub directive: Option<String>,
}

/// A CSS module hoisted out of a `<style>` block, before scoping.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResultCssModule {
    /// The virtual module specifier, e.g.
    /// `"Foo.astro?astro&type=style&index=0&lang.css"`.
    pub virtual_module: String,
    /// The style block's source content, unscoped.
    pub code: String,
}

/// The complete output of a `transform` call (spec.md §6 "Result object").
#[derive(Debug, Clone, Serialize)]
pub struct TransformResult {
    /// The generated JS/TS module code.
    pub code: String,
    /// A Source Map v3 JSON document mapping `code` back to the input,
    /// present only when `sourcemap` was requested.
    pub map: Option<String>,
    /// CSS extracted from `<style>` blocks, in source order.
    pub css: Vec<TransformResultCssModule>,
    /// Scripts hoisted out of the template, in source order.
    pub scripts: Vec<TransformResultHoistedScript>,
    /// Components requiring client hydration or deferred server rendering.
    pub hydrated_components: Vec<TransformResultHydratedComponent>,
    /// Client-only (`client:only`) components; these are also present in
    /// `hydrated_components`, surfaced separately since the caller must
    /// avoid resolving their import at build time.
    pub client_only_components: Vec<TransformResultHydratedComponent>,
    /// Components deferred to server-only rendering (`server:defer`).
    pub server_components: Vec<TransformResultHydratedComponent>,
    /// Whether the component's template contains a `<head>` element;
    /// downstream page rendering uses this to decide whether the
    /// component already supplies its own `<head>`.
    pub contains_head: bool,
    /// Diagnostics collected during parsing and transformation, in source
    /// order. Never discards `Error`-severity ones on to a separate
    /// "throw" path (spec.md §7): callers decide what to do with them.
    pub diagnostics: Vec<DiagnosticMessage>,
    /// The 8-character base-36 scope hash applied to this component, if
    /// it has any scoped styles or `define:vars`.
    pub scope: Option<String>,
    /// Whether any descendant carries a `transition:*` directive, meaning
    /// a page embedding this component needs the client-side
    /// view-transitions runtime loaded (spec.md §6 "propagation").
    pub propagation: bool,
    /// One message per `<style>` block whose preprocessing failed. An
    /// empty `preprocessed_styles` entry for a block (as opposed to no
    /// entry, or a `null`/absent one) means the host's preprocessor ran
    /// and failed; that block's CSS is dropped from `css` and its
    /// `<style>` tag from `code` rather than emitted unprocessed
    /// (spec.md §4.7, §7 kind 2).
    pub style_error: Vec<String>,
}

/// The output of a `parse` call: just the AST, serialized as JSON, plus
/// diagnostics. The façade never hands back the internal [`astro_compiler_core::Node`]
/// by value across FFI — it serializes to a generic JSON tree first.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// The parsed document, as a JSON value shaped like the Node enum's
    /// serde representation.
    pub ast: serde_json::Value,
    /// Diagnostics collected while parsing.
    pub diagnostics: Vec<DiagnosticMessage>,
}

/// The output of a `preprocess_styles` call: one result per `<style>`
/// block found, in source order.
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessStylesResult {
    /// Preprocessed CSS for each `<style>` block, in source order. `None`
    /// entries mean the preprocessor declined to handle that block's
    /// language and it should be emitted unprocessed.
    pub styles: Vec<Option<String>>,
    /// Diagnostics raised while preprocessing.
    pub diagnostics: Vec<DiagnosticMessage>,
}

/// The output of a `convert_to_tsx` call: a TSX surface over the template,
/// for an editor/language-server to type-check against (spec.md §2 "C9").
#[derive(Debug, Clone, Serialize)]
pub struct ConvertToTsxResult {
    /// The generated `.tsx` text. Never executed; exists only so a
    /// TypeScript language service can report type errors against the
    /// template's expressions and component props.
    pub code: String,
    /// Diagnostics collected while parsing.
    pub diagnostics: Vec<DiagnosticMessage>,
}

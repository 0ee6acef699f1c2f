//! NAPI-friendly mirrors of the core crate's option/result types.
//!
//! `napi(object)` structs must be plain data (no trait objects, no
//! closures captured in Rust-only fields), so every field here is a
//! primitive, `String`, `Vec`, or another `#[napi(object)]` struct.
//! [`JsTransformOptions::into_core`] is where the JS-facing shape gets
//! turned into the richer [`astro_compiler::TransformOptions`].

use astro_compiler::{ScopedStyleStrategy, TransformOptions};
use napi::bindgen_prelude::*;
use napi_derive::napi;

/// Options accepted by the exported `transform` function.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct JsTransformOptions {
    /// The component's filename.
    pub filename: String,
    /// A normalized filename used in virtual module specifiers; defaults
    /// to `filename` when omitted.
    pub normalized_filename: Option<String>,
    /// Whether to generate a source map.
    pub sourcemap: Option<bool>,
    /// `"where"`, `"class"`, or `"attribute"`; defaults to `"where"`.
    pub scoped_style_strategy: Option<String>,
    /// Whether to emit compact output.
    pub compact: Option<bool>,
    /// Whether to annotate elements with `data-astro-source-*` attributes.
    pub annotate_source_file: Option<bool>,
    /// Preprocessed replacements for each `<style>` block, positional by
    /// source order; `null` entries mean "leave unprocessed" (spec's
    /// two-phase async protocol — the Node host runs its own
    /// preprocessor before calling in here).
    pub preprocessed_styles: Option<Vec<Option<String>>>,
}

impl JsTransformOptions {
    /// Build the richer core options value this binding's function bodies
    /// operate on.
    pub fn into_core(self) -> TransformOptions {
        let mut opts = TransformOptions::new(self.filename);
        if let Some(n) = self.normalized_filename {
            opts = opts.with_normalized_filename(n);
        }
        if let Some(s) = self.sourcemap {
            opts = opts.with_sourcemap(s);
        }
        if let Some(strategy) = self.scoped_style_strategy {
            let strategy = strategy.parse::<ScopedStyleStrategy>().unwrap_or_default();
            opts = opts.with_scoped_style_strategy(strategy);
        }
        if let Some(c) = self.compact {
            opts = opts.with_compact(c);
        }
        if let Some(a) = self.annotate_source_file {
            opts = opts.with_annotate_source_file(a);
        }
        if let Some(styles) = self.preprocessed_styles {
            opts = opts.with_preprocessed_styles(styles);
        }
        opts
    }
}

/// Options accepted by the exported `parse` function.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct JsParseOptions {
    /// The component's filename, used only for diagnostic locations.
    pub filename: String,
}

/// One diagnostic, as handed back to JS.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct JsDiagnostic {
    /// Severity: 1=error, 2=warning, 3=info, 4=hint.
    pub severity: i32,
    /// The stable integer diagnostic code.
    pub code: i32,
    /// Human-readable message text.
    pub text: String,
    /// 1-based line, if the diagnostic has a known location.
    pub line: Option<u32>,
    /// 1-based column, if the diagnostic has a known location.
    pub column: Option<u32>,
}

impl From<astro_compiler_core::DiagnosticMessage> for JsDiagnostic {
    fn from(value: astro_compiler_core::DiagnosticMessage) -> Self {
        JsDiagnostic {
            severity: value.severity as i32,
            code: value.code,
            text: value.text,
            line: value.location.as_ref().map(|l| l.line),
            column: value.location.as_ref().map(|l| l.column),
        }
    }
}

/// One CSS module hoisted out of a `<style>` block.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct JsCssModule {
    /// The virtual module specifier, e.g. `"Foo.astro?astro&type=style&index=0&lang.css"`.
    pub virtual_module: String,
    /// The style block's source content, scoped.
    pub code: String,
}

impl From<astro_compiler::TransformResultCssModule> for JsCssModule {
    fn from(value: astro_compiler::TransformResultCssModule) -> Self {
        JsCssModule {
            virtual_module: value.virtual_module,
            code: value.code,
        }
    }
}

/// One script hoisted out of the template.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct JsHoistedScript {
    /// `"external"` or `"inline"`.
    #[napi(js_name = "type")]
    pub kind: String,
    /// The `src` attribute, for an external script.
    pub src: Option<String>,
    /// The virtual module specifier, for an inline script.
    pub virtual_module: Option<String>,
    /// Verbatim script text, for an inline script.
    pub code: Option<String>,
}

impl From<astro_compiler::TransformResultHoistedScript> for JsHoistedScript {
    fn from(value: astro_compiler::TransformResultHoistedScript) -> Self {
        JsHoistedScript {
            kind: match value.kind {
                astro_compiler::HoistedScriptType::External => "external".to_string(),
                astro_compiler::HoistedScriptType::Inline => "inline".to_string(),
            },
            src: value.src,
            virtual_module: value.virtual_module,
            code: value.code,
        }
    }
}

/// A component reference classified as needing client hydration or
/// deferred server rendering.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct JsHydratedComponent {
    /// The name the component is referenced by in the template.
    pub export_name: String,
    /// The local binding name it was imported as in frontmatter.
    pub local_name: String,
    /// The import specifier it was imported from.
    pub specifier: String,
    /// The specifier resolved via the `resolvePath` callback, if any.
    pub resolved_path: Option<String>,
    /// The `client:*` directive name, absent for a `server:defer` component.
    pub directive: Option<String>,
}

impl From<astro_compiler::TransformResultHydratedComponent> for JsHydratedComponent {
    fn from(value: astro_compiler::TransformResultHydratedComponent) -> Self {
        JsHydratedComponent {
            export_name: value.export_name,
            local_name: value.local_name,
            specifier: value.specifier,
            resolved_path: value.resolved_path,
            directive: value.directive,
        }
    }
}

/// The result of `transform`.
#[napi(object)]
pub struct JsTransformResult {
    /// The generated module source; empty when a fatal diagnostic fired.
    pub code: String,
    /// A Source Map v3 JSON document, present only when requested.
    pub map: Option<String>,
    /// CSS extracted from `<style>` blocks, one per module.
    pub css: Vec<JsCssModule>,
    /// Scripts hoisted out of the template, in source order.
    pub scripts: Vec<JsHoistedScript>,
    /// Components requiring client hydration or deferred server rendering.
    pub hydrated_components: Vec<JsHydratedComponent>,
    /// Client-only (`client:only`) components.
    pub client_only_components: Vec<JsHydratedComponent>,
    /// Components deferred to server-only rendering (`server:defer`).
    pub server_components: Vec<JsHydratedComponent>,
    /// Whether the component contains a `<head>` element.
    pub contains_head: bool,
    /// Diagnostics collected during compilation.
    pub diagnostics: Vec<JsDiagnostic>,
    /// The 8-character scope hash, if the component has any scoped CSS.
    pub scope: Option<String>,
    /// Whether any descendant carries a `transition:*` directive.
    pub propagation: bool,
    /// One message per `<style>` block whose preprocessing failed.
    pub style_error: Vec<String>,
}

impl From<astro_compiler::TransformResult> for JsTransformResult {
    fn from(value: astro_compiler::TransformResult) -> Self {
        JsTransformResult {
            code: value.code,
            map: value.map,
            css: value.css.into_iter().map(JsCssModule::from).collect(),
            scripts: value.scripts.into_iter().map(JsHoistedScript::from).collect(),
            hydrated_components: value.hydrated_components.into_iter().map(JsHydratedComponent::from).collect(),
            client_only_components: value.client_only_components.into_iter().map(JsHydratedComponent::from).collect(),
            server_components: value.server_components.into_iter().map(JsHydratedComponent::from).collect(),
            contains_head: value.contains_head,
            diagnostics: value.diagnostics.into_iter().map(JsDiagnostic::from).collect(),
            scope: value.scope,
            propagation: value.propagation,
            style_error: value.style_error,
        }
    }
}

/// The result of `parse`: the AST serialized as a JSON string, plus
/// diagnostics.
#[napi(object)]
pub struct JsParseResult {
    /// The parsed document, JSON-encoded.
    pub ast_json: String,
    /// Diagnostics collected while parsing.
    pub diagnostics: Vec<JsDiagnostic>,
}

impl TryFrom<astro_compiler::ParseResult> for JsParseResult {
    type Error = Error;

    fn try_from(value: astro_compiler::ParseResult) -> Result<Self> {
        Ok(JsParseResult {
            ast_json: serde_json::to_string(&value.ast).map_err(|e| Error::from_reason(e.to_string()))?,
            diagnostics: value.diagnostics.into_iter().map(JsDiagnostic::from).collect(),
        })
    }
}

/// Options accepted by the exported `convertToTsx` function.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct JsConvertToTsxOptions {
    /// The component's filename.
    pub filename: String,
}

impl JsConvertToTsxOptions {
    /// Build the richer core options value this binding's function bodies
    /// operate on.
    pub fn into_core(self) -> astro_compiler::ConvertToTsxOptions {
        astro_compiler::ConvertToTsxOptions {
            filename: self.filename,
        }
    }
}

/// The result of `convertToTsx`.
#[napi(object)]
pub struct JsConvertToTsxResult {
    /// The generated `.tsx` text.
    pub code: String,
    /// Diagnostics collected while parsing.
    pub diagnostics: Vec<JsDiagnostic>,
}

impl From<astro_compiler::ConvertToTsxResult> for JsConvertToTsxResult {
    fn from(value: astro_compiler::ConvertToTsxResult) -> Self {
        JsConvertToTsxResult {
            code: value.code,
            diagnostics: value.diagnostics.into_iter().map(JsDiagnostic::from).collect(),
        }
    }
}

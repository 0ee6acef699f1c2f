//! WebAssembly bindings for the Astro component compiler, for hosts that
//! can't load a native Node addon (browsers, edge runtimes, the Astro
//! language server's web build).

use astro_compiler::{ParseOptions, ScopedStyleStrategy, TransformOptions};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Configuration accepted by [`transform`]. Mirrors the NAPI
/// `JsTransformOptions` shape for parity across both bindings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasmTransformOptions {
    #[serde(default)]
    filename: String,
    #[serde(default)]
    normalized_filename: Option<String>,
    #[serde(default)]
    sourcemap: Option<bool>,
    #[serde(default)]
    scoped_style_strategy: Option<String>,
    #[serde(default)]
    compact: Option<bool>,
    #[serde(default)]
    annotate_source_file: Option<bool>,
    #[serde(default)]
    preprocessed_styles: Option<Vec<Option<String>>>,
}

fn parse_options(config: JsValue) -> WasmTransformOptions {
    if config.is_undefined() || config.is_null() {
        return WasmTransformOptions::default();
    }
    serde_wasm_bindgen::from_value(config).unwrap_or_default()
}

fn into_core_options(cfg: WasmTransformOptions) -> TransformOptions {
    let mut opts = TransformOptions::new(cfg.filename);
    if let Some(n) = cfg.normalized_filename {
        opts = opts.with_normalized_filename(n);
    }
    if let Some(s) = cfg.sourcemap {
        opts = opts.with_sourcemap(s);
    }
    if let Some(strategy) = cfg.scoped_style_strategy {
        let strategy = strategy.parse::<ScopedStyleStrategy>().unwrap_or_default();
        opts = opts.with_scoped_style_strategy(strategy);
    }
    if let Some(c) = cfg.compact {
        opts = opts.with_compact(c);
    }
    if let Some(a) = cfg.annotate_source_file {
        opts = opts.with_annotate_source_file(a);
    }
    if let Some(styles) = cfg.preprocessed_styles {
        opts = opts.with_preprocessed_styles(styles);
    }
    opts
}

#[derive(Debug, Serialize)]
struct WasmDiagnostic {
    severity: i32,
    code: i32,
    text: String,
    line: Option<u32>,
    column: Option<u32>,
}

impl From<astro_compiler_core::DiagnosticMessage> for WasmDiagnostic {
    fn from(value: astro_compiler_core::DiagnosticMessage) -> Self {
        WasmDiagnostic {
            severity: value.severity as i32,
            code: value.code,
            text: value.text,
            line: value.location.as_ref().map(|l| l.line),
            column: value.location.as_ref().map(|l| l.column),
        }
    }
}

#[derive(Debug, Serialize)]
struct WasmCssModule {
    virtual_module: String,
    code: String,
}

impl From<astro_compiler::TransformResultCssModule> for WasmCssModule {
    fn from(value: astro_compiler::TransformResultCssModule) -> Self {
        WasmCssModule {
            virtual_module: value.virtual_module,
            code: value.code,
        }
    }
}

#[derive(Debug, Serialize)]
struct WasmHoistedScript {
    #[serde(rename = "type")]
    kind: String,
    src: Option<String>,
    virtual_module: Option<String>,
    code: Option<String>,
}

impl From<astro_compiler::TransformResultHoistedScript> for WasmHoistedScript {
    fn from(value: astro_compiler::TransformResultHoistedScript) -> Self {
        WasmHoistedScript {
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

#[derive(Debug, Serialize)]
struct WasmHydratedComponent {
    export_name: String,
    local_name: String,
    specifier: String,
    resolved_path: Option<String>,
    directive: Option<String>,
}

impl From<astro_compiler::TransformResultHydratedComponent> for WasmHydratedComponent {
    fn from(value: astro_compiler::TransformResultHydratedComponent) -> Self {
        WasmHydratedComponent {
            export_name: value.export_name,
            local_name: value.local_name,
            specifier: value.specifier,
            resolved_path: value.resolved_path,
            directive: value.directive,
        }
    }
}

#[derive(Debug, Serialize)]
struct WasmTransformResult {
    code: String,
    map: Option<String>,
    css: Vec<WasmCssModule>,
    scripts: Vec<WasmHoistedScript>,
    hydrated_components: Vec<WasmHydratedComponent>,
    client_only_components: Vec<WasmHydratedComponent>,
    server_components: Vec<WasmHydratedComponent>,
    contains_head: bool,
    diagnostics: Vec<WasmDiagnostic>,
    scope: Option<String>,
    propagation: bool,
    style_error: Vec<String>,
}

/// Parse and fully compile one `.astro` source file, returning a plain JS
/// object shaped like `{ code, css, scripts, hydratedComponents,
/// clientOnlyComponents, serverComponents, containsHead, diagnostics,
/// scope, propagation, styleError }`.
#[wasm_bindgen]
pub fn transform(source: &str, options: JsValue) -> JsValue {
    let cfg = parse_options(options);
    let core_options = into_core_options(cfg);
    let result = astro_compiler::transform_component(source, &core_options);
    let wasm_result = WasmTransformResult {
        code: result.code,
        map: result.map,
        css: result.css.into_iter().map(WasmCssModule::from).collect(),
        scripts: result.scripts.into_iter().map(WasmHoistedScript::from).collect(),
        hydrated_components: result.hydrated_components.into_iter().map(WasmHydratedComponent::from).collect(),
        client_only_components: result.client_only_components.into_iter().map(WasmHydratedComponent::from).collect(),
        server_components: result.server_components.into_iter().map(WasmHydratedComponent::from).collect(),
        contains_head: result.contains_head,
        diagnostics: result.diagnostics.into_iter().map(WasmDiagnostic::from).collect(),
        scope: result.scope,
        propagation: result.propagation,
        style_error: result.style_error,
    };
    serde_wasm_bindgen::to_value(&wasm_result).unwrap_or(JsValue::NULL)
}

/// Parse a source file and return `{ astJson, diagnostics }`.
#[wasm_bindgen]
pub fn parse(source: &str, filename: &str) -> JsValue {
    let options = ParseOptions {
        filename: filename.to_string(),
    };
    let result = astro_compiler::parse(source, &options);
    let ast_json = serde_json::to_string(&result.ast).unwrap_or_default();
    let diagnostics: Vec<WasmDiagnostic> = result.diagnostics.into_iter().map(WasmDiagnostic::from).collect();

    #[derive(Serialize)]
    struct Out {
        ast_json: String,
        diagnostics: Vec<WasmDiagnostic>,
    }
    serde_wasm_bindgen::to_value(&Out { ast_json, diagnostics }).unwrap_or(JsValue::NULL)
}

/// Render a source file as a `.tsx` surface for editor type-checking,
/// returning `{ code, diagnostics }`.
#[wasm_bindgen(js_name = convertToTsx)]
pub fn convert_to_tsx(source: &str, filename: &str) -> JsValue {
    let options = astro_compiler::ConvertToTsxOptions {
        filename: filename.to_string(),
    };
    let result = astro_compiler::convert_to_tsx(source, &options);
    let diagnostics: Vec<WasmDiagnostic> = result.diagnostics.into_iter().map(WasmDiagnostic::from).collect();

    #[derive(Serialize)]
    struct Out {
        code: String,
        diagnostics: Vec<WasmDiagnostic>,
    }
    serde_wasm_bindgen::to_value(&Out { code: result.code, diagnostics }).unwrap_or(JsValue::NULL)
}

#![deny(missing_docs)]
//! Node.js bindings for the Astro component compiler.

use napi::bindgen_prelude::*;
use napi_derive::napi;

/// NAPI-exposed option/result data structures.
pub mod types;

pub use types::{
    JsConvertToTsxOptions, JsConvertToTsxResult, JsCssModule, JsDiagnostic, JsHoistedScript, JsHydratedComponent,
    JsParseOptions, JsParseResult, JsTransformOptions, JsTransformResult,
};

/// Parse and fully compile one `.astro` source file into a JS module.
#[napi]
pub fn transform(source: String, options: JsTransformOptions) -> JsTransformResult {
    let core_options = options.into_core();
    astro_compiler::transform_component(&source, &core_options).into()
}

/// Parse a source file and return its AST, without running the semantic
/// transform or code generator.
#[napi]
pub fn parse(source: String, options: JsParseOptions) -> Result<JsParseResult> {
    let core_options = astro_compiler::ParseOptions {
        filename: options.filename,
    };
    astro_compiler::parse(&source, &core_options).try_into()
}

/// Render one `.astro` source file as a `.tsx` surface for editor
/// type-checking.
#[napi]
pub fn convert_to_tsx(source: String, options: JsConvertToTsxOptions) -> JsConvertToTsxResult {
    let core_options = options.into_core();
    astro_compiler::convert_to_tsx(&source, &core_options).into()
}

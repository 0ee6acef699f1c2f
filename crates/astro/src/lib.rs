#![deny(missing_docs)]
//! CSS scoping, the semantic transform, code generation, and the
//! `transform`/`parse`/`convertToTSX`/`preprocessStyles` façade for the
//! `.astro` single-file-component compiler.
//!
//! Built on top of [`astro_compiler_core`]'s tokenizer, tree-construction
//! parser, diagnostics, and source maps; this crate owns everything that
//! is specific to what an `.astro` file *means* rather than how it's
//! lexed.

/// CSS tokenizing and selector scoping.
pub mod css;
/// Deterministic per-component scope hash.
pub mod hash;
/// The `transform`/`parse`/`convert_to_tsx`/`preprocess_styles` entry points.
pub mod handler;
/// Options accepted by the façade entry points.
pub mod options;
/// The code generator.
pub mod printer;
/// Public result types returned by the façade.
pub mod result;
/// The semantic transform: import resolution, hydration classification,
/// and directive validation.
pub mod transform;
/// `convertToTSX`: renders the template as JSX for editor type-checking.
pub mod tsx;

pub use handler::{convert_to_tsx, parse, preprocess_styles, transform as transform_component};
pub use options::{
    ConvertToTsxOptions, ParseOptions, ParseScopedStyleStrategyError, PreprocessOptions, PreprocessStyle,
    ResolvePath, ScopedStyleStrategy, TransformOptions,
};
pub use result::{
    ConvertToTsxResult, HoistedScriptType, ParseResult, PreprocessStylesResult, TransformResult,
    TransformResultCssModule, TransformResultHoistedScript, TransformResultHydratedComponent,
};

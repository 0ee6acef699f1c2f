//! Options accepted by the façade entry points (spec.md §4.7, §9 "Two
//! singletons, by design").
//!
//! Every field here has a concrete default so host bindings can construct
//! an options value with only the fields they actually vary. [`TransformOptions::new`]
//! takes the one field with no sane default: the component's filename.

use std::fmt;

/// How scoped styles get their selectors rewritten (spec.md §4.3 "Scoping
/// strategies").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopedStyleStrategy {
    /// Wrap the scope class in `:where(...)` so it contributes no
    /// specificity (the default: matches the resolved-on behavior of
    /// `resultScopedSlot` ordering questions in spec.md §9).
    #[default]
    Where,
    /// Append `.astro-HASH` directly to the compound selector.
    Class,
    /// Use an attribute selector, `[data-astro-hash-HASH]`.
    Attribute,
}

impl fmt::Display for ScopedStyleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopedStyleStrategy::Where => write!(f, "where"),
            ScopedStyleStrategy::Class => write!(f, "class"),
            ScopedStyleStrategy::Attribute => write!(f, "attribute"),
        }
    }
}

/// `s` wasn't one of `"where"`, `"class"`, or `"attribute"`.
#[derive(Debug, thiserror::Error)]
#[error("unknown scoped style strategy {0:?}; expected \"where\", \"class\", or \"attribute\"")]
pub struct ParseScopedStyleStrategyError(String);

impl std::str::FromStr for ScopedStyleStrategy {
    type Err = ParseScopedStyleStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "where" => Ok(ScopedStyleStrategy::Where),
            "class" => Ok(ScopedStyleStrategy::Class),
            "attribute" => Ok(ScopedStyleStrategy::Attribute),
            other => Err(ParseScopedStyleStrategyError(other.to_string())),
        }
    }
}

/// A synchronous callback the host supplies to resolve a bare import
/// specifier to a concrete path. Hosts whose real resolver is async wrap
/// it outside this crate (spec.md §9 "Callback dispatch across the FFI
/// boundary" — the core stays synchronous end to end, the two-phase
/// protocol lives entirely on the host side).
pub trait ResolvePath: Send + Sync {
    /// Resolve `specifier`, imported from `importer`, to a concrete path.
    fn resolve(&self, specifier: &str, importer: &str) -> Option<String>;
}

/// A no-op resolver: every specifier is returned unchanged. Used when the
/// host hasn't wired up a real module resolver (e.g. in `parse`-only use,
/// or in tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityResolver;

impl ResolvePath for IdentityResolver {
    fn resolve(&self, specifier: &str, _importer: &str) -> Option<String> {
        Some(specifier.to_string())
    }
}

/// A synchronous style preprocessor callback, supplied by the host for
/// `preprocess_styles` and honored by `transform` when styles need
/// preprocessing before scoping (spec.md §4.7 "preprocessedStyles").
pub trait PreprocessStyle: Send + Sync {
    /// Preprocess one `<style>` block's content. `lang` is the value of
    /// its `lang` attribute (e.g. `"scss"`), or `"css"` if absent.
    /// Returning `None` means "leave this block's content unprocessed".
    fn preprocess(&self, content: &str, lang: &str, filename: &str) -> Option<String>;
}

/// Options controlling [`crate::handler::transform`].
pub struct TransformOptions {
    /// The component's filename, as the host names it. Used for
    /// diagnostic locations and virtual module specifiers.
    pub filename: String,
    /// A normalized form of `filename` used in virtual module specifiers
    /// (spec.md §4.6); defaults to `filename` itself.
    pub normalized_filename: String,
    /// The module specifier the generated code imports the Astro runtime
    /// from. Defaults to `"astro/runtime/server/index.js"`, matching the
    /// upstream compiler's internal URL.
    pub internal_url: String,
    /// Whether to generate a Source Map v3 document alongside `code`.
    pub sourcemap: bool,
    /// The selector-rewriting strategy for scoped `<style>` blocks.
    pub scoped_style_strategy: ScopedStyleStrategy,
    /// Whether to emit compact (no extraneous whitespace) output.
    pub compact: bool,
    /// Whether a scoped slot fill should itself carry the scope class
    /// (spec.md §9 Open Question — resolved in DESIGN.md: `true`, since
    /// a slotted child renders inside the scoped subtree).
    pub result_scoped_slot: bool,
    /// The module specifier for the view-transitions animation runtime,
    /// only imported when the template uses a transition directive.
    pub transitions_animation_url: String,
    /// Whether to annotate every element with `data-astro-source-file`
    /// and `data-astro-source-loc` attributes (dev-mode source overlay).
    pub annotate_source_file: bool,
    /// Extra arguments appended to the generated `$createAstro(...)` call.
    pub astro_global_args: Option<String>,
    /// Resolves bare component import specifiers to concrete paths.
    pub resolve_path: Box<dyn ResolvePath>,
    /// Preprocessed replacements for `<style>` block contents, supplied
    /// up front by the host instead of invoked as a callback (spec.md
    /// §4.7 "preprocessedStyles" — the host runs its own async
    /// preprocessor pass before calling `transform`, and hands the
    /// results back positionally, one per style block in source order).
    pub preprocessed_styles: Vec<Option<String>>,
}

impl fmt::Debug for TransformOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformOptions")
            .field("filename", &self.filename)
            .field("normalized_filename", &self.normalized_filename)
            .field("internal_url", &self.internal_url)
            .field("sourcemap", &self.sourcemap)
            .field("scoped_style_strategy", &self.scoped_style_strategy)
            .field("compact", &self.compact)
            .field("result_scoped_slot", &self.result_scoped_slot)
            .field("transitions_animation_url", &self.transitions_animation_url)
            .field("annotate_source_file", &self.annotate_source_file)
            .field("astro_global_args", &self.astro_global_args)
            .field("preprocessed_styles", &self.preprocessed_styles)
            .finish_non_exhaustive()
    }
}

impl TransformOptions {
    /// A new options value for `filename`, with every other field at its
    /// default.
    pub fn new(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        TransformOptions {
            normalized_filename: filename.clone(),
            filename,
            internal_url: "astro/runtime/server/index.js".to_string(),
            sourcemap: false,
            scoped_style_strategy: ScopedStyleStrategy::default(),
            compact: false,
            result_scoped_slot: true,
            transitions_animation_url: "astro/components/viewtransitions.css".to_string(),
            annotate_source_file: false,
            astro_global_args: None,
            resolve_path: Box::new(IdentityResolver),
            preprocessed_styles: Vec::new(),
        }
    }

    /// Set `normalized_filename`.
    pub fn with_normalized_filename(mut self, value: impl Into<String>) -> Self {
        self.normalized_filename = value.into();
        self
    }

    /// Set `internal_url`.
    pub fn with_internal_url(mut self, value: impl Into<String>) -> Self {
        self.internal_url = value.into();
        self
    }

    /// Enable or disable source map generation.
    pub fn with_sourcemap(mut self, value: bool) -> Self {
        self.sourcemap = value;
        self
    }

    /// Set the scoped-style selector strategy.
    pub fn with_scoped_style_strategy(mut self, value: ScopedStyleStrategy) -> Self {
        self.scoped_style_strategy = value;
        self
    }

    /// Enable or disable compact output.
    pub fn with_compact(mut self, value: bool) -> Self {
        self.compact = value;
        self
    }

    /// Set `annotate_source_file`.
    pub fn with_annotate_source_file(mut self, value: bool) -> Self {
        self.annotate_source_file = value;
        self
    }

    /// Set the module resolver callback.
    pub fn with_resolve_path(mut self, resolver: impl ResolvePath + 'static) -> Self {
        self.resolve_path = Box::new(resolver);
        self
    }

    /// Supply preprocessed style replacements, positional by source order.
    pub fn with_preprocessed_styles(mut self, styles: Vec<Option<String>>) -> Self {
        self.preprocessed_styles = styles;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_strategy_names() {
        assert_eq!("where".parse::<ScopedStyleStrategy>().unwrap(), ScopedStyleStrategy::Where);
        assert_eq!("class".parse::<ScopedStyleStrategy>().unwrap(), ScopedStyleStrategy::Class);
        assert_eq!("attribute".parse::<ScopedStyleStrategy>().unwrap(), ScopedStyleStrategy::Attribute);
    }

    #[test]
    fn rejects_unknown_strategy_name() {
        assert!("bogus".parse::<ScopedStyleStrategy>().is_err());
    }
}

/// Options controlling [`crate::handler::parse`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// The component's filename, used only for diagnostic locations.
    pub filename: String,
}

/// Options controlling [`crate::handler::preprocess_styles`].
pub struct PreprocessOptions {
    /// The component's filename, used only for diagnostic locations.
    pub filename: String,
    /// The preprocessor callback invoked once per `<style>` block found.
    pub preprocessor: Box<dyn PreprocessStyle>,
}

impl fmt::Debug for PreprocessOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreprocessOptions")
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// Options controlling [`crate::handler::convert_to_tsx`].
#[derive(Debug, Clone, Default)]
pub struct ConvertToTsxOptions {
    /// The component's filename, used for diagnostic locations and as the
    /// generated component's display name.
    pub filename: String,
}

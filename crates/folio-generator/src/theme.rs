//! Theme token resolution.
//!
//! The renderer never reads colours from ambient state. It asks a
//! [`ThemeTokens`] accessor supplied by the caller.

use std::collections::BTreeMap;

use folio_core::config::ThemeConfig;

/// Name of the accent colour token.
pub const PRIMARY: &str = "primary";

/// Resolves named design tokens (e.g. `"primary"`) to colour values.
pub trait ThemeTokens: Sync {
    /// Resolve a token, or `None` if it is unknown.
    fn resolve(&self, name: &str) -> Option<String>;
}

impl<F> ThemeTokens for F
where
    F: Fn(&str) -> Option<String> + Sync,
{
    fn resolve(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Resolves every token to a CSS custom property reference, leaving the
/// actual value to the stylesheet.
#[derive(Debug, Clone, Default)]
pub struct CssVariables {
    prefix: String,
}

impl CssVariables {
    /// Use `--ifm-color-{name}` variables.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix("ifm-color")
    }

    /// Use `--{prefix}-{name}` variables.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ThemeTokens for CssVariables {
    fn resolve(&self, name: &str) -> Option<String> {
        Some(format!("var(--{}-{name})", self.prefix))
    }
}

/// Explicit name → value palette, optionally falling back to another accessor.
pub struct Palette {
    colors: BTreeMap<String, String>,
    fallback: Option<Box<dyn ThemeTokens + Send>>,
}

impl Palette {
    /// Create a palette from explicit colours.
    #[must_use]
    pub fn new(colors: BTreeMap<String, String>) -> Self {
        Self {
            colors,
            fallback: None,
        }
    }

    /// Build the palette configured under `[theme.palette]`.
    #[must_use]
    pub fn from_config(theme: &ThemeConfig) -> Self {
        Self::new(theme.palette.clone())
    }

    /// The site theme: the configured palette over `--ifm-color-*` variables.
    #[must_use]
    pub fn site(theme: &ThemeConfig) -> Self {
        Self::from_config(theme).with_fallback(CssVariables::new())
    }

    /// Consult `fallback` for tokens missing from this palette.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl ThemeTokens + Send + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("colors", &self.colors)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl ThemeTokens for Palette {
    fn resolve(&self, name: &str) -> Option<String> {
        self.colors
            .get(name)
            .cloned()
            .or_else(|| self.fallback.as_ref().and_then(|f| f.resolve(name)))
    }
}

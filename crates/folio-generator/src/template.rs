//! HTML template system for page generation.
//!
//! Templates are plain strings with `{{ name }}` placeholders; `{{ name? }}`
//! renders as empty when the variable is absent. Values are inserted verbatim,
//! so callers escape text before putting it in a context.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Template context with variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with initial variables.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a variable only when a value is present.
    #[must_use]
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A named template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    ///
    /// Substituted values are never rescanned for placeholders.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut out = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                TemplateError::InvalidSyntax(format!("unclosed {{{{ in template '{}'", self.name))
            })?;

            let var_name = after[..end].trim();
            let (var_name, optional) = match var_name.strip_suffix('?') {
                Some(stripped) => (stripped.trim_end(), true),
                None => (var_name, false),
            };

            match context.get(var_name) {
                Some(v) => out.push_str(v),
                None if optional => {}
                None => return Err(TemplateError::MissingVariable(var_name.to_string())),
            }

            rest = &after[end + 2..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new registry with default templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register(Template::new("base", DEFAULT_BASE_TEMPLATE));
        registry.register(Template::new("page", DEFAULT_PAGE_TEMPLATE));
        registry
    }

    /// Register a template, replacing any template with the same name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Default document shell.
pub const DEFAULT_BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}"{{ color_scheme_attr? }}>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}{{ site_title_suffix? }}</title>
    <meta name="description" content="{{ description }}">
    <link rel="canonical" href="{{ canonical_url }}">
    {{ favicon? }}
    {{ analytics? }}
    <style>
        :root {
            --ifm-color-primary: {{ primary_color }};
            --folio-bg: #ffffff;
            --folio-text: #1c1e21;
            --folio-footer-bg: #303846;
            --folio-footer-text: #ebedf0;
        }
        @media (prefers-color-scheme: dark) {
            :root[data-follow-scheme] {
                --folio-bg: #1b1b1d;
                --folio-text: #e3e3e3;
            }
        }
        body { margin: 0; background: var(--folio-bg); color: var(--folio-text); font-family: system-ui, -apple-system, sans-serif; line-height: 1.6; }
        a { color: var(--ifm-color-primary); }
        .navbar { display: flex; align-items: center; gap: 1rem; padding: 0.75rem 1.5rem; box-shadow: 0 1px 2px rgba(0, 0, 0, 0.1); }
        .navbar-brand { display: flex; align-items: center; gap: 0.5rem; font-weight: 700; color: inherit; text-decoration: none; }
        .navbar-brand img, .navbar-item img { height: 2rem; }
        .navbar-items { display: flex; gap: 1rem; }
        .navbar-items-right { margin-left: auto; }
        .navbar-item { color: inherit; text-decoration: none; font-weight: 500; }
        .terminal-main, .plain-main { max-width: 48rem; margin: 0 auto; padding: 2rem 1.5rem; }
        .terminal-main { font-family: ui-monospace, SFMono-Regular, Menlo, monospace; }
        .plain-main { font-size: 20px; }
        .terminal-section, .plain-section { margin-bottom: 2rem; }
        .terminal-section-title { font-weight: 700; }
        .terminal-list, .plain-list { list-style: none; padding: 0; }
        .terminal-list li, .plain-list li { display: flex; gap: 0.5rem; }
        .terminal-image, .plain-image { text-align: center; }
        .footer { padding: 2rem 1.5rem; }
        .footer-dark { background: var(--folio-footer-bg); color: var(--folio-footer-text); }
        .footer-dark a { color: var(--folio-footer-text); }
        .footer-groups { display: flex; gap: 4rem; justify-content: center; }
        .footer-group ul { list-style: none; padding: 0; }
        .footer-copyright { text-align: center; margin-top: 1rem; }
    </style>
</head>
<body>
    {{ navbar }}
    {{ content }}
    {{ footer? }}
</body>
</html>
"##;

/// Default main column.
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<main class="{{ variant }}-main">
{{ blocks }}
</main>"#;

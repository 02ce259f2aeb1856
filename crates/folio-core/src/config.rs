//! Site configuration management.
//!
//! The configuration is loaded once at startup and handed, read-only, to the
//! page collector, the HTML generator and the asset processor.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for Folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Navigation bar shown on every page.
    #[serde(default)]
    pub navbar: NavbarConfig,

    /// Footer link groups and copyright line.
    #[serde(default)]
    pub footer: FooterConfig,

    /// Theme palette.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Analytics snippet settings.
    #[serde(default)]
    pub analytics: Option<AnalyticsConfig>,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Path prefix the site is served under (e.g., "/blog"). Empty for the root.
    #[serde(default)]
    pub base_path: String,

    /// Favicon path relative to the static directory.
    #[serde(default)]
    pub favicon: Option<String>,

    /// Document language code.
    #[serde(default = "default_language")]
    pub language: String,
}

/// An image used as a logo in the navbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logo {
    /// Image path relative to the static directory.
    pub src: String,

    /// Alternative text.
    #[serde(default)]
    pub alt: String,
}

/// Navbar configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavbarConfig {
    /// Brand text shown at the start of the navbar. Falls back to the site title.
    #[serde(default)]
    pub title: Option<String>,

    /// Brand logo.
    #[serde(default)]
    pub logo: Option<Logo>,

    /// Navigation entries in display order.
    #[serde(default)]
    pub items: Vec<NavItem>,
}

/// Side of the navbar an item is placed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavPosition {
    #[default]
    Left,
    Right,
}

/// Where a navigation or footer entry points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// Route inside the site, prefixed with the base path when rendered.
    Internal(&'a str),
    /// Absolute external URL, rendered as-is.
    External(&'a str),
}

/// A single navbar entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavItem {
    /// Visible label. Items may be logo-only.
    #[serde(default)]
    pub label: Option<String>,

    /// Internal route.
    #[serde(default)]
    pub to: Option<String>,

    /// External URL.
    #[serde(default)]
    pub href: Option<String>,

    /// Which side of the navbar the item sits on.
    #[serde(default)]
    pub position: NavPosition,

    /// Optional icon shown instead of or next to the label.
    #[serde(default)]
    pub logo: Option<Logo>,
}

impl NavItem {
    /// Resolve the item's target. Returns `None` unless exactly one of `to`/`href` is set.
    pub fn target(&self) -> Option<LinkTarget<'_>> {
        resolve_target(self.to.as_deref(), self.href.as_deref())
    }
}

/// Footer colour style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterStyle {
    #[default]
    Dark,
    Light,
}

impl FooterStyle {
    /// CSS class suffix for this style.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// Footer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FooterConfig {
    /// Colour style.
    #[serde(default)]
    pub style: FooterStyle,

    /// Link columns in display order.
    #[serde(default)]
    pub groups: Vec<FooterGroup>,

    /// Copyright line. `{year}` is replaced with the build year.
    #[serde(default)]
    pub copyright: Option<String>,
}

/// A titled column of footer links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterGroup {
    /// Column heading.
    pub title: String,

    /// Links in display order.
    #[serde(default)]
    pub items: Vec<FooterLink>,
}

/// A single footer link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterLink {
    /// Visible label.
    pub label: String,

    /// Internal route.
    #[serde(default)]
    pub to: Option<String>,

    /// External URL.
    #[serde(default)]
    pub href: Option<String>,
}

impl FooterLink {
    /// Resolve the link's target. Returns `None` unless exactly one of `to`/`href` is set.
    pub fn target(&self) -> Option<LinkTarget<'_>> {
        resolve_target(self.to.as_deref(), self.href.as_deref())
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Named colour tokens (e.g. `primary = "#2e8555"`).
    #[serde(default)]
    pub palette: BTreeMap<String, String>,

    /// Follow the visitor's light/dark preference.
    #[serde(default = "default_true")]
    pub respect_prefers_color_scheme: bool,
}

/// Analytics configuration (Google tag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Measurement ID, e.g. `G-XXXXXXX`.
    pub tracking_id: String,

    /// Ask the tag to anonymize visitor IPs.
    #[serde(default = "default_true")]
    pub anonymize_ip: bool,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory holding page definition files.
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Directory of static files copied verbatim into the output.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Whether to fingerprint static assets for cache busting.
    #[serde(default)]
    pub fingerprint: bool,
}

// Default value functions
fn default_language() -> String {
    "en".to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            palette: BTreeMap::new(),
            respect_prefers_color_scheme: true,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            pages_dir: default_pages_dir(),
            static_dir: default_static_dir(),
            fingerprint: false,
        }
    }
}

fn resolve_target<'a>(to: Option<&'a str>, href: Option<&'a str>) -> Option<LinkTarget<'a>> {
    match (to, href) {
        (Some(to), None) => Some(LinkTarget::Internal(to)),
        (None, Some(href)) => Some(LinkTarget::External(href)),
        _ => None,
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration layered with `FOLIO__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.trim().is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.trim().is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        for (i, item) in self.navbar.items.iter().enumerate() {
            if item.target().is_none() {
                return Err(CoreError::config(format!(
                    "navbar.items[{i}] must set exactly one of `to` or `href`"
                )));
            }
            if item.label.is_none() && item.logo.is_none() {
                return Err(CoreError::config(format!(
                    "navbar.items[{i}] needs a label or a logo"
                )));
            }
        }

        for group in &self.footer.groups {
            for link in &group.items {
                if link.target().is_none() {
                    return Err(CoreError::config(format!(
                        "footer link '{}' in group '{}' must set exactly one of `to` or `href`",
                        link.label, group.title
                    )));
                }
            }
        }

        if let Some(analytics) = &self.analytics
            && analytics.tracking_id.trim().is_empty()
        {
            return Err(CoreError::config("analytics.tracking_id cannot be empty"));
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        format!("{base}{}", self.path_for(path))
    }

    /// Get the served path for a site route, including the base path.
    pub fn path_for(&self, route: &str) -> String {
        let prefix = self.site.base_path.trim_matches('/');
        let route = route.trim_start_matches('/');
        match (prefix.is_empty(), route.is_empty()) {
            (true, _) => format!("/{route}"),
            (false, true) => format!("/{prefix}/"),
            (false, false) => format!("/{prefix}/{route}"),
        }
    }

    /// Brand text for the navbar.
    pub fn navbar_title(&self) -> &str {
        self.navbar.title.as_deref().unwrap_or(&self.site.title)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn create_test_config() -> String {
        r##"
[site]
title = "mrpbennett.dev"
base_url = "https://mrpbennett.dev"
favicon = "img/favicon.ico"

[navbar]
title = "mrpbennett.dev"
logo = { src = "img/logo.svg", alt = "My Site Logo" }

[[navbar.items]]
to = "/"
label = "Posts"

[[navbar.items]]
to = "/about"
label = "About"

[[navbar.items]]
href = "https://github.com/mrpbennett"
position = "right"
logo = { src = "img/logo.svg", alt = "GitHub Logo" }

[footer]
style = "dark"
copyright = "Copyright © {year} mrpbennett.dev."

[[footer.groups]]
title = "Connect"
items = [{ label = "GitHub", href = "https://github.com/mrpbennett" }]

[theme.palette]
primary = "#2e8555"

[analytics]
tracking_id = "G-SX53WB34GC"

[build]
output_dir = "dist"
fingerprint = true
"##
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("folio.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.title, "mrpbennett.dev");
        assert_eq!(config.navbar.items.len(), 3);
        assert_eq!(
            config.navbar.items[0].target(),
            Some(LinkTarget::Internal("/"))
        );
        assert_eq!(config.navbar.items[2].position, NavPosition::Right);
        assert_eq!(
            config.navbar.items[2].target(),
            Some(LinkTarget::External("https://github.com/mrpbennett"))
        );
        assert_eq!(config.footer.style, FooterStyle::Dark);
        assert_eq!(config.footer.groups[0].items[0].label, "GitHub");
        assert_eq!(
            config.theme.palette.get("primary").map(String::as_str),
            Some("#2e8555")
        );
        let analytics = config.analytics.expect("analytics configured");
        assert_eq!(analytics.tracking_id, "G-SX53WB34GC");
        assert!(analytics.anonymize_ip);
        assert_eq!(config.build.output_dir, "dist");
        assert!(config.build.fingerprint);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_toml(
            r#"
[site]
title = "Minimal Site"
base_url = "https://example.com"
"#,
        )
        .expect("parse config");

        assert_eq!(config.site.language, "en");
        assert_eq!(config.site.base_path, "");
        assert!(config.navbar.items.is_empty());
        assert!(config.footer.groups.is_empty());
        assert!(config.theme.respect_prefers_color_scheme);
        assert!(config.analytics.is_none());
        assert_eq!(config.build.output_dir, "public");
        assert_eq!(config.build.pages_dir, "pages");
        assert_eq!(config.build.static_dir, "static");
        assert!(!config.build.fingerprint);
        assert_eq!(config.navbar_title(), "Minimal Site");
    }

    #[test]
    fn test_url_for() {
        let mut config = Config::from_toml(
            r#"
[site]
title = "Test"
base_url = "https://example.com"
"#,
        )
        .expect("parse config");

        assert_eq!(config.url_for("/about"), "https://example.com/about");
        assert_eq!(config.url_for("about"), "https://example.com/about");
        assert_eq!(config.url_for("/"), "https://example.com/");

        config.site.base_path = "/blog/".to_string();
        assert_eq!(config.path_for("/about"), "/blog/about");
        assert_eq!(config.path_for("/"), "/blog/");
        assert_eq!(config.url_for("/about"), "https://example.com/blog/about");
    }

    #[test]
    fn test_config_validation_empty_title() {
        let result = Config::from_toml(
            r#"
[site]
title = ""
base_url = "https://example.com"
"#,
        );
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("title cannot be empty")
        );
    }

    #[test]
    fn test_config_validation_nav_target() {
        let result = Config::from_toml(
            r#"
[site]
title = "Test"
base_url = "https://example.com"

[[navbar.items]]
label = "Both"
to = "/"
href = "https://example.com"
"#,
        );
        let err = result.expect_err("ambiguous target should fail");
        assert!(err.to_string().contains("navbar.items[0]"));
    }

    #[test]
    fn test_config_validation_footer_target() {
        let result = Config::from_toml(
            r#"
[site]
title = "Test"
base_url = "https://example.com"

[[footer.groups]]
title = "Blog"
items = [{ label = "Nowhere" }]
"#,
        );
        let err = result.expect_err("missing target should fail");
        assert!(err.to_string().contains("Nowhere"));
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/folio.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}

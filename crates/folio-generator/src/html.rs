//! HTML generation from document trees.
//!
//! Serializes a [`DocumentTree`] into a full HTML document wrapped in the site
//! chrome (navbar, footer, analytics) described by the configuration.

use std::{
    fmt::Write,
    path::{Path, PathBuf},
};

use chrono::{Datelike, Utc};
use folio_core::{
    Config,
    config::{LinkTarget, Logo, NavPosition},
};
use thiserror::Error;
use tracing::debug;

use crate::{
    assets::AssetResolver,
    document::{Block, DocumentTree, LinkNode, ParagraphNode, Span, ToolItem},
    template::{TemplateContext, TemplateError, TemplateRegistry},
    theme::{PRIMARY, Palette, ThemeTokens},
};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Stylesheet value for `--ifm-color-primary` when the theme has no concrete colour.
const FALLBACK_PRIMARY: &str = "#2e8555";

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: TemplateRegistry,
    config: Config,
    theme: Palette,
    year: i32,
}

impl HtmlGenerator {
    /// Create a new HTML generator with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            templates: TemplateRegistry::new(),
            theme: Palette::site(&config.theme),
            config,
            year: Utc::now().year(),
        }
    }

    /// Pin the year used in the copyright line.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Generate the full HTML document for a rendered page served at `route`.
    pub fn generate(
        &self,
        doc: &DocumentTree,
        route: &str,
        assets: &dyn AssetResolver,
    ) -> Result<String> {
        debug!(route, title = %doc.title, "generating HTML");

        let page_ctx = TemplateContext::new()
            .with_var("variant", doc.variant.class_prefix())
            .with_var("blocks", self.blocks_html(doc, assets));
        let content = self.templates.render("page", &page_ctx)?;

        let site = &self.config.site;
        let ctx = TemplateContext::new()
            .with_var("lang", escape_html(&site.language))
            .with_var("title", escape_html(&doc.title))
            .with_var(
                "site_title_suffix",
                format!(" | {}", escape_html(&site.title)),
            )
            .with_var("description", escape_html(&doc.description))
            .with_var("canonical_url", escape_html(&self.config.url_for(route)))
            .with_var("primary_color", escape_html(&self.primary_color()))
            .with_opt(
                "color_scheme_attr",
                self.config
                    .theme
                    .respect_prefers_color_scheme
                    .then_some(" data-follow-scheme"),
            )
            .with_opt(
                "favicon",
                site.favicon.as_deref().map(|f| {
                    format!(
                        r#"<link rel="icon" href="{}">"#,
                        escape_html(&assets.resolve(f))
                    )
                }),
            )
            .with_opt("analytics", self.analytics_html())
            .with_var("navbar", self.navbar_html(assets))
            .with_var("content", content)
            .with_opt("footer", self.footer_html());

        Ok(self.templates.render("base", &ctx)?)
    }

    /// Get the output path for a route.
    #[must_use]
    pub fn output_path(&self, route: &str, output_dir: &Path) -> PathBuf {
        let relative = route.trim_matches('/');

        if relative.is_empty() {
            output_dir.join("index.html")
        } else {
            output_dir.join(relative).join("index.html")
        }
    }

    /// Concrete value for the stylesheet's primary colour variable.
    ///
    /// The site theme falls back to `var(--ifm-color-primary)`, which cannot
    /// define itself, so variable references give way to the default colour.
    fn primary_color(&self) -> String {
        self.theme
            .resolve(PRIMARY)
            .filter(|c| !c.trim_start().starts_with("var("))
            .unwrap_or_else(|| FALLBACK_PRIMARY.to_string())
    }

    /// Serialize the document's blocks.
    fn blocks_html(&self, doc: &DocumentTree, assets: &dyn AssetResolver) -> String {
        let prefix = doc.variant.class_prefix();
        let accent = doc
            .accent
            .as_deref()
            .map(|c| format!(r#" style="color: {}""#, escape_html(c)))
            .unwrap_or_default();

        let mut out = String::new();
        for block in &doc.blocks {
            match block {
                Block::Prompt { text } => {
                    let _ = writeln!(
                        out,
                        r#"<p class="{prefix}-prompt"{accent}>{}</p>"#,
                        escape_html(text)
                    );
                }
                Block::Section { title, paragraphs } => {
                    let _ = writeln!(out, r#"<div class="{prefix}-section">"#);
                    if let Some(title) = title {
                        let _ = writeln!(
                            out,
                            r#"<p class="{prefix}-section-title"{accent}>{}</p>"#,
                            escape_html(title)
                        );
                    }
                    for paragraph in paragraphs {
                        let _ = writeln!(out, "<p>{}</p>", self.paragraph_html(paragraph));
                    }
                    out.push_str("</div>\n");
                }
                Block::ToolList { title, items } => {
                    let items: Vec<_> = items
                        .iter()
                        .map(|item| bullet(prefix, &accent, &self.tool_item_html(item)))
                        .collect();
                    out.push_str(&list_html(prefix, &accent, title.as_deref(), &items));
                }
                Block::LinkList { title, items } => {
                    let items: Vec<_> = items
                        .iter()
                        .map(|link| bullet(prefix, &accent, &self.link_html(link)))
                        .collect();
                    out.push_str(&list_html(prefix, &accent, title.as_deref(), &items));
                }
                Block::Image { src, alt } => {
                    let _ = writeln!(
                        out,
                        r#"<div class="{prefix}-image"><img src="{}" alt="{}"></div>"#,
                        escape_html(&assets.resolve(src)),
                        escape_html(alt)
                    );
                }
            }
        }
        out
    }

    fn navbar_html(&self, assets: &dyn AssetResolver) -> String {
        let navbar = &self.config.navbar;

        let logo = navbar
            .logo
            .as_ref()
            .map(|l| logo_html(l, assets))
            .unwrap_or_default();
        let brand = format!(
            r#"<a class="navbar-brand" href="{}">{logo}<b>{}</b></a>"#,
            escape_html(&self.config.path_for("/")),
            escape_html(self.config.navbar_title())
        );

        let items_for = |position: NavPosition| {
            navbar
                .items
                .iter()
                .filter(|item| item.position == position)
                .filter_map(|item| {
                    let (href, external) = self.target_href(item.target()?);
                    let mut inner = item
                        .logo
                        .as_ref()
                        .map(|l| logo_html(l, assets))
                        .unwrap_or_default();
                    if let Some(label) = &item.label {
                        inner.push_str(&escape_html(label));
                    }
                    Some(format!(
                        r#"<a class="navbar-item" href="{}"{}>{inner}</a>"#,
                        escape_html(&href),
                        external_attrs(external)
                    ))
                })
                .collect::<Vec<_>>()
                .join("")
        };

        format!(
            r#"<nav class="navbar">{brand}<div class="navbar-items">{}</div><div class="navbar-items navbar-items-right">{}</div></nav>"#,
            items_for(NavPosition::Left),
            items_for(NavPosition::Right)
        )
    }

    fn footer_html(&self) -> Option<String> {
        let footer = &self.config.footer;
        if footer.groups.is_empty() && footer.copyright.is_none() {
            return None;
        }

        let groups: String = footer
            .groups
            .iter()
            .map(|group| {
                let links: String = group
                    .items
                    .iter()
                    .filter_map(|link| {
                        let (href, external) = self.target_href(link.target()?);
                        Some(format!(
                            r#"<li><a href="{}"{}>{}</a></li>"#,
                            escape_html(&href),
                            external_attrs(external),
                            escape_html(&link.label)
                        ))
                    })
                    .collect();
                format!(
                    r#"<div class="footer-group"><div class="footer-title">{}</div><ul>{links}</ul></div>"#,
                    escape_html(&group.title)
                )
            })
            .collect();

        let copyright = footer
            .copyright
            .as_deref()
            .map(|c| {
                format!(
                    r#"<div class="footer-copyright">{}</div>"#,
                    escape_html(&c.replace("{year}", &self.year.to_string()))
                )
            })
            .unwrap_or_default();

        Some(format!(
            r#"<footer class="footer footer-{}"><div class="footer-groups">{groups}</div>{copyright}</footer>"#,
            footer.style.as_str()
        ))
    }

    fn analytics_html(&self) -> Option<String> {
        let analytics = self.config.analytics.as_ref()?;
        let id = escape_html(&analytics.tracking_id);
        let options = if analytics.anonymize_ip {
            ", { 'anonymize_ip': true }"
        } else {
            ""
        };
        Some(format!(
            r#"<script async src="https://www.googletagmanager.com/gtag/js?id={id}"></script>
    <script>window.dataLayer=window.dataLayer||[];function gtag(){{dataLayer.push(arguments);}}gtag('js',new Date());gtag('config','{id}'{options});</script>"#
        ))
    }

    fn target_href(&self, target: LinkTarget<'_>) -> (String, bool) {
        match target {
            LinkTarget::Internal(route) => (self.config.path_for(route), false),
            LinkTarget::External(url) => (url.to_string(), true),
        }
    }

    /// Href for a link inside page content. Root-relative paths are served
    /// under the base path; anything else is written as authored.
    fn content_href(&self, url: &str) -> String {
        if url.starts_with('/') && !url.starts_with("//") {
            self.config.path_for(url)
        } else {
            url.to_string()
        }
    }

    fn paragraph_html(&self, paragraph: &ParagraphNode) -> String {
        paragraph
            .spans
            .iter()
            .map(|span| match span {
                Span::Text(text) => escape_html(text),
                Span::Link(link) => self.link_html(link),
                Span::Code(code) => format!("<code>{}</code>", escape_html(code)),
            })
            .collect()
    }

    /// `<strong>Label</strong>: link, link note`
    fn tool_item_html(&self, item: &ToolItem) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !item.links.is_empty() {
            parts.push(
                item.links
                    .iter()
                    .map(|link| self.link_html(link))
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        if let Some(note) = &item.note {
            parts.push(escape_html(note));
        }

        let mut html = format!("<strong>{}</strong>", escape_html(&item.label));
        if !parts.is_empty() {
            html.push_str(": ");
            html.push_str(&parts.join(" "));
        }
        format!("<span>{html}</span>")
    }

    fn link_html(&self, link: &LinkNode) -> String {
        format!(
            r#"<a href="{}">{}</a>"#,
            escape_html(&self.content_href(&link.url)),
            escape_html(&link.text)
        )
    }
}

fn bullet(prefix: &str, accent: &str, inner: &str) -> String {
    format!(r#"<li><span class="{prefix}-bullet"{accent}>▸</span>{inner}</li>"#)
}

fn list_html(prefix: &str, accent: &str, title: Option<&str>, items: &[String]) -> String {
    let title = title
        .map(|t| {
            format!(
                r#"<p class="{prefix}-section-title"{accent}>{}</p>"#,
                escape_html(t)
            )
        })
        .unwrap_or_default();
    format!(
        "<div class=\"{prefix}-section\">{title}<ul class=\"{prefix}-list\">{}</ul></div>\n",
        items.join("")
    )
}

fn logo_html(logo: &Logo, assets: &dyn AssetResolver) -> String {
    format!(
        r#"<img src="{}" alt="{}">"#,
        escape_html(&assets.resolve(&logo.src)),
        escape_html(&logo.alt)
    )
}

fn external_attrs(external: bool) -> &'static str {
    if external {
        r#" target="_blank" rel="noopener noreferrer""#
    } else {
        ""
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use folio_core::{
        AssetRef, ContentSection, LinkEntry, PageModel, PageVariant, Paragraph, ToolEntry,
    };

    use super::*;
    use crate::{assets::AssetManifest, render::render_page, theme::CssVariables};

    fn test_config() -> Config {
        Config::from_toml(
            r##"
[site]
title = "mrpbennett.dev"
base_url = "https://mrpbennett.dev"
favicon = "img/favicon.ico"

[navbar]
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
copyright = "Copyright © {year} mrpbennett.dev."

[[footer.groups]]
title = "Blog"
items = [{ label = "All Posts", to = "/" }]

[[footer.groups]]
title = "Connect"
items = [{ label = "GitHub", href = "https://github.com/mrpbennett" }]

[theme.palette]
primary = "#25c2a0"

[analytics]
tracking_id = "G-SX53WB34GC"
"##,
        )
        .unwrap()
    }

    fn render(page: &PageModel, route: &str) -> String {
        let generator = HtmlGenerator::new(test_config()).with_year(2025);
        let doc = render_page(page, &CssVariables::new()).unwrap();
        generator
            .generate(&doc, route, &AssetManifest::new())
            .unwrap()
    }

    fn about() -> PageModel {
        PageModel::builder("About", "About Paul Bennett")
            .prompt_line("mrpbennett@homelab:~/about $ cat README.md")
            .section(ContentSection::new(["Line A", "Line B"]))
            .tools_title("$ ls ~/tools")
            .tool(
                ToolEntry::new("Editor")
                    .link("LazyVim", "https://lazyvim.org")
                    .link("DataGrip", "https://www.jetbrains.com/datagrip/"),
            )
            .tool(
                ToolEntry::new("Keyboard")
                    .link("ZSA Voyager", "https://www.zsa.io/voyager")
                    .note("with ambient switches"),
            )
            .tool(ToolEntry::new("OS").note("MacOS"))
            .link(LinkEntry::new("GitHub", "https://github.com/x"))
            .footer_image(AssetRef::new("img/gopher.gif", "Dancing Gopher"))
            .build()
    }

    #[test]
    fn test_generate_document_shell() {
        let html = render(&about(), "/about");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>About | mrpbennett.dev</title>"));
        assert!(html.contains(r#"<meta name="description" content="About Paul Bennett">"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://mrpbennett.dev/about">"#));
        assert!(html.contains("--ifm-color-primary: #25c2a0;"));
        assert!(html.contains(r#"<link rel="icon" href="/img/favicon.ico">"#));
        assert!(html.contains(r#"<main class="terminal-main">"#));
    }

    #[test]
    fn test_tool_items_markup() {
        let html = render(&about(), "/about");

        assert!(html.contains(
            r#"<strong>Editor</strong>: <a href="https://lazyvim.org">LazyVim</a>, <a href="https://www.jetbrains.com/datagrip/">DataGrip</a>"#
        ));
        assert!(html.contains(
            r#"<strong>Keyboard</strong>: <a href="https://www.zsa.io/voyager">ZSA Voyager</a> with ambient switches"#
        ));
        assert!(html.contains("<strong>OS</strong>: MacOS"));
        assert!(html.contains(r#"<p class="terminal-section-title" style="color: var(--ifm-color-primary)">$ ls ~/tools</p>"#));
        assert!(html.contains(r#"<img src="/img/gopher.gif" alt="Dancing Gopher">"#));
    }

    #[test]
    fn test_navbar_and_footer() {
        let html = render(&about(), "/about");

        assert!(html.contains(r#"<a class="navbar-item" href="/about">About</a>"#));
        assert!(html.contains(
            r#"<a class="navbar-item" href="https://github.com/mrpbennett" target="_blank" rel="noopener noreferrer"><img src="/img/logo.svg" alt="GitHub Logo"></a>"#
        ));
        assert!(html.contains(r#"<div class="footer-title">Connect</div>"#));
        assert!(html.contains(r#"<li><a href="/">All Posts</a></li>"#));
        assert!(html.contains("Copyright © 2025 mrpbennett.dev."));
    }

    #[test]
    fn test_analytics_snippet() {
        let html = render(&about(), "/about");
        assert!(html.contains("googletagmanager.com/gtag/js?id=G-SX53WB34GC"));
        assert!(html.contains("'anonymize_ip': true"));

        let mut config = test_config();
        config.analytics = None;
        let generator = HtmlGenerator::new(config);
        let doc = render_page(&about(), &CssVariables::new()).unwrap();
        let html = generator
            .generate(&doc, "/about", &AssetManifest::new())
            .unwrap();
        assert!(!html.contains("gtag"));
    }

    #[test]
    fn test_text_is_escaped() {
        let page = PageModel::builder("Tom & Jerry", "a \"quoted\" <description>")
            .section(ContentSection::new(["<script>alert(1)</script>"]))
            .variant(PageVariant::Plain)
            .build();
        let html = render(&page, "/tj");

        assert!(html.contains("<title>Tom &amp; Jerry | mrpbennett.dev</title>"));
        assert!(html.contains("a &quot;quoted&quot; &lt;description&gt;"));
        assert!(html.contains("<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"));
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains(r#"<main class="plain-main">"#));
    }

    #[test]
    fn test_base_path_prefixes_links() {
        let mut config = test_config();
        config.site.base_path = "/blog".to_string();
        let generator = HtmlGenerator::new(config);
        let doc = render_page(&about(), &CssVariables::new()).unwrap();
        let html = generator
            .generate(
                &doc,
                "/about",
                &AssetManifest::new().with_base_path("/blog"),
            )
            .unwrap();

        assert!(html.contains(r#"href="/blog/about""#));
        assert!(html.contains(r#"<link rel="canonical" href="https://mrpbennett.dev/blog/about">"#));
        assert!(html.contains(r#"<img src="/blog/img/gopher.gif""#));
    }

    #[test]
    fn test_base_path_prefixes_content_links() {
        let mut config = test_config();
        config.site.base_path = "/blog".to_string();
        let generator = HtmlGenerator::new(config);
        let page = PageModel::builder("Links", "Links page")
            .section(ContentSection::new([Paragraph::text("See ")
                .then_link("tags", "/tags")
                .then_text(" or ")
                .then_link("elsewhere", "https://example.com/tags")]))
            .link(LinkEntry::new("Posts", "/posts"))
            .link(LinkEntry::new("Protocol relative", "//cdn.example.com/x"))
            .link(LinkEntry::new("Anchor", "#top"))
            .build();
        let doc = render_page(&page, &CssVariables::new()).unwrap();
        let html = generator
            .generate(&doc, "/links", &AssetManifest::new())
            .unwrap();

        assert!(html.contains(r#"<a href="/blog/tags">tags</a>"#));
        assert!(html.contains(r#"<a href="https://example.com/tags">elsewhere</a>"#));
        assert!(html.contains(r#"<a href="/blog/posts">Posts</a>"#));
        assert!(html.contains(r#"<a href="//cdn.example.com/x">Protocol relative</a>"#));
        assert!(html.contains(r##"<a href="#top">Anchor</a>"##));
    }

    #[test]
    fn test_primary_color_from_theme() {
        let html = render(&about(), "/about");
        assert!(html.contains("--ifm-color-primary: #25c2a0;"));

        let mut config = test_config();
        config.theme.palette.clear();
        let generator = HtmlGenerator::new(config);
        let doc = render_page(&about(), &CssVariables::new()).unwrap();
        let html = generator
            .generate(&doc, "/about", &AssetManifest::new())
            .unwrap();
        assert!(html.contains("--ifm-color-primary: #2e8555;"));
        assert!(!html.contains("--ifm-color-primary: var("));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_html(r#""it's""#), "&quot;it&#x27;s&quot;");
    }

    #[test]
    fn test_output_path() {
        let generator = HtmlGenerator::new(test_config());
        let output_dir = Path::new("public");

        assert_eq!(
            generator.output_path("/about", output_dir),
            PathBuf::from("public/about/index.html")
        );
        assert_eq!(
            generator.output_path("/", output_dir),
            PathBuf::from("public/index.html")
        );
    }
}

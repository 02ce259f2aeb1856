//! Page content model.
//!
//! A [`PageModel`] describes one page's content independent of markup: an
//! optional prompt line, ordered prose sections, a tool list, a link list and
//! an optional trailing image. Models are immutable values authored as page
//! definition files or assembled with [`PageModel::builder`].

use serde::{Deserialize, Serialize};

/// A fragment of paragraph text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inline {
    /// Plain text.
    Text(String),
    /// Hyperlink embedded in the paragraph.
    Link { text: String, url: String },
    /// Inline code span.
    Code(String),
}

/// A paragraph made of inline fragments, rendered in order.
///
/// In page files a paragraph is either a plain string or a list of fragments:
///
/// ```toml
/// paragraphs = [
///     "Husband, doggo dad.",
///     [{ text = "See my " }, { link = { text = "TIL repo", url = "https://github.com/x" } }],
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ParagraphRepr", into = "ParagraphRepr")]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ParagraphRepr {
    Plain(String),
    Rich(Vec<Inline>),
}

impl From<ParagraphRepr> for Paragraph {
    fn from(repr: ParagraphRepr) -> Self {
        match repr {
            ParagraphRepr::Plain(text) => Self::text(text),
            ParagraphRepr::Rich(inlines) => Self { inlines },
        }
    }
}

impl From<Paragraph> for ParagraphRepr {
    fn from(paragraph: Paragraph) -> Self {
        match paragraph.inlines.as_slice() {
            [Inline::Text(text)] => Self::Plain(text.clone()),
            _ => Self::Rich(paragraph.inlines),
        }
    }
}

impl Paragraph {
    /// A paragraph of plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            inlines: vec![Inline::Text(text.into())],
        }
    }

    /// Append plain text.
    #[must_use]
    pub fn then_text(mut self, text: impl Into<String>) -> Self {
        self.inlines.push(Inline::Text(text.into()));
        self
    }

    /// Append a link.
    #[must_use]
    pub fn then_link(mut self, text: impl Into<String>, url: impl Into<String>) -> Self {
        self.inlines.push(Inline::Link {
            text: text.into(),
            url: url.into(),
        });
        self
    }

    /// Append an inline code span.
    #[must_use]
    pub fn then_code(mut self, code: impl Into<String>) -> Self {
        self.inlines.push(Inline::Code(code.into()));
        self
    }

    /// URLs of all inline links, in order.
    pub fn link_urls(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inlines.iter().filter_map(|inline| match inline {
            Inline::Link { text, url } => Some((text.as_str(), url.as_str())),
            _ => None,
        })
    }
}

impl From<&str> for Paragraph {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Paragraph {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

/// An ordered group of paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentSection {
    /// Heading line shown above the paragraphs (e.g. `$ cat README.md`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Paragraphs in display order.
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

impl ContentSection {
    /// Create a section from paragraphs.
    pub fn new<P: Into<Paragraph>>(paragraphs: impl IntoIterator<Item = P>) -> Self {
        Self {
            title: None,
            paragraphs: paragraphs.into_iter().map(Into::into).collect(),
        }
    }

    /// Set the section heading.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// One hyperlink of a tool entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolLink {
    pub text: String,
    pub url: String,
}

/// A "tool" bullet: a label, zero or more links and an optional note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolEntry {
    /// Category label (e.g. "Editor").
    pub label: String,

    /// Links in display order.
    #[serde(default)]
    pub links: Vec<ToolLink>,

    /// Free text shown after the links (e.g. "with ambient switches").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ToolEntry {
    /// Create a tool entry without links.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            links: Vec::new(),
            note: None,
        }
    }

    /// Append a link.
    #[must_use]
    pub fn link(mut self, text: impl Into<String>, url: impl Into<String>) -> Self {
        self.links.push(ToolLink {
            text: text.into(),
            url: url.into(),
        });
        self
    }

    /// Set the note.
    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// An entry of a simple link list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub label: String,
    pub url: String,
}

impl LinkEntry {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Logical reference to an image in the static directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Path relative to the static directory (e.g. `img/gopher.gif`).
    pub src: String,

    /// Alternative text.
    #[serde(default)]
    pub alt: String,
}

impl AssetRef {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

/// Presentation family for a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageVariant {
    /// Terminal-styled page with accent-coloured prompt and bullets.
    #[default]
    Terminal,
    /// Plain prose page.
    Plain,
}

impl PageVariant {
    /// CSS class prefix used for this variant's markup.
    pub fn class_prefix(&self) -> &'static str {
        match self {
            Self::Terminal => "terminal",
            Self::Plain => "plain",
        }
    }
}

/// Structured description of one page's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageModel {
    /// Document title.
    pub title: String,

    /// Meta description.
    pub description: String,

    /// Presentation family.
    #[serde(default)]
    pub variant: PageVariant,

    /// Line shown above the content (e.g. `user@host:~/about $ cat README.md`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_line: Option<String>,

    /// Prose sections in display order.
    #[serde(default)]
    pub sections: Vec<ContentSection>,

    /// Heading of the tool list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_title: Option<String>,

    /// Tool entries in display order.
    #[serde(default)]
    pub tools: Vec<ToolEntry>,

    /// Heading of the link list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links_title: Option<String>,

    /// Link entries in display order.
    #[serde(default)]
    pub links: Vec<LinkEntry>,

    /// Image shown at the end of the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_image: Option<AssetRef>,
}

impl PageModel {
    /// Start building a page with the required metadata.
    pub fn builder(title: impl Into<String>, description: impl Into<String>) -> PageModelBuilder {
        PageModelBuilder {
            page: Self {
                title: title.into(),
                description: description.into(),
                variant: PageVariant::default(),
                prompt_line: None,
                sections: Vec::new(),
                tools_title: None,
                tools: Vec::new(),
                links_title: None,
                links: Vec::new(),
                footer_image: None,
            },
        }
    }
}

/// Builder for [`PageModel`].
#[derive(Debug, Clone)]
pub struct PageModelBuilder {
    page: PageModel,
}

impl PageModelBuilder {
    #[must_use]
    pub fn variant(mut self, variant: PageVariant) -> Self {
        self.page.variant = variant;
        self
    }

    #[must_use]
    pub fn prompt_line(mut self, line: impl Into<String>) -> Self {
        self.page.prompt_line = Some(line.into());
        self
    }

    #[must_use]
    pub fn section(mut self, section: ContentSection) -> Self {
        self.page.sections.push(section);
        self
    }

    #[must_use]
    pub fn tools_title(mut self, title: impl Into<String>) -> Self {
        self.page.tools_title = Some(title.into());
        self
    }

    #[must_use]
    pub fn tool(mut self, tool: ToolEntry) -> Self {
        self.page.tools.push(tool);
        self
    }

    #[must_use]
    pub fn links_title(mut self, title: impl Into<String>) -> Self {
        self.page.links_title = Some(title.into());
        self
    }

    #[must_use]
    pub fn link(mut self, link: LinkEntry) -> Self {
        self.page.links.push(link);
        self
    }

    #[must_use]
    pub fn footer_image(mut self, image: AssetRef) -> Self {
        self.page.footer_image = Some(image);
        self
    }

    pub fn build(self) -> PageModel {
        self.page
    }
}

/// Check a link target.
///
/// Accepts absolute URIs (`scheme:...`), root-relative and relative paths,
/// and in-document anchors. Returns a description of the problem otherwise.
pub fn url_problem(url: &str) -> Option<&'static str> {
    if url.is_empty() {
        return Some("url is empty");
    }
    if url.chars().any(char::is_whitespace) {
        return Some("url contains whitespace");
    }
    if url.chars().any(char::is_control) {
        return Some("url contains control characters");
    }

    // A colon before any of `/?#` introduces a scheme.
    let head_end = url.find(['/', '?', '#']).unwrap_or(url.len());
    if let Some(colon) = url[..head_end].find(':') {
        let scheme = &url[..colon];
        let mut chars = scheme.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid {
            return Some("url has an invalid scheme");
        }
    }

    None
}

//! Page rendering.
//!
//! [`render_page`] is a pure function from a [`PageModel`] and a theme
//! accessor to a [`DocumentTree`]. The whole model is validated before any
//! block is built, so callers either get a complete tree or an error.

use folio_core::{Inline, PageModel, model::url_problem};
use thiserror::Error;
use tracing::debug;

use crate::{
    document::{Block, DocumentTree, LinkNode, ParagraphNode, Span, ToolItem},
    theme::{PRIMARY, ThemeTokens},
};

/// Page rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Required page metadata is missing.
    #[error("validation error: page {field} must not be empty")]
    Validation { field: &'static str },

    /// A link or tool entry is malformed.
    #[error("malformed entry {entry}: {reason}")]
    MalformedEntry { entry: String, reason: &'static str },
}

/// Result type for page rendering.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Render a page model into a document tree.
pub fn render_page(model: &PageModel, theme: &dyn ThemeTokens) -> Result<DocumentTree> {
    debug!(title = %model.title, "rendering page");

    validate(model)?;

    let mut blocks = Vec::new();

    if let Some(prompt) = &model.prompt_line {
        blocks.push(Block::Prompt {
            text: prompt.clone(),
        });
    }

    for section in &model.sections {
        blocks.push(Block::Section {
            title: section.title.clone(),
            paragraphs: section
                .paragraphs
                .iter()
                .map(|p| ParagraphNode {
                    spans: p.inlines.iter().map(span).collect(),
                })
                .collect(),
        });
    }

    if !model.tools.is_empty() {
        blocks.push(Block::ToolList {
            title: model.tools_title.clone(),
            items: model
                .tools
                .iter()
                .map(|tool| ToolItem {
                    label: tool.label.clone(),
                    note: tool.note.clone(),
                    links: tool
                        .links
                        .iter()
                        .map(|l| LinkNode {
                            text: l.text.clone(),
                            url: l.url.clone(),
                        })
                        .collect(),
                })
                .collect(),
        });
    }

    if !model.links.is_empty() {
        blocks.push(Block::LinkList {
            title: model.links_title.clone(),
            items: model
                .links
                .iter()
                .map(|l| LinkNode {
                    text: l.label.clone(),
                    url: l.url.clone(),
                })
                .collect(),
        });
    }

    if let Some(image) = &model.footer_image {
        blocks.push(Block::Image {
            src: image.src.clone(),
            alt: image.alt.clone(),
        });
    }

    Ok(DocumentTree {
        title: model.title.clone(),
        description: model.description.clone(),
        variant: model.variant,
        accent: theme.resolve(PRIMARY),
        blocks,
    })
}

/// Check page metadata and every link target.
pub fn validate(model: &PageModel) -> Result<()> {
    if model.title.trim().is_empty() {
        return Err(RenderError::Validation { field: "title" });
    }
    if model.description.trim().is_empty() {
        return Err(RenderError::Validation {
            field: "description",
        });
    }

    for (si, section) in model.sections.iter().enumerate() {
        for (pi, paragraph) in section.paragraphs.iter().enumerate() {
            for (text, url) in paragraph.link_urls() {
                check_url(url, || {
                    format!(
                        "section {} paragraph {} link '{text}'",
                        si + 1,
                        pi + 1
                    )
                })?;
            }
        }
    }

    for tool in &model.tools {
        for link in &tool.links {
            check_url(&link.url, || {
                format!("tool '{}' link '{}'", tool.label, link.text)
            })?;
        }
    }

    for link in &model.links {
        check_url(&link.url, || format!("link '{}'", link.label))?;
    }

    if let Some(image) = &model.footer_image
        && image.src.trim().is_empty()
    {
        return Err(RenderError::MalformedEntry {
            entry: "footer image".to_string(),
            reason: "image source is empty",
        });
    }

    Ok(())
}

fn check_url(url: &str, entry: impl FnOnce() -> String) -> Result<()> {
    match url_problem(url) {
        Some(reason) => Err(RenderError::MalformedEntry {
            entry: entry(),
            reason,
        }),
        None => Ok(()),
    }
}

fn span(inline: &Inline) -> Span {
    match inline {
        Inline::Text(text) => Span::Text(text.clone()),
        Inline::Link { text, url } => Span::Link(LinkNode {
            text: text.clone(),
            url: url.clone(),
        }),
        Inline::Code(code) => Span::Code(code.clone()),
    }
}

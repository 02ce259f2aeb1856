//! Display tree produced by the page renderer.
//!
//! The tree is markup-agnostic: [`crate::html`] serializes it to HTML, and
//! the CLI can dump it as JSON.

use folio_core::PageVariant;
use serde::Serialize;

/// A rendered page, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentTree {
    /// Document title.
    pub title: String,

    /// Meta description.
    pub description: String,

    /// Presentation family.
    pub variant: PageVariant,

    /// Accent colour resolved from the `primary` theme token.
    pub accent: Option<String>,

    /// Blocks in display order.
    pub blocks: Vec<Block>,
}

impl DocumentTree {
    /// Iterate over the section blocks.
    pub fn sections(&self) -> impl Iterator<Item = &[ParagraphNode]> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Section { paragraphs, .. } => Some(paragraphs.as_slice()),
            _ => None,
        })
    }

    /// Items of the tool list, if any.
    pub fn tool_items(&self) -> &[ToolItem] {
        self.blocks
            .iter()
            .find_map(|b| match b {
                Block::ToolList { items, .. } => Some(items.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Items of the link list, if any.
    pub fn link_items(&self) -> &[LinkNode] {
        self.blocks
            .iter()
            .find_map(|b| match b {
                Block::LinkList { items, .. } => Some(items.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// A top-level display block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Prompt line above the content.
    Prompt { text: String },

    /// Prose section.
    Section {
        title: Option<String>,
        paragraphs: Vec<ParagraphNode>,
    },

    /// Bulleted tool list.
    ToolList {
        title: Option<String>,
        items: Vec<ToolItem>,
    },

    /// Bulleted link list.
    LinkList {
        title: Option<String>,
        items: Vec<LinkNode>,
    },

    /// Trailing image. `src` is the logical asset reference.
    Image { src: String, alt: String },
}

/// A rendered paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParagraphNode {
    pub spans: Vec<Span>,
}

/// Inline content of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Link(LinkNode),
    Code(String),
}

/// A hyperlink element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkNode {
    /// Visible text.
    pub text: String,
    pub url: String,
}

/// A rendered tool bullet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolItem {
    pub label: String,
    pub note: Option<String>,
    pub links: Vec<LinkNode>,
}

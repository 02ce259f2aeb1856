//! Folio Core Library
//!
//! Content model, site configuration, and error handling for the Folio page builder.

pub mod config;
pub mod error;
pub mod model;
pub mod page_file;

pub use config::Config;
pub use error::{CoreError, Result};
pub use model::{
    AssetRef, ContentSection, Inline, LinkEntry, PageModel, PageVariant, Paragraph, ToolEntry,
    ToolLink,
};
pub use page_file::{PageFormat, PagePath};

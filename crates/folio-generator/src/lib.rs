//! Folio Generator Library
//!
//! Page rendering and static site generation for Folio.
//!
//! # Modules
//!
//! - [`render`] - Pure page renderer producing a [`DocumentTree`]
//! - [`document`] - Renderer output types
//! - [`theme`] - Theme token accessors
//! - [`template`] - HTML template system with variable interpolation
//! - [`html`] - HTML generation from document trees
//! - [`assets`] - Static asset processing with optional fingerprinting
//! - [`collector`] - Page collection and route registration
//! - [`build`] - Build orchestration

pub mod assets;
pub mod build;
pub mod collector;
pub mod document;
pub mod html;
pub mod render;
pub mod template;
pub mod theme;

pub use assets::{AssetManifest, AssetProcessor, AssetResolver};
pub use build::{BuildError, BuildStats, Builder};
pub use collector::{PageCollector, RouteTable, RoutedPage};
pub use document::{Block, DocumentTree, LinkNode, ParagraphNode, Span, ToolItem};
pub use html::{HtmlGenerator, escape_html};
pub use render::{RenderError, render_page};
pub use template::{Template, TemplateContext, TemplateRegistry};
pub use theme::{CssVariables, Palette, ThemeTokens};

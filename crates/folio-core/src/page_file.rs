//! Page definition files.
//!
//! A page definition is a serialized [`PageModel`] stored as TOML or YAML.
//! Its location under the pages directory decides the route it is served at.

use std::path::{Path, PathBuf};

use crate::{
    error::{CoreError, Result},
    model::PageModel,
};

/// Serialization format of a page definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    /// TOML (`.toml`).
    Toml,
    /// YAML (`.yaml`, `.yml`).
    Yaml,
}

impl PageFormat {
    /// Determine format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Yaml => "yaml",
        }
    }

    /// Parse a page model from file content.
    pub fn parse(&self, content: &str, path: &Path) -> Result<PageModel> {
        match self {
            Self::Toml => {
                toml::from_str(content).map_err(|e| CoreError::page_file(path, e.to_string()))
            }
            Self::Yaml => {
                serde_yaml::from_str(content).map_err(|e| CoreError::page_file(path, e.to_string()))
            }
        }
    }

    /// Serialize a page model in this format.
    pub fn write(&self, page: &PageModel) -> Result<String> {
        Ok(match self {
            Self::Toml => toml::to_string_pretty(page)?,
            Self::Yaml => serde_yaml::to_string(page)?,
        })
    }
}

/// A page definition path with its derived route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePath {
    /// Original file path.
    pub path: PathBuf,

    /// Route the page is served at, always starting with `/`.
    pub route: String,

    /// File format based on extension.
    pub format: PageFormat,
}

impl PagePath {
    /// Derive the route for a path relative to the pages directory.
    ///
    /// - `index.toml` → `/`
    /// - `about.toml` → `/about`
    /// - `notes/hello.yaml` → `/notes/hello`
    /// - `notes/index.yml` → `/notes`
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        let format = PageFormat::from_extension(extension)?;
        let stem = path.file_stem()?.to_str()?;

        let parent = path.parent().unwrap_or(Path::new(""));
        let mut segments: Vec<String> = parent
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(s) => Some(s.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();
        if stem != "index" {
            segments.push(stem.to_string());
        }

        Some(Self {
            path: path.to_path_buf(),
            route: format!("/{}", segments.join("/")),
            format,
        })
    }
}

/// Read and parse a page definition file.
pub fn load_page(path: &Path) -> Result<PageModel> {
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(PageFormat::from_extension)
        .ok_or_else(|| CoreError::page_file(path, "unsupported page file extension"))?;

    let content = std::fs::read_to_string(path)?;
    format.parse(&content, path)
}

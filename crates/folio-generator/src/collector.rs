//! Page collection and route registration.
//!
//! Walks the pages directory, parses every page definition and registers it
//! under the route derived from its path.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use folio_core::{PageModel, PagePath, page_file::load_page};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

/// Page collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A page definition could not be parsed.
    #[error(transparent)]
    Page(#[from] folio_core::CoreError),

    /// Two page files resolve to the same route.
    #[error("duplicate route {route}: defined by {first} and {second}")]
    DuplicateRoute {
        route: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// A registered page.
#[derive(Debug, Clone)]
pub struct RoutedPage {
    /// Page definition file it was loaded from.
    pub source: PathBuf,
    pub model: PageModel,
}

/// Pages keyed by route, in route order.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, RoutedPage>,
}

impl RouteTable {
    /// Create an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page under a route.
    pub fn register(
        &mut self,
        route: impl Into<String>,
        source: impl Into<PathBuf>,
        model: PageModel,
    ) -> Result<()> {
        let route = route.into();
        let source = source.into();
        if let Some(existing) = self.routes.get(&route) {
            return Err(CollectorError::DuplicateRoute {
                route,
                first: existing.source.clone(),
                second: source,
            });
        }
        self.routes.insert(route, RoutedPage { source, model });
        Ok(())
    }

    /// Look up the page for a route.
    #[must_use]
    pub fn get(&self, route: &str) -> Option<&RoutedPage> {
        self.routes.get(route)
    }

    /// Iterate over routes in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoutedPage)> {
        self.routes.iter().map(|(route, page)| (route.as_str(), page))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Page collector that walks the pages directory.
#[derive(Debug)]
pub struct PageCollector {
    pages_dir: PathBuf,
}

impl PageCollector {
    /// Create a new page collector.
    #[must_use]
    pub fn new(pages_dir: impl Into<PathBuf>) -> Self {
        Self {
            pages_dir: pages_dir.into(),
        }
    }

    /// Collect all pages into a route table.
    pub fn collect(&self) -> Result<RouteTable> {
        info!(dir = %self.pages_dir.display(), "collecting pages");

        let mut files = Vec::new();
        self.walk_dir(&self.pages_dir, &mut files)?;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        info!(count = files.len(), "found page files");

        let parsed = files
            .par_iter()
            .map(|page_path| {
                debug!(path = %page_path.path.display(), "parsing page");
                load_page(&self.pages_dir.join(&page_path.path)).map(|model| (page_path, model))
            })
            .collect::<folio_core::Result<Vec<_>>>()?;

        let mut table = RouteTable::new();
        for (page_path, model) in parsed {
            table.register(
                page_path.route.clone(),
                self.pages_dir.join(&page_path.path),
                model,
            )?;
        }

        info!(routes = table.len(), "page collection complete");
        Ok(table)
    }

    /// Recursively find page definition files, relative to the pages directory.
    fn walk_dir(&self, dir: &Path, files: &mut Vec<PagePath>) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'))
            {
                continue;
            }

            if path.is_dir() {
                self.walk_dir(&path, files)?;
            } else if path.is_file() {
                let relative = path.strip_prefix(&self.pages_dir).unwrap_or(&path);
                if let Some(page_path) = PagePath::from_path(relative) {
                    files.push(page_path);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const ABOUT: &str = r#"
title = "About"
description = "About me"
"#;

    #[test]
    fn test_collect_routes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("about.toml"), ABOUT).unwrap();
        fs::write(
            dir.path().join("index.yaml"),
            "title: Home\ndescription: Home page\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("notes")).unwrap();
        fs::write(dir.path().join("notes/hello.toml"), ABOUT).unwrap();
        fs::write(dir.path().join("README.md"), "not a page").unwrap();
        fs::write(dir.path().join(".draft.toml"), ABOUT).unwrap();

        let table = PageCollector::new(dir.path()).collect().unwrap();

        let routes: Vec<_> = table.iter().map(|(route, _)| route).collect();
        assert_eq!(routes, vec!["/", "/about", "/notes/hello"]);
        assert_eq!(table.get("/").unwrap().model.title, "Home");
        assert!(table.get("/about").unwrap().source.ends_with("about.toml"));
    }

    #[test]
    fn test_duplicate_route() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("about.toml"), ABOUT).unwrap();
        fs::write(dir.path().join("about.yaml"), "title: About\ndescription: Other\n").unwrap();

        let err = PageCollector::new(dir.path()).collect().unwrap_err();
        match err {
            CollectorError::DuplicateRoute { route, .. } => assert_eq!(route, "/about"),
            other => panic!("expected duplicate route, got {other}"),
        }
    }

    #[test]
    fn test_invalid_page_names_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.toml"), "title = ").unwrap();

        let err = PageCollector::new(dir.path()).collect().unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let table = PageCollector::new("/nonexistent/pages").collect().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_register_duplicate() {
        let model = PageModel::builder("A", "B").build();
        let mut table = RouteTable::new();
        table.register("/a", "a.toml", model.clone()).unwrap();
        assert!(table.register("/a", "a.yaml", model).is_err());
        assert_eq!(table.len(), 1);
    }
}

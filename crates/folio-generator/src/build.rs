//! Build orchestration.
//!
//! Coordinates the full site build: page collection, rendering, assets and
//! writing. Every page is rendered before the output directory is touched, so
//! a single failing page fails the whole build and leaves the previous output
//! in place.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use folio_core::Config;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    assets::{AssetError, AssetManifest, AssetProcessor},
    collector::{CollectorError, PageCollector},
    html::{HtmlError, HtmlGenerator},
    render::{RenderError, render_page},
    theme::Palette,
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error(transparent)]
    Collector(#[from] CollectorError),

    /// A page failed validation.
    #[error("cannot render {route}")]
    Render {
        route: String,
        #[source]
        source: RenderError,
    },

    /// HTML generation error.
    #[error(transparent)]
    Html(#[from] HtmlError),

    /// Asset error.
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of pages generated.
    pub pages: usize,

    /// Number of assets processed.
    pub assets: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    pages_dir: PathBuf,
    output_dir: PathBuf,
    static_dir: Option<PathBuf>,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        config: Config,
        pages_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            pages_dir: pages_dir.into(),
            output_dir: output_dir.into(),
            static_dir: None,
        }
    }

    /// Set the static assets directory.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Theme accessor for this site: configured palette over CSS variables.
    #[must_use]
    pub fn theme(config: &Config) -> Palette {
        Palette::site(&config.theme)
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            pages = %self.pages_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        let routes = PageCollector::new(&self.pages_dir).collect()?;
        let theme = Self::theme(&self.config);

        info!(count = routes.len(), "rendering pages");

        let pages: Vec<_> = routes.iter().collect();
        let documents = pages
            .par_iter()
            .map(|(route, page)| {
                render_page(&page.model, &theme)
                    .map(|doc| (*route, doc))
                    .map_err(|source| BuildError::Render {
                        route: (*route).to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        self.clean_output()?;

        let manifest = match &self.static_dir {
            Some(static_dir) => self.process_assets(static_dir)?,
            None => AssetManifest::new(),
        }
        .with_base_path(&self.config.site.base_path);
        stats.assets = manifest.assets().len();

        let generator = HtmlGenerator::new(self.config.clone());
        let rendered = documents
            .par_iter()
            .map(|(route, doc)| -> Result<(PathBuf, String)> {
                let html = generator.generate(doc, route, &manifest)?;
                Ok((generator.output_path(route, &self.output_dir), html))
            })
            .collect::<Result<Vec<_>>>()?;

        for (output_path, html) in &rendered {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(output_path, html)?;
            debug!(path = %output_path.display(), "wrote page");
        }
        stats.pages = rendered.len();

        stats.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            pages = stats.pages,
            assets = stats.assets,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Clean the output directory.
    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Copy static assets and write the manifest.
    fn process_assets(&self, static_dir: &Path) -> Result<AssetManifest> {
        let processor = AssetProcessor::new(self.config.build.fingerprint);
        let manifest = processor.process(static_dir, &self.output_dir)?;

        if self.config.build.fingerprint {
            let manifest_path = self.output_dir.join("asset-manifest.json");
            fs::write(&manifest_path, manifest.to_json()?)?;
        }

        Ok(manifest)
    }
}

//! Asset processing and resolution.
//!
//! Copies the static directory into the output, optionally fingerprinting
//! files for cache busting, and maps logical asset references to served URLs.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

/// Asset processing errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid asset path.
    #[error("invalid asset path: {0}")]
    InvalidPath(PathBuf),

    /// Manifest serialization error.
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Maps a logical image reference to the URL it is served at.
pub trait AssetResolver: Sync {
    fn resolve(&self, src: &str) -> String;
}

/// Asset manifest mapping original paths to served paths.
#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    /// Original path (`/img/a.gif`) to served path (`/img/a.1f2e3d4c.gif`).
    assets: BTreeMap<String, String>,

    /// Prefix the site is served under.
    base_path: String,
}

impl AssetManifest {
    /// Create a new empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix resolved URLs with the site's base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_matches('/').to_string();
        self
    }

    /// Add an asset to the manifest.
    pub fn add(&mut self, original: impl Into<String>, served: impl Into<String>) {
        self.assets.insert(original.into(), served.into());
    }

    /// Get the served path for an asset.
    #[must_use]
    pub fn get(&self, original: &str) -> Option<&str> {
        self.assets.get(original).map(String::as_str)
    }

    /// Get all assets in the manifest.
    #[must_use]
    pub fn assets(&self) -> &BTreeMap<String, String> {
        &self.assets
    }

    /// Serialize manifest to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.assets)?)
    }
}

impl AssetResolver for AssetManifest {
    fn resolve(&self, src: &str) -> String {
        if src.contains("://") || src.starts_with("data:") {
            return src.to_string();
        }

        let original = format!("/{}", src.trim_start_matches('/'));
        let served = self.get(&original).unwrap_or(&original);

        if self.base_path.is_empty() {
            served.to_string()
        } else {
            format!("/{}{served}", self.base_path)
        }
    }
}

/// Asset processor for copying and optionally fingerprinting static files.
#[derive(Debug)]
pub struct AssetProcessor {
    /// Whether to fingerprint assets.
    fingerprint: bool,

    /// File extensions to fingerprint.
    fingerprint_extensions: Vec<String>,
}

impl AssetProcessor {
    /// Create a new asset processor.
    #[must_use]
    pub fn new(fingerprint: bool) -> Self {
        Self {
            fingerprint,
            fingerprint_extensions: ["css", "js", "png", "jpg", "jpeg", "gif", "svg", "webp"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Process all assets from source to destination directory.
    pub fn process(&self, source_dir: &Path, dest_dir: &Path) -> Result<AssetManifest> {
        info!(
            source = %source_dir.display(),
            dest = %dest_dir.display(),
            "processing assets"
        );

        let mut manifest = AssetManifest::new();

        if !source_dir.exists() {
            debug!("static directory does not exist, skipping");
            return Ok(manifest);
        }

        self.process_dir(source_dir, source_dir, dest_dir, &mut manifest)?;

        info!(count = manifest.assets.len(), "assets processed");
        Ok(manifest)
    }

    /// Recursively process a directory.
    fn process_dir(
        &self,
        base_dir: &Path,
        current_dir: &Path,
        dest_base: &Path,
        manifest: &mut AssetManifest,
    ) -> Result<()> {
        for entry in fs::read_dir(current_dir)? {
            let path = entry?.path();

            if path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'))
            {
                continue;
            }

            if path.is_dir() {
                self.process_dir(base_dir, &path, dest_base, manifest)?;
            } else if path.is_file() {
                self.process_file(base_dir, &path, dest_base, manifest)?;
            }
        }

        Ok(())
    }

    /// Copy a single file, fingerprinting its name when configured.
    fn process_file(
        &self,
        base_dir: &Path,
        file_path: &Path,
        dest_base: &Path,
        manifest: &mut AssetManifest,
    ) -> Result<()> {
        let relative = file_path
            .strip_prefix(base_dir)
            .map_err(|_| AssetError::InvalidPath(file_path.to_path_buf()))?;

        let should_fingerprint = self.fingerprint
            && file_path.extension().is_some_and(|ext| {
                self.fingerprint_extensions
                    .contains(&ext.to_string_lossy().to_lowercase())
            });

        let dest_relative = if should_fingerprint {
            let hash = content_hash(&fs::read(file_path)?);
            let stem = file_path.file_stem().unwrap_or_default().to_string_lossy();
            let ext = file_path.extension().unwrap_or_default().to_string_lossy();
            let parent = relative.parent().unwrap_or(Path::new(""));
            parent.join(format!("{stem}.{hash}.{ext}"))
        } else {
            relative.to_path_buf()
        };

        let dest_path = dest_base.join(&dest_relative);
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(file_path, &dest_path)?;

        manifest.add(url_path(relative), url_path(&dest_relative));

        debug!(
            src = %file_path.display(),
            dest = %dest_path.display(),
            "copied asset"
        );

        Ok(())
    }
}

fn url_path(path: &Path) -> String {
    format!("/{}", path.display()).replace('\\', "/")
}

/// Short FNV-1a hash of file contents.
fn content_hash(bytes: &[u8]) -> String {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    format!("{hash:016x}")[..8].to_string()
}

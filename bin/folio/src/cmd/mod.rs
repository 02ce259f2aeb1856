//! Command implementations.

pub mod build;
pub mod check;
pub mod new;
pub mod render;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;

/// Load the site configuration, applying `FOLIO__SECTION__KEY` overrides.
pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_with_env(config_path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", config_path.display()))
}

/// Resolve a configured directory relative to the config file's location.
pub(crate) fn site_path(config_path: &Path, dir: impl AsRef<Path>) -> PathBuf {
    let dir = dir.as_ref();
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    match config_path.parent() {
        Some(root) if !root.as_os_str().is_empty() => root.join(dir),
        _ => dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_path_relative_to_config() {
        assert_eq!(
            site_path(Path::new("site/folio.toml"), "pages"),
            PathBuf::from("site/pages")
        );
        assert_eq!(
            site_path(Path::new("folio.toml"), "pages"),
            PathBuf::from("pages")
        );
        assert_eq!(
            site_path(Path::new("site/folio.toml"), "/srv/out"),
            PathBuf::from("/srv/out")
        );
    }
}

//! Check command - validate configuration and page definitions

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use folio_core::{Config, PagePath, page_file::load_page};
use folio_generator::{Builder, RouteTable, render_page};

use super::{load_config, site_path};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Loads the configuration and renders every page definition without writing
/// anything, reporting all problems found rather than stopping at the first.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and pages");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match load_config(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e:#}");
            bail!("Validation failed: configuration could not be loaded");
        }
    };

    let pages_dir = site_path(config_path, &config.build.pages_dir);
    let static_dir = site_path(config_path, &config.build.static_dir);
    let output_dir = site_path(config_path, &config.build.output_dir);

    println!("\nChecking configuration values...");
    check_config_values(&config, &output_dir, &mut result);

    if pages_dir.is_dir() {
        println!("\nChecking page definitions...");
        validate_pages(&config, &pages_dir, &static_dir, &mut result);
    } else {
        result.add_error(format!(
            "Pages directory does not exist: {}",
            pages_dir.display()
        ));
    }

    if !static_dir.is_dir() {
        result.add_warning(format!(
            "Static directory does not exist: {}",
            static_dir.display()
        ));
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Parse and render every page definition under `pages_dir`.
fn validate_pages(
    config: &Config,
    pages_dir: &Path,
    static_dir: &Path,
    result: &mut ValidationResult,
) {
    let theme = Builder::theme(config);
    let mut routes = RouteTable::new();
    let mut checked = 0;
    let mut failed = 0;

    for entry in walkdir::WalkDir::new(pages_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                result.add_error(format!("Cannot read pages directory entry: {e}"));
                failed += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(pages_dir).unwrap_or(path);
        let Some(page_path) = PagePath::from_path(relative) else {
            result.add_warning(format!("{}: not a page definition, skipped", path.display()));
            continue;
        };

        checked += 1;

        let model = match load_page(path) {
            Ok(model) => model,
            Err(e) => {
                result.add_error(format!("{}: {e}", path.display()));
                failed += 1;
                continue;
            }
        };

        if let Err(e) = render_page(&model, &theme) {
            result.add_error(format!("{} ({}): {e}", path.display(), page_path.route));
            failed += 1;
        }

        if let Some(image) = &model.footer_image
            && !image.src.contains("://")
            && !static_dir.join(image.src.trim_start_matches('/')).exists()
        {
            result.add_warning(format!(
                "{}: image '{}' not found in static directory",
                path.display(),
                image.src
            ));
        }

        if let Err(e) = routes.register(page_path.route, path, model) {
            result.add_error(e.to_string());
            failed += 1;
        }
    }

    if failed == 0 {
        println!("  ✓ All {checked} page definitions valid");
    } else {
        println!("  ✗ {failed}/{checked} page definitions have errors");
    }
}

/// Check configuration values for common issues.
fn check_config_values(config: &Config, output_dir: &Path, result: &mut ValidationResult) {
    if !config.site.base_url.starts_with("http") {
        result.add_warning("site.base_url should start with http:// or https://");
    }

    if config.site.base_url.ends_with('/') {
        result.add_warning("site.base_url should not have a trailing slash");
    }

    if !config.theme.palette.contains_key(folio_generator::theme::PRIMARY) {
        result.add_warning("theme.palette has no `primary` colour; accents use the CSS variable");
    }

    if output_dir.exists() && !output_dir.is_dir() {
        result.add_error(format!(
            "Output path exists but is not a directory: {}",
            output_dir.display()
        ));
    }

    println!("  ✓ Configuration values checked");
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const CONFIG: &str = r##"
[site]
title = "Test"
base_url = "https://example.com"

[theme]
palette = { primary = "#2e8555" }
"##;

    fn site(pages: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("folio.toml"), CONFIG).unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::create_dir_all(dir.path().join("static")).unwrap();
        for (name, content) in pages {
            fs::write(dir.path().join("pages").join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_check_valid_site() {
        let dir = site(&[("about.toml", "title = \"About\"\ndescription = \"About me\"\n")]);
        run(&dir.path().join("folio.toml"), true).unwrap();
    }

    #[test]
    fn test_check_reports_render_errors() {
        let dir = site(&[("about.toml", "title = \"About\"\ndescription = \"\"\n")]);
        let err = run(&dir.path().join("folio.toml"), false).unwrap_err();
        assert!(err.to_string().contains("1 error"));
    }

    #[test]
    fn test_check_reports_duplicate_routes() {
        let dir = site(&[
            ("about.toml", "title = \"About\"\ndescription = \"One\"\n"),
            ("about.yaml", "title: About\ndescription: Two\n"),
        ]);
        let err = run(&dir.path().join("folio.toml"), false).unwrap_err();
        assert!(err.to_string().contains("1 error"));
    }

    #[cfg(unix)]
    #[test]
    fn test_check_reports_unreadable_entries() {
        let dir = site(&[("about.toml", "title = \"About\"\ndescription = \"About me\"\n")]);
        std::os::unix::fs::symlink(
            dir.path().join("pages/missing.toml"),
            dir.path().join("pages/dangling.toml"),
        )
        .unwrap();

        let err = run(&dir.path().join("folio.toml"), false).unwrap_err();
        assert!(err.to_string().contains("1 error"));
    }

    #[test]
    fn test_strict_fails_on_warnings() {
        let dir = site(&[(
            "about.toml",
            r#"
title = "About"
description = "About me"

[footer_image]
src = "img/missing.gif"
"#,
        )]);
        let config = dir.path().join("folio.toml");
        run(&config, false).unwrap();
        let err = run(&config, true).unwrap_err();
        assert!(err.to_string().contains("strict mode"));
    }
}

//! Render command - print a single page

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use folio_core::{PagePath, page_file::load_page};
use folio_generator::{AssetManifest, Builder, HtmlGenerator, render_page};

use super::{load_config, site_path};

/// Run the render command.
///
/// Prints the HTML for one page definition, or its document tree as JSON.
pub fn run(config_path: &Path, page: &Path, json: bool) -> Result<()> {
    tracing::info!(?config_path, ?page, json, "Rendering page");

    let config = load_config(config_path)?;
    let model = load_page(page).wrap_err_with(|| format!("Failed to load {}", page.display()))?;

    let theme = Builder::theme(&config);
    let doc = render_page(&model, &theme)
        .wrap_err_with(|| format!("Failed to render {}", page.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let pages_dir = site_path(config_path, &config.build.pages_dir);
    let route = route_for(page, &pages_dir);
    let assets = AssetManifest::new().with_base_path(&config.site.base_path);

    let html = HtmlGenerator::new(config)
        .generate(&doc, &route, &assets)
        .wrap_err("Failed to generate HTML")?;
    println!("{html}");

    Ok(())
}

/// Route a page file would be served at. Files outside the pages directory
/// are treated as if they sat at its root.
fn route_for(page: &Path, pages_dir: &Path) -> String {
    let relative = match page.strip_prefix(pages_dir) {
        Ok(relative) => relative,
        Err(_) => page.file_name().map_or(page, Path::new),
    };
    PagePath::from_path(relative).map_or_else(|| "/".to_string(), |p| p.route)
}

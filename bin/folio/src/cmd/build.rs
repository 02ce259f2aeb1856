//! Build command - generates the static site

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use folio_generator::Builder;

use super::{load_config, site_path};

/// Run the build command.
///
/// Renders every page definition into the output directory. `output` and
/// `base_url` override the configured values.
pub fn run(config_path: &Path, output: Option<&Path>, base_url: Option<&str>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, ?base_url, "Starting build");

    let mut config = load_config(config_path)?;

    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base_url from CLI");
        config.site.base_url = url.to_string();
    }

    let output = match output {
        Some(dir) => dir.to_path_buf(),
        None => site_path(config_path, &config.build.output_dir),
    };
    let pages_dir = site_path(config_path, &config.build.pages_dir);
    let static_dir = site_path(config_path, &config.build.static_dir);

    tracing::debug!(?config, "Loaded configuration");

    let mut builder = Builder::new(config, &pages_dir, &output);
    if static_dir.is_dir() {
        tracing::info!("Found static directory, will copy to output");
        builder = builder.with_static_dir(&static_dir);
    }

    let stats = builder.build().wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Pages:      {}", stats.pages);
    println!("  Assets:     {}", stats.assets);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}

//! New command - scaffold a page definition

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use color_eyre::eyre::{Result, WrapErr, bail};
use folio_core::{ContentSection, PageFormat, PageModel, PagePath, PageVariant, Paragraph};

use super::{load_config, site_path};

/// Presentation family for a scaffolded page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    Terminal,
    Plain,
}

impl From<Variant> for PageVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Terminal => Self::Terminal,
            Variant::Plain => Self::Plain,
        }
    }
}

/// File format for a scaffolded page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Toml,
    Yaml,
}

impl From<Format> for PageFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Toml => Self::Toml,
            Format::Yaml => Self::Yaml,
        }
    }
}

/// Run the new command.
///
/// Writes a page definition for `route` into the configured pages directory.
/// Fails if any existing page definition, in any format, already serves the
/// route.
pub fn run(config_path: &Path, route: &str, variant: Variant, format: Format) -> Result<()> {
    tracing::info!(route, ?variant, ?format, "Creating new page");

    let config = load_config(config_path)?;
    let pages_dir = site_path(config_path, &config.build.pages_dir);
    let format = PageFormat::from(format);
    let file_path = page_file_path(&pages_dir, route, format);

    if let Some(existing) = find_route(&pages_dir, &file_path)? {
        bail!(
            "Route is already defined by {}; refusing to create {}",
            existing.display(),
            file_path.display()
        );
    }

    let page = scaffold(route, variant.into());
    let content = format.write(&page).wrap_err("Failed to serialize page")?;

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }
    fs::write(&file_path, content).wrap_err("Failed to write file")?;

    tracing::info!(?file_path, "Created new page definition");
    println!("Created: {}", file_path.display());

    Ok(())
}

/// File a route is defined in: `/` is `index`, `notes/hello` is `notes/hello`.
fn page_file_path(pages_dir: &Path, route: &str, format: PageFormat) -> PathBuf {
    let route = route.trim_matches('/');
    let stem = if route.is_empty() { "index" } else { route };
    pages_dir.join(format!("{stem}.{}", format.extension()))
}

/// Existing page definition serving the same route as `file_path`, if any.
fn find_route(pages_dir: &Path, file_path: &Path) -> Result<Option<PathBuf>> {
    let Some(wanted) = file_path
        .strip_prefix(pages_dir)
        .ok()
        .and_then(PagePath::from_path)
    else {
        bail!("Not a page definition path: {}", file_path.display());
    };

    if !pages_dir.is_dir() {
        return Ok(None);
    }

    for entry in walkdir::WalkDir::new(pages_dir) {
        let entry = entry.wrap_err("Failed to scan pages directory")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(pages_dir).unwrap_or(entry.path());
        if PagePath::from_path(relative).is_some_and(|p| p.route == wanted.route) {
            return Ok(Some(entry.into_path()));
        }
    }

    Ok(None)
}

fn scaffold(route: &str, variant: PageVariant) -> PageModel {
    let slug = route
        .trim_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("home");
    let title = title_case(slug);

    let mut builder = PageModel::builder(&title, format!("{title} page")).variant(variant);
    if variant == PageVariant::Terminal {
        builder = builder.prompt_line(format!("$ cat {slug}.md"));
    }
    builder
        .section(ContentSection::new([Paragraph::text(
            "Write your content here.",
        )]))
        .build()
}

fn title_case(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use folio_core::page_file::load_page;
    use tempfile::TempDir;

    use super::*;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("folio.toml"),
            "[site]\ntitle = \"Test\"\nbase_url = \"https://example.com\"\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_page_file_path() {
        let pages = Path::new("pages");
        assert_eq!(
            page_file_path(pages, "/", PageFormat::Toml),
            PathBuf::from("pages/index.toml")
        );
        assert_eq!(
            page_file_path(pages, "/notes/hello/", PageFormat::Yaml),
            PathBuf::from("pages/notes/hello.yaml")
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("hello-world"), "Hello World");
        assert_eq!(title_case("about"), "About");
        assert_eq!(title_case("my_uses"), "My Uses");
    }

    #[test]
    fn test_new_page_round_trips() {
        let dir = site();
        let config = dir.path().join("folio.toml");

        run(&config, "notes/hello-world", Variant::Plain, Format::Toml).unwrap();

        let page = load_page(&dir.path().join("pages/notes/hello-world.toml")).unwrap();
        assert_eq!(page.title, "Hello World");
        assert_eq!(page.variant, PageVariant::Plain);
        assert!(page.prompt_line.is_none());
        assert_eq!(page.sections.len(), 1);
    }

    #[test]
    fn test_new_terminal_page_has_prompt() {
        let dir = site();
        run(&dir.path().join("folio.toml"), "uses", Variant::Terminal, Format::Yaml).unwrap();

        let page = load_page(&dir.path().join("pages/uses.yaml")).unwrap();
        assert_eq!(page.prompt_line.as_deref(), Some("$ cat uses.md"));
    }

    #[test]
    fn test_new_refuses_route_taken_by_other_format() {
        let dir = site();
        let config = dir.path().join("folio.toml");
        run(&config, "about", Variant::Terminal, Format::Toml).unwrap();

        let err = run(&config, "about", Variant::Terminal, Format::Yaml).unwrap_err();
        assert!(err.to_string().contains("about.toml"));
        assert!(!dir.path().join("pages/about.yaml").exists());

        fs::write(dir.path().join("pages/uses.yml"), "title: Uses
description: Uses
").unwrap();
        assert!(run(&config, "uses", Variant::Plain, Format::Toml).is_err());
    }

    #[test]
    fn test_new_refuses_route_taken_by_index_file() {
        let dir = site();
        let config = dir.path().join("folio.toml");
        fs::create_dir_all(dir.path().join("pages/notes")).unwrap();
        fs::write(
            dir.path().join("pages/notes/index.toml"),
            "title = \"Notes\"\ndescription = \"Notes\"\n",
        )
        .unwrap();

        assert!(run(&config, "/notes/", Variant::Plain, Format::Toml).is_err());
        run(&config, "notes/first", Variant::Plain, Format::Toml).unwrap();
    }

    #[test]
    fn test_new_refuses_overwrite() {
        let dir = site();
        let config = dir.path().join("folio.toml");
        run(&config, "about", Variant::Terminal, Format::Toml).unwrap();
        assert!(run(&config, "about", Variant::Terminal, Format::Toml).is_err());
    }
}

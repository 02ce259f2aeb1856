//! Folio CLI
//!
//! Static page builder for a personal blog and portfolio site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;
use folio::cmd::new::{Format, Variant};

/// Command-line interface for Folio.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Static page builder for a personal blog and portfolio site"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "folio.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the static site
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Override site base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Validate configuration and page definitions without writing anything
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Scaffold a new page definition
    New {
        /// Route of the new page (e.g., notes/hello-world)
        route: String,
        /// Page variant
        #[arg(long, value_enum, default_value_t = Variant::Terminal)]
        variant: Variant,
        /// File format
        #[arg(long, value_enum, default_value_t = Format::Toml)]
        format: Format,
    },
    /// Render one page definition to stdout
    Render {
        /// Page definition file
        page: std::path::PathBuf,
        /// Print the document tree as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output, base_url } => {
            folio::cmd::build::run(&cli.config, output.as_deref(), base_url.as_deref())?;
        }
        Commands::Check { strict } => {
            folio::cmd::check::run(&cli.config, strict)?;
        }
        Commands::New {
            route,
            variant,
            format,
        } => {
            folio::cmd::new::run(&cli.config, &route, variant, format)?;
        }
        Commands::Render { page, json } => {
            folio::cmd::render::run(&cli.config, &page, json)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["folio", "build", "--output", "dist"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("folio.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build { output, base_url } => {
                assert_eq!(output, Some(std::path::PathBuf::from("dist")));
                assert!(base_url.is_none());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_base_url() {
        let args = ["folio", "build", "--base-url", "https://example.com"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build { output, base_url } => {
                assert!(output.is_none());
                assert_eq!(base_url.as_deref(), Some("https://example.com"));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_check_strict() {
        let args = ["folio", "-c", "site/folio.toml", "-vv", "check", "--strict"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("site/folio.toml"));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Check { strict } => assert!(strict),
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_new_command_parsing() {
        let args = ["folio", "new", "notes/hello", "--variant", "plain"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::New {
                route,
                variant,
                format,
            } => {
                assert_eq!(route, "notes/hello");
                assert_eq!(variant, Variant::Plain);
                assert_eq!(format, Format::Toml);
            }
            _ => panic!("Expected New command"),
        }
    }

    #[test]
    fn test_cli_render_command_parsing() {
        let args = ["folio", "render", "pages/about.toml", "--json"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Render { page, json } => {
                assert_eq!(page, std::path::PathBuf::from("pages/about.toml"));
                assert!(json);
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_variant() {
        let args = ["folio", "new", "x", "--variant", "fancy"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}

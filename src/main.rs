use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use treedocs::types::Slug;
use treedocs::{config, content, generate, output, scan};

#[derive(Parser)]
#[command(name = "treedocs")]
#[command(about = "Static documentation site generator for Markdown directories")]
#[command(long_about = "\
Static documentation site generator for Markdown directories

Your filesystem is the data source. Directories become navigation sections,
.md files become pages, and the first '# Heading' of a file is its title.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  └── docs/                        # Markdown root (content_root)
      ├── introduction.md          # Shown at /docs/
      ├── getting-started.md       # → /docs/getting-started/
      ├── guides/                  # Section and home-page project
      │   ├── README.md            # Project intro (index.md, README.md, ...)
      │   └── installation.md      # → /docs/guides/installation/
      └── .drafts/                 # Hidden: ignored

Ordering: directories first, then names case-insensitively.
Titles: first '# Heading' line, else the filename (getting-started → Getting Started).

Run 'treedocs gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Source directory (holds config.toml and the Markdown root)
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".treedocs-temp", global = true)]
    temp_dir: PathBuf,

    /// Log progress at info level (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the Markdown root into a manifest
    Scan,
    /// Produce the HTML site
    Build,
    /// Verify every discovered document resolves
    Check,
    /// Resolve a single slug, e.g. `guides/installation`
    Show {
        /// Slug path, segments separated by '/'
        slug: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Scan => {
            let (_, root) = load_site(&cli.source)?;
            let manifest = scan::scan(&root);
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Build => {
            let (site_config, root) = load_site(&cli.source)?;
            init_thread_pool(&site_config.processing);

            println!("==> Scanning {}", root.display());
            let manifest = scan::scan(&root);
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Generating HTML \u{2192} {}", cli.output.display());
            let report = generate::generate(&manifest, &site_config, &cli.output)?;
            output::print_generate_output(&manifest, &report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let (_, root) = load_site(&cli.source)?;
            println!("==> Checking {}", root.display());
            let manifest = scan::scan(&root);
            output::print_scan_output(&manifest, &cli.source);

            let report = content::check_round_trip(&root, &manifest.paths);
            output::print_check_output(&report);
            if !report.is_ok() {
                return Ok(ExitCode::FAILURE);
            }
            println!("==> Content is valid");
        }
        Command::Show { slug } => {
            let (_, root) = load_site(&cli.source)?;
            let slug = Slug::parse(&slug);
            match content::try_resolve_content(&root, &slug) {
                Ok(doc) => output::print_show_output(&doc),
                Err(e) if e.is_not_found() => {
                    eprintln!("not found: {}", slug);
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load `config.toml` from the source dir and locate the Markdown root.
fn load_site(source: &Path) -> Result<(config::SiteConfig, PathBuf), config::ConfigError> {
    let site_config = config::load_config(source)?;
    let root = site_config.content_path(source);
    Ok((site_config, root))
}

fn write_manifest(manifest: &scan::Manifest, temp_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let manifest_path = temp_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&manifest_path, json)?;
    tracing::info!(path = %manifest_path.display(), "wrote manifest");
    Ok(())
}

/// `--verbose` wins; otherwise `RUST_LOG`, defaulting to warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. User can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

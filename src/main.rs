use clap::{Parser, Subcommand};
use photo_squeeze::config::{self, AppConfig};
use photo_squeeze::imaging::{Quality, RustBackend, encode_jpeg};
use photo_squeeze::metrics::ByteUnits;
use photo_squeeze::output;
use photo_squeeze::pipeline::try_recompute_file;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "photo-squeeze")]
#[command(about = "Shrink a photo into a pixel box and re-encode it as JPEG")]
#[command(long_about = "\
Shrink a photo into a pixel box and re-encode it as JPEG

The photo is scaled down (never up) to fit inside the target box while
keeping its aspect ratio, encoded as JPEG at the chosen quality, and
compared against the source re-encoded at full quality.

Settings resolve in this order (later wins):
  stock defaults → --config file → command-line flags

Set RUST_LOG=debug to trace each pipeline step on stderr.

Run 'photo-squeeze gen-config' to print a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize, encode, and report the size change
    Squeeze(SqueezeArgs),
    /// Show source dimensions and its full-quality JPEG size
    Inspect {
        /// Source image (JPEG, PNG, TIFF, WebP)
        input: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct SqueezeArgs {
    /// Source image (JPEG, PNG, TIFF, WebP)
    input: PathBuf,

    /// JPEG quality, 0.0 (smallest) to 1.0 (best)
    #[arg(short, long)]
    quality: Option<f32>,

    /// Target box width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Target box height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Write the squeezed JPEG here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show sizes in KiB/MiB instead of KB/MB
    #[arg(long)]
    binary_units: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Squeeze(args) => {
            let app_config = setup(cli.config.as_deref())?;
            squeeze(&app_config, args)?;
        }
        Command::Inspect { input } => {
            let app_config = setup(cli.config.as_deref())?;
            inspect(&app_config, &input)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config and install the tracing subscriber it configures.
fn setup(config_path: Option<&Path>) -> Result<AppConfig, config::ConfigError> {
    let app_config = config::load_optional_config(config_path)?;
    init_tracing(&app_config);
    Ok(app_config)
}

/// Diagnostics go to stderr so stdout stays clean for the report.
fn init_tracing(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();
}

fn squeeze(config: &AppConfig, args: SqueezeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let quality = match args.quality {
        Some(q) => Quality::new(q)?,
        None => config.quality()?,
    };
    let target = config
        .target_size()?
        .with_overrides(args.width, args.height)?;
    let units = if args.binary_units {
        ByteUnits::Binary
    } else {
        config.byte_units()
    };

    let backend = RustBackend::new();
    let result = match try_recompute_file(&backend, &args.input, quality, target) {
        Ok(result) => result,
        Err(e) => {
            output::print_no_output(&e.to_string());
            return Err(e.into());
        }
    };

    if let Some(path) = &args.output {
        std::fs::write(path, result.output.as_bytes())?;
        tracing::info!(path = %path.display(), bytes = result.output.byte_len(), "wrote JPEG");
    }

    if args.json {
        let report = output::Report::new(&result, units);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_squeeze_output(&result, units, args.output.as_deref());
    }
    Ok(())
}

fn inspect(config: &AppConfig, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let backend = RustBackend::new();
    let source = backend.decode_file(input)?;
    let reference = encode_jpeg(&backend, &source, Quality::FULL)?;
    output::print_inspect_output(&source, &reference, config.byte_units());
    Ok(())
}

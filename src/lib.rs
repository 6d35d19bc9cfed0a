//! Plastiscan: command-line client for a remote microplastic detection
//! service.
//!
//! A microscope image is acquired from one of three input paths (camera
//! capture, bundled example, or file upload), submitted to the detection
//! endpoint over HTTP, and the returned counts are expanded into per-particle
//! physical sizes and a three-bucket size distribution.
//!
//! # Modules
//!
//! - [`source`]: Image acquisition (camera / example / upload)
//! - [`api`]: Detection service client and response schema
//! - [`analysis`]: Size analysis core and report rendering
//! - [`config`]: Runtime configuration
//! - [`error`]: Error types for plastiscan operations

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod source;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser, Subcommand};

use analysis::DetectionReport;
use source::ImageSource;

pub use error::PlastiscanError;

/// Width of the category chart bars, in characters.
const BAR_WIDTH: usize = 20;

/// The plastiscan CLI application.
#[derive(Parser)]
#[command(name = "plastiscan")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Submit a microscope image for detection and render the results.
    Detect(DetectArgs),
    /// List the bundled example images.
    Examples(ExamplesArgs),
}

/// Arguments for the detect subcommand.
#[derive(clap::Args)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "example", "camera"])))]
struct DetectArgs {
    /// Microscope image file to upload (JPEG or PNG).
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Name of a bundled example image.
    #[arg(long, value_name = "NAME")]
    example: Option<String>,

    /// Capture the image from the configured camera command.
    #[arg(long)]
    camera: bool,

    /// Shell command that writes a captured JPEG frame to stdout.
    #[arg(long, value_name = "CMD", env = "PLASTISCAN_CAMERA_CMD")]
    camera_cmd: Option<String>,

    /// Detection service endpoint.
    #[arg(
        long,
        value_name = "URL",
        env = "PLASTISCAN_API_URL",
        default_value = config::DEFAULT_API_URL
    )]
    api_url: String,

    /// Directory holding the bundled example images.
    #[arg(
        long,
        value_name = "DIR",
        env = "PLASTISCAN_EXAMPLE_DIR",
        default_value = config::DEFAULT_EXAMPLE_DIR
    )]
    example_dir: PathBuf,

    /// Pixel-to-nanometer conversion factor for the microscope optics.
    #[arg(long, value_name = "FACTOR", default_value_t = config::DEFAULT_PIXEL_TO_NM)]
    pixel_to_nm: f64,

    /// Risk threshold echoed in structured output.
    #[arg(long, value_name = "SCORE", default_value_t = config::DEFAULT_RISK_THRESHOLD)]
    risk_threshold: f64,

    /// Detection request timeout in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the examples subcommand.
#[derive(clap::Args)]
struct ExamplesArgs {
    /// Directory holding the bundled example images.
    #[arg(
        long,
        value_name = "DIR",
        env = "PLASTISCAN_EXAMPLE_DIR",
        default_value = config::DEFAULT_EXAMPLE_DIR
    )]
    example_dir: PathBuf,
}

/// Run the plastiscan CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PlastiscanError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Detect(args)) => run_detect(args),
        Some(Commands::Examples(args)) => run_examples(args),
        None => {
            println!("plastiscan {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Microplastic detection client.");
            println!();
            println!("Run 'plastiscan --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the detect subcommand.
fn run_detect(args: DetectArgs) -> Result<(), PlastiscanError> {
    let config = config::DetectConfig {
        api_url: args.api_url,
        pixel_to_nm: args.pixel_to_nm,
        risk_threshold: args.risk_threshold,
        timeout: Duration::from_secs(args.timeout),
    };

    let source = match (args.file, args.example, args.camera) {
        (Some(path), _, _) => ImageSource::Upload { path },
        (_, Some(name), _) => ImageSource::Example {
            dir: args.example_dir,
            name,
        },
        // --camera: the input group admits no other combination.
        _ => {
            let command = args
                .camera_cmd
                .ok_or_else(|| PlastiscanError::CameraCapture {
                    message:
                        "no capture command configured (set --camera-cmd or PLASTISCAN_CAMERA_CMD)"
                            .to_string(),
                })?;
            ImageSource::Camera { command }
        }
    };

    let Some(image) = source.fetch()? else {
        println!("No image captured; nothing to submit.");
        return Ok(());
    };

    // One image end to end per invocation; any failure past this point halts
    // the flow before anything is rendered.
    let client = api::DetectionClient::new(&config.api_url, config.timeout)?;
    let result = client.detect(&image)?;
    log::info!(
        "detection complete: {} particle(s), status {}",
        result.total_count,
        result.status
    );

    let breakdown = analysis::analyze(&result, config.pixel_to_nm);
    let report = DetectionReport::new(&result, breakdown, config.risk_threshold, BAR_WIDTH);

    match args.output.as_str() {
        "json" => {
            let rendered = serde_json::to_string_pretty(&report)
                .map_err(|source| PlastiscanError::ReportSerialize { source })?;
            println!("{rendered}");
        }
        _ => {
            // Default text output
            print!("{report}");
        }
    }

    Ok(())
}

/// Execute the examples subcommand.
fn run_examples(args: ExamplesArgs) -> Result<(), PlastiscanError> {
    let names = source::list_examples(&args.example_dir)?;

    if names.is_empty() {
        println!(
            "No example images found in '{}'.",
            args.example_dir.display()
        );
    } else {
        for name in &names {
            println!("{name}");
        }
    }

    Ok(())
}

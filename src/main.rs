use std::path::PathBuf;

use clap::{Parser, Subcommand};
use drishti_color::{AppError, AppState, ColorClassifier, Configuration, Server};
use tracing::{Level, info};

/// Average color detection service
#[derive(Parser, Debug)]
#[command(name = "drishti-color")]
#[command(about = "Detects the average color of an image and names its hue")]
struct Args {
    /// Configuration file (defaults to ./drishti.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Classify a local image and print the result
    Analyze { image: PathBuf },
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let configuration = Configuration::load(args.config.as_deref())?;
    init_logging(configuration.max_log_level()?);

    match args.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            let configuration = match port {
                Some(port) => configuration.with_port(port),
                None => configuration,
            };
            let state = AppState::new(
                ColorClassifier::new(configuration.classifier.clone()),
                configuration.server.max_concurrent_classifications,
            );
            Server::new(configuration.server, state).start().await
        }
        Command::Analyze { image } => analyze(&configuration, image),
    }
}

fn analyze(configuration: &Configuration, image: PathBuf) -> Result<(), AppError> {
    info!("Analyzing image: {}", image.display());
    let report = ColorClassifier::new(configuration.classifier.clone()).classify_path(&image)?;

    println!(
        "Average RGB color: ({}, {}, {})",
        report.rgb.r, report.rgb.g, report.rgb.b
    );
    println!(
        "HSI values: ({:.2}, {:.4}, {:.4})",
        report.hsi.h, report.hsi.s, report.hsi.i
    );
    println!("Detected color: {}", report.color_name);
    println!("Hex code: {}", report.hex_code);
    Ok(())
}

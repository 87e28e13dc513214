use agriscan::config::Config;
use agriscan::intake::load_image;
use agriscan::models::Provider;
use agriscan::report;
use agriscan::scanner::{ScanView, Scanner};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "agriscan")]
#[command(about = "Diagnose plant pests and diseases from a photo")]
struct CliArgs {
    /// Photo of the affected plant.
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Vendor to use instead of AGRISCAN_PROVIDER (gemini or anthropic).
    #[arg(long, value_parser = parse_provider_arg)]
    provider: Option<Provider>,

    /// MIME type to declare instead of sniffing the file.
    #[arg(long)]
    mime: Option<String>,

    /// Print the diagnosis as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_provider_arg(input: &str) -> std::result::Result<Provider, String> {
    input.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agriscan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(provider) = args.provider {
        config = config.with_provider(provider);
    }

    let image = load_image(&args.image, args.mime.as_deref())
        .with_context(|| format!("Failed to read {}", args.image.display()))?;

    info!("Scanning {} with {}", args.image.display(), config.provider);
    let scanner = Scanner::from_config(&config);

    match scanner.scan(Some(&image)).await {
        ScanView::Diagnosis(record) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", report::render(&record));
            }
            Ok(())
        }
        ScanView::Message(message) => {
            error!("Scan did not produce a diagnosis");
            eprintln!("{}", message);
            std::process::exit(1);
        }
    }
}

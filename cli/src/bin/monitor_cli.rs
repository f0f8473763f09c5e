use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result};
use monitor::{
    MailSession, MonitorCommand, MonitorError, MonitorService, PipelineBuilder, PipelineSettings,
    decode_image_file,
};
use monitor_cli::{BatchConfig, BatchResults};
use serde::Serialize;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a single photo
    Photo {
        /// Path to the image file
        path: PathBuf,
        /// Name used for keyword hints instead of the file name
        #[arg(long)]
        filename_hint: Option<String>,
        /// Seed for reproducible results
        #[arg(long)]
        seed: Option<u64>,
        /// Also print the extracted image features
        #[arg(long)]
        show_features: bool,
    },
    /// Classify a medical report (PDF or text)
    Report {
        /// Path to the report
        path: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Scan mail messages for disease mentions
    Emails {
        /// JSON file with an array of messages (demo inbox when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Maximum number of messages to analyse
        #[arg(short, long, default_value = "10")]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a batch described by a TOML or JSON configuration file
    Process {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the available commands with their parameters and JSON schema
    Commands,
}

fn service_for(settings: &PipelineSettings) -> MonitorService {
    MonitorService::with_pipeline(
        PipelineBuilder::from_settings(settings).build(),
        settings.random_source(),
    )
}

fn seeded(seed: Option<u64>) -> PipelineSettings {
    PipelineSettings {
        seed,
        ..Default::default()
    }
}

/// Keep the technical cause but lead with the message meant for people
fn presented(error: MonitorError) -> Report {
    let message = error.user_message();
    Report::new(error).wrap_err(message)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Photo { path, filename_hint, seed, show_features } => {
            analyze_photo(path, filename_hint.clone(), *seed, *show_features).await?;
        }
        Commands::Report { path, seed } => {
            let service = service_for(&seeded(*seed));
            match service.analyze_report_file(path).await.map_err(presented)? {
                Some(submission) => print_json(&submission)?,
                None => warn!("Report result was superseded"),
            }
        }
        Commands::Emails { input, count, seed } => {
            analyze_emails(input.as_deref(), *count, *seed).await?;
        }
        Commands::Process { config } => {
            process_batch(config).await?;
        }
        Commands::Commands => {
            list_commands()?;
        }
    }

    Ok(())
}

async fn analyze_photo(
    path: &Path,
    filename_hint: Option<String>,
    seed: Option<u64>,
    show_features: bool,
) -> Result<()> {
    let settings = seeded(seed);
    let service = service_for(&settings);

    if show_features {
        let image = decode_image_file(path).map_err(presented)?;
        let features = service.pipeline().features(&image)?;
        print_json(&features)?;
    }

    match service.analyze_photo_file(path, filename_hint).await.map_err(presented)? {
        Some(submission) => print_json(&submission),
        None => {
            warn!("Photo result was superseded");
            Ok(())
        }
    }
}

async fn analyze_emails(input: Option<&Path>, count: usize, seed: Option<u64>) -> Result<()> {
    let service = service_for(&seeded(seed));

    let messages = match input {
        Some(path) => service.load_emails(path).await?,
        None => {
            info!("📭 No input given, using the demo inbox");
            service.session_emails(&MailSession::Demo, count)?
        }
    };

    let report = service.analyze_emails(&messages, count);
    print_json(&report)
}

async fn process_batch(config_path: &Path) -> Result<()> {
    let config = BatchConfig::from_file(config_path)?;
    info!("Batch configuration: {:?}", config);

    let service = service_for(&config.settings);
    let mut results = BatchResults::default();

    for command in config.commands() {
        info!("▶️ {}", command);
        let outcome = service.execute(command.clone()).await;
        if let Err(error) = &outcome {
            warn!("{} failed: {}", command, error);
        }
        results.record(&command, outcome);
    }

    match &config.output {
        Some(output) => {
            results.to_json_file(output)?;
            info!("📄 Results saved to: {}", output);
        }
        None => println!("{}", results.to_json()?),
    }

    info!(
        "✅ Batch completed: {} photos, {} reports, {} inboxes, {} failures",
        results.photos.len(),
        results.reports.len(),
        results.inboxes.len(),
        results.failures.len()
    );
    Ok(())
}

fn list_commands() -> Result<()> {
    for command in MonitorCommand::iter() {
        println!("{} - {}", command, command.description());
        for (name, description, required) in command.parameters_info() {
            let marker = if required { "required" } else { "optional" };
            println!("    {} ({}): {}", name, marker, description);
        }
    }
    println!();
    print_json(&MonitorCommand::schema())
}

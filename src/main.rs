use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Instrument;

use contact_intake::{
    config, telemetry, DispatchOutcome, EventDispatcher, FinalValidationWorkflow,
    IngestionValidator, IntakeConfig, JobApi, JobKind, LifecyclePhase, PlatformClient,
    PlatformEvent, ProvisioningWorkflow, SecretsApi, SheetsReferenceReader, SubmissionWorkflow,
    WebhookSink, WorkspaceApi,
};

#[derive(Parser)]
#[command(name = "contact-intake")]
#[command(about = "Import-platform workspace orchestration and validation")]
#[command(long_about = "contact-intake binds to a data-import platform's lifecycle events: it \
                       provisions the contacts workbook, cross-checks imported emails against a \
                       reference spreadsheet, and relays confirmed data to the configured sink.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consume platform events (one JSON object per line) and dispatch them
    Run {
        /// Read events from this file instead of stdin
        #[arg(long, help = "Path to an NDJSON event file; defaults to stdin")]
        events: Option<PathBuf>,
    },
    /// Validate and print the effective configuration
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry()?;
    config::init_config()?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { events } => run(events).await,
        Commands::CheckConfig => check_config(),
    }
}

/// Wire the four workflows to the dispatcher against the real platform client.
fn build_dispatcher(cfg: &IntakeConfig) -> EventDispatcher {
    let client = Arc::new(PlatformClient::new(&cfg.platform));
    let jobs: Arc<dyn JobApi> = client.clone();
    let workspace: Arc<dyn WorkspaceApi> = client.clone();
    let secrets: Arc<dyn SecretsApi> = client;

    let reference = Arc::new(SheetsReferenceReader::new(&cfg.reference));
    let sink = Arc::new(WebhookSink::new(&cfg.submission));

    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(
        JobKind::SpaceConfigure,
        LifecyclePhase::Ready,
        Arc::new(ProvisioningWorkflow::new(
            jobs.clone(),
            workspace.clone(),
            &cfg.platform.workbook_name,
        )),
    );
    dispatcher.register(
        JobKind::SheetFinalValidation,
        LifecyclePhase::Ready,
        Arc::new(FinalValidationWorkflow::new(jobs.clone(), workspace.clone())),
    );
    dispatcher.register(
        JobKind::WorkbookSubmit,
        LifecyclePhase::Ready,
        Arc::new(SubmissionWorkflow::new(
            jobs,
            workspace,
            sink,
            &cfg.submission,
        )),
    );
    dispatcher.register_record_hook(Arc::new(IngestionValidator::new(
        secrets,
        reference,
        cfg.validation.clone(),
    )));
    dispatcher
}

async fn run(events: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;
    let dispatcher = build_dispatcher(cfg);

    let lines: Vec<String> = match events {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read event file {}", path.display()))?
            .lines()
            .map(str::to_string)
            .collect(),
        None => std::io::stdin()
            .lock()
            .lines()
            .collect::<std::io::Result<_>>()
            .context("failed to read events from stdin")?,
    };

    let mut dispatched = 0usize;
    for line in lines.iter().filter(|l| !l.trim().is_empty()) {
        let event: PlatformEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "Skipping malformed event line");
                continue;
            }
        };

        let correlation_id = telemetry::generate_correlation_id();
        let span = telemetry::create_event_span(
            &event.topic,
            event.context.job_id.as_deref(),
            Some(&correlation_id),
        );

        match dispatcher.dispatch(&event).instrument(span).await {
            Ok(DispatchOutcome::Job { kind }) => {
                dispatched += 1;
                tracing::info!(job = kind.as_str(), "Job event handled");
            }
            Ok(DispatchOutcome::Records { records }) => {
                dispatched += 1;
                // Annotated records go back to the hosting runtime on stdout
                println!("{}", serde_json::to_string(&records)?);
            }
            Ok(DispatchOutcome::Ignored) => {
                tracing::debug!(topic = %event.topic, "Event ignored");
            }
            Err(err) => {
                tracing::error!(error = %err, topic = %event.topic, "Dispatch failed");
            }
        }
    }

    tracing::info!(dispatched, "Event stream drained");
    contact_intake::platform_metrics().log_stats();
    telemetry::shutdown_telemetry();
    Ok(())
}

fn check_config() -> Result<()> {
    let cfg = config::config()?;
    let mut display = cfg.clone();
    // Never echo the token
    if display.platform.token.is_some() {
        display.platform.token = Some("<set>".to_string());
    }
    println!("{}", toml::to_string_pretty(&display)?);
    Ok(())
}

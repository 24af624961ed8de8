/*
[INPUT]:  CLI arguments, optional YAML configuration file
[OUTPUT]: Interactive drawing-test wizard (TUI), config init, or dry-run validation
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or logging setup
*/

mod cli;
mod tui;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use drawtest_adapter::DrawTestClient;
use drawtest_wizard::{TaskStore, WizardConfig, Workflow};

use crate::tui::{AppSettings, LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory};

#[derive(Parser, Debug)]
#[command(name = "drawtest-wizard", version, about = "Children's drawing test wizard")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    /// Overrides api.base_url from the config file
    #[arg(long = "base-url", value_name = "URL")]
    base_url: Option<String>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[arg(long = "dry-run")]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a configuration file interactively
    Init {
        #[arg(long = "output", value_name = "PATH", default_value = "drawtest.yaml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if let Some(Command::Init { output }) = args.command {
        return cli::init::run_init(output);
    }

    let config = load_config(args.config_path.as_deref(), args.base_url.as_deref())?;

    if args.dry_run {
        init_tracing(&args.log_level)?;
        let questionnaire = config.load_questionnaire()?;
        info!(
            base_url = %config.api.base_url,
            questions = questionnaire.len(),
            poll_interval_secs = config.polling.interval_secs,
            "configuration loaded"
        );
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let log_buffer: LogBufferHandle = Arc::new(StdMutex::new(LogBuffer::new(LOG_BUFFER_CAPACITY)));
    let _file_guard = init_tui_tracing(&args.log_level, log_buffer.clone(), args.log_file.as_deref())?;

    let questionnaire = Arc::new(config.load_questionnaire()?);
    let client = Arc::new(
        DrawTestClient::with_config_and_base_url(config.client_config(), &config.api.base_url)
            .map_err(|err| anyhow!(err.to_string()))
            .context("build drawing-test client")?,
    );
    info!(
        base_url = %client.base_url(),
        questions = questionnaire.len(),
        "starting drawtest-wizard"
    );

    let store = Arc::new(TaskStore::new());
    let workflow = Arc::new(Workflow::new(client.clone(), store, questionnaire));
    let settings = AppSettings {
        poll_interval: config.poll_interval(),
        poll_source: config.polling.status_source,
        output_dir: config.output_dir(),
    };

    tui::run_tui_with_log(workflow, client, settings, log_buffer).await?;
    info!("wizard closed");
    Ok(())
}

fn load_config(path: Option<&Path>, base_url: Option<&str>) -> Result<WizardConfig> {
    let mut config = match path {
        Some(path) => {
            let path_str = path.to_str().context("config path must be valid utf-8")?;
            WizardConfig::from_file(path_str)
                .with_context(|| format!("load config from {}", path.display()))?
                .resolve_paths(path)
        }
        None => WizardConfig::default(),
    };
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    config.validate().context("validate config")?;
    Ok(config)
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

/// Routes events into the TUI log panel and, optionally, a plain log file
fn init_tui_tracing(
    log_level: &str,
    buffer: LogBufferHandle,
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path.file_name().context("log file path must name a file")?;
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(LogWriterFactory::new(buffer))
                .with_ansi(false)
                .with_target(false),
        )
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;

    Ok(guard)
}

/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When WizardConfig schema changes
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use std::path::PathBuf;

use drawtest_wizard::config::{ApiConfig, ExportConfig, PollingConfig, WizardConfig};
use drawtest_wizard::PollStatusSource;

pub fn run_init(output: PathBuf) -> Result<()> {
    println!("{}", style("Drawing test wizard setup").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a wizard configuration.").dim()
    );

    let theme = ColorfulTheme::default();
    let defaults = WizardConfig::default();

    println!("\n{}", style("--- Service ---").bold());
    let base_url: String = Input::with_theme(&theme)
        .with_prompt("Service base URL")
        .default(defaults.api.base_url.clone())
        .interact_text()?;

    let timeout_secs: u64 = Input::with_theme(&theme)
        .with_prompt("Request timeout (seconds)")
        .default(defaults.api.timeout_secs)
        .interact_text()?;

    println!("\n{}", style("--- Report polling ---").bold());
    let interval_secs: u64 = Input::with_theme(&theme)
        .with_prompt("Status check interval (seconds)")
        .default(defaults.polling.interval_secs)
        .interact_text()?;

    let sources = ["latest", "captured_at_setup"];
    let source_selection = Select::with_theme(&theme)
        .with_prompt("Status that gates each re-check")
        .items(&sources)
        .default(0)
        .interact()?;
    let status_source = if source_selection == 0 {
        PollStatusSource::Latest
    } else {
        PollStatusSource::CapturedAtSetup
    };

    println!("\n{}", style("--- Export ---").bold());
    let output_dir: String = Input::with_theme(&theme)
        .with_prompt("Directory for reports and summaries")
        .default(defaults.output_dir().display().to_string())
        .interact_text()?;

    let config = WizardConfig {
        api: ApiConfig {
            base_url,
            timeout_secs,
            ..defaults.api
        },
        polling: PollingConfig {
            interval_secs,
            status_source,
        },
        export: ExportConfig {
            output_dir: Some(PathBuf::from(output_dir)),
        },
        questionnaire_path: None,
    };
    config.validate().context("configuration is not valid")?;

    let yaml = serde_yaml::to_string(&config).context("failed to serialize config to YAML")?;

    std::fs::write(&output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!("Configuration written to: {}", style(output.display()).cyan());

    Ok(())
}

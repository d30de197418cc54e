//! Command-line runner for the form-to-signing pipeline.
//!
//! Uses the same configuration keys as the Lambda function, read from the
//! environment or from a JSON file given with `--config`.

use clap::{Parser, Subcommand};
use formsign_core::config::BridgeConfig;
use log::info;
use std::io::Write;
use std::path::PathBuf;

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "formsign", version, about = "Turn form entries into signing links")]
pub struct Cli {
    /// JSON settings file; keys it omits are read from the environment
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a signing submission for an entry and print its link
    Run {
        #[arg(short, long, value_name = "ENTRY_ID")]
        entry: String,
    },
    /// Fetch and map an entry, printing the payload without submitting it
    Preview {
        #[arg(short, long, value_name = "ENTRY_ID")]
        entry: String,
    },
    /// Validate the configuration and print a summary
    Check,
}

pub fn load_config(path: Option<&PathBuf>) -> Result<BridgeConfig, CliError> {
    let config = match path {
        Some(path) => BridgeConfig::from_file(path)?,
        None => BridgeConfig::from_env()?,
    };
    Ok(config)
}

/// Parses process arguments and runs the selected command.
pub async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(cli, &mut stdout.lock()).await
}

pub async fn execute<W: Write>(cli: Cli, out: &mut W) -> Result<(), CliError> {
    let config = load_config(cli.config.as_ref())?;
    info!("Using profile {}", config.profile);

    match cli.command {
        Command::Run { entry } => {
            let pipeline = formsign_engines::create_pipeline(&config)?;
            let link = pipeline.run(&entry).await?;
            writeln!(out, "{}", link)?;
        }
        Command::Preview { entry } => {
            let pipeline = formsign_engines::create_pipeline(&config)?;
            let payload = pipeline.prepare(&entry).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
        }
        Command::Check => {
            let labels: Vec<String> = config
                .mapping
                .field_table
                .iter()
                .map(|m| format!("{} -> {}", m.source, m.label))
                .collect();
            writeln!(out, "profile: {}", config.profile)?;
            writeln!(out, "form provider: {}", config.form_provider.base_url)?;
            writeln!(out, "signing service: {}", config.signing_service.base_url)?;
            writeln!(out, "template: {}", config.mapping.template_id)?;
            writeln!(out, "role: {}", config.mapping.role_label)?;
            writeln!(out, "send email: {}", config.mapping.send_email)?;
            writeln!(out, "fields: {}", labels.join(", "))?;
            writeln!(
                out,
                "redirect: {} via ?{}=",
                config.handler.redirect_status, config.handler.query_param_name
            )?;
            writeln!(out, "timeout: {}ms", config.request_timeout.as_millis())?;
        }
    }
    Ok(())
}

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use sdtp_core::{CertPolicy, ClientConfig, HttpSdtpClient, SdtpClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::app::{cert_gate, exit_handler, shutdown, terminal};
use crate::cli::{Cli, Command, GlobalArgs};
use crate::{ProcessExit, commands};

pub(crate) async fn run_sdtp() -> Result<ProcessExit> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    let default_level = terminal::resolve_default_log_level(cli.global.quiet, cli.global.verbose);
    terminal::init_tracing(default_level, terminal::is_no_color_requested(&cli.global));
    debug!(?cli, "CLI arguments parsed");

    let config = client_config(&cli.global)?;
    let policy = CertPolicy {
        enabled: cli.global.check_cert_expr,
        warning_days: cli.global.check_cert_days,
    };

    let cancel = CancellationToken::new();
    shutdown::spawn_signal_listener(cancel.clone());

    match &cli.command {
        Command::Check => {
            // Always inspected here, regardless of --check-cert-expr
            let (_, health) =
                cert_gate::inspect(config.cert_path(), config.key_path(), policy.warning_days)?;
            if let Some(exit) = exit_handler::exit_for_health(health) {
                return Ok(exit);
            }
            let client = connect(&config)?;
            Ok(commands::run_check_command(client.as_ref(), &cancel).await)
        }
        Command::List(args) => {
            if let Some(exit) = gate(&config, policy)? {
                return Ok(exit);
            }
            let client = connect(&config)?;
            let mut stdout = io::stdout().lock();
            commands::run_list_command(client.as_ref(), &args.filter.to_tags(), &cancel, &mut stdout)
                .await
        }
        Command::Ingest(args) => {
            if let Some(exit) = gate(&config, policy)? {
                return Ok(exit);
            }
            let client = connect(&config)?;
            info!(dest_dir = %args.dest_dir.display(), "starting ingest");
            commands::run_ingest_command(client, args, &cancel).await
        }
        Command::Register => {
            if let Some(exit) = gate(&config, policy)? {
                return Ok(exit);
            }
            let client = connect(&config)?;
            Ok(commands::run_register_command(client.as_ref(), &cancel).await)
        }
    }
}

fn client_config(global: &GlobalArgs) -> Result<ClientConfig> {
    let config = ClientConfig::new(&global.api_url, &global.cert, &global.key)
        .context("invalid configuration")?
        .with_request_timeout(Duration::from_secs(global.http_timeout))
        .context("invalid configuration")?;
    Ok(config)
}

fn gate(config: &ClientConfig, policy: CertPolicy) -> Result<Option<ProcessExit>> {
    let health = cert_gate::enforce(config.cert_path(), config.key_path(), policy)?;
    Ok(health.and_then(exit_handler::exit_for_health))
}

fn connect(config: &ClientConfig) -> Result<Arc<dyn SdtpClient>> {
    let client = HttpSdtpClient::new(config).context("failed to create SDTP client")?;
    Ok(Arc::new(client))
}

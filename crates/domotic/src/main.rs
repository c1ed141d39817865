mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use domotic_api::{ApiClient, BearerAuth, TransportConfig};
use domotic_core::{JsonFileStore, SessionStore};

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need an API client
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Labels => commands::labels::handle(&cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "domotic", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the API with the stored session
        cmd => {
            let ctx = build_context(&cli.global)?;
            if !cmd.is_public() && !ctx.session.session().is_authenticated() {
                return Err(CliError::NotLoggedIn);
            }

            tracing::debug!(command = ?cmd, base_url = ctx.client.base_url(), "dispatching command");
            commands::dispatch(cmd, &ctx, &cli.global).await
        }
    }
}

/// Wire the session stores, bearer interceptor and HTTP client from the
/// config file, profile, and CLI overrides.
fn build_context(global: &cli::GlobalOpts) -> Result<Context, CliError> {
    let cfg = config::load_config()?;
    let profile = config::resolve(global, &cfg)?;
    let paths = config::storage_paths(&cfg);
    tracing::debug!(
        profile = %profile.name,
        durable = %paths.durable.display(),
        volatile = %paths.volatile.display(),
        "resolved profile"
    );

    let session = SessionStore::new(
        Arc::new(JsonFileStore::new(paths.durable)),
        Arc::new(JsonFileStore::new(paths.volatile)),
    );

    let transport = TransportConfig::default()
        .with_timeout(profile.timeout)
        .with_tls(profile.tls.clone());
    let auth = BearerAuth::new(Arc::new(session.clone()));
    let client = ApiClient::new(&profile.base_url, &transport, Arc::new(auth)).map_err(|e| {
        CliError::Validation {
            field: format!("profile '{}'", profile.name),
            reason: e.to_string(),
        }
    })?;

    Ok(Context {
        client,
        session,
        courtesy_delay: profile.courtesy_delay,
    })
}

//! launchkit - launchd job descriptors and job control
//!
//! Main entry point for the launchkit CLI.

mod cli;
mod cmd_jobs;
mod cmd_plist;
mod cmd_system;
mod output;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use launchkit_config::{Config, ConfigLoader, OutputFormat};
use launchkit_core::control::{AsyncLaunchctl, SubmitRequest};
use launchkit_launchctl::LaunchctlCommand;

use crate::cli::{Cli, Commands};
use crate::cmd_jobs::JobVerb;
use crate::output::Printer;

/// Initialize tracing on stderr so stdout stays machine-readable.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => match ConfigLoader::default_path() {
            Some(path) => ConfigLoader::load_or_default(&path)?,
            None => Config::default(),
        },
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.log_level);
    debug!(binary = %config.launchctl.binary.display(), "configuration loaded");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format
    };
    let printer = Printer::new(format);
    let ctl = AsyncLaunchctl::new(LaunchctlCommand::new(config.launchctl.binary.clone()));

    match cli.command {
        Commands::List { label, pattern } => cmd_jobs::list(&ctl, printer, label, pattern).await,
        Commands::Start { label } => cmd_jobs::control(&ctl, printer, JobVerb::Start, label).await,
        Commands::Stop { label } => cmd_jobs::control(&ctl, printer, JobVerb::Stop, label).await,
        Commands::Remove { label } => cmd_jobs::control(&ctl, printer, JobVerb::Remove, label).await,
        Commands::Restart { label } => {
            cmd_jobs::control(&ctl, printer, JobVerb::Restart, label).await
        }
        Commands::Load(args) => cmd_jobs::load(&ctl, printer, &config, args, false).await,
        Commands::Unload(args) => cmd_jobs::load(&ctl, printer, &config, args, true).await,
        Commands::Submit { label, program, stdout, stderr, args } => {
            let request = SubmitRequest {
                label,
                program,
                stdout_path: stdout,
                stderr_path: stderr,
                arguments: args,
            };
            cmd_jobs::submit(&ctl, printer, request).await
        }
        Commands::Limit { kind, soft, hard } => {
            cmd_system::limit(&ctl, printer, kind, soft, hard).await
        }
        Commands::Getenv { key } => cmd_system::getenv(&ctl, printer, key).await,
        Commands::Setenv { key, value } => cmd_system::setenv(&ctl, printer, key, value).await,
        Commands::Unsetenv { key } => cmd_system::unsetenv(&ctl, printer, key).await,
        Commands::Umask { mask } => cmd_system::umask(&ctl, printer, mask).await,
        Commands::Manager => cmd_system::manager(&ctl, printer).await,
        Commands::Rusage { who } => cmd_system::rusage(&ctl, printer, who).await,
        Commands::Plist(args) => cmd_plist::handle_plist(args),
    }
}

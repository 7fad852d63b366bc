mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod server;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::jira::JiraClient;
use crate::infra::snyk::SnykClient;

#[derive(Parser)]
#[command(
    name = "snyk-jira-sync",
    author,
    version,
    about = "Close Jira tickets when Snyk reports their vulnerabilities fixed"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Receive Snyk webhooks and trigger a sync on `issue.fixed`.
    Serve,
    /// Close the Jira tickets of every fixed Snyk issue, then exit.
    Sync,
    /// Inspect configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    logging::init();
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config = Arc::new(AppConfig::from_env()?);

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command, &config),
        Commands::Serve => cmd::serve::run(build_context(config)).await,
        Commands::Sync => {
            cmd::sync::run(&build_context(config)).await?;
            Ok(())
        }
    }
}

fn build_context(config: Arc<AppConfig>) -> AppContext {
    let scanner = Arc::new(SnykClient::new(
        config.snyk_api_url.clone(),
        config.snyk_token.clone(),
        config.snyk_org_id.clone(),
    ));
    let issue_tracker = Arc::new(JiraClient::new(
        config.jira_base_url.clone(),
        config.jira_email.clone(),
        config.jira_token.clone(),
    ));
    AppContext::new(config, scanner, issue_tracker)
}

use clap::{Args, Subcommand};

use crate::config::AppConfig;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the resolved configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand, config: &AppConfig) -> AppResult<()> {
    match command {
        ConfigCommand::Show => {
            for (label, value) in describe(config) {
                println!("{label}: {value}");
            }
            Ok(())
        }
    }
}

fn describe(cfg: &AppConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Listening port", cfg.port.to_string()),
        ("Webhook secret", mask_secret(&cfg.webhook_secret)),
        ("Snyk API URL", cfg.snyk_api_url.clone()),
        ("Snyk API token", mask_secret(&cfg.snyk_token)),
        ("Snyk org id", display_value(&cfg.snyk_org_id)),
        ("Jira base URL", display_value(&cfg.jira_base_url)),
        ("Jira email", display_value(&cfg.jira_email)),
        ("Jira API token", mask_secret(&cfg.jira_token)),
        (
            "Closing transitions",
            cfg.transition_matcher.names().join(", "),
        ),
        ("Sync trigger mode", cfg.trigger_mode.as_str().to_string()),
        (
            "Sync command",
            cfg.sync_command
                .as_ref()
                .map(|parts| parts.join(" "))
                .unwrap_or_else(|| "<current executable> sync".to_string()),
        ),
    ]
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars = token.chars().collect::<Vec<_>>();
            let prefix = chars[..3].iter().collect::<String>();
            let suffix = chars[chars.len() - 3..].iter().collect::<String>();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

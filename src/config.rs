use std::env;

use crate::domain::transition::TransitionMatcher;
use crate::error::{AppError, AppResult};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SNYK_API_URL: &str = "https://api.snyk.io/v1";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub webhook_secret: Option<String>,
    pub snyk_api_url: String,
    pub snyk_token: Option<String>,
    pub snyk_org_id: Option<String>,
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub transition_matcher: TransitionMatcher,
    pub trigger_mode: TriggerMode,
    pub sync_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerMode {
    /// Run each sync as a child process of the receiver.
    Process,
    /// Run each sync as a task on the receiver's runtime.
    Task,
}

impl TriggerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerMode::Process => "process",
            TriggerMode::Task => "task",
        }
    }
}

impl AppConfig {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match read("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Configuration(format!("PORT is not a valid port: {raw}")))?,
            None => DEFAULT_PORT,
        };

        let trigger_mode = match read("SYNC_TRIGGER_MODE") {
            None => TriggerMode::Process,
            Some(mode) => match mode.to_lowercase().as_str() {
                "process" => TriggerMode::Process,
                "task" => TriggerMode::Task,
                other => {
                    return Err(AppError::Configuration(format!(
                        "unknown SYNC_TRIGGER_MODE '{other}' (expected 'process' or 'task')"
                    )));
                }
            },
        };

        let transition_matcher = match read("SYNC_TRANSITION_NAMES") {
            Some(names) => TransitionMatcher::from_list(&names).ok_or_else(|| {
                AppError::Configuration(
                    "SYNC_TRANSITION_NAMES must name at least one transition".to_string(),
                )
            })?,
            None => TransitionMatcher::default(),
        };

        // The program path is taken verbatim so it may contain spaces.
        let sync_command = read("SYNC_COMMAND").map(|program| {
            let args = read("SYNC_COMMAND_ARGS").unwrap_or_default();
            std::iter::once(program)
                .chain(args.split_whitespace().map(str::to_string))
                .collect::<Vec<_>>()
        });

        Ok(Self {
            port,
            webhook_secret: read("SNYK_WEBHOOK_SECRET"),
            snyk_api_url: read("SNYK_API_URL").unwrap_or_else(|| DEFAULT_SNYK_API_URL.to_string()),
            snyk_token: read("SNYK_API_TOKEN"),
            snyk_org_id: read("SNYK_ORG_ID"),
            jira_base_url: read("JIRA_BASE_URL"),
            jira_email: read("JIRA_EMAIL"),
            jira_token: read("JIRA_API_TOKEN"),
            transition_matcher,
            trigger_mode,
            sync_command,
        })
    }

    pub fn require_webhook(&self) -> AppResult<&str> {
        self.webhook_secret
            .as_deref()
            .ok_or_else(|| AppError::Configuration("SNYK_WEBHOOK_SECRET is not set".to_string()))
    }

    /// Fails with every missing variable named, so one run surfaces them all.
    pub fn require_sync(&self) -> AppResult<()> {
        let required = [
            ("SNYK_API_TOKEN", &self.snyk_token),
            ("SNYK_ORG_ID", &self.snyk_org_id),
            ("JIRA_BASE_URL", &self.jira_base_url),
            ("JIRA_EMAIL", &self.jira_email),
            ("JIRA_API_TOKEN", &self.jira_token),
        ];
        let missing = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Configuration(format!(
                "missing required settings: {}",
                missing.join(", ")
            )))
        }
    }
}

use std::env;
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{Level, error, info};

use crate::error::{AppError, AppResult};
use crate::services::{SyncSlot, SyncTrigger, TriggerOutcome};

/// Runs each sync as a child process that inherits the receiver's environment.
pub struct ProcessSyncTrigger {
    command: SyncCommand,
    slot: SyncSlot,
}

#[derive(Debug, Clone)]
struct SyncCommand {
    program: String,
    args: Vec<String>,
}

impl SyncCommand {
    fn spawn(&self) -> AppResult<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                AppError::Trigger(format!("failed to start '{}': {err}", self.command_line()))
            })
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ProcessSyncTrigger {
    /// Without an explicit command, re-invokes this binary's `sync` subcommand.
    pub fn new(command: Option<Vec<String>>) -> AppResult<Self> {
        let (program, args) = match command {
            Some(mut parts) if !parts.is_empty() => {
                let program = parts.remove(0);
                (program, parts)
            }
            _ => {
                let exe = env::current_exe()?;
                (exe.to_string_lossy().into_owned(), vec!["sync".to_string()])
            }
        };
        Ok(Self {
            command: SyncCommand { program, args },
            slot: SyncSlot::new(),
        })
    }

    pub fn command_line(&self) -> String {
        self.command.command_line()
    }
}

#[async_trait]
impl SyncTrigger for ProcessSyncTrigger {
    async fn trigger(&self) -> AppResult<TriggerOutcome> {
        let Some(mut permit) = self.slot.try_claim() else {
            info!("Sync process already running; queued one more run");
            return Ok(TriggerOutcome::AlreadyRunning);
        };

        let mut child = self.command.spawn()?;
        info!(pid = ?child.id(), command = %self.command_line(), "Sync process started");

        let command = self.command.clone();
        let slot = self.slot.clone();
        tokio::spawn(async move {
            loop {
                match child.wait_with_output().await {
                    Ok(output) => {
                        log_child_output(&output);
                    }
                    Err(err) => error!(error = %err, "Error waiting for sync process"),
                }

                let Some(next) = slot.finish(permit) else {
                    break;
                };
                permit = next;
                info!("Webhooks arrived during the sync; running again");
                child = match command.spawn() {
                    Ok(child) => child,
                    Err(err) => {
                        error!(error = %err, "Error starting sync rerun");
                        break;
                    }
                };
            }
        });

        Ok(TriggerOutcome::Started)
    }
}

/// stdout and stderr of the child, trimmed and joined.
fn captured_text(output: &Output) -> String {
    [&output.stdout, &output.stderr]
        .into_iter()
        .map(|stream| String::from_utf8_lossy(stream).trim_end().to_string())
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The child logs through tracing on stderr whatever the outcome, so the
/// exit status alone decides whether the run is reported as failed.
fn log_child_output(output: &Output) -> Level {
    let text = captured_text(output);
    if output.status.success() {
        if !text.is_empty() {
            info!("Sync output:\n{text}");
        }
        info!("Sync process finished");
        Level::INFO
    } else {
        error!(status = %output.status, "Sync process failed:\n{text}");
        Level::ERROR
    }
}

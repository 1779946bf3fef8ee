use std::process::Stdio;

use log::debug;

use crate::command::EngineCommand;
use crate::config::EngineConfig;
use crate::error::{BridgeError, Result};
use crate::util::{build_engine_command, exit_label};

/// Captured streams of one completed engine invocation. Owned by the
/// launcher for the duration of a call, handed to reconciliation, then
/// discarded.
#[derive(Debug)]
pub struct EngineInvocation {
    pub stdout: String,
    pub stderr: String,
}

/// Run one engine command to completion and capture both output streams.
///
/// Stdin is closed immediately; stdout and stderr are accumulated in full
/// before this returns, so reconciliation never sees partial output. No
/// timeout is imposed: a hung engine blocks the calling task indefinitely.
///
/// A process that cannot be started at all yields [`BridgeError::Spawn`];
/// a non-zero exit yields [`BridgeError::EngineFailed`] carrying the exit
/// status and the verbatim stderr text.
pub async fn run_engine(
    config: &EngineConfig,
    command: &EngineCommand,
) -> Result<EngineInvocation> {
    let args = command.encode()?;
    debug!(
        "spawning engine: {} {} {} ({} args)",
        config.interpreter.display(),
        config.script.display(),
        command.name(),
        args.len()
    );

    let mut cmd = build_engine_command(&config.interpreter, &config.script, command.name(), &args);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = cmd
        .output()
        .await
        .map_err(|source| BridgeError::Spawn { source })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        Ok(EngineInvocation { stdout, stderr })
    } else {
        Err(BridgeError::EngineFailed {
            status: exit_label(&output.status),
            stderr,
        })
    }
}

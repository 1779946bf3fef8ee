use std::env;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::Result;

pub fn env_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

pub fn env_bool(name: &str, default: bool) -> bool {
    match env_optional(name) {
        Some(value) => {
            let v = value.trim().to_ascii_lowercase();
            matches!(v.as_str(), "1" | "true" | "yes" | "y" | "on")
        }
        None => default,
    }
}

/// Resolve a path to absolute form without requiring it to exist.
/// The engine process must see the same file regardless of its own
/// working directory, so every path crosses the boundary absolute.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::path::absolute(path)?)
}

fn command_wrapper() -> Option<Vec<String>> {
    env_optional("DRAWBRIDGE_COMMAND_WRAPPER")
        .and_then(|raw| shlex::split(&raw))
        .filter(|parts| !parts.is_empty())
}

/// Build the engine invocation `<interpreter> <script> <command> <args...>`,
/// optionally prefixed by a wrapper command from the environment (useful for
/// sandboxing or tracing the engine).
pub fn build_engine_command(
    interpreter: &Path,
    script: &Path,
    command_name: &str,
    args: &[String],
) -> Command {
    if let Some(wrapper) = command_wrapper() {
        let mut cmd = Command::new(&wrapper[0]);
        cmd.args(&wrapper[1..])
            .arg(interpreter)
            .arg(script)
            .arg(command_name)
            .args(args);
        cmd
    } else {
        let mut cmd = Command::new(interpreter);
        cmd.arg(script).arg(command_name).args(args);
        cmd
    }
}

/// Describe how a process exited. Reports the signal on Unix when the
/// process did not exit normally.
pub fn exit_label(status: &std::process::ExitStatus) -> String {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(code) = status.code() {
            format!("code {code}")
        } else if let Some(sig) = status.signal() {
            format!("signal {sig}")
        } else {
            "unknown status".to_string()
        }
    }
    #[cfg(not(unix))]
    {
        match status.code() {
            Some(code) => format!("code {code}"),
            None => "unknown status".to_string(),
        }
    }
}

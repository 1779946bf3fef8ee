use std::env;
use std::path::PathBuf;

use crate::util::{env_bool, env_optional};

/// Name of the bridge script the engine-side interpreter runs.
pub const BRIDGE_SCRIPT_NAME: &str = "odg_bridge.py";

/// Caller-facing knobs, all optional. Anything left unset falls back to a
/// `DRAWBRIDGE_*` environment variable and then to a platform default.
#[derive(Debug, Clone, Default)]
pub struct EngineOverrides {
    /// Path to the LibreOffice-bundled Python interpreter.
    pub engine_path: Option<PathBuf>,
    /// Plain Python interpreter to use when no engine path is given.
    pub python_path: Option<PathBuf>,
    /// Location of the bridge script.
    pub script_path: Option<PathBuf>,
    /// Default output path for operations that accept one.
    pub output_path: Option<PathBuf>,
    /// Whether text modifications also export a PDF.
    pub export_pdf: Option<bool>,
}

/// Resolved per-instance configuration. Immutable after construction; the
/// facade holds one and passes it by reference into every invocation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Interpreter spawned for every bridge invocation.
    pub interpreter: PathBuf,
    /// Bridge script handed to the interpreter as its first argument.
    pub script: PathBuf,
    /// Default output path substituted when an operation gets none.
    pub output_path: Option<PathBuf>,
    /// Default for the export-PDF flag of text modifications.
    pub export_pdf: bool,
}

impl EngineConfig {
    pub fn resolve(overrides: EngineOverrides) -> Self {
        let engine = overrides
            .engine_path
            .or_else(|| env_optional("DRAWBRIDGE_ENGINE").map(PathBuf::from));
        let python = overrides
            .python_path
            .or_else(|| env_optional("DRAWBRIDGE_PYTHON").map(PathBuf::from));
        let interpreter = engine
            .or(python)
            .unwrap_or_else(default_engine_interpreter);
        let script = overrides
            .script_path
            .or_else(|| env_optional("DRAWBRIDGE_SCRIPT").map(PathBuf::from))
            .unwrap_or_else(default_script_path);
        let output_path = overrides
            .output_path
            .or_else(|| env_optional("DRAWBRIDGE_OUTPUT").map(PathBuf::from));
        let export_pdf = overrides
            .export_pdf
            .unwrap_or_else(|| env_bool("DRAWBRIDGE_EXPORT_PDF", true));
        EngineConfig {
            interpreter,
            script,
            output_path,
            export_pdf,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::resolve(EngineOverrides::default())
    }
}

/// LibreOffice ships its own Python; these are the stock install locations
/// per platform family.
fn default_engine_interpreter() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:\\Program Files\\LibreOffice\\program\\python.exe")
    } else if cfg!(target_os = "macos") {
        PathBuf::from("/Applications/LibreOffice.app/Contents/MacOS/python")
    } else {
        PathBuf::from("/usr/lib/libreoffice/program/python3")
    }
}

/// The bridge script is expected next to the executable under `python/`,
/// mirroring how the package is laid out when installed.
fn default_script_path() -> PathBuf {
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.join("python").join(BRIDGE_SCRIPT_NAME);
        }
    }
    PathBuf::from("python").join(BRIDGE_SCRIPT_NAME)
}

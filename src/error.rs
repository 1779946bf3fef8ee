use std::io;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Canonical error surface for the bridge.
///
/// Unparseable engine stdout is deliberately *not* represented here: an
/// invocation that exits 0 always reconciles to a value, degrading to a raw
/// wrapper when no JSON can be recovered (see [`crate::reconcile`]).
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The engine process image could not be launched at all (interpreter
    /// missing, permission denied). Distinct from a non-zero exit.
    #[error("failed to start engine process: {source}")]
    Spawn {
        #[source]
        source: io::Error,
    },

    /// The engine started but exited unsuccessfully. Carries the full
    /// accumulated stderr so the engine's diagnostic is never dropped.
    #[error("engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },

    /// Facade-level wrapper naming the logical operation that failed.
    /// The root cause propagates unchanged as the source.
    #[error("{op} failed: {source}")]
    Operation {
        op: &'static str,
        #[source]
        source: Box<BridgeError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

impl BridgeError {
    /// Wrap a lower-layer error with the name of the failing operation.
    pub(crate) fn in_operation(op: &'static str) -> impl FnOnce(BridgeError) -> BridgeError {
        move |source| BridgeError::Operation {
            op,
            source: Box::new(source),
        }
    }
}

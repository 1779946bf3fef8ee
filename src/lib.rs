//! Subprocess bridge to a vector-graphics document engine, plus PDF form
//! tools.
//!
//! The bridge drives LibreOffice's bundled Python interpreter running a
//! fixed script. Each logical operation encodes a command into a positional
//! argument vector, spawns one engine process, waits for it to exit with
//! both output streams fully accumulated, and then recovers a single JSON
//! result from a stdout stream that may start with diagnostic noise.
//!
//! ```no_run
//! use std::path::Path;
//! use drawbridge::{EngineConfig, OdgProcessor};
//!
//! # async fn demo() -> drawbridge::Result<()> {
//! let processor = OdgProcessor::new(EngineConfig::default());
//! let info = processor.get_info(Path::new("diagram.odg")).await?;
//! println!("{info}");
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod launch;
pub mod ops;
pub mod pdf;
pub mod reconcile;
pub mod util;

pub use command::{EngineCommand, ShapeTextMap};
pub use config::{EngineConfig, EngineOverrides};
pub use error::{BridgeError, Result};
pub use launch::{EngineInvocation, run_engine};
pub use ops::OdgProcessor;
pub use reconcile::reconcile;

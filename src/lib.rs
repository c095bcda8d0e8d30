pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{CleanupContext, CleanupOptions, CleanupSettings};
pub use core::engine::CleanupEngine;
pub use domain::model::{CleanupReport, RunOutcome};
pub use utils::error::{CleanupError, Result};

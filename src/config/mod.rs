pub mod context;
pub mod toml_config;

pub use context::{CleanupContext, CleanupPaths};
pub use toml_config::CleanupSettings;

use serde::{Deserialize, Serialize};

/// 三個執行旗標
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupOptions {
    pub remove_all_printers: bool,
    pub force: bool,
    pub user_level_only: bool,
}

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::CleanupOptions;
    use crate::utils::logger::LogFormat;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "printer-reset")]
    #[command(about = "Reset printer registry preferences, spooler queue, drivers and ports")]
    pub struct CliConfig {
        /// Remove every installed printer during the system phase
        #[arg(long, visible_alias = "RemoveAllPrinters")]
        pub remove_all_printers: bool,

        /// Do not ask for confirmation before removing printers
        #[arg(long, visible_alias = "Force")]
        pub force: bool,

        /// Only clean user-level state, even when elevated
        #[arg(long, visible_alias = "UserLevelOnly")]
        pub user_level_only: bool,

        /// Optional TOML settings file
        #[arg(long)]
        pub config: Option<PathBuf>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, value_enum, default_value = "compact")]
        pub log_format: LogFormat,
    }

    impl CliConfig {
        pub fn options(&self) -> CleanupOptions {
            CleanupOptions {
                remove_all_printers: self.remove_all_printers,
                force: self.force,
                user_level_only: self.user_level_only,
            }
        }
    }

}

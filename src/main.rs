use anyhow::Context;
use clap::Parser;
use printer_reset::adapters::{windows_host, WindowsPrivilegeProbe};
use printer_reset::domain::ports::PrivilegeProbe;
use printer_reset::utils::{logger, validation::Validate};
use printer_reset::{CleanupContext, CleanupEngine, CleanupSettings, CliConfig, RunOutcome};

fn load_settings(config: &CliConfig) -> anyhow::Result<CleanupSettings> {
    match &config.config {
        Some(path) => CleanupSettings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(CleanupSettings::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose, config.log_format);
    tracing::debug!("CLI config: {:?}", config);

    let settings = match load_settings(&config) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    let is_admin = WindowsPrivilegeProbe::new().is_elevated();
    let context = CleanupContext::from_settings(config.options(), &settings, is_admin);

    // 驗證配置
    if let Err(e) = context.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let engine = CleanupEngine::new(windows_host(), context);

    match engine.run().await {
        Ok(RunOutcome::Completed(_)) => {
            tracing::info!("✅ Printer reset completed");
        }
        Ok(RunOutcome::Declined(_)) => {
            tracing::info!("Printer reset cancelled by user");
        }
        Err(e) => {
            tracing::error!(
                "❌ Printer reset failed: {} (Category: {:?})",
                e,
                e.category()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    }
}

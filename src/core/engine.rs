use crate::config::CleanupContext;
use crate::core::system_phase::{run_system_phase, SystemPhaseOutcome};
use crate::core::user_phase::{run_user_phase, BACKUP_TIMESTAMP_FORMAT};
use crate::domain::model::{CleanupReport, ItemKind, RunOutcome, ServiceState};
use crate::domain::ports::HostServices;
use crate::utils::error::Result;

pub struct CleanupEngine {
    host: HostServices,
    context: CleanupContext,
}

impl CleanupEngine {
    pub fn new(host: HostServices, context: CleanupContext) -> Self {
        Self { host, context }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("Starting printer reset");

        let mut options = self.context.options;
        if !self.context.is_admin {
            tracing::warn!(
                "⚠️ Not running as administrator, only user-level cleanup will be performed"
            );
            options.user_level_only = true;
        }

        let timestamp = chrono::Local::now()
            .format(BACKUP_TIMESTAMP_FORMAT)
            .to_string();
        let mut report = CleanupReport {
            user_level_only: options.user_level_only,
            ..CleanupReport::default()
        };

        run_user_phase(&self.host, &self.context, &mut report, &timestamp).await;

        if options.user_level_only {
            log_summary(&report);
            return Ok(RunOutcome::Completed(report));
        }

        match run_system_phase(&self.host, &self.context, &options, &mut report).await {
            Ok(SystemPhaseOutcome::Completed) => {
                log_summary(&report);
                Ok(RunOutcome::Completed(report))
            }
            Ok(SystemPhaseOutcome::Declined) => Ok(RunOutcome::Declined(report)),
            Err(e) => {
                tracing::error!("❌ Printer reset aborted: {}", e);
                self.ensure_spooler_running().await;
                Err(e)
            }
        }
    }

    /// 中止前盡量讓 spooler 保持執行中，失敗只記錄
    async fn ensure_spooler_running(&self) {
        let service = self.context.spooler_service.as_str();

        match self.host.services.state(service).await {
            Ok(ServiceState::Running) => return,
            Ok(state) => tracing::info!("{} is {:?}, attempting to start it", service, state),
            Err(e) => tracing::debug!("Could not query {}: {}", service, e),
        }

        match self.host.services.start(service).await {
            Ok(()) => tracing::info!("✅ {} service started", service),
            Err(e) => tracing::error!("❌ Could not restart {}: {}", service, e),
        }
    }
}

fn log_summary(report: &CleanupReport) {
    tracing::info!(
        "📊 Summary - registry locations cleared: {}, backups written: {}, recent items: {}, temp entries: {}",
        report.removed_count(ItemKind::RegistryLocation),
        report.backups.len(),
        report.removed_count(ItemKind::RecentItem),
        report.removed_count(ItemKind::TempEntry),
    );

    if report.user_level_only {
        return;
    }

    tracing::info!(
        "📊 Summary - drivers removed: {}, ports removed: {}, driver packages removed: {}, spool files removed: {}, all printers removed: {}",
        report.drivers_removed(),
        report.ports_removed(),
        report.removed_count(ItemKind::DriverPackage),
        report.removed_count(ItemKind::SpoolFile),
        if report.all_printers_removed { "yes" } else { "no" },
    );
}

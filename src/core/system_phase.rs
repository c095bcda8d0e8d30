use crate::config::{CleanupContext, CleanupOptions};
use crate::core::snapshot::InUseSnapshot;
use crate::core::user_phase::remove_entries;
use crate::domain::model::{CleanupReport, ItemKind, ItemOutcome, Printer};
use crate::domain::ports::HostServices;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPhaseOutcome {
    Completed,
    Declined,
}

/// 系統層級清理。只有 spooler 停止/啟動失敗與列舉印表機失敗會以 Err 回傳，
/// 其餘單一項目失敗都記錄在 report 中。
pub async fn run_system_phase(
    host: &HostServices,
    context: &CleanupContext,
    options: &CleanupOptions,
    report: &mut CleanupReport,
) -> Result<SystemPhaseOutcome> {
    tracing::info!("🖨️ Starting system-level cleanup");
    let service = context.spooler_service.as_str();

    tracing::info!("Stopping {} service", service);
    host.services.stop(service).await?;

    let spool_dir = &context.paths.spool_dir;
    tracing::info!("Purging spool queue in {}", spool_dir.display());
    let purged = match host.files.list_files(spool_dir).await {
        Ok(queued) => {
            remove_entries(host.files.as_ref(), ItemKind::SpoolFile, queued, report).await
        }
        Err(e) => {
            tracing::warn!("⚠️ Could not list {}: {}", spool_dir.display(), e);
            0
        }
    };
    tracing::info!("Removed {} queued spool files", purged);

    tracing::info!("Starting {} service", service);
    host.services.start(service).await?;
    if !context.settle_delay.is_zero() {
        tracing::debug!("Waiting {:?} for the spooler to settle", context.settle_delay);
        tokio::time::sleep(context.settle_delay).await;
    }

    let installed = host.printers.list_printers().await?;
    tracing::info!("Found {} installed printers", installed.len());

    if options.remove_all_printers {
        if !options.force && !installed.is_empty() {
            let prompt = format!(
                "Remove ALL {} installed printers? This cannot be undone.",
                installed.len()
            );
            if !host.confirm.confirm(&prompt) {
                tracing::info!("Printer removal declined, stopping without further changes");
                return Ok(SystemPhaseOutcome::Declined);
            }
        }
        let all_removed = remove_printers(host, &installed, report).await;
        report.all_printers_removed = all_removed;
    }

    // 移除印表機之後重新列舉，才能算出真正仍在使用的驅動與連接埠
    let snapshot = InUseSnapshot::capture(host.printers.as_ref()).await?;
    tracing::debug!(
        "In-use snapshot taken from {} remaining printers",
        snapshot.printer_count()
    );

    remove_unused_drivers(host, context, &snapshot, report).await;
    remove_unused_ports(host, &snapshot, report).await;
    remove_unused_packages(host, context, &snapshot, report).await;

    Ok(SystemPhaseOutcome::Completed)
}

/// 回傳是否全部移除成功
async fn remove_printers(
    host: &HostServices,
    installed: &[Printer],
    report: &mut CleanupReport,
) -> bool {
    let mut all_removed = true;
    for printer in installed {
        match host.printers.remove_printer(&printer.name).await {
            Ok(()) => {
                tracing::info!("🗑️ Removed printer {}", printer.name);
                report.record(ItemOutcome::removed(ItemKind::Printer, &printer.name));
            }
            Err(e) => {
                all_removed = false;
                tracing::warn!("⚠️ Failed to remove printer {}: {}", printer.name, e);
                report.record(ItemOutcome::failed(
                    ItemKind::Printer,
                    &printer.name,
                    e.to_string(),
                ));
            }
        }
    }
    all_removed
}

async fn remove_unused_drivers(
    host: &HostServices,
    context: &CleanupContext,
    snapshot: &InUseSnapshot,
    report: &mut CleanupReport,
) {
    let drivers = match host.printers.list_drivers().await {
        Ok(drivers) => drivers,
        Err(e) => {
            tracing::warn!("⚠️ Could not enumerate printer drivers: {}", e);
            return;
        }
    };

    let mut removed = 0;
    for driver in drivers {
        if let Some(reason) = snapshot.driver_skip_reason(&driver) {
            tracing::debug!("Keeping driver {} ({})", driver.name, reason);
            report.record(ItemOutcome::skipped(ItemKind::Driver, &driver.name, reason));
            continue;
        }

        let first_error = match host.printers.remove_driver(&driver.name, None).await {
            Ok(()) => {
                tracing::info!("🗑️ Removed driver {}", driver.name);
                report.record(ItemOutcome::removed(ItemKind::Driver, &driver.name));
                removed += 1;
                continue;
            }
            Err(e) => e,
        };

        let environment = driver
            .environment
            .as_deref()
            .unwrap_or(context.fallback_environment.as_str());
        tracing::debug!(
            "Retrying removal of driver {} for environment '{}' after: {}",
            driver.name,
            environment,
            first_error
        );

        match host
            .printers
            .remove_driver(&driver.name, Some(environment))
            .await
        {
            Ok(()) => {
                tracing::info!("🗑️ Removed driver {} ({})", driver.name, environment);
                report.record(ItemOutcome::removed(ItemKind::Driver, &driver.name));
                removed += 1;
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to remove driver {}: {}", driver.name, e);
                report.record(ItemOutcome::failed(
                    ItemKind::Driver,
                    &driver.name,
                    e.to_string(),
                ));
            }
        }
    }
    tracing::info!("Removed {} unused printer drivers", removed);
}

async fn remove_unused_ports(
    host: &HostServices,
    snapshot: &InUseSnapshot,
    report: &mut CleanupReport,
) {
    let ports = match host.printers.list_ports().await {
        Ok(ports) => ports,
        Err(e) => {
            tracing::warn!("⚠️ Could not enumerate printer ports: {}", e);
            return;
        }
    };

    let mut removed = 0;
    for port in ports {
        if let Some(reason) = snapshot.port_skip_reason(&port) {
            tracing::debug!("Keeping port {} ({})", port.name, reason);
            report.record(ItemOutcome::skipped(ItemKind::Port, &port.name, reason));
            continue;
        }

        match host.printers.remove_port(&port.name).await {
            Ok(()) => {
                tracing::info!("🗑️ Removed port {}", port.name);
                report.record(ItemOutcome::removed(ItemKind::Port, &port.name));
                removed += 1;
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to remove port {}: {}", port.name, e);
                report.record(ItemOutcome::failed(ItemKind::Port, &port.name, e.to_string()));
            }
        }
    }
    tracing::info!("Removed {} unused printer ports", removed);
}

/// Driver store 清理失敗很常見 (套件仍被系統使用)，只留 debug 紀錄
async fn remove_unused_packages(
    host: &HostServices,
    context: &CleanupContext,
    snapshot: &InUseSnapshot,
    report: &mut CleanupReport,
) {
    let packages = match host
        .driver_store
        .list_packages(&context.driver_store_class)
        .await
    {
        Ok(packages) => packages,
        Err(e) => {
            tracing::debug!("Driver store enumeration skipped: {}", e);
            return;
        }
    };

    for package in packages {
        if let Some(reason) = snapshot.package_skip_reason(&package) {
            report.record(ItemOutcome::skipped(
                ItemKind::DriverPackage,
                &package.published_name,
                reason,
            ));
            continue;
        }

        match host.driver_store.remove_package(&package.published_name).await {
            Ok(()) => {
                tracing::info!("🗑️ Removed driver package {}", package.published_name);
                report.record(ItemOutcome::removed(
                    ItemKind::DriverPackage,
                    &package.published_name,
                ));
            }
            Err(e) => {
                tracing::debug!("Driver package {} kept: {}", package.published_name, e);
                report.record(ItemOutcome::failed(
                    ItemKind::DriverPackage,
                    &package.published_name,
                    e.to_string(),
                ));
            }
        }
    }
}

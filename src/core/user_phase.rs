use crate::config::CleanupContext;
use crate::domain::model::{CleanupReport, ItemKind, ItemOutcome, RegistryBackup};
use crate::domain::policy::{is_print_temp_entry, is_recent_print_shortcut, registry_slug};
use crate::domain::ports::{FileSystem, HostServices};
use std::path::{Path, PathBuf};

pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn backup_file_name(location: &str, timestamp: &str) -> String {
    format!("PrinterRegBackup_{}_{}.reg", registry_slug(location), timestamp)
}

/// 使用者層級清理：登錄檔偏好、最近使用捷徑、暫存檔。
/// 任何單一項目失敗只記錄警告，不中斷整個階段。
pub async fn run_user_phase(
    host: &HostServices,
    context: &CleanupContext,
    report: &mut CleanupReport,
    timestamp: &str,
) {
    tracing::info!("👤 Starting user-level cleanup");

    clear_registry_locations(host, context, report, timestamp).await;
    clean_recent_items(host.files.as_ref(), context, report).await;
    clean_temp_entries(host.files.as_ref(), context, report).await;

    tracing::info!("👤 User-level cleanup finished");
}

async fn clear_registry_locations(
    host: &HostServices,
    context: &CleanupContext,
    report: &mut CleanupReport,
    timestamp: &str,
) {
    for location in &context.paths.registry_locations {
        match host.registry.exists(location).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("Registry location {} not present, skipping", location);
                report.record(ItemOutcome::skipped(
                    ItemKind::RegistryLocation,
                    location,
                    "not present",
                ));
                continue;
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not open {}: {}", location, e);
                report.record(ItemOutcome::failed(
                    ItemKind::RegistryLocation,
                    location,
                    e.to_string(),
                ));
                continue;
            }
        }

        // 先備份，備份失敗就不清除
        let backup = context
            .paths
            .backup_dir
            .join(backup_file_name(location, timestamp));
        if let Err(e) = host.registry.export(location, &backup).await {
            tracing::warn!("⚠️ Backup of {} failed, leaving it untouched: {}", location, e);
            report.record(ItemOutcome::failed(
                ItemKind::RegistryLocation,
                location,
                format!("backup failed: {}", e),
            ));
            continue;
        }
        tracing::info!("💾 Backed up {} to {}", location, backup.display());
        report.backups.push(RegistryBackup {
            location: location.clone(),
            file: backup,
        });

        match host.registry.clear_children(location).await {
            Ok(count) => {
                tracing::info!("🧹 Cleared {} entries under {}", count, location);
                report.record(ItemOutcome::removed(ItemKind::RegistryLocation, location));
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to clear {}: {}", location, e);
                report.record(ItemOutcome::failed(
                    ItemKind::RegistryLocation,
                    location,
                    e.to_string(),
                ));
            }
        }
    }
}

async fn clean_recent_items(
    files: &dyn FileSystem,
    context: &CleanupContext,
    report: &mut CleanupReport,
) {
    let Some(recent_dir) = &context.paths.recent_dir else {
        tracing::warn!("⚠️ Recent items directory could not be determined, skipping");
        return;
    };

    tracing::info!("Removing printer shortcuts from {}", recent_dir.display());
    let removed = remove_matching(
        files,
        recent_dir,
        ItemKind::RecentItem,
        is_recent_print_shortcut,
        report,
    )
    .await;
    tracing::info!("Removed {} recent printer shortcuts", removed);
}

async fn clean_temp_entries(
    files: &dyn FileSystem,
    context: &CleanupContext,
    report: &mut CleanupReport,
) {
    for temp_dir in &context.paths.temp_dirs {
        tracing::info!("Removing print-related temp entries from {}", temp_dir.display());
        let removed =
            remove_matching(files, temp_dir, ItemKind::TempEntry, is_print_temp_entry, report)
                .await;
        tracing::info!("Removed {} temp entries", removed);
    }
}

/// 刪除目錄下符合條件的項目，回傳成功刪除的數量
pub(crate) async fn remove_matching(
    files: &dyn FileSystem,
    dir: &Path,
    kind: ItemKind,
    matches: impl Fn(&Path) -> bool,
    report: &mut CleanupReport,
) -> usize {
    let entries: Vec<PathBuf> = match files.list_entries(dir).await {
        Ok(entries) => entries.into_iter().filter(|p| matches(p.as_path())).collect(),
        Err(e) => {
            tracing::warn!("⚠️ Could not list {}: {}", dir.display(), e);
            return 0;
        }
    };
    remove_entries(files, kind, entries, report).await
}

/// 逐一刪除，失敗記錄在 report 中，回傳成功刪除的數量
pub(crate) async fn remove_entries(
    files: &dyn FileSystem,
    kind: ItemKind,
    entries: Vec<PathBuf>,
    report: &mut CleanupReport,
) -> usize {
    let mut removed = 0;
    for entry in entries {
        let name = entry.display().to_string();
        match files.remove_entry(&entry).await {
            Ok(()) => {
                tracing::debug!("Removed {} {}", kind, name);
                report.record(ItemOutcome::removed(kind, name));
                removed += 1;
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not remove {} {}: {}", kind, name, e);
                report.record(ItemOutcome::failed(kind, name, e.to_string()));
            }
        }
    }
    removed
}

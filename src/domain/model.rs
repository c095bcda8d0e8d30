use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Printer {
    pub name: String,
    pub driver_name: String,
    pub port_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterDriver {
    pub name: String,
    /// 例如 "Windows x64"，重試移除時使用
    pub environment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterPort {
    pub name: String,
    pub monitor: Option<String>,
    pub description: Option<String>,
}

/// Driver store 中的驅動程式套件 (pnputil 列出的 oemNN.inf)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverPackage {
    pub published_name: String,
    pub original_name: Option<String>,
    pub provider: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryBackup {
    pub location: String,
    pub file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceState {
    Running,
    Stopped,
    Pending,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    RegistryLocation,
    RecentItem,
    TempEntry,
    SpoolFile,
    Printer,
    Driver,
    Port,
    DriverPackage,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemKind::RegistryLocation => "registry location",
            ItemKind::RecentItem => "recent item",
            ItemKind::TempEntry => "temp entry",
            ItemKind::SpoolFile => "spool file",
            ItemKind::Printer => "printer",
            ItemKind::Driver => "driver",
            ItemKind::Port => "port",
            ItemKind::DriverPackage => "driver package",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Removed,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub kind: ItemKind,
    pub name: String,
    pub outcome: Outcome,
}

impl ItemOutcome {
    pub fn removed(kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            outcome: Outcome::Removed,
        }
    }

    pub fn skipped(kind: ItemKind, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            outcome: Outcome::Skipped(reason.into()),
        }
    }

    pub fn failed(kind: ItemKind, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            outcome: Outcome::Failed(reason.into()),
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self.outcome, Outcome::Removed)
    }
}

/// 一次執行的結果彙整，所有計數都由 outcomes 推導
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupReport {
    pub user_level_only: bool,
    pub backups: Vec<RegistryBackup>,
    pub outcomes: Vec<ItemOutcome>,
    pub all_printers_removed: bool,
}

impl CleanupReport {
    pub fn record(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn removed_count(&self, kind: ItemKind) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.kind == kind && o.is_removed())
            .count()
    }

    pub fn failed_count(&self, kind: ItemKind) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.kind == kind && matches!(o.outcome, Outcome::Failed(_)))
            .count()
    }

    pub fn removed_names(&self, kind: ItemKind) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.kind == kind && o.is_removed())
            .map(|o| o.name.as_str())
            .collect()
    }

    pub fn drivers_removed(&self) -> usize {
        self.removed_count(ItemKind::Driver)
    }

    pub fn ports_removed(&self) -> usize {
        self.removed_count(ItemKind::Port)
    }

    pub fn printers_removed(&self) -> usize {
        self.removed_count(ItemKind::Printer)
    }
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(CleanupReport),
    /// 使用者拒絕移除所有印表機，屬於正常結束
    Declined(CleanupReport),
}

impl RunOutcome {
    pub fn report(&self) -> &CleanupReport {
        match self {
            RunOutcome::Completed(report) | RunOutcome::Declined(report) => report,
        }
    }

    pub fn is_declined(&self) -> bool {
        matches!(self, RunOutcome::Declined(_))
    }
}

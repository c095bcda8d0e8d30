use crate::config::{CleanupOptions, CleanupSettings};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_user_registry_path,
    Validate,
};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REGISTRY_LOCATIONS: &[&str] = &[
    r"HKCU\Printers\Connections",
    r"HKCU\Printers\DevModePerUser",
    r"HKCU\Printers\DevModes2",
    r"HKCU\Printers\Settings",
    r"HKCU\Software\Microsoft\Windows NT\CurrentVersion\Devices",
    r"HKCU\Software\Microsoft\Windows NT\CurrentVersion\PrinterPorts",
    r"HKCU\Software\Microsoft\Windows NT\CurrentVersion\Windows",
];

pub const DEFAULT_SPOOLER_SERVICE: &str = "Spooler";
pub const DEFAULT_SETTLE_SECONDS: u64 = 3;
pub const DEFAULT_DRIVER_STORE_CLASS: &str = "Printer";
pub const DEFAULT_FALLBACK_ENVIRONMENT: &str = "Windows x64";
const MAX_SETTLE_SECONDS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupPaths {
    pub registry_locations: Vec<String>,
    pub recent_dir: Option<PathBuf>,
    pub temp_dirs: Vec<PathBuf>,
    pub spool_dir: PathBuf,
    pub backup_dir: PathBuf,
}

impl CleanupPaths {
    /// 依目前使用者的環境推導預設路徑
    pub fn detect() -> Self {
        let mut temp_dirs = vec![std::env::temp_dir()];
        if let Some(local) = dirs::data_local_dir() {
            let local_temp = local.join("Temp");
            if !temp_dirs.contains(&local_temp) {
                temp_dirs.push(local_temp);
            }
        }

        let system_root =
            std::env::var_os("SystemRoot").map_or_else(|| PathBuf::from(r"C:\Windows"), PathBuf::from);

        Self {
            registry_locations: DEFAULT_REGISTRY_LOCATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            recent_dir: dirs::data_dir().map(|d| d.join("Microsoft").join("Windows").join("Recent")),
            temp_dirs,
            spool_dir: system_root.join("System32").join("spool").join("PRINTERS"),
            backup_dir: std::env::temp_dir(),
        }
    }

    fn with_overrides(mut self, settings: &CleanupSettings) -> Self {
        if let Some(locations) = settings.registry_locations() {
            self.registry_locations = locations.to_vec();
        }
        if let Some(recent) = settings.recent_dir() {
            self.recent_dir = Some(recent.to_path_buf());
        }
        if let Some(temp_dirs) = settings.temp_dirs() {
            self.temp_dirs = temp_dirs.to_vec();
        }
        if let Some(spool) = settings.spool_dir() {
            self.spool_dir = spool.to_path_buf();
        }
        if let Some(backup) = settings.backup_dir() {
            self.backup_dir = backup.to_path_buf();
        }
        self
    }
}

/// 取代全域狀態：權限、路徑與旗標都明確傳入 engine
#[derive(Debug, Clone)]
pub struct CleanupContext {
    pub is_admin: bool,
    pub options: CleanupOptions,
    pub paths: CleanupPaths,
    pub spooler_service: String,
    pub settle_delay: Duration,
    pub driver_store_class: String,
    pub fallback_environment: String,
}

impl CleanupContext {
    pub fn new(options: CleanupOptions, paths: CleanupPaths, is_admin: bool) -> Self {
        Self {
            is_admin,
            options,
            paths,
            spooler_service: DEFAULT_SPOOLER_SERVICE.to_string(),
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_SECONDS),
            driver_store_class: DEFAULT_DRIVER_STORE_CLASS.to_string(),
            fallback_environment: DEFAULT_FALLBACK_ENVIRONMENT.to_string(),
        }
    }

    pub fn from_settings(options: CleanupOptions, settings: &CleanupSettings, is_admin: bool) -> Self {
        let paths = CleanupPaths::detect().with_overrides(settings);
        let mut context = Self::new(options, paths, is_admin);

        if let Some(service) = settings.service_name() {
            context.spooler_service = service.to_string();
        }
        if let Some(seconds) = settings.settle_seconds() {
            context.settle_delay = Duration::from_secs(seconds);
        }
        if let Some(class) = settings.driver_store_class() {
            context.driver_store_class = class.to_string();
        }
        if let Some(environment) = settings.fallback_environment() {
            context.fallback_environment = environment.to_string();
        }
        context
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

impl Validate for CleanupContext {
    fn validate(&self) -> Result<()> {
        for location in &self.paths.registry_locations {
            validate_user_registry_path("registry.locations", location)?;
        }
        if let Some(recent) = &self.paths.recent_dir {
            validate_path("paths.recent_dir", recent)?;
        }
        for dir in &self.paths.temp_dirs {
            validate_path("paths.temp_dirs", dir)?;
        }
        validate_path("paths.spool_dir", &self.paths.spool_dir)?;
        validate_path("paths.backup_dir", &self.paths.backup_dir)?;

        validate_non_empty_string("spooler.service_name", &self.spooler_service)?;
        validate_range(
            "spooler.settle_seconds",
            self.settle_delay.as_secs(),
            0,
            MAX_SETTLE_SECONDS,
        )?;
        validate_non_empty_string("driver_store.class", &self.driver_store_class)?;
        validate_non_empty_string("drivers.fallback_environment", &self.fallback_environment)?;
        Ok(())
    }
}

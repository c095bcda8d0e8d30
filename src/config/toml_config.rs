use crate::utils::error::{CleanupError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `--config` 指定的設定檔，所有欄位都可省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanupSettings {
    pub registry: Option<RegistrySettings>,
    pub paths: Option<PathSettings>,
    pub spooler: Option<SpoolerSettings>,
    pub driver_store: Option<DriverStoreSettings>,
    pub drivers: Option<DriverSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySettings {
    pub locations: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathSettings {
    pub recent_dir: Option<PathBuf>,
    pub temp_dirs: Option<Vec<PathBuf>>,
    pub spool_dir: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpoolerSettings {
    pub service_name: Option<String>,
    pub settle_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverStoreSettings {
    pub class: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverSettings {
    pub fallback_environment: Option<String>,
}

impl CleanupSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${USERPROFILE})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CleanupError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn registry_locations(&self) -> Option<&[String]> {
        self.registry.as_ref()?.locations.as_deref()
    }

    pub fn recent_dir(&self) -> Option<&Path> {
        self.paths.as_ref()?.recent_dir.as_deref()
    }

    pub fn temp_dirs(&self) -> Option<&[PathBuf]> {
        self.paths.as_ref()?.temp_dirs.as_deref()
    }

    pub fn spool_dir(&self) -> Option<&Path> {
        self.paths.as_ref()?.spool_dir.as_deref()
    }

    pub fn backup_dir(&self) -> Option<&Path> {
        self.paths.as_ref()?.backup_dir.as_deref()
    }

    pub fn service_name(&self) -> Option<&str> {
        self.spooler.as_ref()?.service_name.as_deref()
    }

    pub fn settle_seconds(&self) -> Option<u64> {
        self.spooler.as_ref()?.settle_seconds
    }

    pub fn driver_store_class(&self) -> Option<&str> {
        self.driver_store.as_ref()?.class.as_deref()
    }

    pub fn fallback_environment(&self) -> Option<&str> {
        self.drivers.as_ref()?.fallback_environment.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_settings() {
        let settings = CleanupSettings::from_toml_str(
            r#"
[registry]
locations = ['HKCU\Printers\Settings']

[spooler]
settle_seconds = 0
"#,
        )
        .unwrap();

        assert_eq!(
            settings.registry_locations().unwrap(),
            &[r"HKCU\Printers\Settings".to_string()]
        );
        assert_eq!(settings.settle_seconds(), Some(0));
        assert!(settings.service_name().is_none());
        assert!(settings.spool_dir().is_none());
    }

    #[test]
    fn test_empty_settings() {
        let settings = CleanupSettings::from_toml_str("").unwrap();
        assert!(settings.registry_locations().is_none());
        assert!(settings.temp_dirs().is_none());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("PRINTER_RESET_TEST_SPOOL", "D:/spool");
        let settings = CleanupSettings::from_toml_str(
            r#"
[paths]
spool_dir = "${PRINTER_RESET_TEST_SPOOL}/PRINTERS"
backup_dir = "${PRINTER_RESET_UNSET_VARIABLE}"
"#,
        )
        .unwrap();

        assert_eq!(settings.spool_dir().unwrap(), Path::new("D:/spool/PRINTERS"));
        assert_eq!(
            settings.backup_dir().unwrap(),
            Path::new("${PRINTER_RESET_UNSET_VARIABLE}")
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = CleanupSettings::from_toml_str("[spooler]\nservice = \"Spooler\"\n");
        assert!(matches!(result, Err(CleanupError::TomlError(_))));
    }
}

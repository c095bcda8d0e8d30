use crate::adapters::command::run_command;
use crate::domain::ports::RegistryStore;
use crate::utils::error::{CleanupError, Result};
use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hive {
    CurrentUser,
}

/// 拆出根機碼與子路徑，例如 HKCU\Printers -> (CurrentUser, "Printers")
pub fn split_hive(path: &str) -> Result<(Hive, &str)> {
    let (root, rest) = path
        .split_once('\\')
        .ok_or_else(|| CleanupError::RegistryError {
            path: path.to_string(),
            message: "expected <hive>\\<subkey>".to_string(),
        })?;

    let hive = match root.to_ascii_uppercase().as_str() {
        "HKCU" | "HKEY_CURRENT_USER" => Hive::CurrentUser,
        other => {
            return Err(CleanupError::RegistryError {
                path: path.to_string(),
                message: format!("unsupported hive '{}'", other),
            })
        }
    };

    let rest = rest.trim_matches('\\');
    if rest.is_empty() {
        return Err(CleanupError::RegistryError {
            path: path.to_string(),
            message: "refusing to operate on a hive root".to_string(),
        });
    }
    Ok((hive, rest))
}

/// winreg 操作登錄檔，備份交給 reg.exe export
#[derive(Debug, Clone, Default)]
pub struct WindowsRegistry;

impl WindowsRegistry {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
mod native {
    use super::{split_hive, Hive};
    use crate::utils::error::{CleanupError, Result};
    use std::io;
    use winreg::enums::{HKEY_CURRENT_USER, KEY_READ, KEY_WRITE};
    use winreg::RegKey;

    fn registry_error(path: &str, e: io::Error) -> CleanupError {
        CleanupError::RegistryError {
            path: path.to_string(),
            message: e.to_string(),
        }
    }

    fn root(hive: Hive) -> RegKey {
        match hive {
            Hive::CurrentUser => RegKey::predef(HKEY_CURRENT_USER),
        }
    }

    pub fn exists(path: &str) -> Result<bool> {
        let (hive, subkey) = split_hive(path)?;
        match root(hive).open_subkey(subkey) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(registry_error(path, e)),
        }
    }

    pub fn clear_children(path: &str) -> Result<usize> {
        let (hive, subkey) = split_hive(path)?;
        let key = root(hive)
            .open_subkey_with_flags(subkey, KEY_READ | KEY_WRITE)
            .map_err(|e| registry_error(path, e))?;

        let subkeys: Vec<String> = key.enum_keys().filter_map(|res| res.ok()).collect();
        let values: Vec<String> = key
            .enum_values()
            .filter_map(|res| res.ok().map(|(name, _value)| name))
            .collect();

        for name in &subkeys {
            key.delete_subkey_all(name)
                .map_err(|e| registry_error(&format!("{}\\{}", path, name), e))?;
        }
        for name in &values {
            key.delete_value(name)
                .map_err(|e| registry_error(&format!("{} [{}]", path, name), e))?;
        }

        Ok(subkeys.len() + values.len())
    }
}

#[cfg(not(windows))]
mod native {
    use super::split_hive;
    use crate::utils::error::{CleanupError, Result};

    fn unsupported() -> CleanupError {
        CleanupError::Unsupported {
            capability: "Registry access".to_string(),
        }
    }

    pub fn exists(path: &str) -> Result<bool> {
        split_hive(path)?;
        Err(unsupported())
    }

    pub fn clear_children(path: &str) -> Result<usize> {
        split_hive(path)?;
        Err(unsupported())
    }
}

#[async_trait]
impl RegistryStore for WindowsRegistry {
    async fn exists(&self, path: &str) -> Result<bool> {
        native::exists(path)
    }

    async fn export(&self, path: &str, destination: &Path) -> Result<()> {
        split_hive(path)?;
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let destination = destination.to_string_lossy().into_owned();
        run_command("reg", &["export", path, destination.as_str(), "/y"])
            .await
            .map(|_| ())
    }

    async fn clear_children(&self, path: &str) -> Result<usize> {
        native::clear_children(path)
    }
}

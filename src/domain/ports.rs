use crate::domain::model::{DriverPackage, Printer, PrinterDriver, PrinterPort, ServiceState};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait PrivilegeProbe: Send + Sync {
    fn is_elevated(&self) -> bool;
}

#[async_trait]
pub trait RegistryStore: Send + Sync {
    async fn exists(&self, path: &str) -> Result<bool>;
    async fn export(&self, path: &str, destination: &Path) -> Result<()>;
    /// 刪除子機碼與值，保留機碼本身；回傳刪除的項目數
    async fn clear_children(&self, path: &str) -> Result<usize>;
}

#[async_trait]
pub trait FileSystem: Send + Sync {
    /// 目錄不存在時回傳空清單
    async fn list_entries(&self, dir: &Path) -> Result<Vec<PathBuf>>;
    /// 只列出一般檔案，子目錄不包含在內
    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
    async fn remove_entry(&self, path: &Path) -> Result<()>;
}

#[async_trait]
pub trait ServiceControl: Send + Sync {
    async fn stop(&self, service: &str) -> Result<()>;
    async fn start(&self, service: &str) -> Result<()>;
    async fn state(&self, service: &str) -> Result<ServiceState>;
}

#[async_trait]
pub trait PrintManager: Send + Sync {
    async fn list_printers(&self) -> Result<Vec<Printer>>;
    async fn remove_printer(&self, name: &str) -> Result<()>;
    async fn list_drivers(&self) -> Result<Vec<PrinterDriver>>;
    async fn remove_driver(&self, name: &str, environment: Option<&str>) -> Result<()>;
    async fn list_ports(&self) -> Result<Vec<PrinterPort>>;
    async fn remove_port(&self, name: &str) -> Result<()>;
}

#[async_trait]
pub trait DriverStore: Send + Sync {
    async fn list_packages(&self, class: &str) -> Result<Vec<DriverPackage>>;
    async fn remove_package(&self, published_name: &str) -> Result<()>;
}

pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// 清理流程需要的所有外部能力
pub struct HostServices {
    pub registry: Box<dyn RegistryStore>,
    pub files: Box<dyn FileSystem>,
    pub services: Box<dyn ServiceControl>,
    pub printers: Box<dyn PrintManager>,
    pub driver_store: Box<dyn DriverStore>,
    pub confirm: Box<dyn Confirm>,
}

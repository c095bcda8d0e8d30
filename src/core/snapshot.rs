use crate::domain::model::{DriverPackage, Printer, PrinterDriver, PrinterPort};
use crate::domain::policy::{is_local_port, is_standard_port, normalize_name};
use crate::domain::ports::PrintManager;
use crate::utils::error::Result;
use std::collections::HashSet;

/// 某一時間點仍被印表機引用的驅動程式與連接埠。
///
/// 這只是快照：列舉與移除之間沒有鎖定，其他程序同時修改印表機時
/// 結果可能過期。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InUseSnapshot {
    drivers: HashSet<String>,
    ports: HashSet<String>,
    printer_count: usize,
}

impl InUseSnapshot {
    pub async fn capture(printers: &dyn PrintManager) -> Result<Self> {
        let current = printers.list_printers().await?;
        Ok(Self::from_printers(&current))
    }

    pub fn from_printers(printers: &[Printer]) -> Self {
        Self {
            drivers: printers
                .iter()
                .filter(|p| !p.driver_name.trim().is_empty())
                .map(|p| normalize_name(&p.driver_name))
                .collect(),
            ports: printers
                .iter()
                .filter(|p| !p.port_name.trim().is_empty())
                .map(|p| normalize_name(&p.port_name))
                .collect(),
            printer_count: printers.len(),
        }
    }

    pub fn printer_count(&self) -> usize {
        self.printer_count
    }

    pub fn driver_in_use(&self, name: &str) -> bool {
        self.drivers.contains(&normalize_name(name))
    }

    pub fn port_in_use(&self, name: &str) -> bool {
        self.ports.contains(&normalize_name(name))
    }

    /// None 表示可以移除，否則回傳跳過的原因
    pub fn driver_skip_reason(&self, driver: &PrinterDriver) -> Option<&'static str> {
        self.driver_in_use(&driver.name).then_some("in use by a printer")
    }

    pub fn port_skip_reason(&self, port: &PrinterPort) -> Option<&'static str> {
        if is_standard_port(&port.name) {
            Some("standard port")
        } else if self.port_in_use(&port.name) {
            Some("in use by a printer")
        } else if is_local_port(port) {
            Some("local port")
        } else {
            None
        }
    }

    pub fn package_skip_reason(&self, package: &DriverPackage) -> Option<&'static str> {
        let original_in_use = package
            .original_name
            .as_deref()
            .is_some_and(|name| self.driver_in_use(name));

        (self.driver_in_use(&package.published_name) || original_in_use)
            .then_some("in use by a printer")
    }
}

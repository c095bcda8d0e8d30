use crate::adapters::command::{quote, PowerShell};
use crate::domain::model::{Printer, PrinterDriver, PrinterPort};
use crate::domain::ports::PrintManager;
use crate::utils::error::{CleanupError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// 透過 PrintManagement 模組 (Get-Printer 等 cmdlet) 操作列印子系統
#[derive(Debug, Clone, Default)]
pub struct PowerShellPrintManager {
    shell: PowerShell,
}

impl PowerShellPrintManager {
    pub fn new(shell: PowerShell) -> Self {
        Self { shell }
    }

    async fn run(&self, script: &str) -> Result<String> {
        self.shell
            .run(script)
            .await
            .map_err(|e| CleanupError::PrintSubsystemError {
                message: e.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// ConvertTo-Json 只有一筆時輸出物件而不是陣列，沒有資料時輸出空字串
pub(crate) fn parse_json_list<T: DeserializeOwned>(output: &str) -> Result<Vec<T>> {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }

    Ok(match serde_json::from_str::<OneOrMany<T>>(trimmed)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PsPrinter {
    name: String,
    driver_name: Option<String>,
    port_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PsDriver {
    name: String,
    printer_environment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PsPort {
    name: String,
    description: Option<String>,
    port_monitor: Option<String>,
}

impl From<PsPrinter> for Printer {
    fn from(p: PsPrinter) -> Self {
        Printer {
            name: p.name,
            driver_name: p.driver_name.unwrap_or_default(),
            port_name: p.port_name.unwrap_or_default(),
        }
    }
}

impl From<PsDriver> for PrinterDriver {
    fn from(d: PsDriver) -> Self {
        PrinterDriver {
            name: d.name,
            environment: d.printer_environment.filter(|e| !e.trim().is_empty()),
        }
    }
}

impl From<PsPort> for PrinterPort {
    fn from(p: PsPort) -> Self {
        PrinterPort {
            name: p.name,
            monitor: p.port_monitor,
            description: p.description,
        }
    }
}

#[async_trait]
impl PrintManager for PowerShellPrintManager {
    async fn list_printers(&self) -> Result<Vec<Printer>> {
        let output = self
            .run("Get-Printer | Select-Object Name, DriverName, PortName | ConvertTo-Json -Compress")
            .await?;
        let printers: Vec<PsPrinter> = parse_json_list(&output)?;
        Ok(printers.into_iter().map(Printer::from).collect())
    }

    async fn remove_printer(&self, name: &str) -> Result<()> {
        self.run(&format!("Remove-Printer -Name {}", quote(name)))
            .await
            .map(|_| ())
    }

    async fn list_drivers(&self) -> Result<Vec<PrinterDriver>> {
        let output = self
            .run("Get-PrinterDriver | Select-Object Name, PrinterEnvironment | ConvertTo-Json -Compress")
            .await?;
        let drivers: Vec<PsDriver> = parse_json_list(&output)?;
        Ok(drivers.into_iter().map(PrinterDriver::from).collect())
    }

    async fn remove_driver(&self, name: &str, environment: Option<&str>) -> Result<()> {
        let mut script = format!("Remove-PrinterDriver -Name {}", quote(name));
        if let Some(environment) = environment {
            script.push_str(&format!(" -PrinterEnvironment {}", quote(environment)));
        }
        self.run(&script).await.map(|_| ())
    }

    async fn list_ports(&self) -> Result<Vec<PrinterPort>> {
        let output = self
            .run("Get-PrinterPort | Select-Object Name, Description, PortMonitor | ConvertTo-Json -Compress")
            .await?;
        let ports: Vec<PsPort> = parse_json_list(&output)?;
        Ok(ports.into_iter().map(PrinterPort::from).collect())
    }

    async fn remove_port(&self, name: &str) -> Result<()> {
        self.run(&format!("Remove-PrinterPort -Name {}", quote(name)))
            .await
            .map(|_| ())
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use printer_reset::config::{CleanupContext, CleanupOptions, CleanupPaths};
use printer_reset::domain::model::{
    DriverPackage, Printer, PrinterDriver, PrinterPort, ServiceState,
};
use printer_reset::domain::ports::{
    DriverStore, FileSystem, HostServices, PrintManager, RegistryStore, ServiceControl,
};
use printer_reset::utils::error::{CleanupError, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 所有假物件共用的呼叫紀錄，用來檢查順序
pub type CallLog = Arc<Mutex<Vec<String>>>;

fn log(calls: &CallLog, entry: String) {
    calls.lock().unwrap().push(entry);
}

#[derive(Default)]
pub struct RegistryState {
    /// 機碼 -> 子項目
    pub keys: BTreeMap<String, Vec<String>>,
    pub exports: Vec<(String, PathBuf)>,
    pub failing_clears: HashSet<String>,
    pub failing_exports: HashSet<String>,
}

#[derive(Clone)]
pub struct FakeRegistry {
    pub state: Arc<Mutex<RegistryState>>,
    calls: CallLog,
}

#[async_trait]
impl RegistryStore for FakeRegistry {
    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.state.lock().unwrap().keys.contains_key(path))
    }

    async fn export(&self, path: &str, destination: &Path) -> Result<()> {
        log(&self.calls, format!("registry.export {}", path));
        let mut state = self.state.lock().unwrap();
        if state.failing_exports.contains(path) {
            return Err(CleanupError::CommandError {
                program: "reg".to_string(),
                message: "ERROR: Access is denied.".to_string(),
            });
        }
        state
            .exports
            .push((path.to_string(), destination.to_path_buf()));
        Ok(())
    }

    async fn clear_children(&self, path: &str) -> Result<usize> {
        log(&self.calls, format!("registry.clear {}", path));
        let mut state = self.state.lock().unwrap();
        if state.failing_clears.contains(path) {
            return Err(CleanupError::RegistryError {
                path: path.to_string(),
                message: "access denied".to_string(),
            });
        }
        let children = state.keys.get_mut(path).map(std::mem::take).unwrap_or_default();
        Ok(children.len())
    }
}

#[derive(Default)]
pub struct FileState {
    pub dirs: BTreeMap<PathBuf, Vec<String>>,
    pub removed: Vec<PathBuf>,
}

#[derive(Clone)]
pub struct FakeFileSystem {
    pub state: Arc<Mutex<FileState>>,
}

#[async_trait]
impl FileSystem for FakeFileSystem {
    async fn list_entries(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .dirs
            .get(dir)
            .map(|names| names.iter().map(|n| dir.join(n)).collect())
            .unwrap_or_default())
    }

    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .dirs
            .get(dir)
            .map(|names| {
                names
                    .iter()
                    .map(|n| dir.join(n))
                    .filter(|p| !state.dirs.contains_key(p))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn remove_entry(&self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            let name = name.to_string_lossy().to_string();
            if let Some(entries) = state.dirs.get_mut(parent) {
                entries.retain(|n| *n != name);
            }
        }
        state.removed.push(path.to_path_buf());
        Ok(())
    }
}

pub struct ServiceStateInner {
    pub state: ServiceState,
    pub fail_stop: bool,
    pub fail_start: bool,
    /// start 回報成功但服務隨即停止
    pub dies_after_start: bool,
    pub start_attempts: usize,
}

#[derive(Clone)]
pub struct FakeServices {
    pub state: Arc<Mutex<ServiceStateInner>>,
    calls: CallLog,
}

fn service_error(service: &str, action: &str) -> CleanupError {
    CleanupError::ServiceError {
        service: service.to_string(),
        action: action.to_string(),
        message: "service did not respond".to_string(),
    }
}

#[async_trait]
impl ServiceControl for FakeServices {
    async fn stop(&self, service: &str) -> Result<()> {
        log(&self.calls, format!("service.stop {}", service));
        let mut state = self.state.lock().unwrap();
        if state.fail_stop {
            return Err(service_error(service, "stop"));
        }
        state.state = ServiceState::Stopped;
        Ok(())
    }

    async fn start(&self, service: &str) -> Result<()> {
        log(&self.calls, format!("service.start {}", service));
        let mut state = self.state.lock().unwrap();
        state.start_attempts += 1;
        if state.fail_start {
            return Err(service_error(service, "start"));
        }
        state.state = if state.dies_after_start {
            ServiceState::Stopped
        } else {
            ServiceState::Running
        };
        Ok(())
    }

    async fn state(&self, service: &str) -> Result<ServiceState> {
        log(&self.calls, format!("service.state {}", service));
        Ok(self.state.lock().unwrap().state)
    }
}

#[derive(Default)]
pub struct PrintState {
    pub printers: Vec<Printer>,
    pub drivers: Vec<PrinterDriver>,
    pub ports: Vec<PrinterPort>,
    pub fail_list_printers: bool,
    pub fail_list_drivers: bool,
    pub fail_list_ports: bool,
    pub failing_printers: HashSet<String>,
    /// 第一次移除失敗、帶環境參數重試才成功
    pub drivers_needing_environment: HashSet<String>,
    pub failing_drivers: HashSet<String>,
    pub failing_ports: HashSet<String>,
    pub driver_attempts: Vec<(String, Option<String>)>,
}

#[derive(Clone)]
pub struct FakePrintManager {
    pub state: Arc<Mutex<PrintState>>,
    calls: CallLog,
}

fn print_error(message: &str) -> CleanupError {
    CleanupError::PrintSubsystemError {
        message: message.to_string(),
    }
}

#[async_trait]
impl PrintManager for FakePrintManager {
    async fn list_printers(&self) -> Result<Vec<Printer>> {
        log(&self.calls, "print.list_printers".to_string());
        let state = self.state.lock().unwrap();
        if state.fail_list_printers {
            return Err(print_error("Get-Printer : The spooler service is not reachable."));
        }
        Ok(state.printers.clone())
    }

    async fn remove_printer(&self, name: &str) -> Result<()> {
        log(&self.calls, format!("print.remove_printer {}", name));
        let mut state = self.state.lock().unwrap();
        if state.failing_printers.contains(name) {
            return Err(print_error("printer is busy"));
        }
        state.printers.retain(|p| p.name != name);
        Ok(())
    }

    async fn list_drivers(&self) -> Result<Vec<PrinterDriver>> {
        log(&self.calls, "print.list_drivers".to_string());
        let state = self.state.lock().unwrap();
        if state.fail_list_drivers {
            return Err(print_error("Get-PrinterDriver : access denied"));
        }
        Ok(state.drivers.clone())
    }

    async fn remove_driver(&self, name: &str, environment: Option<&str>) -> Result<()> {
        log(&self.calls, format!("print.remove_driver {}", name));
        let mut state = self.state.lock().unwrap();
        state
            .driver_attempts
            .push((name.to_string(), environment.map(str::to_string)));

        if state.failing_drivers.contains(name) {
            return Err(print_error("driver is in use"));
        }
        if environment.is_none() && state.drivers_needing_environment.contains(name) {
            return Err(print_error("driver not found for default environment"));
        }
        state.drivers.retain(|d| d.name != name);
        Ok(())
    }

    async fn list_ports(&self) -> Result<Vec<PrinterPort>> {
        log(&self.calls, "print.list_ports".to_string());
        let state = self.state.lock().unwrap();
        if state.fail_list_ports {
            return Err(print_error("Get-PrinterPort : access denied"));
        }
        Ok(state.ports.clone())
    }

    async fn remove_port(&self, name: &str) -> Result<()> {
        log(&self.calls, format!("print.remove_port {}", name));
        let mut state = self.state.lock().unwrap();
        if state.failing_ports.contains(name) {
            return Err(print_error("port is busy"));
        }
        state.ports.retain(|p| p.name != name);
        Ok(())
    }
}

#[derive(Default)]
pub struct DriverStoreState {
    pub packages: Vec<DriverPackage>,
    pub failing: HashSet<String>,
    pub removed: Vec<String>,
}

#[derive(Clone)]
pub struct FakeDriverStore {
    pub state: Arc<Mutex<DriverStoreState>>,
}

#[async_trait]
impl DriverStore for FakeDriverStore {
    async fn list_packages(&self, _class: &str) -> Result<Vec<DriverPackage>> {
        Ok(self.state.lock().unwrap().packages.clone())
    }

    async fn remove_package(&self, published_name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing.contains(published_name) {
            return Err(CleanupError::CommandError {
                program: "pnputil".to_string(),
                message: "One or more devices are presently installed using the specified INF."
                    .to_string(),
            });
        }
        state.removed.push(published_name.to_string());
        Ok(())
    }
}

/// 一組可檢查狀態的假主機
pub struct TestHost {
    pub calls: CallLog,
    pub registry: FakeRegistry,
    pub files: FakeFileSystem,
    pub services: FakeServices,
    pub printers: FakePrintManager,
    pub driver_store: FakeDriverStore,
    pub prompts: Arc<AtomicUsize>,
    pub answer: bool,
}

impl TestHost {
    pub fn new() -> Self {
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        Self {
            registry: FakeRegistry {
                state: Arc::new(Mutex::new(RegistryState::default())),
                calls: calls.clone(),
            },
            files: FakeFileSystem {
                state: Arc::new(Mutex::new(FileState::default())),
            },
            services: FakeServices {
                state: Arc::new(Mutex::new(ServiceStateInner {
                    state: ServiceState::Running,
                    fail_stop: false,
                    fail_start: false,
                    dies_after_start: false,
                    start_attempts: 0,
                })),
                calls: calls.clone(),
            },
            printers: FakePrintManager {
                state: Arc::new(Mutex::new(PrintState::default())),
                calls: calls.clone(),
            },
            driver_store: FakeDriverStore {
                state: Arc::new(Mutex::new(DriverStoreState::default())),
            },
            prompts: Arc::new(AtomicUsize::new(0)),
            answer: true,
            calls,
        }
    }

    pub fn with_answer(mut self, answer: bool) -> Self {
        self.answer = answer;
        self
    }

    pub fn host_services(&self) -> HostServices {
        let prompts = self.prompts.clone();
        let answer = self.answer;
        HostServices {
            registry: Box::new(self.registry.clone()),
            files: Box::new(self.files.clone()),
            services: Box::new(self.services.clone()),
            printers: Box::new(self.printers.clone()),
            driver_store: Box::new(self.driver_store.clone()),
            confirm: Box::new(move |_prompt: &str| {
                prompts.fetch_add(1, Ordering::SeqCst);
                answer
            }),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn service_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("service."))
            .collect()
    }

    pub fn add_registry_key(&self, path: &str, children: &[&str]) {
        self.registry
            .state
            .lock()
            .unwrap()
            .keys
            .insert(path.to_string(), children.iter().map(|c| c.to_string()).collect());
    }

    pub fn add_dir(&self, dir: &Path, names: &[&str]) {
        self.files
            .state
            .lock()
            .unwrap()
            .dirs
            .insert(dir.to_path_buf(), names.iter().map(|n| n.to_string()).collect());
    }

    pub fn add_printer(&self, name: &str, driver: &str, port: &str) {
        self.printers.state.lock().unwrap().printers.push(Printer {
            name: name.to_string(),
            driver_name: driver.to_string(),
            port_name: port.to_string(),
        });
    }

    pub fn add_driver(&self, name: &str) {
        self.printers.state.lock().unwrap().drivers.push(PrinterDriver {
            name: name.to_string(),
            environment: Some("Windows x64".to_string()),
        });
    }

    pub fn add_port(&self, name: &str, monitor: &str) {
        self.printers.state.lock().unwrap().ports.push(PrinterPort {
            name: name.to_string(),
            monitor: Some(monitor.to_string()),
            description: None,
        });
    }

    pub fn add_package(&self, published: &str, original: &str) {
        self.driver_store.state.lock().unwrap().packages.push(DriverPackage {
            published_name: published.to_string(),
            original_name: Some(original.to_string()),
            provider: None,
            class_name: Some("Printers".to_string()),
        });
    }
}

pub fn test_paths() -> CleanupPaths {
    CleanupPaths {
        registry_locations: vec![
            r"HKCU\Printers\Connections".to_string(),
            r"HKCU\Printers\Settings".to_string(),
        ],
        recent_dir: Some(PathBuf::from("/profile/Recent")),
        temp_dirs: vec![PathBuf::from("/profile/Temp")],
        spool_dir: PathBuf::from("/windows/spool/PRINTERS"),
        backup_dir: PathBuf::from("/backups"),
    }
}

pub fn test_context(options: CleanupOptions, is_admin: bool) -> CleanupContext {
    CleanupContext::new(options, test_paths(), is_admin).with_settle_delay(Duration::ZERO)
}

// Adapters layer: concrete Windows implementations of the domain ports.

pub mod command;
pub mod driver_store;
pub mod filesystem;
pub mod print_manager;
pub mod privilege;
pub mod prompt;
pub mod registry;
pub mod service;

pub use driver_store::PnpUtilDriverStore;
pub use filesystem::LocalFileSystem;
pub use print_manager::PowerShellPrintManager;
pub use privilege::WindowsPrivilegeProbe;
pub use prompt::ConsolePrompt;
pub use registry::WindowsRegistry;
pub use service::PowerShellServiceControl;

use crate::adapters::command::PowerShell;
use crate::domain::ports::HostServices;

/// 組合實際在 Windows 上使用的所有能力
pub fn windows_host() -> HostServices {
    let shell = PowerShell::new();
    HostServices {
        registry: Box::new(WindowsRegistry::new()),
        files: Box::new(LocalFileSystem::new()),
        services: Box::new(PowerShellServiceControl::new(shell.clone())),
        printers: Box::new(PowerShellPrintManager::new(shell)),
        driver_store: Box::new(PnpUtilDriverStore::new()),
        confirm: Box::new(ConsolePrompt::new()),
    }
}

pub mod engine;
pub mod snapshot;
pub mod system_phase;
pub mod user_phase;

pub use crate::domain::model::{CleanupReport, ItemKind, ItemOutcome, Outcome, RunOutcome};
pub use crate::domain::ports::{
    Confirm, DriverStore, FileSystem, HostServices, PrintManager, PrivilegeProbe, RegistryStore,
    ServiceControl,
};
pub use crate::utils::error::Result;

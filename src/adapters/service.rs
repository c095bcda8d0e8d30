use crate::adapters::command::{quote, PowerShell};
use crate::domain::model::ServiceState;
use crate::domain::ports::ServiceControl;
use crate::utils::error::{CleanupError, Result};
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct PowerShellServiceControl {
    shell: PowerShell,
}

impl PowerShellServiceControl {
    pub fn new(shell: PowerShell) -> Self {
        Self { shell }
    }

    async fn run(&self, service: &str, action: &str, script: String) -> Result<String> {
        self.shell
            .run(&script)
            .await
            .map_err(|e| CleanupError::ServiceError {
                service: service.to_string(),
                action: action.to_string(),
                message: e.to_string(),
            })
    }
}

pub fn parse_service_state(status: &str) -> ServiceState {
    match status.trim() {
        "Running" => ServiceState::Running,
        "Stopped" => ServiceState::Stopped,
        "StartPending" | "StopPending" | "ContinuePending" | "PausePending" => {
            ServiceState::Pending
        }
        _ => ServiceState::Unknown,
    }
}

#[async_trait]
impl ServiceControl for PowerShellServiceControl {
    async fn stop(&self, service: &str) -> Result<()> {
        // -Force 連同相依服務一起停止
        self.run(
            service,
            "stop",
            format!("Stop-Service -Name {} -Force", quote(service)),
        )
        .await
        .map(|_| ())
    }

    async fn start(&self, service: &str) -> Result<()> {
        self.run(service, "start", format!("Start-Service -Name {}", quote(service)))
            .await
            .map(|_| ())
    }

    async fn state(&self, service: &str) -> Result<ServiceState> {
        let output = self
            .run(
                service,
                "query",
                format!("(Get-Service -Name {}).Status.ToString()", quote(service)),
            )
            .await?;
        Ok(parse_service_state(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_state() {
        assert_eq!(parse_service_state("Running\r\n"), ServiceState::Running);
        assert_eq!(parse_service_state("Stopped"), ServiceState::Stopped);
        assert_eq!(parse_service_state("StopPending"), ServiceState::Pending);
        assert_eq!(parse_service_state("Paused"), ServiceState::Unknown);
    }
}

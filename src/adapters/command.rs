use crate::utils::error::{CleanupError, Result};
use tokio::process::Command;

/// 執行外部程式，非零結束碼視為失敗並帶回第一行有意義的錯誤訊息
pub async fn run_command(program: &str, args: &[&str]) -> Result<String> {
    tracing::debug!("Running {} {:?}", program, args);

    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| CleanupError::CommandError {
            program: program.to_string(),
            message: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // pnputil / reg 有時把錯誤寫在 stdout
        let message = essential_line(&stderr)
            .or_else(|| essential_line(&stdout))
            .unwrap_or_else(|| format!("exited with {}", output.status));
        return Err(CleanupError::CommandError {
            program: program.to_string(),
            message,
        });
    }

    Ok(stdout)
}

pub fn essential_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.contains("ProgressPreference"))
        .map(str::to_string)
}

#[derive(Debug, Clone)]
pub struct PowerShell {
    program: String,
}

impl PowerShell {
    pub fn new() -> Self {
        Self {
            program: "powershell".to_string(),
        }
    }

    pub async fn run(&self, script: &str) -> Result<String> {
        let script = with_prelude(script);
        run_command(
            &self.program,
            &[
                "-NoProfile",
                "-NonInteractive",
                "-ExecutionPolicy",
                "Bypass",
                "-Command",
                script.as_str(),
            ],
        )
        .await
    }
}

impl Default for PowerShell {
    fn default() -> Self {
        Self::new()
    }
}

/// 重導向時 Windows PowerShell 預設用 OEM code page 輸出，非 ASCII 名稱會變成亂碼
pub fn with_prelude(script: &str) -> String {
    format!(
        "$ErrorActionPreference = 'Stop'; [Console]::OutputEncoding = [System.Text.Encoding]::UTF8; {}",
        script
    )
}

/// PowerShell 單引號字串，內部的 ' 需要重複
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_single_quotes() {
        assert_eq!(quote("HP LaserJet"), "'HP LaserJet'");
        assert_eq!(quote("Bob's Printer"), "'Bob''s Printer'");
    }

    #[test]
    fn test_prelude_forces_utf8_output() {
        let script = with_prelude("Get-Printer");
        assert!(script.starts_with("$ErrorActionPreference = 'Stop';"));
        assert!(script.contains("[Console]::OutputEncoding = [System.Text.Encoding]::UTF8;"));
        assert!(script.ends_with("Get-Printer"));
    }

    #[test]
    fn test_essential_line_skips_noise() {
        let stderr = "\n  \n$ProgressPreference noise\nRemove-Printer : The printer was not found.\nAt line:1\n";
        assert_eq!(
            essential_line(stderr).as_deref(),
            Some("Remove-Printer : The printer was not found.")
        );
        assert_eq!(essential_line("   \n"), None);
    }

    #[tokio::test]
    async fn test_missing_program_is_command_error() {
        let result = run_command("printer-reset-no-such-program", &[]).await;
        assert!(matches!(result, Err(CleanupError::CommandError { .. })));
    }
}

use crate::adapters::command::run_command;
use crate::domain::model::DriverPackage;
use crate::domain::ports::DriverStore;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 以 pnputil 操作 driver store
#[derive(Debug, Clone, Default)]
pub struct PnpUtilDriverStore;

impl PnpUtilDriverStore {
    pub fn new() -> Self {
        Self
    }
}

const PUBLISHED_NAME: &str = "Published Name";

/// 解析 `pnputil /enum-drivers` 的輸出，每個套件以空白行分隔
pub fn parse_enum_drivers(output: &str) -> Vec<DriverPackage> {
    let mut packages = Vec::new();
    let mut current: Option<DriverPackage> = None;

    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            if line.trim().is_empty() {
                packages.extend(current.take());
            }
            continue;
        };
        let value = value.trim();

        match key.trim() {
            PUBLISHED_NAME => {
                packages.extend(current.take());
                current = Some(DriverPackage {
                    published_name: value.to_string(),
                    original_name: None,
                    provider: None,
                    class_name: None,
                });
            }
            "Original Name" => {
                if let Some(package) = current.as_mut() {
                    package.original_name = Some(value.to_string());
                }
            }
            "Provider Name" => {
                if let Some(package) = current.as_mut() {
                    package.provider = Some(value.to_string());
                }
            }
            "Class Name" => {
                if let Some(package) = current.as_mut() {
                    package.class_name = Some(value.to_string());
                }
            }
            _ => {}
        }
    }
    packages.extend(current);
    packages
}

/// "Printer" 同時符合 "Printer" 與 "Printers"
fn class_matches(package: &DriverPackage, class: &str) -> bool {
    package
        .class_name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().starts_with(&class.to_lowercase()))
}

#[async_trait]
impl DriverStore for PnpUtilDriverStore {
    async fn list_packages(&self, class: &str) -> Result<Vec<DriverPackage>> {
        let output = run_command("pnputil", &["/enum-drivers"]).await?;
        let packages = parse_enum_drivers(&output);
        if packages.is_empty() && output.lines().any(|l| l.contains(':')) {
            // 非英文系統的欄位名稱會被翻譯
            tracing::debug!(
                "pnputil output had fields but no '{}' entries, labels may be localized",
                PUBLISHED_NAME
            );
        }
        Ok(packages
            .into_iter()
            .filter(|p| class_matches(p, class))
            .collect())
    }

    async fn remove_package(&self, published_name: &str) -> Result<()> {
        run_command("pnputil", &["/delete-driver", published_name])
            .await
            .map(|_| ())
    }
}

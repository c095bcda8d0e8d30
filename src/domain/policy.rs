// 純粹的分類規則，不碰任何外部狀態

use crate::domain::model::PrinterPort;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

const PRINT_MARKER: &str = "print";
const LOCAL_PORT_TYPE: &str = "Local Port";

static STANDARD_PORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(COM\d+|LPT\d+|FILE|NUL):?$").expect("standard port pattern is valid")
});

/// 名稱含 "print" (不分大小寫)，"printer" 也會命中
pub fn is_print_related(name: &str) -> bool {
    name.to_lowercase().contains(PRINT_MARKER)
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// 最近使用項目中與印表機相關的捷徑
pub fn is_recent_print_shortcut(path: &Path) -> bool {
    let is_shortcut = path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("lnk"))
        .unwrap_or(false);

    is_shortcut && file_name_of(path).is_some_and(|name| is_print_related(&name))
}

pub fn is_print_temp_entry(path: &Path) -> bool {
    file_name_of(path).is_some_and(|name| is_print_related(&name))
}

/// COMn / LPTn / FILE: / NUL: 永遠不移除
pub fn is_standard_port(name: &str) -> bool {
    STANDARD_PORT.is_match(name.trim())
}

pub fn is_local_port(port: &PrinterPort) -> bool {
    [port.monitor.as_deref(), port.description.as_deref()]
        .into_iter()
        .flatten()
        .any(|value| value.trim().eq_ignore_ascii_case(LOCAL_PORT_TYPE))
}

/// 名稱比對一律不分大小寫
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 備份檔名中的機碼片段，例如 HKCU\Printers\Settings -> HKCU_Printers_Settings
pub fn registry_slug(location: &str) -> String {
    location
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

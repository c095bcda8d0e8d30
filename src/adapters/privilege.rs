use crate::domain::ports::PrivilegeProbe;

#[derive(Debug, Clone, Default)]
pub struct WindowsPrivilegeProbe;

impl WindowsPrivilegeProbe {
    pub fn new() -> Self {
        Self
    }
}

impl PrivilegeProbe for WindowsPrivilegeProbe {
    #[cfg(windows)]
    fn is_elevated(&self) -> bool {
        // SAFETY: IsUserAnAdmin takes no arguments and only reads the process token.
        unsafe { windows_sys::Win32::UI::Shell::IsUserAnAdmin() != 0 }
    }

    // 非 Windows 平台一律視為一般使用者
    #[cfg(not(windows))]
    fn is_elevated(&self) -> bool {
        false
    }
}

//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific behavior live in this module rather
//! than being scattered through the engine.
//!
//! # Architecture
//!
//! - `paths` - Known shortcut folders (Start Menu, Startup, Desktop)
//! - `privilege` - Whether the current process runs elevated
//! - `shell` - Shell change notifications and elevated process launch
//!
//! # Supported Platforms
//!
//! - **Windows**: Full support (`ShellExecuteExW` with the `runas` verb)
//! - **Linux/macOS**: XDG folder analogs, elevation through `pkexec`

pub mod paths;
pub mod privilege;
pub mod shell;

// Re-export commonly used items
pub use paths::KnownFolders;
pub use privilege::{current_process_is_elevated, PrivilegeProbe, ProcessPrivilege};
pub use shell::{run_elevated, LaunchError, NoopNotifier, ShellNotifier, SystemShellNotifier};

/// Returns the current platform name.
pub fn current_platform() -> &'static str {
    #[cfg(target_os = "linux")]
    {
        "linux"
    }
    #[cfg(target_os = "windows")]
    {
        "windows"
    }
    #[cfg(target_os = "macos")]
    {
        "macos"
    }
    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform() {
        let platform = current_platform();
        assert!(["linux", "windows", "macos", "unknown"].contains(&platform));
    }
}

//! Platform-specific shortcut folders.
//!
//! The six built-in destinations are held in an explicit [`KnownFolders`]
//! value that is threaded through the resolver. Tests build one under a
//! temporary root instead of touching the real profile.

use std::path::{Path, PathBuf};

/// The built-in shortcut directories of the host.
///
/// A `None` entry means the folder could not be determined on this host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownFolders {
    pub start_menu_user: Option<PathBuf>,
    pub start_menu_all_users: Option<PathBuf>,
    pub startup_user: Option<PathBuf>,
    pub startup_all_users: Option<PathBuf>,
    pub desktop_user: Option<PathBuf>,
    pub desktop_all_users: Option<PathBuf>,
}

impl KnownFolders {
    /// Detect the folders of the current host.
    ///
    /// # Platform Behavior
    /// - **Windows**: `%APPDATA%` / `%ProgramData%` Start Menu trees,
    ///   the user Desktop and `%PUBLIC%\Desktop`
    /// - **Linux/macOS**: XDG analogs (`applications`, `autostart`, `Desktop`);
    ///   there is no all-users desktop
    pub fn detect() -> Self {
        #[cfg(windows)]
        {
            let programs = dirs::data_dir().map(|d| windows_programs(&d));
            let common_programs = std::env::var_os("ProgramData")
                .map(PathBuf::from)
                .or_else(|| Some(PathBuf::from(r"C:\ProgramData")))
                .map(|d| windows_programs(&d));
            let public_desktop = std::env::var_os("PUBLIC")
                .map(|p| PathBuf::from(p).join("Desktop"))
                .or_else(|| Some(PathBuf::from(r"C:\Users\Public\Desktop")));

            Self {
                startup_user: programs.as_ref().map(|p| p.join("Startup")),
                startup_all_users: common_programs.as_ref().map(|p| p.join("StartUp")),
                start_menu_user: programs,
                start_menu_all_users: common_programs,
                desktop_user: dirs::desktop_dir(),
                desktop_all_users: public_desktop,
            }
        }

        #[cfg(not(windows))]
        {
            Self {
                start_menu_user: dirs::data_dir().map(|d| d.join("applications")),
                start_menu_all_users: Some(PathBuf::from("/usr/local/share/applications")),
                startup_user: dirs::config_dir().map(|d| d.join("autostart")),
                startup_all_users: Some(PathBuf::from("/etc/xdg/autostart")),
                desktop_user: dirs::desktop_dir(),
                desktop_all_users: None,
            }
        }
    }

    /// Lay all six folders out under `root`.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            start_menu_user: Some(root.join("user").join("Start Menu").join("Programs")),
            start_menu_all_users: Some(root.join("common").join("Start Menu").join("Programs")),
            startup_user: Some(root.join("user").join("Startup")),
            startup_all_users: Some(root.join("common").join("StartUp")),
            desktop_user: Some(root.join("user").join("Desktop")),
            desktop_all_users: Some(root.join("common").join("Desktop")),
        }
    }
}

#[cfg(windows)]
fn windows_programs(base: &Path) -> PathBuf {
    base.join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
}

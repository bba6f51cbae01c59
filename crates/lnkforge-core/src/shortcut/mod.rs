//! Shortcut artifact construction.
//!
//! Provides:
//! - [`ShortcutSpec`], the validated input of one creation request
//! - a deterministic shell-link (.lnk) encoder
//! - [`ArtifactWriter`], the capability that puts an artifact on disk
//! - the "run as administrator" header patch
//! - [`ShortcutBuilder`], which strings the steps together
//! - [`QuickPreset`], the fixed presets used by context-menu callers

mod builder;
mod encoder;
mod patch;
mod presets;
mod writer;

pub use builder::ShortcutBuilder;
pub use encoder::encode_link;
pub use patch::{patch_run_as_flag, with_run_as_flag};
pub use presets::QuickPreset;
pub use writer::{ArtifactWriter, LinkFileWriter};

#[cfg(test)]
pub(crate) use writer::FixedBytesWriter;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::LinkConfig;
use crate::error::BuildError;
use crate::location::LocationChoice;

/// How the target's window is shown when the shortcut is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowMode {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

impl WindowMode {
    /// The link format's `ShowCommand` value.
    pub fn show_command(self) -> u32 {
        match self {
            WindowMode::Normal => 1,
            WindowMode::Maximized => 3,
            WindowMode::Minimized => 7,
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowMode::Normal => f.write_str("Normal window"),
            WindowMode::Minimized => f.write_str("Minimized"),
            WindowMode::Maximized => f.write_str("Maximized"),
        }
    }
}

/// Everything needed to create one shortcut.
///
/// Built once per request with the `with_*` methods and not modified
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutSpec {
    name: String,
    target_path: String,
    arguments: String,
    working_directory: String,
    window_mode: WindowMode,
    elevate_on_launch: bool,
    destination: LocationChoice,
}

impl ShortcutSpec {
    pub fn new(
        name: impl Into<String>,
        target_path: impl Into<String>,
        destination: LocationChoice,
    ) -> Self {
        Self {
            name: name.into(),
            target_path: target_path.into(),
            arguments: String::new(),
            working_directory: String::new(),
            window_mode: WindowMode::Normal,
            elevate_on_launch: false,
            destination,
        }
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = arguments.into();
        self
    }

    pub fn with_working_directory(mut self, working_directory: impl Into<String>) -> Self {
        self.working_directory = working_directory.into();
        self
    }

    pub fn with_window_mode(mut self, window_mode: WindowMode) -> Self {
        self.window_mode = window_mode;
        self
    }

    /// Mark the produced artifact "run as administrator".
    pub fn with_elevate_on_launch(mut self, elevate: bool) -> Self {
        self.elevate_on_launch = elevate;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    pub fn working_directory(&self) -> &str {
        &self.working_directory
    }

    pub fn window_mode(&self) -> WindowMode {
        self.window_mode
    }

    pub fn elevate_on_launch(&self) -> bool {
        self.elevate_on_launch
    }

    pub fn destination(&self) -> &LocationChoice {
        &self.destination
    }

    /// Reject specs with an empty name or target.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.name.trim().is_empty() {
            return Err(BuildError::EmptyName);
        }
        if self.target_path.trim().is_empty() {
            return Err(BuildError::EmptyTarget);
        }
        Ok(())
    }

    /// The artifact's file name: the name with the canonical extension.
    pub fn file_name(&self) -> String {
        let suffix = format!(".{}", LinkConfig::EXTENSION);
        if self.name.to_lowercase().ends_with(&suffix) {
            self.name.clone()
        } else {
            format!("{}{}", self.name, suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_appends_extension_once() {
        let spec = ShortcutSpec::new("Notepad", "C:\\notepad.exe", LocationChoice::DesktopUser);
        assert_eq!(spec.file_name(), "Notepad.lnk");

        let spec = ShortcutSpec::new("Tool.LNK", "C:\\tool.exe", LocationChoice::DesktopUser);
        assert_eq!(spec.file_name(), "Tool.LNK");
    }

    #[test]
    fn test_validate() {
        let ok = ShortcutSpec::new("a", "b", LocationChoice::DesktopUser);
        assert!(ok.validate().is_ok());

        let no_name = ShortcutSpec::new("  ", "b", LocationChoice::DesktopUser);
        assert!(matches!(no_name.validate(), Err(BuildError::EmptyName)));

        let no_target = ShortcutSpec::new("a", "", LocationChoice::DesktopUser);
        assert!(matches!(no_target.validate(), Err(BuildError::EmptyTarget)));
    }

    #[test]
    fn test_show_command_codes() {
        assert_eq!(WindowMode::Normal.show_command(), 1);
        assert_eq!(WindowMode::Minimized.show_command(), 7);
        assert_eq!(WindowMode::Maximized.show_command(), 3);
    }
}

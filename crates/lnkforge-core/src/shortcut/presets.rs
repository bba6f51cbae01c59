//! One-click presets for shell context-menu integration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ShortcutSpec;
use crate::error::BuildError;
use crate::location::LocationChoice;

/// Fixed presets that derive a whole spec from a target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuickPreset {
    /// Start Menu of the current user.
    JustMe,
    /// Start Menu of all users.
    AllUsers,
}

impl QuickPreset {
    pub fn destination(self) -> LocationChoice {
        match self {
            QuickPreset::JustMe => LocationChoice::StartMenuUser,
            QuickPreset::AllUsers => LocationChoice::StartMenuAllUsers,
        }
    }

    /// Spec for `target`: named after the file stem, started in the file's
    /// folder, with no arguments and a normal window.
    pub fn spec_for(self, target: &Path) -> Result<ShortcutSpec, BuildError> {
        let name = target
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.trim().is_empty())
            .ok_or(BuildError::EmptyTarget)?;
        let working_directory = target
            .parent()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(
            ShortcutSpec::new(name, target.to_string_lossy(), self.destination())
                .with_working_directory(working_directory),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcut::WindowMode;
    use std::path::PathBuf;

    #[test]
    fn test_spec_from_target() {
        let target = PathBuf::from("/opt/tools/My Tool.exe");

        let spec = QuickPreset::AllUsers.spec_for(&target).unwrap();

        assert_eq!(spec.name(), "My Tool");
        assert_eq!(spec.target_path(), target.to_string_lossy());
        assert_eq!(spec.working_directory(), "/opt/tools");
        assert_eq!(spec.arguments(), "");
        assert_eq!(spec.window_mode(), WindowMode::Normal);
        assert!(!spec.elevate_on_launch());
        assert_eq!(spec.destination(), &LocationChoice::StartMenuAllUsers);
    }

    #[test]
    fn test_just_me_targets_user_start_menu() {
        let spec = QuickPreset::JustMe.spec_for(Path::new("app.exe")).unwrap();
        assert_eq!(spec.destination(), &LocationChoice::StartMenuUser);
        assert_eq!(spec.working_directory(), "");
    }

    #[test]
    fn test_target_without_stem_is_rejected() {
        assert!(matches!(
            QuickPreset::JustMe.spec_for(Path::new("")),
            Err(BuildError::EmptyTarget)
        ));
    }
}

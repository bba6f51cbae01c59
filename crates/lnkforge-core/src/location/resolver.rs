//! Location resolution.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::{probe, LocationChoice, ResolvedLocation};
use crate::config::AppConfig;
use crate::error::LocationError;
use crate::platform::KnownFolders;

/// Maps [`LocationChoice`] values to directories.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    folders: KnownFolders,
    /// Sub-folder appended to the Start Menu choices.
    start_menu_folder: Option<String>,
}

impl LocationResolver {
    /// Create a resolver over `folders` using the default Start Menu
    /// sub-folder.
    pub fn new(folders: KnownFolders) -> Self {
        Self {
            folders,
            start_menu_folder: Some(AppConfig::START_MENU_FOLDER.to_string()),
        }
    }

    /// Override the Start Menu sub-folder (`None` writes straight into
    /// `Programs`).
    pub fn with_start_menu_folder(mut self, folder: Option<String>) -> Self {
        self.start_menu_folder = folder.filter(|f| !f.trim().is_empty());
        self
    }

    pub fn folders(&self) -> &KnownFolders {
        &self.folders
    }

    /// Directory for `choice`, without touching the filesystem.
    pub fn locate(&self, choice: &LocationChoice) -> Result<PathBuf, LocationError> {
        let (folder, label) = match choice {
            LocationChoice::StartMenuUser => (&self.folders.start_menu_user, "Start Menu"),
            LocationChoice::StartMenuAllUsers => {
                (&self.folders.start_menu_all_users, "common Start Menu")
            }
            LocationChoice::StartupUser => (&self.folders.startup_user, "Startup"),
            LocationChoice::StartupAllUsers => (&self.folders.startup_all_users, "common Startup"),
            LocationChoice::DesktopUser => (&self.folders.desktop_user, "Desktop"),
            LocationChoice::DesktopAllUsers => (&self.folders.desktop_all_users, "public Desktop"),
            LocationChoice::Custom(path) => {
                if path.as_os_str().is_empty() {
                    return Err(LocationError::NoDestinationSelected);
                }
                return Ok(path.clone());
            }
        };

        let base = folder
            .clone()
            .ok_or(LocationError::FolderUnavailable { folder: label })?;

        match (choice, &self.start_menu_folder) {
            (LocationChoice::StartMenuUser | LocationChoice::StartMenuAllUsers, Some(sub)) => {
                Ok(base.join(sub))
            }
            _ => Ok(base),
        }
    }

    /// Whether writing to `choice` needs elevation.
    ///
    /// Built-in choices answer from a fixed table without I/O. `Custom` runs
    /// one probe cycle, which creates the directory if it is missing.
    pub fn requires_elevation(&self, choice: &LocationChoice) -> Result<bool, LocationError> {
        if let Some(fixed) = choice.fixed_elevation_requirement() {
            return Ok(fixed);
        }
        let directory = self.locate(choice)?;
        Ok(probe::requires_elevation_to_write(&directory))
    }

    /// Resolve `choice` for one creation attempt and make sure the directory
    /// exists.
    ///
    /// For choices that need elevation, a permission-denied failure to create
    /// the directory is tolerated: the elevated builder creates it later.
    pub fn resolve(&self, choice: &LocationChoice) -> Result<ResolvedLocation, LocationError> {
        let directory = self.locate(choice)?;
        let requires_elevation_to_write = match choice.fixed_elevation_requirement() {
            Some(fixed) => fixed,
            None => probe::requires_elevation_to_write(&directory),
        };

        if let Err(source) = fs::create_dir_all(&directory) {
            if requires_elevation_to_write && source.kind() == ErrorKind::PermissionDenied {
                warn!(
                    "Cannot create {} without elevation; deferring to the elevated builder",
                    directory.display()
                );
            } else {
                return Err(LocationError::DirectoryCreateFailed {
                    path: directory,
                    source,
                });
            }
        }

        debug!(
            "Resolved {} to {} (elevation required: {})",
            choice,
            directory.display(),
            requires_elevation_to_write
        );

        Ok(ResolvedLocation {
            directory,
            requires_elevation_to_write,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver(root: &TempDir) -> LocationResolver {
        LocationResolver::new(KnownFolders::rooted_at(root.path()))
    }

    #[test]
    fn test_start_menu_gets_sub_folder() {
        let root = TempDir::new().unwrap();
        let resolver = resolver(&root);

        let dir = resolver.locate(&LocationChoice::StartMenuUser).unwrap();
        assert!(dir.ends_with(AppConfig::START_MENU_FOLDER));

        let startup = resolver.locate(&LocationChoice::StartupUser).unwrap();
        assert!(startup.ends_with("Startup"));
    }

    #[test]
    fn test_start_menu_sub_folder_can_be_disabled() {
        let root = TempDir::new().unwrap();
        let resolver = resolver(&root).with_start_menu_folder(None);

        let dir = resolver.locate(&LocationChoice::StartMenuAllUsers).unwrap();
        assert!(dir.ends_with("Programs"));
    }

    #[test]
    fn test_builtin_requirement_needs_no_io() {
        let root = TempDir::new().unwrap();
        let resolver = resolver(&root);

        assert!(resolver
            .requires_elevation(&LocationChoice::DesktopAllUsers)
            .unwrap());
        assert!(!resolver
            .requires_elevation(&LocationChoice::DesktopUser)
            .unwrap());
        // Nothing was created under the root.
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_custom_without_path_is_rejected() {
        let root = TempDir::new().unwrap();
        let resolver = resolver(&root);

        let err = resolver
            .resolve(&LocationChoice::Custom(PathBuf::new()))
            .unwrap_err();
        assert!(matches!(err, LocationError::NoDestinationSelected));
    }

    #[test]
    fn test_custom_is_probed_and_created() {
        let root = TempDir::new().unwrap();
        let resolver = resolver(&root);
        let custom = root.path().join("custom").join("links");

        let resolved = resolver
            .resolve(&LocationChoice::Custom(custom.clone()))
            .unwrap();
        assert_eq!(resolved.directory, custom);
        assert!(!resolved.requires_elevation_to_write);
        assert!(custom.is_dir());
        assert_eq!(fs::read_dir(&custom).unwrap().count(), 0);
    }

    #[test]
    fn test_resolve_creates_builtin_directory() {
        let root = TempDir::new().unwrap();
        let resolver = resolver(&root);

        let resolved = resolver.resolve(&LocationChoice::StartMenuUser).unwrap();
        assert!(resolved.directory.is_dir());
        assert!(!resolved.requires_elevation_to_write);
    }

    #[test]
    fn test_missing_folder_is_reported() {
        let resolver = LocationResolver::new(KnownFolders::default());

        let err = resolver.locate(&LocationChoice::DesktopAllUsers).unwrap_err();
        assert!(matches!(err, LocationError::FolderUnavailable { .. }));
    }
}

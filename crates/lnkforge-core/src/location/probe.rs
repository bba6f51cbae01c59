//! Empirical write-permission probe.
//!
//! There is no portable "may I write here" query, so the probe tries it: make
//! sure the directory exists, create a uniquely named zero-byte file, delete
//! it. This is a heuristic, not a guarantee; permissions can change between
//! the probe and the real write.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ElevationConfig;

/// Probe `dir` and report whether writing there needs elevation.
///
/// Only a permission-denied failure counts as "needs elevation"; any other
/// failure (bad path, missing drive, ...) is reported as `false` and left for
/// the real write to surface.
pub fn requires_elevation_to_write(dir: &Path) -> bool {
    if let Err(e) = fs::create_dir_all(dir) {
        debug!("Probe could not create {}: {}", dir.display(), e);
        return is_permission_denied(&e);
    }

    let probe = dir.join(format!(
        "{}{}",
        ElevationConfig::PROBE_PREFIX,
        Uuid::new_v4().simple()
    ));

    let file = match OpenOptions::new().write(true).create_new(true).open(&probe) {
        Ok(file) => file,
        Err(e) => {
            debug!("Probe write failed in {}: {}", dir.display(), e);
            return is_permission_denied(&e);
        }
    };
    drop(file);

    match fs::remove_file(&probe) {
        Ok(()) => {
            debug!("Probe succeeded in {}", dir.display());
            false
        }
        Err(e) => {
            warn!("Could not remove probe file {}: {}", probe.display(), e);
            is_permission_denied(&e)
        }
    }
}

fn is_permission_denied(e: &std::io::Error) -> bool {
    e.kind() == ErrorKind::PermissionDenied
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_writable_directory_leaves_no_residue() {
        let temp_dir = TempDir::new().unwrap();

        assert!(!requires_elevation_to_write(temp_dir.path()));
        assert_eq!(entries(temp_dir.path()), 0);
    }

    #[test]
    fn test_missing_directory_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a").join("b");

        assert!(!requires_elevation_to_write(&target));
        assert!(target.is_dir());
        assert_eq!(entries(&target), 0);
    }

    #[test]
    fn test_non_permission_failure_is_not_elevation() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain-file");
        fs::write(&file, b"x").unwrap();

        // A directory cannot be created beneath a regular file.
        assert!(!requires_elevation_to_write(&file.join("sub")));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_directory_requires_elevation() {
        use std::os::unix::fs::PermissionsExt;

        // Root bypasses permission bits.
        if nix::unistd::geteuid().is_root() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        assert!(requires_elevation_to_write(&locked));
        assert_eq!(entries(&locked), 0);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

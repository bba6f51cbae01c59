//! Artifact writers.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::Builder;

use super::{encode_link, ShortcutSpec};

/// Capability that puts the artifact for a spec on disk.
///
/// The default is [`LinkFileWriter`]; tests and embedders can substitute
/// their own (for example a writer that delegates to the shell's own link
/// object).
pub trait ArtifactWriter: Send + Sync {
    /// Write the artifact for `spec` to `destination` and return the path
    /// actually written.
    fn write_artifact(&self, spec: &ShortcutSpec, destination: &Path) -> io::Result<PathBuf>;
}

/// Writes shell-link files with the built-in encoder.
///
/// The file is written to a temporary sibling, synced, then renamed over
/// `destination`, so readers never see a half-written link.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkFileWriter;

impl ArtifactWriter for LinkFileWriter {
    fn write_artifact(&self, spec: &ShortcutSpec, destination: &Path) -> io::Result<PathBuf> {
        let bytes = encode_link(spec)?;
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = Builder::new()
            .prefix(".lnkforge-")
            .suffix(".tmp")
            .tempfile_in(dir)?;
        temp.write_all(&bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(destination).map_err(|e| e.error)?;

        Ok(destination.to_path_buf())
    }
}

/// Writes raw bytes, ignoring the spec.
#[cfg(test)]
pub(crate) struct FixedBytesWriter(pub Vec<u8>);

#[cfg(test)]
impl ArtifactWriter for FixedBytesWriter {
    fn write_artifact(&self, _spec: &ShortcutSpec, destination: &Path) -> io::Result<PathBuf> {
        std::fs::write(destination, &self.0)?;
        Ok(destination.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationChoice;
    use std::fs;
    use tempfile::TempDir;

    fn spec() -> ShortcutSpec {
        ShortcutSpec::new("Notepad", r"C:\Windows\notepad.exe", LocationChoice::DesktopUser)
    }

    #[test]
    fn test_writes_encoded_link() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Notepad.lnk");

        let written = LinkFileWriter.write_artifact(&spec(), &dest).unwrap();

        assert_eq!(written, dest);
        assert_eq!(fs::read(&dest).unwrap(), encode_link(&spec()).unwrap());
        // Only the link itself remains.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Notepad.lnk");
        fs::write(&dest, b"old").unwrap();

        LinkFileWriter.write_artifact(&spec(), &dest).unwrap();

        assert_ne!(fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn test_missing_parent_fails() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("nope").join("Notepad.lnk");

        assert!(LinkFileWriter.write_artifact(&spec(), &dest).is_err());
    }
}

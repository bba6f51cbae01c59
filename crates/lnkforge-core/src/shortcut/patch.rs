//! "Run as administrator" header patch.
//!
//! The shell honours the `RunAsUser` bit of the `LinkFlags` word at byte
//! offset 20. Setting it is a read-modify-write of that one word; every other
//! byte of the artifact is left as it was.

use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

use crate::config::LinkConfig;
use crate::error::{BuildError, WritePhase};

/// `word` with the `RunAsUser` bit set and every other bit unchanged.
pub fn with_run_as_flag(word: u32) -> u32 {
    word | LinkConfig::RUN_AS_USER_FLAG
}

/// Set the `RunAsUser` bit in the artifact at `path`.
///
/// Artifacts too short to contain the flag word are rejected with
/// [`BuildError::PatchTooSmall`] and left untouched. Applying the patch twice
/// produces the same bytes as applying it once.
pub fn patch_run_as_flag(path: &Path) -> Result<(), BuildError> {
    let patch_error = |source| BuildError::WriteFailed {
        phase: WritePhase::Patch,
        path: path.to_path_buf(),
        source,
    };

    let bytes = fs::read(path).map_err(patch_error)?;
    let end = LinkConfig::FLAGS_OFFSET + LinkConfig::FLAGS_LEN;
    if bytes.len() < end {
        return Err(BuildError::PatchTooSmall { len: bytes.len() });
    }

    let mut word = [0u8; LinkConfig::FLAGS_LEN];
    word.copy_from_slice(&bytes[LinkConfig::FLAGS_OFFSET..end]);
    let current = u32::from_le_bytes(word);
    let patched = with_run_as_flag(current);
    if patched == current {
        debug!("{} already carries the run-as flag", path.display());
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(patch_error)?;
    file.seek(SeekFrom::Start(LinkConfig::FLAGS_OFFSET as u64))
        .map_err(patch_error)?;
    file.write_all(&patched.to_le_bytes()).map_err(patch_error)?;
    file.sync_all().map_err(patch_error)?;

    debug!(
        "Set run-as flag on {} (flags {:#010x} -> {:#010x})",
        path.display(),
        current,
        patched
    );
    Ok(())
}

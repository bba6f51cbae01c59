//! Shortcut construction.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::{patch_run_as_flag, ArtifactWriter, LinkFileWriter, ShortcutSpec};
use crate::error::{BuildError, WritePhase};
use crate::platform::{ShellNotifier, SystemShellNotifier};

/// Produces one artifact from a spec, optionally marked "run as
/// administrator".
///
/// Runs with whatever rights the current process has. It is used both by the
/// normal path (after the caller has checked rights) and by the elevated
/// helper.
#[derive(Clone)]
pub struct ShortcutBuilder {
    writer: Arc<dyn ArtifactWriter>,
    notifier: Arc<dyn ShellNotifier>,
}

impl Default for ShortcutBuilder {
    fn default() -> Self {
        Self::new(
            Arc::new(LinkFileWriter),
            Arc::new(SystemShellNotifier::default()),
        )
    }
}

impl std::fmt::Debug for ShortcutBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutBuilder").finish_non_exhaustive()
    }
}

impl ShortcutBuilder {
    pub fn new(writer: Arc<dyn ArtifactWriter>, notifier: Arc<dyn ShellNotifier>) -> Self {
        Self { writer, notifier }
    }

    /// Create the artifact for `spec` at `destination_file`.
    ///
    /// Steps, in order:
    /// 1. validate the spec
    /// 2. create the parent directory
    /// 3. write the artifact, replacing any existing file
    /// 4. set the run-as flag when `elevate_on_launch` is requested
    /// 5. tell the shell about the new file
    ///
    /// A failure in step 4 leaves a usable artifact behind and is reported
    /// as an error for which [`BuildError::is_partial_success`] is true. The
    /// shell is notified in that case too.
    pub fn build(&self, spec: &ShortcutSpec, destination_file: &Path) -> Result<(), BuildError> {
        spec.validate()?;

        if let Some(parent) = destination_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| {
                    BuildError::DirectoryCreateFailed {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
        }

        let written = self
            .writer
            .write_artifact(spec, destination_file)
            .map_err(|source| BuildError::WriteFailed {
                phase: WritePhase::Construct,
                path: destination_file.to_path_buf(),
                source,
            })?;

        info!(
            "Created shortcut '{}' at {} -> {}",
            spec.name(),
            written.display(),
            spec.target_path()
        );

        let patched = if spec.elevate_on_launch() {
            patch_run_as_flag(&written)
        } else {
            Ok(())
        };

        if let Err(e) = &patched {
            warn!(
                "Shortcut {} was created without the run-as flag: {}",
                written.display(),
                e
            );
        }

        self.notifier.artifact_created(&written);
        patched
    }
}

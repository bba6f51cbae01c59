//! Out-of-process elevated construction.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{Builder, TempPath};
use tracing::{debug, info};

use super::{ElevatedLauncher, ElevationRequest, HelperCommand, ScriptDialect, SystemLauncher};
use crate::config::{ElevationConfig, HelperExitCode};
use crate::error::ElevationError;
use crate::platform::LaunchError;
use crate::shortcut::ShortcutSpec;

/// Hands one construction to an elevated helper process.
///
/// Each call writes a uniquely named script, launches it elevated, waits for
/// it, deletes it and maps the exit status. Nothing is retried.
#[derive(Clone)]
pub struct ElevationOrchestrator {
    helper: HelperCommand,
    launcher: Arc<dyn ElevatedLauncher>,
    dialect: ScriptDialect,
    script_dir: Option<PathBuf>,
}

impl std::fmt::Debug for ElevationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevationOrchestrator")
            .field("helper", &self.helper)
            .field("dialect", &self.dialect)
            .field("script_dir", &self.script_dir)
            .finish_non_exhaustive()
    }
}

impl ElevationOrchestrator {
    pub fn new(
        helper: HelperCommand,
        launcher: Arc<dyn ElevatedLauncher>,
        dialect: ScriptDialect,
    ) -> Self {
        Self {
            helper,
            launcher,
            dialect,
            script_dir: None,
        }
    }

    /// Orchestrator for the running executable, using the host's dialect
    /// and elevation mechanism.
    pub fn for_current_exe() -> std::io::Result<Self> {
        let dialect = ScriptDialect::native();
        Ok(Self::new(
            HelperCommand::current_exe()?,
            Arc::new(SystemLauncher::new(dialect)),
            dialect,
        ))
    }

    /// Directory for the transient scripts (defaults to the system temp
    /// directory).
    pub fn with_script_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.script_dir = Some(dir.into());
        self
    }

    pub fn helper(&self) -> &HelperCommand {
        &self.helper
    }

    /// Build `spec` at `destination_file` in an elevated helper process.
    ///
    /// Blocks until the helper exits. The script is deleted before this
    /// returns, whatever the outcome.
    pub fn build_elevated(
        &self,
        spec: &ShortcutSpec,
        destination_file: &Path,
    ) -> Result<(), ElevationError> {
        spec.validate().map_err(ElevationError::InvalidSpec)?;

        let payload = ElevationRequest::new(spec.clone(), destination_file)
            .encode()
            .map_err(|e| ElevationError::failed(format!("Could not encode request: {}", e)))?;
        let script = self.dialect.render(&self.helper, &payload)?;
        let script_path = self.persist_script(&script)?;

        info!(
            "Launching elevated helper for '{}' at {}",
            spec.name(),
            destination_file.display()
        );
        let outcome = self.launcher.launch_and_wait(&script_path);

        let shown = script_path.display().to_string();
        if let Err(e) = script_path.close() {
            debug!("Script {} was already gone: {}", shown, e);
        }

        match outcome {
            Ok(HelperExitCode::SUCCESS) => {
                info!("Elevated helper created {}", destination_file.display());
                Ok(())
            }
            Ok(code) => Err(ElevationError::Failed {
                message: format!("{} (exit code {})", HelperExitCode::describe(code), code),
                exit_code: Some(code),
                source: None,
            }),
            Err(LaunchError::Denied) => Err(ElevationError::Denied),
            Err(LaunchError::Failed(e)) => Err(ElevationError::io(
                "Could not launch the elevated helper",
                e,
            )),
        }
    }

    fn persist_script(&self, script: &str) -> Result<TempPath, ElevationError> {
        let dir = self
            .script_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let suffix = format!(".{}", self.dialect.extension());

        let mut file = Builder::new()
            .prefix(ElevationConfig::SCRIPT_PREFIX)
            .suffix(&suffix)
            .tempfile_in(&dir)
            .map_err(|e| ElevationError::io("Could not create the elevation script", e))?;
        file.write_all(script.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| ElevationError::io("Could not write the elevation script", e))?;

        debug!("Wrote elevation script {}", file.path().display());
        // The handle is released so the elevated interpreter can open and
        // delete the file.
        Ok(file.into_temp_path())
    }
}

//! Public entry point of the engine.

mod builder;

pub use builder::ShortcutEngineBuilder;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::elevation::{self, ElevationOrchestrator};
use crate::error::{BuildError, CreateError, ElevationError, LocationError};
use crate::location::{LocationChoice, LocationResolver};
use crate::platform::PrivilegeProbe;
use crate::shortcut::{ShortcutBuilder, ShortcutSpec};

/// Result of a successful [`ShortcutEngine::create_shortcut`].
#[derive(Debug)]
pub enum CreateOutcome {
    /// The shortcut exists with every requested property.
    Created { path: PathBuf },
    /// The shortcut exists and works, but the run-as-administrator flag
    /// could not be set; `reason` says why.
    CreatedWithoutElevateFlag { path: PathBuf, reason: BuildError },
}

impl CreateOutcome {
    pub fn path(&self) -> &Path {
        match self {
            CreateOutcome::Created { path } => path,
            CreateOutcome::CreatedWithoutElevateFlag { path, .. } => path,
        }
    }
}

/// Shortcut creation with elevation handling.
///
/// Holds no per-request state; one engine can serve any number of calls.
#[derive(Clone)]
pub struct ShortcutEngine {
    resolver: LocationResolver,
    privilege: Arc<dyn PrivilegeProbe>,
    builder: ShortcutBuilder,
    orchestrator: ElevationOrchestrator,
}

impl std::fmt::Debug for ShortcutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutEngine")
            .field("resolver", &self.resolver)
            .field("orchestrator", &self.orchestrator)
            .finish_non_exhaustive()
    }
}

impl ShortcutEngine {
    /// Engine over the host's folders, privilege and elevation mechanism.
    pub fn new() -> std::io::Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ShortcutEngineBuilder {
        ShortcutEngineBuilder::new()
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Create the shortcut described by `spec` with the current rights.
    ///
    /// Fails with [`CreateError::ElevationRequired`] when the destination
    /// needs rights this process lacks; the caller then decides whether to
    /// use [`create_shortcut_elevated`](Self::create_shortcut_elevated).
    pub fn create_shortcut(&self, spec: &ShortcutSpec) -> Result<CreateOutcome, CreateError> {
        spec.validate()?;

        let resolved = self.resolver.resolve(spec.destination())?;
        if resolved.requires_elevation_to_write && !self.privilege.is_elevated() {
            return Err(CreateError::ElevationRequired {
                directory: resolved.directory,
            });
        }

        let path = resolved.directory.join(spec.file_name());
        match self.builder.build(spec, &path) {
            Ok(()) => Ok(CreateOutcome::Created { path }),
            Err(reason) if reason.is_partial_success() => {
                Ok(CreateOutcome::CreatedWithoutElevateFlag { path, reason })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether writing to `choice` needs elevation. Built-in choices never
    /// touch the filesystem; `Custom` is probed.
    pub fn requires_elevation(&self, choice: &LocationChoice) -> Result<bool, LocationError> {
        self.resolver.requires_elevation(choice)
    }

    pub fn is_process_elevated(&self) -> bool {
        self.privilege.is_elevated()
    }

    /// Full path of the artifact `spec` would produce, without I/O.
    pub fn destination_file(&self, spec: &ShortcutSpec) -> Result<PathBuf, LocationError> {
        Ok(self
            .resolver
            .locate(spec.destination())?
            .join(spec.file_name()))
    }

    /// Create the shortcut in an elevated helper process.
    ///
    /// Nothing is written by this process; the helper creates the directory
    /// and the artifact.
    pub fn create_shortcut_elevated(&self, spec: &ShortcutSpec) -> Result<(), ElevationError> {
        spec.validate().map_err(ElevationError::InvalidSpec)?;
        let destination = self.destination_file(spec)?;
        debug!("Elevated destination for '{}': {}", spec.name(), destination.display());
        self.orchestrator.build_elevated(spec, &destination)
    }

    /// Helper-process entry point: build the request in `payload`. Returns
    /// the process exit code.
    pub fn run_elevated_request(&self, payload: &str) -> i32 {
        elevation::run_elevated_request(payload, &self.builder)
    }
}

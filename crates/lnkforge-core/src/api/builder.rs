//! Builder for configuring a [`ShortcutEngine`].

use std::path::PathBuf;
use std::sync::Arc;

use super::ShortcutEngine;
use crate::elevation::{
    ElevatedLauncher, ElevationOrchestrator, HelperCommand, ScriptDialect, SystemLauncher,
};
use crate::location::LocationResolver;
use crate::platform::{
    KnownFolders, PrivilegeProbe, ProcessPrivilege, ShellNotifier, SystemShellNotifier,
};
use crate::shortcut::{ArtifactWriter, LinkFileWriter, ShortcutBuilder};

/// Builder for configuring a [`ShortcutEngine`].
///
/// Every capability defaults to the host implementation; override them to
/// embed the engine elsewhere or to test it without touching the real
/// desktop.
///
/// # Example
///
/// ```rust,ignore
/// use lnkforge::{KnownFolders, ShortcutEngine};
///
/// let engine = ShortcutEngine::builder()
///     .known_folders(KnownFolders::rooted_at("/tmp/sandbox"))
///     .start_menu_folder(None)
///     .refresh_search_index(false)
///     .build()?;
/// ```
#[derive(Default)]
pub struct ShortcutEngineBuilder {
    folders: Option<KnownFolders>,
    start_menu_folder: Option<Option<String>>,
    writer: Option<Arc<dyn ArtifactWriter>>,
    privilege: Option<Arc<dyn PrivilegeProbe>>,
    notifier: Option<Arc<dyn ShellNotifier>>,
    launcher: Option<Arc<dyn ElevatedLauncher>>,
    helper: Option<HelperCommand>,
    dialect: Option<ScriptDialect>,
    script_dir: Option<PathBuf>,
    refresh_search_index: Option<bool>,
}

impl ShortcutEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `folders` instead of the folders detected on the host.
    pub fn known_folders(mut self, folders: KnownFolders) -> Self {
        self.folders = Some(folders);
        self
    }

    /// Sub-folder for the Start Menu choices. `None` writes straight into
    /// `Programs`.
    ///
    /// Default: `lnkforge`
    pub fn start_menu_folder(mut self, folder: Option<String>) -> Self {
        self.start_menu_folder = Some(folder);
        self
    }

    pub fn writer(mut self, writer: Arc<dyn ArtifactWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn privilege_probe(mut self, probe: Arc<dyn PrivilegeProbe>) -> Self {
        self.privilege = Some(probe);
        self
    }

    /// Replace the shell notifier. Takes precedence over
    /// [`refresh_search_index`](Self::refresh_search_index).
    pub fn notifier(mut self, notifier: Arc<dyn ShellNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn launcher(mut self, launcher: Arc<dyn ElevatedLauncher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    /// Executable (and leading arguments) the elevated script re-invokes.
    ///
    /// Default: the current executable with `apply-elevated`, preceded by
    /// `--no-index-refresh` when the refresh is turned off
    pub fn helper_command(mut self, helper: HelperCommand) -> Self {
        self.helper = Some(helper);
        self
    }

    pub fn script_dialect(mut self, dialect: ScriptDialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Directory for transient elevation scripts.
    ///
    /// Default: the system temp directory
    pub fn script_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.script_dir = Some(dir.into());
        self
    }

    /// Ask the search indexer to refresh after each created shortcut.
    ///
    /// Default: `true`
    pub fn refresh_search_index(mut self, enable: bool) -> Self {
        self.refresh_search_index = Some(enable);
        self
    }

    /// Build the engine.
    ///
    /// Fails only when no helper command was given and the path of the
    /// current executable cannot be determined.
    pub fn build(self) -> std::io::Result<ShortcutEngine> {
        let folders = self.folders.unwrap_or_else(KnownFolders::detect);
        let mut resolver = LocationResolver::new(folders);
        if let Some(folder) = self.start_menu_folder {
            resolver = resolver.with_start_menu_folder(folder);
        }

        let writer = self
            .writer
            .unwrap_or_else(|| Arc::new(LinkFileWriter) as Arc<dyn ArtifactWriter>);
        let refresh = self.refresh_search_index.unwrap_or(true);
        let notifier = self.notifier.unwrap_or_else(|| {
            Arc::new(SystemShellNotifier::new(refresh)) as Arc<dyn ShellNotifier>
        });
        let privilege = self
            .privilege
            .unwrap_or_else(|| Arc::new(ProcessPrivilege) as Arc<dyn PrivilegeProbe>);

        let dialect = self.dialect.unwrap_or_else(ScriptDialect::native);
        let helper = match self.helper {
            Some(helper) => helper,
            None if refresh => HelperCommand::current_exe()?,
            None => HelperCommand::current_exe()?.without_index_refresh(),
        };
        let launcher = self
            .launcher
            .unwrap_or_else(|| Arc::new(SystemLauncher::new(dialect)) as Arc<dyn ElevatedLauncher>);
        let mut orchestrator = ElevationOrchestrator::new(helper, launcher, dialect);
        if let Some(dir) = self.script_dir {
            orchestrator = orchestrator.with_script_dir(dir);
        }

        Ok(ShortcutEngine {
            resolver,
            privilege,
            builder: ShortcutBuilder::new(writer, notifier),
            orchestrator,
        })
    }
}

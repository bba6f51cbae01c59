//! lnkforge - shortcut (.lnk) construction and privilege-elevation engine.
//!
//! The engine decides where a shortcut should live, whether writing there
//! needs administrator rights, produces the shell-link artifact (optionally
//! flagged "run as administrator"), and, when the current process lacks the
//! rights, hands the same construction to an elevated helper process.
//!
//! # Example
//!
//! ```rust,ignore
//! use lnkforge::{CreateError, LocationChoice, ShortcutEngine, ShortcutSpec, WindowMode};
//!
//! fn main() -> anyhow::Result<()> {
//!     let engine = ShortcutEngine::new()?;
//!     let spec = ShortcutSpec::new("Notepad", r"C:\Windows\notepad.exe", LocationChoice::DesktopUser)
//!         .with_window_mode(WindowMode::Maximized);
//!
//!     match engine.create_shortcut(&spec) {
//!         Ok(outcome) => println!("created {}", outcome.path().display()),
//!         Err(CreateError::ElevationRequired { .. }) => engine.create_shortcut_elevated(&spec)?,
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod elevation;
pub mod error;
pub mod location;
pub mod platform;
pub mod shortcut;

mod api;

// Re-export commonly used types
pub use api::{CreateOutcome, ShortcutEngine, ShortcutEngineBuilder};
pub use elevation::{
    ElevatedLauncher, ElevationOrchestrator, ElevationRequest, HelperCommand, ScriptDialect,
    SystemLauncher,
};
pub use error::{BuildError, CreateError, ElevationError, LocationError, PayloadError, WritePhase};
pub use location::{LocationChoice, LocationResolver, ResolvedLocation};
pub use platform::{KnownFolders, PrivilegeProbe, ProcessPrivilege, ShellNotifier};
pub use shortcut::{
    ArtifactWriter, LinkFileWriter, QuickPreset, ShortcutBuilder, ShortcutSpec, WindowMode,
};

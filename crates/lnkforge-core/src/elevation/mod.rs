//! Elevated construction through a helper process.
//!
//! When the destination needs rights the current process lacks, the
//! construction is handed over as an [`ElevationRequest`]:
//!
//! 1. the request is encoded and embedded in a self-deleting script
//! 2. the script is launched with elevation (UAC on Windows, `pkexec`
//!    elsewhere) and awaited
//! 3. the script re-invokes the helper executable, whose
//!    [`run_elevated_request`] entry point runs the same
//!    [`ShortcutBuilder`](crate::shortcut::ShortcutBuilder)
//! 4. the helper's exit code is the only result that travels back

mod helper;
mod launcher;
mod orchestrator;
mod request;
mod script;

pub use helper::run_elevated_request;
pub use launcher::{ElevatedLauncher, SystemLauncher};
pub use orchestrator::ElevationOrchestrator;
pub use request::ElevationRequest;
pub use script::{HelperCommand, ScriptDialect};

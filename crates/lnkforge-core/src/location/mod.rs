//! Destination selection.
//!
//! Maps a logical [`LocationChoice`] to a concrete directory and decides
//! whether writing there needs elevated rights.

mod probe;
mod resolver;

pub use probe::requires_elevation_to_write;
pub use resolver::LocationResolver;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where the caller wants the shortcut to go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationChoice {
    StartMenuUser,
    StartMenuAllUsers,
    StartupUser,
    StartupAllUsers,
    DesktopUser,
    DesktopAllUsers,
    /// A folder the caller already picked. An empty path means nothing was
    /// picked.
    Custom(PathBuf),
}

impl LocationChoice {
    /// Whether the choice targets a machine-wide folder.
    pub fn is_all_users(&self) -> bool {
        matches!(
            self,
            LocationChoice::StartMenuAllUsers
                | LocationChoice::StartupAllUsers
                | LocationChoice::DesktopAllUsers
        )
    }

    /// Fixed elevation requirement of the built-in choices; `None` for
    /// [`LocationChoice::Custom`], which has to be probed.
    pub fn fixed_elevation_requirement(&self) -> Option<bool> {
        match self {
            LocationChoice::Custom(_) => None,
            other => Some(other.is_all_users()),
        }
    }
}

impl fmt::Display for LocationChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationChoice::StartMenuUser => f.write_str("Start Menu (Current User)"),
            LocationChoice::StartMenuAllUsers => f.write_str("Start Menu (All Users)"),
            LocationChoice::StartupUser => f.write_str("Startup (Current User)"),
            LocationChoice::StartupAllUsers => f.write_str("Startup (All Users)"),
            LocationChoice::DesktopUser => f.write_str("Desktop (Current User)"),
            LocationChoice::DesktopAllUsers => f.write_str("Desktop (All Users)"),
            LocationChoice::Custom(path) => write!(f, "Custom ({})", path.display()),
        }
    }
}

/// A choice resolved for one creation attempt.
///
/// Never persisted: a later attempt resolves (and probes) again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub directory: PathBuf,
    pub requires_elevation_to_write: bool,
}

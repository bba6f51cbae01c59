//! Elevated script launchers.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

use super::ScriptDialect;
use crate::config::ElevationConfig;
use crate::platform::{self, LaunchError};

/// Capability that runs a script with elevation and waits for it.
pub trait ElevatedLauncher: Send + Sync {
    /// Run `script` elevated, block until it exits and return its exit
    /// status.
    fn launch_and_wait(&self, script: &Path) -> Result<i32, LaunchError>;
}

/// Launches scripts through the host's elevation mechanism.
#[derive(Debug, Clone, Copy)]
pub struct SystemLauncher {
    dialect: ScriptDialect,
}

impl SystemLauncher {
    pub fn new(dialect: ScriptDialect) -> Self {
        Self { dialect }
    }

    /// Interpreter and arguments that run `script`.
    pub fn command_for(&self, script: &Path) -> (PathBuf, Vec<OsString>) {
        match self.dialect {
            ScriptDialect::PowerShell => {
                let mut args: Vec<OsString> = [
                    "-NoProfile",
                    "-NonInteractive",
                    "-ExecutionPolicy",
                    "Bypass",
                    "-WindowStyle",
                    "Hidden",
                    "-File",
                ]
                .into_iter()
                .map(OsString::from)
                .collect();
                args.push(script.as_os_str().to_os_string());
                (PathBuf::from("powershell.exe"), args)
            }
            ScriptDialect::Posix => (
                PathBuf::from(ElevationConfig::POSIX_SHELL),
                vec![script.as_os_str().to_os_string()],
            ),
        }
    }
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self::new(ScriptDialect::native())
    }
}

impl ElevatedLauncher for SystemLauncher {
    fn launch_and_wait(&self, script: &Path) -> Result<i32, LaunchError> {
        let (program, args) = self.command_for(script);
        info!(
            "Requesting elevation to run {} via {}",
            script.display(),
            program.display()
        );
        platform::run_elevated(&program, &args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_powershell_command_runs_file() {
        let launcher = SystemLauncher::new(ScriptDialect::PowerShell);
        let (program, args) = launcher.command_for(Path::new("x.ps1"));

        assert_eq!(program, PathBuf::from("powershell.exe"));
        assert_eq!(args.last(), Some(&OsString::from("x.ps1")));
        assert!(args.contains(&OsString::from("-File")));
        assert!(args.contains(&OsString::from("Bypass")));
    }

    #[test]
    fn test_posix_command_uses_sh() {
        let launcher = SystemLauncher::new(ScriptDialect::Posix);
        let (program, args) = launcher.command_for(Path::new("/tmp/x.sh"));

        assert_eq!(program, PathBuf::from("/bin/sh"));
        assert_eq!(args, vec![OsString::from("/tmp/x.sh")]);
    }
}

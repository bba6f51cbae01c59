//! Centralized configuration for lnkforge.
//!
//! Constants for the link format, the elevation protocol and the file names
//! the engine generates.

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "lnkforge";
    /// Sub-folder created under the Start Menu "Programs" folders.
    pub const START_MENU_FOLDER: &'static str = "lnkforge";
}

/// Shell link (.lnk) format constants.
pub struct LinkConfig;

impl LinkConfig {
    /// Canonical artifact extension, without the dot.
    pub const EXTENSION: &'static str = "lnk";
    /// Byte offset of the little-endian `LinkFlags` word.
    pub const FLAGS_OFFSET: usize = 20;
    /// `RunAsUser` bit in `LinkFlags`.
    pub const RUN_AS_USER_FLAG: u32 = 0x0000_2000;
    /// Width of the `LinkFlags` word. Artifacts that end before the word
    /// does are never patched.
    pub const FLAGS_LEN: usize = 4;
}

/// Elevation protocol configuration.
pub struct ElevationConfig;

impl ElevationConfig {
    /// Hidden sub-command the generated script passes to the helper.
    pub const HELPER_SUBCOMMAND: &'static str = "apply-elevated";
    /// Global flag that turns off the search index refresh in the helper.
    pub const NO_INDEX_REFRESH_FLAG: &'static str = "--no-index-refresh";
    /// Prefix of the transient script files.
    pub const SCRIPT_PREFIX: &'static str = "lnkforge-elevate-";
    /// Prefix of the zero-byte probe files.
    pub const PROBE_PREFIX: &'static str = ".lnkforge-probe-";
    /// Version of the serialized request.
    pub const REQUEST_FORMAT_VERSION: u32 = 1;
    /// Interpreter used to run POSIX scripts under `pkexec`.
    pub const POSIX_SHELL: &'static str = "/bin/sh";
}

/// Exit codes of the elevated helper entry point.
pub struct HelperExitCode;

impl HelperExitCode {
    pub const SUCCESS: i32 = 0;
    /// Status the POSIX script reports when the helper itself could not be
    /// run. Kept below 126 so it never reads as a pkexec refusal.
    pub const NOT_RUN: i32 = 1;
    pub const PAYLOAD_REJECTED: i32 = 2;
    pub const BUILD_FAILED: i32 = 3;
    pub const CREATED_WITHOUT_ELEVATE_FLAG: i32 = 4;

    /// Human-readable meaning of a helper exit code.
    pub fn describe(code: i32) -> &'static str {
        match code {
            Self::SUCCESS => "success",
            Self::NOT_RUN => "the elevated helper could not be started",
            Self::PAYLOAD_REJECTED => "the elevated helper rejected the request",
            Self::BUILD_FAILED => "the elevated helper could not create the shortcut",
            Self::CREATED_WITHOUT_ELEVATE_FLAG => {
                "the shortcut was created but the run-as-administrator flag could not be set"
            }
            _ => "the elevated helper exited unexpectedly",
        }
    }
}

/// Exit codes of the command-line front end.
pub struct CliExitCode;

impl CliExitCode {
    pub const SUCCESS: i32 = 0;
    /// Any failure without a more specific code.
    pub const FAILURE: i32 = 1;
    /// The request was invalid: empty name or target, or no folder chosen.
    pub const INVALID_REQUEST: i32 = HelperExitCode::PAYLOAD_REJECTED;
    /// Writing the shortcut failed.
    pub const BUILD_FAILED: i32 = HelperExitCode::BUILD_FAILED;
    pub const ELEVATION_DENIED: i32 = 5;
    pub const ELEVATION_FAILED: i32 = 6;
    /// The destination needs administrator rights and `--elevate` was not given.
    pub const ELEVATION_REQUIRED: i32 = 7;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_word_lies_inside_header() {
        assert_eq!(LinkConfig::FLAGS_OFFSET + LinkConfig::FLAGS_LEN, 24);
    }

    #[test]
    fn test_exit_code_descriptions() {
        assert_eq!(HelperExitCode::describe(0), "success");
        assert!(HelperExitCode::describe(4).contains("run-as-administrator"));
        assert!(HelperExitCode::describe(99).contains("unexpectedly"));
    }

    #[test]
    fn test_script_failure_code_is_not_a_pkexec_refusal() {
        assert!(HelperExitCode::NOT_RUN < 126);
        assert_ne!(HelperExitCode::NOT_RUN, HelperExitCode::SUCCESS);
    }

    #[test]
    fn test_cli_exit_codes_are_distinct() {
        let codes = [
            CliExitCode::SUCCESS,
            CliExitCode::FAILURE,
            CliExitCode::INVALID_REQUEST,
            CliExitCode::BUILD_FAILED,
            CliExitCode::ELEVATION_DENIED,
            CliExitCode::ELEVATION_FAILED,
            CliExitCode::ELEVATION_REQUIRED,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

//! Detection of the current process's privilege level.
//!
//! The probe never fails outward: anything that prevents an answer is
//! reported as "not elevated", which pushes callers onto the elevation path
//! instead of letting them write to a protected folder unprivileged.

/// Capability that answers whether the current process runs elevated.
pub trait PrivilegeProbe: Send + Sync {
    fn is_elevated(&self) -> bool;
}

/// [`PrivilegeProbe`] backed by the real process token / effective uid.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessPrivilege;

impl PrivilegeProbe for ProcessPrivilege {
    fn is_elevated(&self) -> bool {
        current_process_is_elevated()
    }
}

/// Check whether the current process is elevated.
///
/// # Platform Behavior
/// - **Windows**: `TokenElevation` of the process token
/// - **Linux/macOS**: effective uid is root
pub fn current_process_is_elevated() -> bool {
    #[cfg(windows)]
    {
        token_is_elevated()
    }

    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }

    #[cfg(not(any(unix, windows)))]
    {
        tracing::debug!("Privilege check not implemented for this platform");
        false
    }
}

#[cfg(windows)]
#[allow(unsafe_code)]
fn token_is_elevated() -> bool {
    use std::ffi::c_void;
    use std::mem::size_of;
    use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
    use windows_sys::Win32::Security::{
        GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
    };
    use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

    let mut token: HANDLE = std::ptr::null_mut();
    // SAFETY: GetCurrentProcess returns a pseudo handle that needs no cleanup,
    // and `token` is a valid out pointer.
    let opened = unsafe { OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) };
    if opened == 0 {
        tracing::debug!(
            "OpenProcessToken failed: {}",
            std::io::Error::last_os_error()
        );
        return false;
    }

    let mut elevation = TOKEN_ELEVATION { TokenIsElevated: 0 };
    let mut returned = 0u32;
    // SAFETY: the buffer is a TOKEN_ELEVATION of exactly the size passed and
    // `token` was opened with TOKEN_QUERY above.
    let queried = unsafe {
        GetTokenInformation(
            token,
            TokenElevation,
            &mut elevation as *mut TOKEN_ELEVATION as *mut c_void,
            size_of::<TOKEN_ELEVATION>() as u32,
            &mut returned,
        )
    };
    // SAFETY: `token` is a handle we own and it is closed exactly once.
    unsafe { CloseHandle(token) };

    if queried == 0 {
        tracing::debug!("GetTokenInformation(TokenElevation) failed");
        return false;
    }
    elevation.TokenIsElevated != 0
}

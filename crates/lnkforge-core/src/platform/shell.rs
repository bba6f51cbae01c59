//! Shell integration: change notifications and elevated process launch.

use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

/// One-way notification that a shell-visible file appeared.
///
/// Implementations must not block for long and have no error channel;
/// whatever happens inside never affects the result of the operation that
/// triggered the notification.
pub trait ShellNotifier: Send + Sync {
    fn artifact_created(&self, path: &Path);
}

/// Notifier that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl ShellNotifier for NoopNotifier {
    fn artifact_created(&self, _path: &Path) {}
}

/// Notifier backed by the host shell.
///
/// # Platform Behavior
/// - **Windows**: `SHChangeNotify` for the new file plus an association
///   refresh, then optionally `searchindexer.exe /reindex`
/// - **Linux/macOS**: logs only
#[derive(Debug, Clone, Copy)]
pub struct SystemShellNotifier {
    refresh_search_index: bool,
}

impl SystemShellNotifier {
    pub fn new(refresh_search_index: bool) -> Self {
        Self {
            refresh_search_index,
        }
    }
}

impl Default for SystemShellNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ShellNotifier for SystemShellNotifier {
    fn artifact_created(&self, path: &Path) {
        #[cfg(windows)]
        notify_shell_windows(path);

        #[cfg(not(windows))]
        debug!("Shell notification skipped on this platform for {}", path.display());

        if self.refresh_search_index {
            spawn_search_index_refresh();
        }
    }
}

#[cfg(windows)]
#[allow(unsafe_code)]
fn notify_shell_windows(path: &Path) {
    use windows_sys::Win32::UI::Shell::{
        SHChangeNotify, SHCNE_ASSOCCHANGED, SHCNE_CREATE, SHCNF_IDLIST, SHCNF_PATHW,
    };

    let wide = to_wide(path.as_os_str());
    // SAFETY: `wide` is a NUL-terminated UTF-16 path that outlives the call;
    // the second item may be null for SHCNE_CREATE.
    unsafe {
        SHChangeNotify(
            SHCNE_CREATE as _,
            SHCNF_PATHW as _,
            wide.as_ptr() as *const _,
            std::ptr::null(),
        );
        SHChangeNotify(
            SHCNE_ASSOCCHANGED as _,
            SHCNF_IDLIST as _,
            std::ptr::null(),
            std::ptr::null(),
        );
    }
    debug!("Sent shell change notification for {}", path.display());
}

fn spawn_search_index_refresh() {
    #[cfg(windows)]
    {
        // The child is intentionally not awaited.
        match std::process::Command::new("searchindexer.exe")
            .arg("/reindex")
            .spawn()
        {
            Ok(_) => debug!("Requested search index refresh"),
            Err(e) => debug!("Search index refresh unavailable: {}", e),
        }
    }

    #[cfg(not(windows))]
    debug!("Search index refresh not available on this platform");
}

/// Why an elevated launch did not produce an exit status.
#[derive(Debug)]
pub enum LaunchError {
    /// The consent prompt was dismissed or authorization was refused.
    Denied,
    /// The process could not be started.
    Failed(std::io::Error),
}

/// Start `program` with `args` requesting OS-level elevation, wait for it to
/// exit and return its exit status.
///
/// # Platform Behavior
/// - **Windows**: `ShellExecuteExW` with the `runas` verb (shows the UAC
///   prompt); `ERROR_CANCELLED` maps to [`LaunchError::Denied`]
/// - **Linux/macOS**: `pkexec program args...`; pkexec's 126/127 statuses
///   (dialog dismissed / not authorized) map to [`LaunchError::Denied`]
pub fn run_elevated(program: &Path, args: &[OsString]) -> Result<i32, LaunchError> {
    #[cfg(windows)]
    {
        run_elevated_windows(program, args)
    }

    #[cfg(unix)]
    {
        run_elevated_pkexec(program, args)
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = (program, args);
        Err(LaunchError::Failed(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "elevated launch is not implemented for this platform",
        )))
    }
}

#[cfg(unix)]
fn run_elevated_pkexec(program: &Path, args: &[OsString]) -> Result<i32, LaunchError> {
    debug!("Launching {} through pkexec", program.display());
    let status = std::process::Command::new("pkexec")
        .arg(program)
        .args(args)
        .status()
        .map_err(LaunchError::Failed)?;

    pkexec_outcome(status)
}

/// Map the status of a `pkexec` run to a launch result.
///
/// pkexec forwards the child's status unchanged, so programs launched
/// through it must keep their own statuses below 126.
#[cfg(unix)]
pub(crate) fn pkexec_outcome(status: std::process::ExitStatus) -> Result<i32, LaunchError> {
    const PKEXEC_DISMISSED: i32 = 126;
    const PKEXEC_NOT_AUTHORIZED: i32 = 127;

    match status.code() {
        Some(PKEXEC_DISMISSED) | Some(PKEXEC_NOT_AUTHORIZED) => Err(LaunchError::Denied),
        Some(code) => Ok(code),
        None => Err(LaunchError::Failed(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("elevated process terminated by signal ({})", status),
        ))),
    }
}

#[cfg(windows)]
#[allow(unsafe_code)]
fn run_elevated_windows(program: &Path, args: &[OsString]) -> Result<i32, LaunchError> {
    use std::mem::size_of;
    use windows_sys::Win32::Foundation::{CloseHandle, GetLastError, ERROR_CANCELLED};
    use windows_sys::Win32::System::Threading::{
        GetExitCodeProcess, WaitForSingleObject, INFINITE,
    };
    use windows_sys::Win32::UI::Shell::{
        ShellExecuteExW, SEE_MASK_NOASYNC, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW,
    };
    use windows_sys::Win32::UI::WindowsAndMessaging::SW_HIDE;

    let verb = to_wide(std::ffi::OsStr::new("runas"));
    let file = to_wide(program.as_os_str());
    let parameters = to_wide(&join_windows_args(args));

    // SAFETY: SHELLEXECUTEINFOW is a plain C struct; all-zero is its empty value.
    let mut info: SHELLEXECUTEINFOW = unsafe { std::mem::zeroed() };
    info.cbSize = size_of::<SHELLEXECUTEINFOW>() as u32;
    info.fMask = SEE_MASK_NOCLOSEPROCESS | SEE_MASK_NOASYNC;
    info.lpVerb = verb.as_ptr();
    info.lpFile = file.as_ptr();
    info.lpParameters = parameters.as_ptr();
    info.nShow = SW_HIDE as i32;

    // ShellExecuteExW may hand the verb to a shell extension, which needs COM.
    let _com = ComApartment::enter();

    debug!("Launching {} with the runas verb", program.display());
    // SAFETY: every string pointer references a NUL-terminated buffer that
    // outlives the call, and `info.cbSize` matches the struct.
    let launched = unsafe { ShellExecuteExW(&mut info) };
    if launched == 0 {
        // SAFETY: called immediately after the failing API on the same thread.
        let code = unsafe { GetLastError() };
        if code == ERROR_CANCELLED {
            return Err(LaunchError::Denied);
        }
        return Err(LaunchError::Failed(std::io::Error::from_raw_os_error(
            code as i32,
        )));
    }
    if info.hProcess.is_null() {
        return Err(LaunchError::Failed(std::io::Error::new(
            std::io::ErrorKind::Other,
            "elevated launch returned no process handle",
        )));
    }

    let mut exit_code: u32 = 1;
    // SAFETY: SEE_MASK_NOCLOSEPROCESS hands us ownership of `hProcess`; it is
    // waited on, queried and closed exactly once.
    let queried = unsafe {
        WaitForSingleObject(info.hProcess, INFINITE);
        GetExitCodeProcess(info.hProcess, &mut exit_code)
    };
    let query_error = std::io::Error::last_os_error();
    // SAFETY: see above.
    unsafe { CloseHandle(info.hProcess) };

    if queried == 0 {
        return Err(LaunchError::Failed(query_error));
    }
    Ok(exit_code as i32)
}

/// COM initialized on the current thread for the guard's lifetime.
///
/// A thread already in a different apartment keeps it; the guard then
/// does nothing on drop.
#[cfg(windows)]
struct ComApartment {
    initialized: bool,
}

#[cfg(windows)]
#[allow(unsafe_code)]
impl ComApartment {
    fn enter() -> Self {
        use windows_sys::Win32::System::Com::{
            CoInitializeEx, COINIT_APARTMENTTHREADED, COINIT_DISABLE_OLE1DDE,
        };

        // SAFETY: the reserved pointer must be null; every successful call
        // is balanced by CoUninitialize in Drop.
        let hr = unsafe {
            CoInitializeEx(
                std::ptr::null(),
                (COINIT_APARTMENTTHREADED | COINIT_DISABLE_OLE1DDE) as _,
            )
        };
        if hr < 0 {
            debug!("COM already initialized differently on this thread (0x{:08x})", hr);
        }
        Self {
            initialized: hr >= 0,
        }
    }
}

#[cfg(windows)]
#[allow(unsafe_code)]
impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.initialized {
            // SAFETY: balances the successful CoInitializeEx in `enter`.
            unsafe { windows_sys::Win32::System::Com::CoUninitialize() };
        }
    }
}

/// Join arguments into one Windows command line, quoting those with spaces.
#[cfg(windows)]
fn join_windows_args(args: &[OsString]) -> OsString {
    let mut joined = OsString::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            joined.push(" ");
        }
        let text = arg.to_string_lossy();
        if text.is_empty() || text.contains(&[' ', '\t'][..]) {
            joined.push("\"");
            joined.push(arg);
            joined.push("\"");
        } else {
            joined.push(arg);
        }
    }
    joined
}

#[cfg(windows)]
fn to_wide(value: &std::ffi::OsStr) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;
    value.encode_wide().chain(std::iter::once(0)).collect()
}

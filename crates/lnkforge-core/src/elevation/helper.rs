//! Entry point of the elevated helper process.

use tracing::{error, info, warn};

use super::ElevationRequest;
use crate::config::HelperExitCode;
use crate::shortcut::ShortcutBuilder;

/// Decode `payload` and build the shortcut it describes with `builder`.
///
/// Runs inside the elevated process. The only channel back to the
/// orchestrator is the returned exit code (see [`HelperExitCode`]).
pub fn run_elevated_request(payload: &str, builder: &ShortcutBuilder) -> i32 {
    let request = match ElevationRequest::decode(payload) {
        Ok(request) => request,
        Err(e) => {
            error!("Rejected elevation request: {}", e);
            return HelperExitCode::PAYLOAD_REJECTED;
        }
    };

    if let Err(e) = request.spec().validate() {
        error!("Rejected elevation request: {}", e);
        return HelperExitCode::PAYLOAD_REJECTED;
    }

    info!(
        "Building '{}' at {} with elevated rights",
        request.spec().name(),
        request.destination_file().display()
    );

    match builder.build(request.spec(), request.destination_file()) {
        Ok(()) => HelperExitCode::SUCCESS,
        Err(e) if e.is_partial_success() => {
            warn!("Shortcut created without the run-as flag: {}", e);
            HelperExitCode::CREATED_WITHOUT_ELEVATE_FLAG
        }
        Err(e) => {
            error!("Elevated build failed: {}", e);
            HelperExitCode::BUILD_FAILED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationChoice;
    use crate::platform::NoopNotifier;
    use crate::shortcut::FixedBytesWriter;
    use crate::shortcut::{LinkFileWriter, ShortcutSpec};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn builder() -> ShortcutBuilder {
        ShortcutBuilder::new(Arc::new(LinkFileWriter), Arc::new(NoopNotifier))
    }

    #[test]
    fn test_success() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Tool.lnk");
        let spec = ShortcutSpec::new("Tool", r"C:\tool.exe", LocationChoice::DesktopAllUsers);
        let payload = ElevationRequest::new(spec, &dest).encode().unwrap();

        assert_eq!(run_elevated_request(&payload, &builder()), 0);
        assert!(dest.is_file());
    }

    #[test]
    fn test_garbage_payload_is_rejected() {
        assert_eq!(
            run_elevated_request("not hex", &builder()),
            HelperExitCode::PAYLOAD_REJECTED
        );
    }

    #[test]
    fn test_invalid_spec_is_rejected() {
        let dir = TempDir::new().unwrap();
        let spec = ShortcutSpec::new("", r"C:\tool.exe", LocationChoice::DesktopAllUsers);
        let payload = ElevationRequest::new(spec, dir.path().join("x.lnk"))
            .encode()
            .unwrap();

        assert_eq!(
            run_elevated_request(&payload, &builder()),
            HelperExitCode::PAYLOAD_REJECTED
        );
    }

    #[test]
    fn test_partial_success_has_its_own_code() {
        let dir = TempDir::new().unwrap();
        let spec = ShortcutSpec::new("Tool", r"C:\tool.exe", LocationChoice::DesktopAllUsers)
            .with_elevate_on_launch(true);
        let payload = ElevationRequest::new(spec, dir.path().join("Tool.lnk"))
            .encode()
            .unwrap();
        let builder = ShortcutBuilder::new(
            Arc::new(FixedBytesWriter(vec![0u8; 10])),
            Arc::new(NoopNotifier),
        );

        assert_eq!(
            run_elevated_request(&payload, &builder),
            HelperExitCode::CREATED_WITHOUT_ELEVATE_FLAG
        );
    }

    #[test]
    fn test_build_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let spec = ShortcutSpec::new("Tool", r"C:\tool.exe", LocationChoice::DesktopAllUsers);
        let payload = ElevationRequest::new(spec, blocker.join("Tool.lnk"))
            .encode()
            .unwrap();

        assert_eq!(
            run_elevated_request(&payload, &builder()),
            HelperExitCode::BUILD_FAILED
        );
    }
}

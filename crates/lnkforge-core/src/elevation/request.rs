//! The request that crosses the elevation boundary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::ElevationConfig;
use crate::error::PayloadError;
use crate::shortcut::ShortcutSpec;

/// A full spec plus the already-resolved destination file.
///
/// Travels as hex-encoded JSON, so the payload embedded in the script is made
/// of `[0-9a-f]` only and needs no further escaping on any shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevationRequest {
    version: u32,
    spec: ShortcutSpec,
    destination_file: PathBuf,
}

impl ElevationRequest {
    pub fn new(spec: ShortcutSpec, destination_file: impl Into<PathBuf>) -> Self {
        Self {
            version: ElevationConfig::REQUEST_FORMAT_VERSION,
            spec,
            destination_file: destination_file.into(),
        }
    }

    pub fn spec(&self) -> &ShortcutSpec {
        &self.spec
    }

    pub fn destination_file(&self) -> &Path {
        &self.destination_file
    }

    /// Encode for transport.
    pub fn encode(&self) -> Result<String, PayloadError> {
        let json = serde_json::to_vec(self)?;
        Ok(hex::encode(json))
    }

    /// Decode a payload produced by [`ElevationRequest::encode`].
    pub fn decode(payload: &str) -> Result<Self, PayloadError> {
        let json = hex::decode(payload.trim())?;
        let request: Self = serde_json::from_slice(&json)?;
        if request.version != ElevationConfig::REQUEST_FORMAT_VERSION {
            return Err(PayloadError::UnsupportedVersion(request.version));
        }
        Ok(request)
    }
}

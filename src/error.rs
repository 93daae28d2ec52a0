//! Terminal failure taxonomy
//!
//! Every fatal condition of a sideload run maps to exactly one variant and
//! each variant to a distinct process exit code.

use std::{fmt, path::PathBuf, time::Duration};
use thiserror::Error;

/// Phase of the run a failure was detected in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Probe,
    Upload,
    Poll,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Probe => "device probe",
            Phase::Upload => "package upload",
            Phase::Poll => "post-upload check",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SideloadError {
    #[error("package file not found: {}", .0.display())]
    PackageNotFound(PathBuf),

    #[error("failed to contact device: {0:#}")]
    Unreachable(#[source] anyhow::Error),

    #[error("{phase} returned 401 Unauthorized: {hint}")]
    Unauthorized { phase: Phase, hint: &'static str },

    #[error("upload did not complete: {0:#}")]
    UploadRejected(#[source] anyhow::Error),

    #[error("timed out after {}s waiting for device to respond after upload", .0.as_secs())]
    Timeout(Duration),
}

impl SideloadError {
    pub const EXIT_PACKAGE_NOT_FOUND: u8 = 2;
    pub const EXIT_UNREACHABLE: u8 = 3;
    pub const EXIT_UNAUTHORIZED_PROBE: u8 = 4;
    pub const EXIT_UPLOAD_REJECTED: u8 = 5;
    pub const EXIT_UNAUTHORIZED_UPLOAD: u8 = 6;
    pub const EXIT_POST_UPLOAD_FAILED: u8 = 7;

    pub(crate) fn unauthorized(phase: Phase, credential_supplied: bool) -> Self {
        let hint = if credential_supplied {
            "check developer username and password"
        } else {
            "developer credentials required, re-run with --username and --password"
        };

        SideloadError::Unauthorized { phase, hint }
    }

    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            SideloadError::PackageNotFound(_) => Self::EXIT_PACKAGE_NOT_FOUND,
            SideloadError::Unreachable(_) => Self::EXIT_UNREACHABLE,
            SideloadError::Unauthorized { phase, .. } => match phase {
                Phase::Probe => Self::EXIT_UNAUTHORIZED_PROBE,
                Phase::Upload => Self::EXIT_UNAUTHORIZED_UPLOAD,
                Phase::Poll => Self::EXIT_POST_UPLOAD_FAILED,
            },
            SideloadError::UploadRejected(_) => Self::EXIT_UPLOAD_REJECTED,
            SideloadError::Timeout(_) => Self::EXIT_POST_UPLOAD_FAILED,
        }
    }
}

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Why a probe did not report its target as reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeErrorKind {
    #[error("connection refused")]
    ConnectionRefused,
    #[error("timed out")]
    Timeout,
    #[error("network unreachable")]
    NetworkUnreachable,
    #[error("host unreachable")]
    HostUnreachable,
    #[error("packet loss")]
    PacketLoss,
    #[error("permission denied")]
    PermissionDenied,
    #[error("i/o error")]
    Io,
    /// The target never got an outcome from the prober.
    #[error("not probed")]
    NotProbed,
    #[error("cancelled")]
    Cancelled,
    /// The probe task panicked or was aborted.
    #[error("probe task failed")]
    TaskFailed,
}

impl From<&io::Error> for ProbeErrorKind {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            io::ErrorKind::TimedOut => Self::Timeout,
            io::ErrorKind::NetworkUnreachable => Self::NetworkUnreachable,
            io::ErrorKind::HostUnreachable => Self::HostUnreachable,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io,
        }
    }
}

/// Structural failures around the device configuration file.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid device configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not resolve the home directory")]
    HomeDirUnavailable,
}

impl RegistryError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_kinds_map_to_probe_errors() {
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(ProbeErrorKind::from(&refused), ProbeErrorKind::ConnectionRefused);

        let unreachable = io::Error::from(io::ErrorKind::NetworkUnreachable);
        assert_eq!(ProbeErrorKind::from(&unreachable), ProbeErrorKind::NetworkUnreachable);

        let timed_out = io::Error::from(io::ErrorKind::TimedOut);
        assert_eq!(ProbeErrorKind::from(&timed_out), ProbeErrorKind::Timeout);

        let other = io::Error::from(io::ErrorKind::BrokenPipe);
        assert_eq!(ProbeErrorKind::from(&other), ProbeErrorKind::Io);
    }

    #[test]
    fn registry_io_error_names_the_path() {
        let err = RegistryError::io("/tmp/devices.json", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.to_string().contains("/tmp/devices.json"));
    }
}

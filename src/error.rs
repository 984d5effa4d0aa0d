//! # Error Types
//!
//! This module defines all error types used throughout the crate.
//!
//! ## Error Hierarchy
//!
//! The main [`Error`] enum covers every failure mode of the listener, the
//! probe and the harness. They fall into three families:
//!
//! | Variant | Family | Raised by |
//! |---------|--------|-----------|
//! | [`Error::Io`] | transport | accept, connect, receive |
//! | [`Error::Setup`] | transport | listener socket creation, bind, listen |
//! | [`Error::InvalidHandle`] | invalid handle | any operation on an invalid descriptor |
//! | [`Error::Closed`] | invalid handle | any operation on a closed endpoint |
//! | [`Error::NotConnected`] | state | receive before connect |
//! | [`Error::AlreadyConnected`] | state | second connect on a live endpoint |
//! | [`Error::ReadShutdown`] | state | receive after `shutdown_read` |
//! | [`Error::Config`] | configuration | [`HarnessConfig::validate`](crate::HarnessConfig::validate) |
//! | [`Error::StartupTimeout`] | liveness | probe waiting on the startup gate |
//! | [`Error::TaskFailed`] | liveness | harness join |
//!
//! Receive errors never reach the caller of the probe directly: they are
//! folded into the `-1` sentinel by [`ReceiveOutcome`](crate::ReceiveOutcome),
//! which keeps the [`FailureKind`](crate::FailureKind) for logging.

use std::fmt;
use std::io;

/// Result type alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for all crate operations.
#[derive(Debug)]
pub enum Error {
    /// Network I/O error on an established or connecting socket.
    Io(io::Error),

    /// The listener could not prepare its socket.
    ///
    /// Socket creation, bind and listen failures end the listener before it
    /// signals the startup gate.
    Setup {
        /// Which setup call failed.
        step: SetupStep,
        /// The OS error.
        source: io::Error,
    },

    /// Invalid configuration.
    Config(ConfigError),

    /// The operation was issued on a descriptor that names no socket.
    InvalidHandle,

    /// The endpoint was closed; its socket has been released.
    Closed,

    /// The endpoint has not been connected yet.
    NotConnected,

    /// The endpoint is already connected.
    AlreadyConnected,

    /// The read side of the endpoint has been shut down.
    ReadShutdown,

    /// The startup gate was not signaled within the configured timeout.
    StartupTimeout,

    /// A harness task panicked or was cancelled.
    TaskFailed(String),
}

/// Listener setup call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Socket,
    Bind,
    Listen,
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Socket => f.write_str("socket"),
            Self::Bind => f.write_str("bind"),
            Self::Listen => f.write_str("listen"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Setup { step, source } => write!(f, "Listener {step} failed: {source}"),
            Self::Config(e) => write!(f, "Configuration error: {}", e.message),
            Self::InvalidHandle => write!(f, "Invalid socket descriptor"),
            Self::Closed => write!(f, "Socket is closed"),
            Self::NotConnected => write!(f, "Socket is not connected"),
            Self::AlreadyConnected => write!(f, "Socket is already connected"),
            Self::ReadShutdown => write!(f, "Socket read side is shut down"),
            Self::StartupTimeout => write!(f, "Timed out waiting for the listener"),
            Self::TaskFailed(reason) => write!(f, "Task failed: {reason}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Setup { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_error_exposes_os_source() {
        let err = Error::Setup {
            step: SetupStep::Bind,
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert_eq!(
            err.to_string(),
            format!("Listener bind failed: {}", io::Error::from(io::ErrorKind::AddrInUse))
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn state_errors_have_no_source() {
        for err in [Error::Closed, Error::ReadShutdown, Error::InvalidHandle] {
            assert!(std::error::Error::source(&err).is_none());
        }
    }
}

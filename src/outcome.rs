//! Classified results of a single receive call.

use std::io;

use bytes::Bytes;

use crate::error::{Error, Result};

/// Return value reported for a failed receive.
pub const RECV_FAILED: isize = -1;

/// Expected or observed classification of a receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A non-negative byte count.
    Success,
    /// The [`RECV_FAILED`] sentinel.
    Failure,
}

/// Why a receive failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport(io::ErrorKind),
    InvalidHandle,
    Closed,
    NotConnected,
    ReadShutdown,
    Other,
}

impl From<&Error> for FailureKind {
    fn from(e: &Error) -> Self {
        match e {
            Error::Io(e) => Self::Transport(e.kind()),
            Error::InvalidHandle => Self::InvalidHandle,
            Error::Closed => Self::Closed,
            Error::NotConnected => Self::NotConnected,
            Error::ReadShutdown => Self::ReadShutdown,
            _ => Self::Other,
        }
    }
}

/// The (return value, error indicator, expected classification) triple
/// produced by one receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveOutcome {
    return_value: isize,
    failure: Option<FailureKind>,
    expected: Classification,
    received: Bytes,
}

impl ReceiveOutcome {
    /// Fold the result of a receive into `buf` into an outcome.
    ///
    /// Only a successful result slices `buf`; errors never touch it.
    pub fn new(result: &Result<usize>, buf: &[u8], expected: Classification) -> Self {
        match result {
            Ok(n) => {
                let n = (*n).min(buf.len());
                Self {
                    return_value: isize::try_from(n).unwrap_or(isize::MAX),
                    failure: None,
                    expected,
                    received: Bytes::copy_from_slice(&buf[..n]),
                }
            }
            Err(e) => Self {
                return_value: RECV_FAILED,
                failure: Some(FailureKind::from(e)),
                expected,
                received: Bytes::new(),
            },
        }
    }

    /// Byte count, or [`RECV_FAILED`].
    pub fn return_value(&self) -> isize {
        self.return_value
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    pub fn expected(&self) -> Classification {
        self.expected
    }

    /// Bytes delivered by a successful receive; empty on failure.
    pub fn received(&self) -> &Bytes {
        &self.received
    }

    pub fn classification(&self) -> Classification {
        if self.return_value == RECV_FAILED {
            Classification::Failure
        } else {
            Classification::Success
        }
    }

    pub fn meets_expectation(&self) -> bool {
        self.classification() == self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn failure_never_reads_the_buffer() {
        let buf = [0xAAu8; 20];
        let outcome = ReceiveOutcome::new(&Err(Error::ReadShutdown), &buf, Classification::Failure);
        assert_eq!(outcome.return_value(), RECV_FAILED);
        assert_eq!(outcome.failure(), Some(FailureKind::ReadShutdown));
        assert!(outcome.received().is_empty());
        assert!(outcome.meets_expectation());
    }

    #[test]
    fn zero_bytes_is_success() {
        let outcome = ReceiveOutcome::new(&Ok(0), &[0u8; 20], Classification::Success);
        assert_eq!(outcome.classification(), Classification::Success);
        assert!(outcome.meets_expectation());
    }

    #[test]
    fn transport_errors_keep_their_kind() {
        let err = Error::Io(io::Error::from(io::ErrorKind::ConnectionReset));
        let outcome = ReceiveOutcome::new(&Err(err), &[], Classification::Success);
        assert_eq!(
            outcome.failure(),
            Some(FailureKind::Transport(io::ErrorKind::ConnectionReset))
        );
        assert!(!outcome.meets_expectation());
    }

    proptest! {
        #[test]
        fn successful_counts_stay_within_capacity(
            data in proptest::collection::vec(any::<u8>(), 0..=20)
        ) {
            let mut buf = [0u8; 20];
            buf[..data.len()].copy_from_slice(&data);
            let outcome = ReceiveOutcome::new(&Ok(data.len()), &buf, Classification::Success);
            prop_assert!((0..=20).contains(&outcome.return_value()));
            prop_assert_ne!(outcome.return_value(), RECV_FAILED);
            prop_assert_eq!(&outcome.received()[..], &data[..]);
        }
    }
}

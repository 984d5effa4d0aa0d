//! # Harness
//!
//! Runs the listener and the probe as two tokio tasks sharing one
//! [`StartupGate`], joins both and collects a [`HarnessReport`].
//!
//! ```no_run
//! use loopback_recv::{Harness, HarnessConfig};
//!
//! # async fn example() -> loopback_recv::Result<()> {
//! let report = Harness::new(HarnessConfig::default()).run().await?;
//! assert!(report.checks.all_passed());
//! # Ok(())
//! # }
//! ```
//!
//! The join has no timeout. Whichever role fails first has its error
//! returned and the other role aborted: a listener that fails before
//! signaling would leave the probe waiting on the gate forever, and a probe
//! that fails before connecting would leave the listener blocked in
//! `accept`. A role that merely stalls still keeps the harness waiting; the
//! caller bounds the whole run if it needs to.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::task::{JoinError, JoinHandle};

use crate::config::HarnessConfig;
use crate::error::{Error, Result};
use crate::gate::StartupGate;
use crate::listener::{Listener, ListenerStats};
use crate::net::{TcpListener, TcpStream};
use crate::outcome::ReceiveOutcome;
use crate::probe::Probe;
use crate::report::{CheckLog, CheckRecord, CheckSummary};

/// Everything a harness run produced.
#[derive(Debug, Clone)]
pub struct HarnessReport {
    pub listener: ListenerStats,
    /// Probe outcomes in scenario order.
    pub outcomes: Vec<ReceiveOutcome>,
    pub records: Vec<CheckRecord>,
    pub checks: CheckSummary,
}

/// Two-task driver of the receive check.
pub struct Harness<S = tokio::net::TcpStream, L = tokio::net::TcpListener>
where
    S: TcpStream<Listener = L>,
    L: TcpListener<Stream = S>,
{
    config: HarnessConfig,
    log: Arc<CheckLog>,
    _phantom: PhantomData<fn() -> (S, L)>,
}

impl Harness {
    /// Harness over tokio sockets.
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_socket_type(config)
    }
}

impl<S, L> Harness<S, L>
where
    S: TcpStream<Listener = L>,
    L: TcpListener<Stream = S>,
{
    /// Harness over a custom socket implementation.
    pub fn with_socket_type(config: HarnessConfig) -> Self {
        Self {
            config,
            log: Arc::new(CheckLog::new()),
            _phantom: PhantomData,
        }
    }

    /// The reporter the probe writes to.
    pub fn check_log(&self) -> &Arc<CheckLog> {
        &self.log
    }

    pub async fn run(self) -> Result<HarnessReport> {
        self.config.validate()?;

        let gate = StartupGate::new();
        let mut listener =
            tokio::spawn(Listener::<L>::new(self.config.clone(), gate.clone()).run());
        let mut probe = tokio::spawn(
            Probe::<CheckLog, S>::new(self.config.clone(), gate, Arc::clone(&self.log)).run(),
        );

        let (stats, outcomes) = tokio::select! {
            joined = &mut listener => {
                let stats = match flatten(joined) {
                    Ok(stats) => stats,
                    Err(e) => return Err(abort_other("listener", e, probe).await),
                };
                (stats, finish("probe", probe).await?)
            }
            joined = &mut probe => {
                let outcomes = match flatten(joined) {
                    Ok(outcomes) => outcomes,
                    Err(e) => return Err(abort_other("probe", e, listener).await),
                };
                (finish("listener", listener).await?, outcomes)
            }
        };

        let checks = self.log.summary();
        tracing::info!(%checks, "receive check finished");
        Ok(HarnessReport {
            listener: stats,
            outcomes,
            records: self.log.records(),
            checks,
        })
    }
}

/// Log the failed role, then abort the other one and wait for it to wind
/// down so no task outlives the harness.
async fn abort_other<T>(role: &str, e: Error, other: JoinHandle<T>) -> Error {
    tracing::error!("{role} failed: {e}");
    other.abort();
    let _ = other.await;
    e
}

/// Join the role that is still running after the other one succeeded.
async fn finish<T>(role: &str, handle: JoinHandle<Result<T>>) -> Result<T> {
    flatten(handle.await).map_err(|e| {
        tracing::error!("{role} failed: {e}");
        e
    })
}

fn flatten<T>(joined: std::result::Result<Result<T>, JoinError>) -> Result<T> {
    joined.map_err(|e| Error::TaskFailed(e.to_string()))?
}

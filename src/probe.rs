//! # Probe
//!
//! The client side of the receive check. After the startup gate opens, the
//! probe connects and drives its endpoint through four receive scenarios:
//!
//! | # | Scenario | Socket before the receive | Expected |
//! |---|----------|---------------------------|----------|
//! | 1 | [`Scenario::Connected`] | freshly connected | byte count |
//! | 2 | [`Scenario::InvalidDescriptor`] | a descriptor naming no socket | `-1` |
//! | 3 | [`Scenario::ReadShutdown`] | read side shut down | `-1` |
//! | 4 | [`Scenario::Closed`] | closed, then reconnected on the closed handle | `-1` |
//!
//! Scenarios run in that order on the same endpoint; each one leaves the
//! endpoint in the state the next one starts from. Scenario 2 receives
//! through a separate invalid endpoint and leaves the real one untouched.

use std::sync::Arc;
use std::time::Duration;

use crate::config::HarnessConfig;
use crate::endpoint::ConnectionEndpoint;
use crate::error::{Error, Result};
use crate::gate::StartupGate;
use crate::net::TcpStream;
use crate::outcome::{Classification, ReceiveOutcome, RECV_FAILED};
use crate::report::Reporter;

/// Assertion name used for every receive check.
pub const RECV_CHECK: &str = "recv";

/// One receive scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    Connected,
    InvalidDescriptor,
    ReadShutdown,
    Closed,
}

impl Scenario {
    /// All scenarios in execution order.
    pub const ALL: [Scenario; 4] = [
        Self::Connected,
        Self::InvalidDescriptor,
        Self::ReadShutdown,
        Self::Closed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Connected => "recv_connected",
            Self::InvalidDescriptor => "recv_invalid_descriptor",
            Self::ReadShutdown => "recv_after_shutdown_read",
            Self::Closed => "recv_after_close",
        }
    }

    pub fn expected(self) -> Classification {
        match self {
            Self::Connected => Classification::Success,
            _ => Classification::Failure,
        }
    }
}

/// Client role of the receive check.
pub struct Probe<R: Reporter, S: TcpStream = tokio::net::TcpStream> {
    config: HarnessConfig,
    gate: StartupGate,
    reporter: Arc<R>,
    endpoint: ConnectionEndpoint<S>,
}

impl<R: Reporter, S: TcpStream> Probe<R, S> {
    pub fn new(config: HarnessConfig, gate: StartupGate, reporter: Arc<R>) -> Self {
        Self {
            config,
            gate,
            reporter,
            endpoint: ConnectionEndpoint::new(),
        }
    }

    /// Wait for the listener, connect, and run every scenario.
    ///
    /// Returns one outcome per entry of [`Scenario::ALL`], in order.
    pub async fn run(mut self) -> Result<Vec<ReceiveOutcome>> {
        wait_for_listener(&self.gate, self.config.startup_timeout).await?;
        self.endpoint.connect(self.config.peer_addr).await?;
        tracing::info!(peer = %self.config.peer_addr, "probe connected");

        let mut outcomes = Vec::with_capacity(Scenario::ALL.len());
        for scenario in Scenario::ALL {
            outcomes.push(self.run_scenario(scenario).await);
        }
        self.endpoint.close();
        Ok(outcomes)
    }

    async fn run_scenario(&mut self, scenario: Scenario) -> ReceiveOutcome {
        let mut buf = vec![0u8; self.config.recv_capacity];
        let result = match scenario {
            Scenario::Connected => self.endpoint.recv(&mut buf).await,
            Scenario::InvalidDescriptor => {
                ConnectionEndpoint::<S>::invalid().recv(&mut buf).await
            }
            Scenario::ReadShutdown => {
                if let Err(e) = self.endpoint.shutdown_read() {
                    tracing::warn!(scenario = scenario.name(), "shutdown_read failed: {e}");
                }
                self.endpoint.recv(&mut buf).await
            }
            Scenario::Closed => {
                self.endpoint.close();
                if let Err(e) = self.endpoint.connect(self.config.peer_addr).await {
                    tracing::debug!(
                        scenario = scenario.name(),
                        "reconnect on closed handle refused: {e}"
                    );
                }
                self.endpoint.recv(&mut buf).await
            }
        };

        let outcome = ReceiveOutcome::new(&result, &buf, scenario.expected());
        self.report(scenario, &outcome);
        outcome
    }

    fn report(&self, scenario: Scenario, outcome: &ReceiveOutcome) {
        let name = scenario.name();
        let ret = outcome.return_value();
        tracing::debug!(
            scenario = name,
            ret,
            failure = ?outcome.failure(),
            received = ?outcome.received(),
            "receive finished"
        );

        match scenario.expected() {
            Classification::Success => self.reporter.assert_ne(name, RECV_CHECK, ret, RECV_FAILED),
            Classification::Failure => self.reporter.assert_eq(name, RECV_CHECK, ret, RECV_FAILED),
        }
        if outcome.meets_expectation() {
            self.reporter.success(name);
        }
    }
}

/// Pass the gate, giving up after `limit` when one is set.
///
/// Borrows only the gate so the probe future stays `Send` for streams that
/// are not `Sync`.
async fn wait_for_listener(gate: &StartupGate, limit: Option<Duration>) -> Result<()> {
    match limit {
        None => {
            gate.wait().await;
            Ok(())
        }
        Some(limit) => tokio::time::timeout(limit, gate.wait())
            .await
            .map_err(|_| Error::StartupTimeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_connected_scenario_expects_data() {
        let expected: Vec<_> = Scenario::ALL.iter().map(|s| s.expected()).collect();
        assert_eq!(
            expected,
            [
                Classification::Success,
                Classification::Failure,
                Classification::Failure,
                Classification::Failure,
            ]
        );
    }

    #[test]
    fn scenario_names_are_unique() {
        let mut names: Vec<_> = Scenario::ALL.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Scenario::ALL.len());
    }
}

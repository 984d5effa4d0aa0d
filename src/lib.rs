//! # loopback-recv
//!
//! Receive-side behavior checks for stream sockets, run over a loopback TCP
//! connection between two concurrent [tokio](https://tokio.rs) tasks.
//!
//! A [`Listener`] accepts one connection and sends a short greeting several
//! times. A [`Probe`] connects to it and receives on its socket in four
//! states: connected, invalid descriptor, read side shut down, and closed.
//! Each receive is classified as a byte count or the `-1` failure sentinel
//! and checked against the expected classification.
//!
//! ## Quick Start
//!
//! ```no_run
//! use loopback_recv::{Harness, HarnessConfig};
//!
//! #[tokio::main]
//! async fn main() -> loopback_recv::Result<()> {
//!     let report = Harness::new(HarnessConfig::default()).run().await?;
//!     for outcome in &report.outcomes {
//!         println!("{:?} -> {}", outcome.expected(), outcome.return_value());
//!     }
//!     println!("{}", report.checks);
//!     Ok(())
//! }
//! ```
//!
//! ---
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────── Harness ────────────────────────────────┐
//! │                                                                         │
//! │   tokio::spawn                              tokio::spawn                │
//! │  ┌──────────────────────┐               ┌─────────────────────────────┐ │
//! │  │ Listener             │  StartupGate  │ Probe                       │ │
//! │  │  bind + listen(2)    │ ── signal ──▶ │  wait                       │ │
//! │  │  accept              │               │  connect                    │ │
//! │  │  send greeting × 6   │ ─── TCP ────▶ │  1. recv (connected)        │ │
//! │  │  close               │               │  2. recv (invalid handle)   │ │
//! │  └──────────────────────┘               │  3. recv (read shut down)   │ │
//! │                                         │  4. recv (closed)           │ │
//! │                                         └──────────────┬──────────────┘ │
//! │                                                        │ Reporter       │
//! │                                                        ▼                │
//! │                                                    CheckLog             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Responsibilities
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`gate`] | [`StartupGate`]: listener → probe rendezvous |
//! | [`net`] | Socket traits over tokio and turmoil sockets |
//! | [`endpoint`] | [`ConnectionEndpoint`]: socket plus lifecycle state |
//! | [`outcome`] | [`ReceiveOutcome`]: classified receive results |
//! | [`report`] | [`Reporter`] trait and the tracing-backed [`CheckLog`] |
//! | [`listener`] | Server role |
//! | [`probe`] | Client role and the scenario table |
//! | [`harness`] | Spawns and joins both roles |
//! | [`config`] | [`HarnessConfig`] and its builder |
//! | [`error`] | [`Error`] and [`Result`] |
//!
//! ## Ordering
//!
//! The gate gives a single guarantee: the listener is listening before the
//! probe's first connect. It says nothing about `accept`; a connect that
//! arrives first waits in the listen backlog.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `turmoil` | No | Socket traits for turmoil's simulated network |
//!
//! ## Testing
//!
//! ```bash
//! cargo test
//! cargo test --features turmoil --test simulated
//! ```

pub mod config;
pub mod endpoint;
pub mod error;
pub mod gate;
pub mod harness;
pub mod listener;
pub mod net;
pub mod outcome;
pub mod probe;
pub mod report;

pub use config::{
    HarnessConfig, HarnessConfigBuilder, DEFAULT_BACKLOG, DEFAULT_MESSAGE, DEFAULT_PORT,
    DEFAULT_RECV_CAPACITY, DEFAULT_REPEAT,
};
pub use endpoint::{ConnectionEndpoint, SocketState};
pub use error::*;
pub use gate::StartupGate;
pub use harness::{Harness, HarnessReport};
pub use listener::{Listener, ListenerStats};
pub use outcome::{Classification, FailureKind, ReceiveOutcome, RECV_FAILED};
pub use probe::{Probe, Scenario, RECV_CHECK};
pub use report::{CheckKind, CheckLog, CheckRecord, CheckSummary, Reporter};

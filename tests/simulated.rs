//! Simulated Receive Check
//!
//! The listener and the client run on two turmoil hosts. The simulated stack
//! gives deterministic scheduling, so these tests also pin down the startup
//! ordering without real sleeps.
//!
//! Run with: cargo test --features turmoil --test simulated

use loopback_recv::{
    CheckLog, Harness, HarnessConfig, HarnessReport, Listener, Probe, ReceiveOutcome, StartupGate,
    DEFAULT_PORT,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[path = "helpers.rs"]
mod helpers;

use helpers::assert_scenario_table;

type SimListener = Listener<turmoil::net::TcpListener>;
type SimClient = Probe<CheckLog, turmoil::net::TcpStream>;
type SimHarness = Harness<turmoil::net::TcpStream, turmoil::net::TcpListener>;

fn listener_config() -> HarnessConfig {
    HarnessConfig::builder()
        .bind_addr(SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
        .build()
}

fn client_config() -> HarnessConfig {
    HarnessConfig::builder()
        .peer_addr(SocketAddr::new(turmoil::lookup("listener"), DEFAULT_PORT))
        .build()
}

/// Register the listener host; it starts `delay` after the simulation does.
fn add_listener(sim: &mut turmoil::Sim<'_>, gate: &StartupGate, delay: Duration) {
    let gate = gate.clone();
    sim.host("listener", move || {
        let gate = gate.clone();
        async move {
            tokio::time::sleep(delay).await;
            let stats = SimListener::new(listener_config(), gate).run().await?;
            tracing::info!(?stats, "listener done");
            // Keep the host up until the client has drained its socket.
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        }
    });
}

#[test_log::test]
fn simulated_receive_check_matches_scenario_table() {
    let mut sim = turmoil::Builder::new()
        .simulation_duration(Duration::from_secs(30))
        .build();
    let gate = StartupGate::new();
    let log = Arc::new(CheckLog::new());
    let outcomes: Arc<Mutex<Vec<ReceiveOutcome>>> = Arc::default();

    add_listener(&mut sim, &gate, Duration::ZERO);

    sim.client("client", {
        let log = Arc::clone(&log);
        let outcomes = Arc::clone(&outcomes);
        async move {
            let result = SimClient::new(client_config(), gate, log).run().await?;
            *outcomes.lock().unwrap() = result;
            Ok(())
        }
    });

    sim.run().unwrap();

    assert_scenario_table(&outcomes.lock().unwrap(), 20);
    let summary = log.summary();
    assert_eq!(summary.passed, 4);
    assert!(summary.all_passed());
}

#[test_log::test]
fn client_waits_for_a_late_listener() {
    let mut sim = turmoil::Builder::new()
        .simulation_duration(Duration::from_secs(30))
        .build();
    let gate = StartupGate::new();
    let connected_at: Arc<Mutex<Option<Duration>>> = Arc::default();

    add_listener(&mut sim, &gate, Duration::from_secs(5));

    sim.client("client", {
        let connected_at = Arc::clone(&connected_at);
        async move {
            let log = Arc::new(CheckLog::new());
            let outcomes = SimClient::new(client_config(), gate, log).run().await?;
            *connected_at.lock().unwrap() = turmoil::sim_elapsed();
            assert_scenario_table(&outcomes, 20);
            Ok(())
        }
    });

    sim.run().unwrap();

    let elapsed = connected_at.lock().unwrap().expect("client finished");
    assert!(elapsed >= Duration::from_secs(5), "client finished after {elapsed:?}");
}

/// Both roles spawned by the harness on one simulated host, over loopback.
#[test_log::test]
fn harness_runs_over_simulated_sockets() {
    let mut sim = turmoil::Builder::new()
        .simulation_duration(Duration::from_secs(30))
        .build();
    let report: Arc<Mutex<Option<HarnessReport>>> = Arc::default();

    sim.client("harness", {
        let report = Arc::clone(&report);
        async move {
            let done = SimHarness::with_socket_type(HarnessConfig::default()).run().await?;
            *report.lock().unwrap() = Some(done);
            Ok(())
        }
    });

    sim.run().unwrap();

    let report = report.lock().unwrap().take().expect("harness finished");
    assert_scenario_table(&report.outcomes, 20);
    assert!(report.checks.all_passed(), "{}", report.checks);
    assert_eq!(report.listener.local.port(), DEFAULT_PORT);
}

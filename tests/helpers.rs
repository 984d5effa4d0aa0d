#![allow(dead_code)]

use loopback_recv::ReceiveOutcome;

/// Greeting the listener repeats, concatenated as the client sees it on the wire.
pub(crate) fn greeting_stream(repeat: usize) -> Vec<u8> {
    loopback_recv::DEFAULT_MESSAGE.repeat(repeat).into_bytes()
}

/// Assert the scenario table: data first, then three failures.
pub(crate) fn assert_scenario_table(outcomes: &[ReceiveOutcome], capacity: usize) {
    assert_eq!(outcomes.len(), 4, "one outcome per scenario");

    let first = outcomes[0].return_value();
    assert!(
        (1..=capacity as isize).contains(&first),
        "connected receive returned {first}"
    );
    assert!(greeting_stream(loopback_recv::DEFAULT_REPEAT).starts_with(outcomes[0].received()));

    for outcome in &outcomes[1..] {
        assert_eq!(outcome.return_value(), loopback_recv::RECV_FAILED);
        assert!(outcome.received().is_empty());
    }
    assert!(outcomes.iter().all(ReceiveOutcome::meets_expectation));
}

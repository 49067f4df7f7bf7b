//! Behavioral scenarios against a hub-attached scanner.

use money_scanner::accumulator::AddOutcome;
use money_scanner::events::TargetStatusEvent;
use money_scanner::registry::DenominationRegistry;
use money_scanner::types::TrackingStatus;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::common::Rig;

fn at(rig: &Rig, secs: f64, target: &str, status: TrackingStatus) {
    rig.clock.set_secs(secs);
    rig.hub.publish(&TargetStatusEvent::new(target, status));
}

#[test]
fn test_auto_add_cooldown_scenario() {
    let rig = Rig::ab(true);

    at(&rig, 0.0, "A", TrackingStatus::Tracked);
    assert_eq!(rig.scanner.borrow().total(), dec!(5));

    at(&rig, 0.3, "A", TrackingStatus::Tracked);
    assert_eq!(rig.scanner.borrow().total(), dec!(5));

    at(&rig, 0.7, "A", TrackingStatus::Tracked);
    assert_eq!(rig.scanner.borrow().total(), dec!(10));
    assert_eq!(rig.total.text(), "Total: 10");
    assert_eq!(rig.detected.text(), "Detected: A — 5");
}

#[test]
fn test_unknown_target_scenario() {
    let rig = Rig::ab(true);

    at(&rig, 0.0, "Z", TrackingStatus::Tracked);
    assert_eq!(rig.detected.text(), "Detected: Z (unknown) — 0");

    let outcome = rig.scanner.borrow_mut().on_add_button();
    assert_eq!(outcome, AddOutcome::NothingToAdd);
    assert_eq!(rig.scanner.borrow().total(), Decimal::ZERO);
    assert_eq!(rig.total.text(), "Total: 0");
}

#[test]
fn test_double_manual_add_scenario() {
    let rig = Rig::new(DenominationRegistry::new([("Twenty", dec!(20))]).unwrap(), false);

    at(&rig, 0.0, "Twenty", TrackingStatus::Tracked);
    rig.scanner.borrow_mut().on_add_button();
    rig.scanner.borrow_mut().on_add_button();

    assert_eq!(rig.scanner.borrow().total(), dec!(40));
    assert_eq!(rig.scanner.borrow().history().len(), 2);
}

#[test]
fn test_total_tracks_history_over_mixed_events() {
    let rig = Rig::ab(true);
    let script: &[(f64, &str, TrackingStatus)] = &[
        (0.0, "A", TrackingStatus::Tracked),
        (0.1, "A", TrackingStatus::ExtendedTracked),
        (0.2, "B", TrackingStatus::Tracked),
        (0.4, "Z", TrackingStatus::Tracked),
        (0.5, "B", TrackingStatus::Limited),
        (0.9, "B", TrackingStatus::Tracked),
        (1.0, "A", TrackingStatus::Tracked),
        (1.0, "A", TrackingStatus::NoPose),
    ];

    for (secs, target, status) in script {
        at(&rig, *secs, target, *status);
        let scanner = rig.scanner.borrow();
        let sum: Decimal = scanner.history().iter().map(|r| r.value).sum();
        assert_eq!(scanner.total(), sum);
    }

    // A@0, B@0.2, B@0.9 (0.7 after), A@1.0 (1.0 after).
    assert_eq!(rig.scanner.borrow().total(), dec!(30));
    assert_eq!(rig.detected.text(), "Detected: —");
}

#[test]
fn test_clear_then_continue() {
    let rig = Rig::ab(true);
    at(&rig, 0.0, "B", TrackingStatus::Tracked);
    rig.scanner.borrow_mut().on_clear_button();
    assert_eq!(rig.scanner.borrow().total(), Decimal::ZERO);
    assert!(rig.scanner.borrow().history().is_empty());

    // Cooldown from before the clear still applies.
    at(&rig, 0.3, "B", TrackingStatus::Tracked);
    assert_eq!(rig.scanner.borrow().total(), Decimal::ZERO);

    at(&rig, 0.7, "B", TrackingStatus::Tracked);
    assert_eq!(rig.scanner.borrow().total(), dec!(10));
}

#[test]
fn test_toggle_flipped_mid_session() {
    let rig = Rig::ab(false);
    at(&rig, 0.0, "A", TrackingStatus::Tracked);
    assert_eq!(rig.scanner.borrow().total(), Decimal::ZERO);

    rig.toggle.set(true);
    at(&rig, 0.1, "A", TrackingStatus::Tracked);
    assert_eq!(rig.scanner.borrow().total(), dec!(5));
}

#[test]
fn test_teardown_stops_delivery() {
    let mut rig = Rig::ab(true);
    at(&rig, 0.0, "A", TrackingStatus::Tracked);

    rig.subscription.take();
    assert_eq!(rig.hub.listener_count(), 0);

    at(&rig, 5.0, "B", TrackingStatus::Tracked);
    assert_eq!(rig.scanner.borrow().total(), dec!(5));
    assert_eq!(rig.detected.text(), "Detected: A — 5");
}

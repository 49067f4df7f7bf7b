//! Shared fixtures for integration tests.

use money_scanner::clock::ManualClock;
use money_scanner::events::{Subscription, TrackingHub};
use money_scanner::presenter::{MemoryLabel, SharedToggle};
use money_scanner::registry::DenominationRegistry;
use money_scanner::scanner::{MoneyScanner, ScannerBindings, ScannerSettings};
use rust_decimal_macros::dec;
use std::cell::RefCell;
use std::rc::Rc;

/// A scanner wired to in-memory labels, a manual clock and a hub.
pub struct Rig {
    pub scanner: Rc<RefCell<MoneyScanner>>,
    pub hub: TrackingHub,
    pub clock: ManualClock,
    pub toggle: SharedToggle,
    pub detected: MemoryLabel,
    pub total: MemoryLabel,
    pub subscription: Option<Subscription>,
}

impl Rig {
    pub fn new(registry: DenominationRegistry, auto_add: bool) -> Self {
        let clock = ManualClock::new();
        let toggle = SharedToggle::new(auto_add);
        let detected = MemoryLabel::new();
        let total = MemoryLabel::new();
        let bindings = ScannerBindings::new()
            .detected_label(detected.clone())
            .total_label(total.clone())
            .auto_add_toggle(toggle.clone());
        let scanner = Rc::new(RefCell::new(MoneyScanner::new(
            registry,
            ScannerSettings::default(),
            bindings,
            clock.clone(),
        )));
        let hub = TrackingHub::new();
        let subscription = Some(MoneyScanner::attach(&scanner, &hub));

        Self {
            scanner,
            hub,
            clock,
            toggle,
            detected,
            total,
            subscription,
        }
    }

    /// Registry {"A": 5, "B": 10}.
    pub fn ab(auto_add: bool) -> Self {
        Self::new(
            DenominationRegistry::new([("A", dec!(5)), ("B", dec!(10))]).unwrap(),
            auto_add,
        )
    }
}

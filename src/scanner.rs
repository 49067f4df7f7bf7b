//! Scanner: the explicitly owned context tying everything together.
//!
//! Inbound tracking events → detection update → label refresh → (auto-add
//! enabled and target known) cooldown check → accumulator → label refresh.
//! All mutation is synchronous and finishes before the callback returns.

use rust_decimal::Decimal;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::accumulator::{Accumulator, AddOutcome};
use crate::clock::Clock;
use crate::cooldown::{CooldownGate, DEFAULT_COOLDOWN};
use crate::detection::DetectionHolder;
use crate::events::{Subscription, TrackingHub};
use crate::presenter::{AudioCue, TextLabel, ToggleInput, UiPresenter, DEFAULT_DECIMAL_PLACES};
use crate::registry::DenominationRegistry;
use crate::types::{DetectionState, HistoryRecord, TrackingStatus};

// ---------------------------------------------------------------------------
// Settings & bindings
// ---------------------------------------------------------------------------

/// Behavioral settings fixed at startup.
#[derive(Debug, Clone)]
pub struct ScannerSettings {
    pub cooldown: Duration,
    pub decimal_places: u32,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

/// Optional connections to the host UI. Anything left unset is skipped.
#[derive(Default)]
pub struct ScannerBindings {
    pub detected_label: Option<Box<dyn TextLabel>>,
    pub total_label: Option<Box<dyn TextLabel>>,
    pub auto_add_toggle: Option<Box<dyn ToggleInput>>,
    pub add_cue: Option<Box<dyn AudioCue>>,
}

impl ScannerBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detected_label(mut self, label: impl TextLabel + 'static) -> Self {
        self.detected_label = Some(Box::new(label));
        self
    }

    pub fn total_label(mut self, label: impl TextLabel + 'static) -> Self {
        self.total_label = Some(Box::new(label));
        self
    }

    pub fn auto_add_toggle(mut self, toggle: impl ToggleInput + 'static) -> Self {
        self.auto_add_toggle = Some(Box::new(toggle));
        self
    }

    pub fn add_cue(mut self, cue: impl AudioCue + 'static) -> Self {
        self.add_cue = Some(Box::new(cue));
        self
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

pub struct MoneyScanner {
    registry: DenominationRegistry,
    detection: DetectionHolder,
    gate: CooldownGate,
    accumulator: Accumulator,
    presenter: UiPresenter,
    auto_add_toggle: Option<Box<dyn ToggleInput>>,
    clock: Box<dyn Clock>,
}

impl MoneyScanner {
    /// Build a scanner and render its initial state to any bound labels.
    pub fn new(
        registry: DenominationRegistry,
        settings: ScannerSettings,
        bindings: ScannerBindings,
        clock: impl Clock + 'static,
    ) -> Self {
        let ScannerBindings {
            detected_label,
            total_label,
            auto_add_toggle,
            add_cue,
        } = bindings;

        let mut scanner = Self {
            registry,
            detection: DetectionHolder::new(),
            gate: CooldownGate::new(settings.cooldown),
            accumulator: Accumulator::with_cue(add_cue),
            presenter: UiPresenter::new(detected_label, total_label, settings.decimal_places),
            auto_add_toggle,
            clock: Box::new(clock),
        };

        let auto_add = scanner.auto_add_enabled();
        info!(
            denominations = scanner.registry.len(),
            cooldown_ms = settings.cooldown.as_millis() as u64,
            auto_add,
            "Scanner ready"
        );

        scanner.presenter.render_detection(scanner.detection.state());
        scanner.presenter.render_total(scanner.accumulator.total());
        scanner
    }

    /// Subscribe `scanner` to a tracking hub. The scanner only receives
    /// events while the returned handle is alive; the hub does not keep the
    /// scanner alive.
    pub fn attach(scanner: &Rc<RefCell<MoneyScanner>>, hub: &TrackingHub) -> Subscription {
        let weak: Weak<RefCell<MoneyScanner>> = Rc::downgrade(scanner);
        hub.subscribe(move |event| {
            let Some(scanner) = weak.upgrade() else {
                return;
            };
            match scanner.try_borrow_mut() {
                Ok(mut scanner) => {
                    scanner.on_target_status_changed(&event.target_id, event.status);
                }
                Err(_) => warn!(%event, "Scanner busy, tracking event dropped"),
            };
        })
    }

    /// Handle a status change reported by the tracking engine.
    ///
    /// Returns the outcome of the automatic add when one was attempted.
    pub fn on_target_status_changed(
        &mut self,
        target_id: &str,
        status: TrackingStatus,
    ) -> Option<AddOutcome> {
        self.detection.on_status_changed(&self.registry, target_id, status);
        self.presenter.render_detection(self.detection.state());

        let state = self.detection.state();
        if !(state.tracked && state.known && self.auto_add_enabled()) {
            return None;
        }

        Some(self.try_auto_add())
    }

    /// Manual add: bypasses the cooldown check but still records the
    /// target's cooldown timestamp when something is added.
    pub fn on_add_button(&mut self) -> AddOutcome {
        let now = self.clock.now();
        let outcome = self
            .accumulator
            .add(self.detection.state(), now, &mut self.gate);
        if outcome.is_added() {
            self.presenter.render_total(self.accumulator.total());
        }
        outcome
    }

    pub fn on_clear_button(&mut self) {
        self.accumulator.clear();
        self.presenter.render_total(self.accumulator.total());
    }

    fn try_auto_add(&mut self) -> AddOutcome {
        let now = self.clock.now();
        let state = self.detection.state();
        let Some(target_id) = state.target_id.as_deref() else {
            return AddOutcome::NothingToAdd;
        };

        if !self.gate.can_add(target_id, now) {
            let remaining = self.gate.remaining(target_id, now);
            debug!(
                target_id,
                remaining_ms = remaining.as_millis() as u64,
                "Auto-add cooling down"
            );
            return AddOutcome::CoolingDown {
                target_id: target_id.to_string(),
                remaining,
            };
        }

        let outcome = self.accumulator.add(state, now, &mut self.gate);
        if outcome.is_added() {
            self.presenter.render_total(self.accumulator.total());
        }
        outcome
    }

    /// Auto-add is on only when a toggle is bound and reads on.
    pub fn auto_add_enabled(&self) -> bool {
        self.auto_add_toggle
            .as_ref()
            .map(|toggle| toggle.is_on())
            .unwrap_or(false)
    }

    pub fn total(&self) -> Decimal {
        self.accumulator.total()
    }

    pub fn detection(&self) -> &DetectionState {
        self.detection.state()
    }

    pub fn history(&self) -> &[HistoryRecord] {
        self.accumulator.history()
    }

    pub fn registry(&self) -> &DenominationRegistry {
        &self.registry
    }

    pub fn cooldown(&self) -> &CooldownGate {
        &self.gate
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! UI presenter and the seams to the host UI toolkit.
//!
//! The presenter is a pure projection of scanner state onto two text
//! labels. Every binding is optional: a missing label is skipped, never an
//! error.

use rust_decimal::{Decimal, RoundingStrategy};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::types::DetectionState;

/// Default number of decimals shown in the total.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

// ---------------------------------------------------------------------------
// UI seams
// ---------------------------------------------------------------------------

/// A text display owned by the host UI.
#[cfg_attr(test, mockall::automock)]
pub trait TextLabel {
    fn set_text(&mut self, text: &str);
}

/// The auto-add switch owned by the host UI.
#[cfg_attr(test, mockall::automock)]
pub trait ToggleInput {
    fn is_on(&self) -> bool;
}

/// Feedback played after every accepted addition.
#[cfg_attr(test, mockall::automock)]
pub trait AudioCue {
    fn play(&self);
}

/// Label whose text can be read back through any clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryLabel {
    text: Rc<RefCell<String>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryLabel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Number of times the label has been written.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl TextLabel for MemoryLabel {
    fn set_text(&mut self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        self.writes.set(self.writes.get() + 1);
    }
}

/// Toggle whose state is shared between clones.
#[derive(Debug, Clone, Default)]
pub struct SharedToggle {
    on: Rc<Cell<bool>>,
}

impl SharedToggle {
    pub fn new(on: bool) -> Self {
        Self { on: Rc::new(Cell::new(on)) }
    }

    pub fn set(&self, on: bool) {
        self.on.set(on);
    }
}

impl ToggleInput for SharedToggle {
    fn is_on(&self) -> bool {
        self.on.get()
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `Detected: {name} — {value}`, or `Detected: —` when nothing is tracked.
pub fn format_detection(state: &DetectionState) -> String {
    match (&state.target_id, state.tracked) {
        (Some(id), true) if state.known => {
            format!("Detected: {id} — {}", state.value.normalize())
        }
        (Some(id), true) => format!("Detected: {id} (unknown) — {}", Decimal::ZERO),
        _ => "Detected: —".to_string(),
    }
}

/// `Total: {value}` with at most `decimal_places` decimals and no trailing zeros.
pub fn format_total(total: Decimal, decimal_places: u32) -> String {
    let shown = total
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("Total: {shown}")
}

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

pub struct UiPresenter {
    detected_label: Option<Box<dyn TextLabel>>,
    total_label: Option<Box<dyn TextLabel>>,
    decimal_places: u32,
}

impl Default for UiPresenter {
    fn default() -> Self {
        Self::new(None, None, DEFAULT_DECIMAL_PLACES)
    }
}

impl UiPresenter {
    pub fn new(
        detected_label: Option<Box<dyn TextLabel>>,
        total_label: Option<Box<dyn TextLabel>>,
        decimal_places: u32,
    ) -> Self {
        Self {
            detected_label,
            total_label,
            decimal_places,
        }
    }

    pub fn render_detection(&mut self, state: &DetectionState) {
        if let Some(label) = self.detected_label.as_mut() {
            label.set_text(&format_detection(state));
        }
    }

    pub fn render_total(&mut self, total: Decimal) {
        if let Some(label) = self.total_label.as_mut() {
            label.set_text(&format_total(total, self.decimal_places));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

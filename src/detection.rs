//! Detection state holder.
//!
//! Turns raw tracking-status callbacks into the current [`DetectionState`].
//! Knows nothing about cooldowns or totals.

use tracing::debug;

use crate::registry::DenominationRegistry;
use crate::types::{DetectionState, TrackingStatus};

#[derive(Debug, Default)]
pub struct DetectionHolder {
    state: DetectionState,
}

impl DetectionHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DetectionState {
        &self.state
    }

    /// Apply a status change and return the new state.
    ///
    /// Losing any target clears the detection, even when a different target
    /// is the one currently shown.
    pub fn on_status_changed(
        &mut self,
        registry: &DenominationRegistry,
        target_id: &str,
        status: TrackingStatus,
    ) -> &DetectionState {
        self.state = if status.is_tracked() {
            match registry.lookup(target_id) {
                Some(value) => DetectionState::known(target_id, value),
                None => DetectionState::unknown(target_id),
            }
        } else {
            DetectionState::untracked()
        };

        debug!(
            target_id,
            %status,
            known = self.state.known,
            value = %self.state.value,
            "Detection updated"
        );
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn registry() -> DenominationRegistry {
        DenominationRegistry::new([("A", dec!(5)), ("B", dec!(10))]).unwrap()
    }

    #[test]
    fn test_tracked_known_target() {
        let mut holder = DetectionHolder::new();
        let state = holder.on_status_changed(&registry(), "A", TrackingStatus::Tracked);
        assert_eq!(state, &DetectionState::known("A", dec!(5)));
    }

    #[test]
    fn test_extended_tracking_counts_as_tracked() {
        let mut holder = DetectionHolder::new();
        let state = holder.on_status_changed(&registry(), "B", TrackingStatus::ExtendedTracked);
        assert_eq!(state.value, dec!(10));
        assert!(state.tracked);
    }

    #[test]
    fn test_tracked_unknown_target() {
        let mut holder = DetectionHolder::new();
        let state = holder.on_status_changed(&registry(), "Z", TrackingStatus::Tracked);
        assert_eq!(state.target_id.as_deref(), Some("Z"));
        assert_eq!(state.value, Decimal::ZERO);
        assert!(state.tracked);
        assert!(!state.known);
    }

    #[test]
    fn test_lost_tracking_clears_state() {
        let mut holder = DetectionHolder::new();
        holder.on_status_changed(&registry(), "A", TrackingStatus::Tracked);
        let state = holder.on_status_changed(&registry(), "A", TrackingStatus::NoPose);
        assert_eq!(state, &DetectionState::untracked());
    }

    #[test]
    fn test_limited_and_detected_are_not_tracked() {
        let mut holder = DetectionHolder::new();
        for status in [TrackingStatus::Limited, TrackingStatus::Detected] {
            holder.on_status_changed(&registry(), "A", TrackingStatus::Tracked);
            let state = holder.on_status_changed(&registry(), "A", status);
            assert!(!state.tracked);
        }
    }

    #[test]
    fn test_other_target_lost_clears_current() {
        let mut holder = DetectionHolder::new();
        holder.on_status_changed(&registry(), "A", TrackingStatus::Tracked);
        holder.on_status_changed(&registry(), "B", TrackingStatus::NoPose);
        assert_eq!(holder.state().target_id, None);
    }
}

//! Per-target cooldown gate.
//!
//! Keeps a target that stays in view from being added on every tracking
//! callback. Only the automatic path asks [`CooldownGate::can_add`]; every
//! successful addition, manual or automatic, calls
//! [`CooldownGate::record_add`].

use std::collections::HashMap;
use std::time::Duration;

use crate::types::ScannerError;

/// Default cooldown window.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(600);

#[derive(Debug, Clone)]
pub struct CooldownGate {
    window: Duration,
    last_added: HashMap<String, Duration>,
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl CooldownGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_added: HashMap::new(),
        }
    }

    /// Build a gate from a window expressed in (fractional) seconds.
    pub fn from_secs_f64(secs: f64) -> Result<Self, ScannerError> {
        let window = Duration::try_from_secs_f64(secs)
            .map_err(|e| ScannerError::InvalidCooldown(format!("{secs}: {e}")))?;
        Ok(Self::new(window))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// True if the target was never added, or at least `window` has passed
    /// since its last addition.
    pub fn can_add(&self, target_id: &str, now: Duration) -> bool {
        match self.last_added.get(target_id) {
            None => true,
            Some(last) => now.saturating_sub(*last) >= self.window,
        }
    }

    /// Time left before `target_id` may be added again (zero if it may).
    pub fn remaining(&self, target_id: &str, now: Duration) -> Duration {
        match self.last_added.get(target_id) {
            None => Duration::ZERO,
            Some(last) => self.window.saturating_sub(now.saturating_sub(*last)),
        }
    }

    pub fn record_add(&mut self, target_id: &str, now: Duration) {
        self.last_added.insert(target_id.to_string(), now);
    }

    pub fn last_added(&self, target_id: &str) -> Option<Duration> {
        self.last_added.get(target_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_add_always_allowed() {
        let gate = CooldownGate::default();
        assert!(gate.can_add("A", Duration::ZERO));
        assert_eq!(gate.remaining("A", Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_blocked_inside_window() {
        let mut gate = CooldownGate::new(ms(600));
        gate.record_add("A", ms(1000));
        assert!(!gate.can_add("A", ms(1000)));
        assert!(!gate.can_add("A", ms(1300)));
        assert!(!gate.can_add("A", ms(1599)));
    }

    #[test]
    fn test_open_exactly_at_window_end() {
        let mut gate = CooldownGate::new(ms(600));
        gate.record_add("A", ms(1000));
        assert!(gate.can_add("A", ms(1600)));
        assert!(gate.can_add("A", ms(5000)));
    }

    #[test]
    fn test_targets_are_independent() {
        let mut gate = CooldownGate::new(ms(600));
        gate.record_add("A", ms(0));
        assert!(gate.can_add("B", ms(100)));
    }

    #[test]
    fn test_record_overwrites() {
        let mut gate = CooldownGate::new(ms(600));
        gate.record_add("A", ms(0));
        gate.record_add("A", ms(500));
        assert_eq!(gate.last_added("A"), Some(ms(500)));
        assert!(!gate.can_add("A", ms(700)));
        assert!(gate.can_add("A", ms(1100)));
    }

    #[test]
    fn test_remaining() {
        let mut gate = CooldownGate::new(ms(600));
        gate.record_add("A", ms(0));
        assert_eq!(gate.remaining("A", ms(200)), ms(400));
        assert_eq!(gate.remaining("A", ms(900)), Duration::ZERO);
    }

    #[test]
    fn test_clock_behind_last_add_counts_as_zero_elapsed() {
        let mut gate = CooldownGate::new(ms(600));
        gate.record_add("A", ms(1000));
        assert!(!gate.can_add("A", ms(500)));
    }

    #[test]
    fn test_zero_window_never_blocks() {
        let mut gate = CooldownGate::new(Duration::ZERO);
        gate.record_add("A", ms(10));
        assert!(gate.can_add("A", ms(10)));
    }

    #[test]
    fn test_from_secs_rejects_negative() {
        assert!(CooldownGate::from_secs_f64(-0.5).is_err());
        assert!(CooldownGate::from_secs_f64(f64::NAN).is_err());
        assert_eq!(CooldownGate::from_secs_f64(1.5).unwrap().window(), ms(1500));
    }
}

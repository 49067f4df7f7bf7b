//! Session replay.
//!
//! Drives a scanner from a line-oriented script instead of a live AR
//! engine. Each line is `<seconds> <command>`:
//!
//! ```text
//! # time  command
//! 0.0     status Carte_5dt TRACKED
//! 0.3     status Carte_5dt EXTENDED_TRACKED
//! 1.0     lost Carte_5dt
//! 1.2     auto off
//! 1.5     add
//! 2.0     clear
//! ```
//!
//! Timestamps are session seconds and must never decrease.

use rust_decimal::Decimal;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

use crate::clock::ManualClock;
use crate::events::{TargetStatusEvent, TrackingHub};
use crate::presenter::SharedToggle;
use crate::scanner::MoneyScanner;
use crate::types::{ScannerError, TrackingStatus};

// ---------------------------------------------------------------------------
// Script model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayCommand {
    Status { target_id: String, status: TrackingStatus },
    Add,
    Clear,
    AutoAdd(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    pub line: usize,
    pub at: Duration,
    pub command: ReplayCommand,
}

/// Incremental parser; feed it one line at a time.
#[derive(Debug, Default)]
pub struct ScriptParser {
    line: usize,
    previous: Option<f64>,
}

impl ScriptParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the next line. Blank lines and `#` comments yield `None`.
    pub fn feed(&mut self, raw: &str) -> Result<Option<ReplayStep>, ScannerError> {
        self.line += 1;
        let line = self.line;
        let err = |message: String| ScannerError::ReplayParse { line, message };

        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            return Ok(None);
        }

        let mut words = content.split_whitespace();
        let time_word = words.next().unwrap_or_default();
        let at: f64 = time_word
            .parse()
            .map_err(|_| err(format!("invalid timestamp '{time_word}'")))?;
        if !at.is_finite() || at < 0.0 {
            return Err(err(format!("invalid timestamp '{time_word}'")));
        }
        let at_duration = Duration::try_from_secs_f64(at)
            .map_err(|e| err(format!("invalid timestamp '{time_word}': {e}")))?;
        if let Some(previous) = self.previous {
            if at < previous {
                return Err(ScannerError::ReplayOutOfOrder { line, at, previous });
            }
        }

        let command = match words.next() {
            Some("status") => {
                let target_id = words
                    .next()
                    .ok_or_else(|| err("status needs a target and a status".into()))?;
                let status_word = words
                    .next()
                    .ok_or_else(|| err("status needs a target and a status".into()))?;
                let status: TrackingStatus = status_word.parse().map_err(|e: ScannerError| err(e.to_string()))?;
                ReplayCommand::Status {
                    target_id: target_id.to_string(),
                    status,
                }
            }
            Some("lost") => {
                let target_id = words.next().ok_or_else(|| err("lost needs a target".into()))?;
                ReplayCommand::Status {
                    target_id: target_id.to_string(),
                    status: TrackingStatus::NoPose,
                }
            }
            Some("add") => ReplayCommand::Add,
            Some("clear") => ReplayCommand::Clear,
            Some("auto") => match words.next() {
                Some("on") => ReplayCommand::AutoAdd(true),
                Some("off") => ReplayCommand::AutoAdd(false),
                other => return Err(err(format!("auto expects on|off, got {other:?}"))),
            },
            Some(other) => return Err(err(format!("unknown command '{other}'"))),
            None => return Err(err("missing command".into())),
        };

        if let Some(extra) = words.next() {
            return Err(err(format!("unexpected trailing '{extra}'")));
        }

        self.previous = Some(at);
        Ok(Some(ReplayStep {
            line,
            at: at_duration,
            command,
        }))
    }
}

/// Parse a whole script up front.
pub fn parse_script(text: &str) -> Result<Vec<ReplayStep>, ScannerError> {
    let mut parser = ScriptParser::new();
    let mut steps = Vec::new();
    for line in text.lines() {
        if let Some(step) = parser.feed(line)? {
            steps.push(step);
        }
    }
    Ok(steps)
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub events_delivered: usize,
    pub additions: usize,
    pub clears: usize,
    pub final_total: Decimal,
}

/// Plays steps against a scanner: moves the shared clock, publishes status
/// events through the hub, flips the shared toggle and presses buttons.
pub struct ReplayRunner {
    hub: TrackingHub,
    clock: ManualClock,
    toggle: SharedToggle,
    summary: ReplaySummary,
}

impl ReplayRunner {
    /// `clock` and `toggle` must be the same handles the scanner was built with.
    pub fn new(hub: TrackingHub, clock: ManualClock, toggle: SharedToggle) -> Self {
        Self {
            hub,
            clock,
            toggle,
            summary: ReplaySummary::default(),
        }
    }

    pub fn apply(&mut self, scanner: &Rc<RefCell<MoneyScanner>>, step: &ReplayStep) {
        self.clock.set(step.at);
        let before = scanner.borrow().history().len();

        match &step.command {
            ReplayCommand::Status { target_id, status } => {
                let event = TargetStatusEvent::new(target_id.clone(), *status);
                self.summary.events_delivered += self.hub.publish(&event);
            }
            ReplayCommand::Add => {
                scanner.borrow_mut().on_add_button();
            }
            ReplayCommand::Clear => {
                scanner.borrow_mut().on_clear_button();
                self.summary.clears += 1;
            }
            ReplayCommand::AutoAdd(on) => {
                self.toggle.set(*on);
                debug!(line = step.line, auto_add = *on, "Auto-add toggled");
            }
        }

        let scanner = scanner.borrow();
        let after = scanner.history().len();
        self.summary.additions += after.saturating_sub(before);
        self.summary.steps += 1;
        self.summary.final_total = scanner.total();
    }

    pub fn run(mut self, scanner: &Rc<RefCell<MoneyScanner>>, steps: &[ReplayStep]) -> ReplaySummary {
        for step in steps {
            self.apply(scanner, step);
        }
        self.finish()
    }

    pub fn finish(self) -> ReplaySummary {
        info!(
            steps = self.summary.steps,
            events = self.summary.events_delivered,
            additions = self.summary.additions,
            total = %self.summary.final_total,
            "Replay finished"
        );
        self.summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

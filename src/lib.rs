//! money-scanner: denomination lookup and running totals for AR banknote scanning.
//!
//! Library crate exposing all modules for use by integration tests
//! and the replay binary.

pub mod config;
pub mod types;
pub mod registry;
pub mod clock;
pub mod detection;
pub mod cooldown;
pub mod accumulator;
pub mod presenter;
pub mod events;
pub mod scanner;
pub mod export;
pub mod replay;

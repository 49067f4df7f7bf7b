//! End-to-end tests driving the public API.

mod common;
mod scenarios;
mod replay_session;

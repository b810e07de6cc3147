//! Timing boundary trait for testability
//!
//! Auto-play waits between steps through this trait, so services can be
//! tested without real delays.

use std::thread;
use std::time::Duration;

/// Waits between auto-play steps.
pub trait Ticker: Send + Sync {
    fn wait(&self, delay: Duration);
}

/// Blocks the current thread for the delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadTicker;

impl Ticker for ThreadTicker {
    fn wait(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantTicker;

impl Ticker for InstantTicker {
    fn wait(&self, _delay: Duration) {}
}

//! Timed auto-play
//!
//! Repeatedly schedules a tick, waits the step delay and fires it, until the
//! plan is complete.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::application::services::session::Session;
use crate::infrastructure::traits::Ticker;

pub struct AutoPlayer {
    ticker: Arc<dyn Ticker>,
    delay: Duration,
}

impl AutoPlayer {
    pub fn new(ticker: Arc<dyn Ticker>, delay: Duration) -> Self {
        Self { ticker, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Plays `session` to the end. Starts playback if it is not already
    /// running. Returns the number of steps played.
    #[instrument(level = "debug", skip_all, fields(delay_ms = self.delay.as_millis() as u64))]
    pub fn run(&self, session: &mut Session) -> usize {
        if !session.is_playing() {
            session.toggle_play();
        }
        let mut played = 0;
        while let Some(handle) = session.schedule_tick() {
            self.ticker.wait(self.delay);
            if session.fire_tick(handle).is_some() {
                played += 1;
            }
        }
        debug!("auto-play stopped after {} steps", played);
        played
    }
}

//! Service container for dependency injection
//!
//! Wires up sessions and auto-play with their dependencies.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{AutoPlayer, Session, TreeSource};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::Theme;
use crate::infrastructure::traits::{ThreadTicker, Ticker};

/// Container holding the settings and the timing dependency.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Wait between auto-play steps
    pub ticker: Arc<dyn Ticker>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(ThreadTicker))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, ticker: Arc<dyn Ticker>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, ticker }
    }

    /// Open a session on the configured layout and random tree parameters.
    ///
    /// `theme` overrides the configured theme. A random source without a seed
    /// falls back to the configured seed.
    pub fn session(&self, source: TreeSource, theme: Option<Theme>) -> ApplicationResult<Session> {
        let source = match source {
            TreeSource::Random { seed: None } => TreeSource::Random {
                seed: self.settings.random.seed,
            },
            other => other,
        };
        Session::new(
            self.settings.session_options(),
            source,
            theme.unwrap_or(self.settings.theme),
        )
    }

    /// Auto-player with the configured step delay, unless overridden.
    pub fn auto_player(&self, delay_ms: Option<u64>) -> AutoPlayer {
        let delay = Duration::from_millis(delay_ms.unwrap_or(self.settings.step_delay_ms));
        AutoPlayer::new(Arc::clone(&self.ticker), delay)
    }
}

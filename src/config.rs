//! Tuning knobs for page sessions, kept per site instead of as literals

use std::time::Duration;

/// Parameters of the lazy-load scroll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollConfig {
    /// Pixels advanced per round
    pub scroll_delta: i64,
    /// Base pause after each scroll
    pub min_wait: Duration,
    /// Upper bound (exclusive) of the random extra pause
    pub max_jitter: Duration,
    /// Consecutive identical non-zero reads needed to call the feed settled
    pub required_stable_rounds: u32,
    /// Hard cap on rounds, reached only when the feed never settles
    pub max_rounds: u32,
}

impl ScrollConfig {
    pub const DEFAULT_STABLE_ROUNDS: u32 = 4;
    pub const DEFAULT_MAX_ROUNDS: u32 = 50;

    pub fn new(scroll_delta: i64, min_wait_ms: u64, max_jitter_ms: u64) -> Self {
        Self {
            scroll_delta,
            min_wait: Duration::from_millis(min_wait_ms),
            max_jitter: Duration::from_millis(max_jitter_ms),
            required_stable_rounds: Self::DEFAULT_STABLE_ROUNDS,
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
        }
    }

    /// Same thresholds, no waiting. Used by tests and fake sessions.
    #[must_use]
    pub fn instant(mut self) -> Self {
        self.min_wait = Duration::ZERO;
        self.max_jitter = Duration::ZERO;
        self
    }
}

/// Timeouts applied by the pipeline around the page session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeouts {
    /// First navigation (landing page)
    pub landing: Duration,
    /// Any navigation after the first one
    pub navigation: Duration,
    /// Waiting for the first product card to exist
    pub selector: Duration,
    /// Interval between selector checks while waiting
    pub selector_poll: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            landing: Duration::from_secs(60),
            navigation: Duration::from_secs(30),
            selector: Duration::from_secs(30),
            selector_poll: Duration::from_millis(250),
        }
    }
}

/// How the Chromium process is launched.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    pub executable: Option<std::path::PathBuf>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
        }
    }
}

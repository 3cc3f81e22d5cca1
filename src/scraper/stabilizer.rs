//! Scroll-driven stabilization of lazily loaded product feeds
//!
//! Listing pages never announce that they reached the end of the feed. The
//! loop below keeps scrolling until the number of rendered items holds steady
//! for a configured number of rounds, or until the round cap is hit.

use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info};

use crate::config::ScrollConfig;
use crate::errors::ScrapeError;
use crate::traits::PageSession;

/// Counters local to one `stabilize` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct ScrollState {
    last_count: usize,
    /// Consecutive rounds that observed the current non-zero count
    stable_rounds: u32,
    scroll_attempts: u32,
}

impl ScrollState {
    /// Record one count. A zero count never contributes to stability; growth
    /// (or shrinkage) starts a new streak.
    fn observe(&mut self, count: usize) {
        self.stable_rounds = match count {
            0 => 0,
            _ if count == self.last_count => self.stable_rounds + 1,
            _ => 1,
        };
        self.last_count = count;
        self.scroll_attempts += 1;
    }
}

/// How a stabilization run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilizeReport {
    /// Rounds performed, including the converging one
    pub rounds: u32,
    /// Item count observed in the last round
    pub last_count: usize,
    /// `false` when the round cap stopped the loop
    pub converged: bool,
}

fn round_pause(config: &ScrollConfig) -> Duration {
    let max_jitter = u64::try_from(config.max_jitter.as_millis()).unwrap_or(u64::MAX);
    if max_jitter == 0 {
        return config.min_wait;
    }
    let jitter = rand::thread_rng().gen_range(0..max_jitter);
    config.min_wait + Duration::from_millis(jitter)
}

/// Scroll until the count of `item_selector` matches settles.
///
/// The caller is responsible for waiting until the selector matches at least
/// once (see [`wait_for_selector`]). Hitting `max_rounds` is not an error.
///
/// # Errors
/// Only failures of the page session itself; nothing is retried.
pub async fn stabilize<S>(session: &S, item_selector: &str, config: &ScrollConfig) -> Result<StabilizeReport>
where
    S: PageSession + ?Sized,
{
    let mut state = ScrollState::default();

    while state.scroll_attempts < config.max_rounds {
        session.scroll_by(config.scroll_delta).await?;
        session.pause(round_pause(config)).await;

        let count = session.count(item_selector).await?;
        state.observe(count);
        debug!(
            "Scroll round {}: {} items ({} stable)",
            state.scroll_attempts, count, state.stable_rounds
        );

        if state.stable_rounds >= config.required_stable_rounds {
            info!(
                "Feed settled at {} items after {} scroll rounds",
                count, state.scroll_attempts
            );
            return Ok(StabilizeReport {
                rounds: state.scroll_attempts,
                last_count: count,
                converged: true,
            });
        }
    }

    info!(
        "Stopped scrolling after {} rounds with {} items (feed still changing)",
        state.scroll_attempts, state.last_count
    );
    Ok(StabilizeReport {
        rounds: state.scroll_attempts,
        last_count: state.last_count,
        converged: false,
    })
}

/// Wait until `selector` matches at least one element.
///
/// Counts once, then every `poll` until `timeout` worth of polls has passed.
///
/// # Errors
/// * `ScrapeError::SelectorTimeout` - the selector never matched
pub async fn wait_for_selector<S>(session: &S, selector: &str, timeout: Duration, poll: Duration) -> Result<()>
where
    S: PageSession + ?Sized,
{
    let mut remaining = (timeout.as_millis() / poll.as_millis().max(1)).max(1);

    loop {
        if session.count(selector).await? > 0 {
            return Ok(());
        }
        if remaining == 0 {
            break;
        }
        remaining -= 1;
        session.pause(poll).await;
    }

    Err(ScrapeError::SelectorTimeout {
        selector: selector.to_string(),
        timeout,
    }
    .into())
}

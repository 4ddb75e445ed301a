//! Explicit waits: poll an element until a condition holds or time runs out

use std::fmt;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::browser::{Browser, ElementState};
use crate::error::{StepError, StepResult};

/// Default upper bound for every wait (seconds)
pub const DEFAULT_WAIT_SECONDS: u64 = 10;

/// Default delay between two polls (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_WAIT_SECONDS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// What an element must satisfy before a step acts on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition<'a> {
    /// In the DOM, visible or not
    Present,

    /// Displayed and enabled
    Clickable,

    /// Rendered text contains the string
    TextInElement(&'a str),

    /// `value` property contains the string
    TextInValue(&'a str),
}

impl Condition<'_> {
    pub fn holds(&self, state: &ElementState) -> bool {
        match self {
            Condition::Present => true,
            Condition::Clickable => state.is_clickable(),
            Condition::TextInElement(text) => state.text.contains(text),
            Condition::TextInValue(text) => state
                .value
                .as_deref()
                .map(|value| value.contains(text))
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for Condition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Present => write!(f, "be present"),
            Condition::Clickable => write!(f, "be clickable"),
            Condition::TextInElement(text) => write!(f, "contain text '{}'", text),
            Condition::TextInValue(text) => write!(f, "have a value containing '{}'", text),
        }
    }
}

/// Poll the element with `id` until `condition` holds.
///
/// The condition is checked at least once, even with a zero timeout. A
/// missing element, or one that went stale while being read, counts as the
/// condition not holding yet.
pub async fn wait_for(
    browser: &dyn Browser,
    id: &str,
    condition: Condition<'_>,
    wait: WaitConfig,
) -> StepResult<ElementState> {
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        match browser.inspect(id).await {
            Ok(Some(state)) if condition.holds(&state) => {
                debug!("'{}' did {} after {} poll(s)", id, condition, attempts);
                return Ok(state);
            }
            Ok(_) => {}
            Err(StepError::StaleElement(_)) => {
                debug!("'{}' went stale on poll {}, retrying", id, attempts);
            }
            Err(e) => return Err(e),
        }

        let elapsed = start.elapsed();
        if elapsed >= wait.timeout {
            return Err(StepError::Timeout {
                id: id.to_string(),
                condition: condition.to_string(),
                waited: wait.timeout,
            });
        }

        sleep(wait.poll_interval.min(wait.timeout - elapsed)).await;
    }
}

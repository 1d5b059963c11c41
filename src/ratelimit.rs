//! Cooldown bookkeeping between consecutive API requests.
//!
//! [`RateState`] is a small two-state machine (`Ready` / `Cooling`). Sending
//! a request always moves it to `Cooling`; it becomes `Ready` again lazily,
//! the next time a call asks for a decision and the cooldown has elapsed.
//! The state never reads the clock itself, callers pass `now` in, which keeps
//! the decisions deterministic.

use std::time::Duration;
use tokio::time::Instant;

use crate::CallMode;

/// Default cooldown between requests without an API key
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1000);

/// Default cooldown between requests when an API key is configured
pub const DEFAULT_KEYED_COOLDOWN: Duration = Duration::from_millis(250);

/// The cooldown a client uses when none was configured explicitly.
pub fn default_cooldown(has_api_key: bool) -> Duration {
    if has_api_key {
        DEFAULT_KEYED_COOLDOWN
    } else {
        DEFAULT_COOLDOWN
    }
}

/// What to do with a call before it reaches the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gate {
    /// Send right away
    Proceed,
    /// Sleep for the given duration, then send
    Wait(Duration),
    /// Do not send at all
    Drop,
}

/// Mutable pacing state, owned by exactly one client
#[derive(Debug, Clone)]
pub struct RateState {
    last_request: Option<Instant>,
    ready: bool,
}

impl Default for RateState {
    fn default() -> Self {
        Self::new()
    }
}

impl RateState {
    pub fn new() -> Self {
        RateState {
            last_request: None,
            ready: true,
        }
    }

    /// Whether the last evaluation found the API ready
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Time of the most recent request that reached the transport
    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }

    /// Time left until the cooldown has elapsed, zero if it already has
    pub fn remaining(&self, now: Instant, cooldown: Duration) -> Duration {
        match self.last_request {
            Some(last) => cooldown.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::from_secs(0),
        }
    }

    /// Lazily move from `Cooling` back to `Ready` once the cooldown passed
    pub(crate) fn refresh(&mut self, now: Instant, cooldown: Duration) {
        if !self.ready && self.remaining(now, cooldown) == Duration::from_secs(0) {
            self.ready = true;
        }
    }

    /// Decide how a call in `mode` may proceed at `now`
    pub(crate) fn gate(&mut self, mode: CallMode, now: Instant, cooldown: Duration) -> Gate {
        self.refresh(now, cooldown);
        match mode {
            CallMode::Force => Gate::Proceed,
            CallMode::Fast if self.ready => Gate::Proceed,
            CallMode::Fast => Gate::Drop,
            CallMode::Safe if self.ready => Gate::Proceed,
            CallMode::Safe => Gate::Wait(self.remaining(now, cooldown)),
        }
    }

    /// A `Safe` call finished waiting out the cooldown
    pub(crate) fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// A request was handed to the transport at `now`
    pub(crate) fn mark_sent(&mut self, now: Instant) {
        self.last_request = Some(now);
        self.ready = false;
    }
}

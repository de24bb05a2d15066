//! Reconnect state machine for the fix feed.
//!
//! ```text
//!                 on_connected
//!   Disconnected ──────────────► Connected
//!        │                          │
//!        │ on_attempt_failed        │ on_disconnected
//!        ▼                          ▼
//!   Backoff { attempt, delay } ◄────┘
//!        │  ▲
//!        │  └── on_attempt_failed (delay doubles, capped)
//!        ▼
//!     GaveUp  (after max_attempts failed attempts)
//! ```
//!
//! `Backoff { attempt, delay }` means: wait `delay`, then make attempt number
//! `attempt` (1-based).

use std::time::Duration;

/// Exponential backoff parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub first_delay: Duration,
    pub multiplier: u32,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            first_delay: Duration::from_secs(1),
            multiplier: 2,
            max_delay: Duration::from_secs(60),
            max_attempts: 12,
        }
    }
}

/// Where the feed is in its connect/reconnect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectState {
    /// Never connected yet; connect immediately.
    Disconnected,
    Connected,
    Backoff { attempt: u32, delay: Duration },
    /// Terminal until a connection succeeds.
    GaveUp,
}

impl ReconnectState {
    pub fn on_connected(self) -> Self {
        Self::Connected
    }

    /// An established connection was lost.
    pub fn on_disconnected(self, policy: &ReconnectPolicy) -> Self {
        match self {
            Self::GaveUp => Self::GaveUp,
            _ => Self::first_backoff(policy),
        }
    }

    /// A connection attempt failed.
    pub fn on_attempt_failed(self, policy: &ReconnectPolicy) -> Self {
        match self {
            Self::Backoff { attempt, delay } => {
                if attempt >= policy.max_attempts {
                    Self::GaveUp
                } else {
                    Self::Backoff {
                        attempt: attempt + 1,
                        delay: delay.saturating_mul(policy.multiplier).min(policy.max_delay),
                    }
                }
            }
            Self::GaveUp => Self::GaveUp,
            Self::Disconnected | Self::Connected => Self::first_backoff(policy),
        }
    }

    /// How long to wait before the next attempt, if one is due.
    pub fn delay(&self) -> Option<Duration> {
        match self {
            Self::Backoff { delay, .. } => Some(*delay),
            _ => None,
        }
    }

    pub fn is_gave_up(&self) -> bool {
        matches!(self, Self::GaveUp)
    }

    fn first_backoff(policy: &ReconnectPolicy) -> Self {
        if policy.max_attempts == 0 {
            return Self::GaveUp;
        }
        Self::Backoff {
            attempt: 1,
            delay: policy.first_delay.min(policy.max_delay),
        }
    }
}

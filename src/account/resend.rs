//! Cooldown between verification email resends.

use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

/// Seconds the user has to wait before another resend.
pub const RESEND_COOLDOWN_SECS: u32 = 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResendState {
    /// Nothing has been sent yet.
    #[default]
    Idle,
    CoolingDown {
        remaining: u32,
    },
    Ready,
}

#[derive(Clone, Debug, Default)]
pub struct ResendCooldown {
    state: ResendState,
}

impl ResendCooldown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> ResendState {
        self.state
    }

    /// Starts (or restarts) the full countdown.
    pub fn start(&mut self) {
        self.state = ResendState::CoolingDown {
            remaining: RESEND_COOLDOWN_SECS,
        };
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> ResendState {
        if let ResendState::CoolingDown { remaining } = self.state {
            self.state = if remaining <= 1 {
                ResendState::Ready
            } else {
                ResendState::CoolingDown {
                    remaining: remaining - 1,
                }
            };
        }
        self.state
    }

    #[must_use]
    pub const fn can_resend(&self) -> bool {
        matches!(self.state, ResendState::Ready)
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, ResendState::Idle)
    }

    /// Seconds left, zero unless cooling down.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        match self.state {
            ResendState::CoolingDown { remaining } => remaining,
            ResendState::Idle | ResendState::Ready => 0,
        }
    }

    pub fn reset(&mut self) {
        self.state = ResendState::Idle;
    }

    /// Ticks once per second until the countdown is over. Returns at once when
    /// not cooling down.
    pub async fn run(&mut self) {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;
        while matches!(self.state, ResendState::CoolingDown { .. }) {
            ticker.tick().await;
            let state = self.tick();
            debug!(remaining = self.remaining(), ?state, "resend cooldown tick");
        }
    }
}

//! Local countdown used by the timer mode

use std::{future::Future, time::Duration};

use tokio::{
    sync::watch,
    time::{interval, Instant},
};
use tracing::{debug, info};

/// Default countdown length, matching the first timer preset
pub const DEFAULT_COUNTDOWN: Duration = Duration::from_secs(20);

/// Countdown state published to watchers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    pub active: bool,
    pub remaining_seconds: u64,
    pub expired: bool,
}

impl CountdownState {
    pub fn running(remaining_seconds: u64) -> Self {
        Self {
            active: true,
            remaining_seconds,
            expired: false,
        }
    }

    pub fn expired() -> Self {
        Self {
            active: false,
            remaining_seconds: 0,
            expired: true,
        }
    }

    pub fn stopped(remaining_seconds: u64) -> Self {
        Self {
            active: false,
            remaining_seconds,
            expired: false,
        }
    }
}

/// How a countdown ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    Expired,
    Cancelled,
}

/// Count down `duration`, publishing the remaining whole seconds once per
/// second, until it runs out or `cancel` resolves.
pub async fn countdown_task<C>(
    duration: Duration,
    updates: watch::Sender<CountdownState>,
    cancel: C,
) -> CountdownOutcome
where
    C: Future<Output = ()>,
{
    info!("Starting countdown of {}s", duration.as_secs());

    let start = Instant::now();
    let mut ticker = interval(Duration::from_secs(1));
    tokio::pin!(cancel);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let elapsed = start.elapsed();
                if elapsed >= duration {
                    info!("Countdown expired");
                    updates.send_replace(CountdownState::expired());
                    return CountdownOutcome::Expired;
                }

                let remaining = remaining_seconds(duration - elapsed);
                debug!("Countdown: {}s remaining", remaining);
                updates.send_replace(CountdownState::running(remaining));
            }

            _ = &mut cancel => {
                let remaining = remaining_seconds(duration.saturating_sub(start.elapsed()));
                info!("Countdown cancelled with {}s remaining", remaining);
                updates.send_replace(CountdownState::stopped(remaining));
                return CountdownOutcome::Cancelled;
            }
        }
    }
}

/// Whole seconds left, rounded up so the display never shows 0 while running
fn remaining_seconds(remaining: Duration) -> u64 {
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

//! Periodic background refresh of the dashboard

use std::{sync::Weak, time::Duration};

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::{DashboardController, RefreshOutcome};

/// Background task that asks the controller for a quiet refresh every `every`.
///
/// Holds only a weak reference, so it ends on its own once the controller is
/// dropped or disposed.
pub async fn auto_refresh_task(controller: Weak<DashboardController>, every: Duration) {
    info!("Starting auto refresh every {}ms", every.as_millis());

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately and construction already fetched
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let Some(live) = controller.upgrade() else {
            break;
        };

        match live.refresh_in_background() {
            Ok(RefreshOutcome::Started(seq)) => debug!("Auto refresh issued fetch #{}", seq),
            Ok(RefreshOutcome::Coalesced(seq)) => {
                debug!("Auto refresh skipped, fetch #{} still running", seq)
            }
            Err(e) => {
                debug!("Auto refresh stopping: {}", e);
                break;
            }
        }
    }

    info!("Auto refresh stopped");
}

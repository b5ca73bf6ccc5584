//! Dashboard view-state controller
//!
//! Owns what the dashboard shows, runs at most one fetch at a time against
//! the [`ResourceFetcher`], and fans every state transition out to observers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use futures::stream::{self, Stream};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use super::ViewState;
use crate::{endpoint::Endpoint, error::DashboardError, services::ResourceFetcher};

/// What a refresh call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new fetch was issued with this sequence number
    Started(u64),
    /// A fetch was already in flight; its result will settle the state
    Coalesced(u64),
}

/// The fetch currently allowed to settle the state
#[derive(Debug)]
struct InFlight {
    seq: u64,
    /// Background fetches leave the state alone on failure
    quiet: bool,
    task: JoinHandle<()>,
}

#[derive(Debug)]
struct Shared {
    state: ViewState,
    /// Sequence number of the most recently issued fetch
    seq: u64,
    in_flight: Option<InFlight>,
    subscribers: Vec<mpsc::UnboundedSender<ViewState>>,
    last_settled_at: Option<DateTime<Utc>>,
    disposed: bool,
}

impl Shared {
    /// Replace the state and notify every live subscriber
    fn transition(&mut self, next: ViewState) {
        if self.state == next {
            return;
        }

        debug!("View state: {} -> {}", self.state.label(), next.label());
        self.state = next;
        let state = &self.state;
        self.subscribers.retain(|tx| tx.send(state.clone()).is_ok());
    }

    fn settle(&mut self, next: ViewState) {
        self.last_settled_at = Some(Utc::now());
        self.transition(next);
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single source of truth for the dashboard screen, bound to one endpoint
/// for its whole life.
///
/// Must be created inside a Tokio runtime: construction issues the first
/// fetch immediately. Dropping the controller disposes it.
pub struct DashboardController {
    endpoint: Endpoint,
    fetcher: Arc<dyn ResourceFetcher>,
    shared: Arc<Mutex<Shared>>,
}

impl DashboardController {
    /// Validate `endpoint`, enter `Loading` and start the first fetch
    pub fn initialize(
        endpoint: &str,
        fetcher: Arc<dyn ResourceFetcher>,
    ) -> Result<Self, DashboardError> {
        let endpoint = Endpoint::parse(endpoint)?;
        Ok(Self::with_endpoint(endpoint, fetcher))
    }

    /// Bind to an already validated `endpoint` and start the first fetch.
    /// Spawns onto the current Tokio runtime.
    pub fn with_endpoint(endpoint: Endpoint, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        info!("Dashboard controller bound to {}", endpoint);

        let controller = Self {
            endpoint,
            fetcher,
            shared: Arc::new(Mutex::new(Shared {
                state: ViewState::Loading,
                seq: 0,
                in_flight: None,
                subscribers: Vec::new(),
                last_settled_at: None,
                disposed: false,
            })),
        };

        let mut shared = lock(&controller.shared);
        controller.issue_fetch(&mut shared, false);
        drop(shared);

        controller
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Show `Loading` and fetch, unless a fetch is already in flight, in
    /// which case this call rides on that one.
    pub fn refresh(&self) -> Result<RefreshOutcome, DashboardError> {
        let mut shared = self.lock_live()?;

        if let Some(in_flight) = shared.in_flight.as_mut() {
            let seq = in_flight.seq;
            if in_flight.quiet {
                // Someone is now waiting on this fetch, so its outcome must show
                in_flight.quiet = false;
                shared.transition(ViewState::Loading);
            }
            debug!("Refresh coalesced into fetch #{}", seq);
            return Ok(RefreshOutcome::Coalesced(seq));
        }

        shared.transition(ViewState::Loading);
        Ok(RefreshOutcome::Started(self.issue_fetch(&mut shared, false)))
    }

    /// Fetch without showing `Loading`. A failure keeps whatever is on screen.
    pub fn refresh_in_background(&self) -> Result<RefreshOutcome, DashboardError> {
        let mut shared = self.lock_live()?;

        if let Some(in_flight) = shared.in_flight.as_ref() {
            return Ok(RefreshOutcome::Coalesced(in_flight.seq));
        }

        Ok(RefreshOutcome::Started(self.issue_fetch(&mut shared, true)))
    }

    /// Abandon any in-flight fetch and start over from `Loading`
    pub fn restart(&self) -> Result<RefreshOutcome, DashboardError> {
        let mut shared = self.lock_live()?;

        if let Some(stale) = shared.in_flight.take() {
            debug!("Superseding fetch #{}", stale.seq);
            stale.task.abort();
        }

        shared.transition(ViewState::Loading);
        Ok(RefreshOutcome::Started(self.issue_fetch(&mut shared, false)))
    }

    /// Stream of view states: the current one first, then every transition
    /// in order. Ends when the controller is disposed, dropping anything
    /// still queued.
    pub fn observe_state(
        &self,
    ) -> Result<impl Stream<Item = ViewState> + Send + 'static, DashboardError> {
        let mut shared = self.lock_live()?;

        let (tx, rx) = mpsc::unbounded_channel();
        // The receiver is still in hand, so this cannot fail
        let _ = tx.send(shared.state.clone());
        shared.subscribers.push(tx);

        let owner = Arc::clone(&self.shared);
        Ok(stream::unfold((rx, owner), |(mut rx, owner)| async move {
            let state = rx.recv().await?;
            let disposed = lock(&owner).disposed;
            if disposed {
                return None;
            }
            Some((state, (rx, owner)))
        }))
    }

    /// Snapshot of the current state
    pub fn state(&self) -> Result<ViewState, DashboardError> {
        Ok(self.lock_live()?.state.clone())
    }

    pub fn is_refreshing(&self) -> Result<bool, DashboardError> {
        Ok(self.lock_live()?.in_flight.is_some())
    }

    /// When the state last settled on `Empty`, `Populated` or `Error`
    pub fn last_settled_at(&self) -> Result<Option<DateTime<Utc>>, DashboardError> {
        Ok(self.lock_live()?.last_settled_at)
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.shared).disposed
    }

    /// Cancel the in-flight fetch and end every observer stream. Idempotent.
    pub fn dispose(&self) {
        let mut shared = lock(&self.shared);
        if shared.disposed {
            return;
        }

        shared.disposed = true;
        if let Some(in_flight) = shared.in_flight.take() {
            in_flight.task.abort();
        }
        shared.subscribers.clear();
        info!("Dashboard controller for {} disposed", self.endpoint);
    }

    fn lock_live(&self) -> Result<MutexGuard<'_, Shared>, DashboardError> {
        let shared = lock(&self.shared);
        if shared.disposed {
            return Err(DashboardError::Disposed);
        }
        Ok(shared)
    }

    /// Spawn the next fetch and make it the only one allowed to settle state
    fn issue_fetch(&self, shared: &mut Shared, quiet: bool) -> u64 {
        shared.seq += 1;
        let seq = shared.seq;
        debug!("Issuing fetch #{} to {} (quiet: {})", seq, self.endpoint, quiet);

        let task = tokio::spawn(run_fetch(
            Arc::clone(&self.shared),
            Arc::clone(&self.fetcher),
            self.endpoint.clone(),
            seq,
        ));

        shared.in_flight = Some(InFlight { seq, quiet, task });
        seq
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn run_fetch(
    shared: Arc<Mutex<Shared>>,
    fetcher: Arc<dyn ResourceFetcher>,
    endpoint: Endpoint,
    seq: u64,
) {
    let result = fetcher.fetch(&endpoint).await;

    let mut shared = lock(&shared);
    let current = match shared.in_flight.as_ref() {
        Some(in_flight) if !shared.disposed && in_flight.seq == seq && shared.seq == seq => in_flight,
        _ => {
            debug!("Discarding stale result of fetch #{}", seq);
            return;
        }
    };
    let quiet = current.quiet;
    shared.in_flight = None;

    match result {
        Ok(items) => {
            debug!("Fetch #{} returned {} item(s)", seq, items.len());
            shared.settle(ViewState::from_items(items));
        }
        Err(e) if quiet => {
            warn!("Background refresh of {} failed: {}", endpoint, e);
        }
        Err(e) => {
            warn!("Fetch #{} from {} failed: {}", seq, endpoint, e);
            shared.settle(ViewState::Error {
                message: e.user_message(),
            });
        }
    }
}

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn, Instrument};

use crate::error::{FeedError, Result};
use crate::model::{MatchDetails, MatchEvent};
use crate::source::{MatchCache, MatchDetailSource};

/// Error shown when neither enriched details nor a listed fixture exist.
pub const NOT_FOUND_ERROR: &str = "Match details not found";
const LOAD_ERROR: &str = "Failed to load match details";

/// Snapshot of a detail loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailState {
    pub match_id: Option<String>,
    pub details: Option<MatchDetails>,
    pub events: Vec<MatchEvent>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Loads the details and timeline of one fixture at a time.
///
/// Loading another id cancels the previous request; its result is never
/// published. When the backend has no enriched record, a minimal one is
/// derived from the fixture in the shared [`MatchCache`].
pub struct MatchDetailLoader {
    source: Arc<dyn MatchDetailSource>,
    cache: MatchCache,
    state: Arc<watch::Sender<DetailState>>,
    in_flight: CancellationToken,
}

impl MatchDetailLoader {
    pub fn new(source: Arc<dyn MatchDetailSource>, cache: MatchCache) -> Self {
        let (state, _) = watch::channel(DetailState::default());
        Self {
            source,
            cache,
            state: Arc::new(state),
            in_flight: CancellationToken::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DetailState {
        self.state.borrow().clone()
    }

    /// Start loading `match_id`. Returns `false` when it is already the
    /// current id; use [`MatchDetailLoader::refetch`] to reload it. Must be
    /// called inside a Tokio runtime.
    pub fn load(&mut self, match_id: impl Into<String>) -> bool {
        let match_id = match_id.into();
        if self.state.borrow().match_id.as_deref() == Some(match_id.as_str()) {
            return false;
        }

        let token = self.supersede();
        self.state.send_modify(|state| {
            *state = DetailState {
                match_id: Some(match_id.clone()),
                loading: true,
                ..DetailState::default()
            };
        });
        self.spawn_fetch(token, match_id);
        true
    }

    /// Reload the current id, keeping what is shown until the new result
    /// arrives. Returns `false` when nothing has been loaded yet.
    pub fn refetch(&mut self) -> bool {
        let Some(match_id) = self.state.borrow().match_id.clone() else {
            return false;
        };

        let token = self.supersede();
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        self.spawn_fetch(token, match_id);
        true
    }

    pub fn cancel(&mut self) {
        self.in_flight.cancel();
        self.state.send_if_modified(|state| std::mem::replace(&mut state.loading, false));
    }

    /// Wait until no request is in flight and return that snapshot.
    pub async fn settled(&self) -> DetailState {
        let mut rx = self.state.subscribe();
        let settled = rx.wait_for(|state| !state.loading).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.snapshot())
    }

    fn supersede(&mut self) -> CancellationToken {
        self.in_flight.cancel();
        self.in_flight = CancellationToken::new();
        self.in_flight.clone()
    }

    #[instrument(skip(self, token))]
    fn spawn_fetch(&self, token: CancellationToken, match_id: String) {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let cache = self.cache.clone();

        tokio::spawn(
            async move {
                let result = tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("details request cancelled");
                        return;
                    }
                    result = resolve(source.as_ref(), &cache, &match_id) => result,
                };
                apply_details(&state, &token, result);
            }
            .in_current_span(),
        );
    }
}

impl Drop for MatchDetailLoader {
    fn drop(&mut self) {
        self.in_flight.cancel();
    }
}

async fn resolve(
    source: &dyn MatchDetailSource,
    cache: &MatchCache,
    match_id: &str,
) -> Result<(MatchDetails, Vec<MatchEvent>)> {
    let (details, events) = tokio::join!(source.fetch_details(match_id), source.fetch_events(match_id));

    let details = match details? {
        Some(details) => details,
        None => {
            let basic = cache
                .get(match_id)
                .ok_or_else(|| FeedError::not_found(match_id))?;
            debug!(match_id, "no enriched details, using listed fixture");
            MatchDetails::from_basic(basic)
        }
    };

    let events = match events {
        Ok(events) => events.unwrap_or_default(),
        Err(FeedError::Cancelled) => return Err(FeedError::Cancelled),
        Err(err) => {
            warn!(match_id, error = %err, "timeline unavailable");
            Vec::new()
        }
    };

    Ok((details, events))
}

fn apply_details(
    state: &watch::Sender<DetailState>,
    token: &CancellationToken,
    result: Result<(MatchDetails, Vec<MatchEvent>)>,
) {
    let applied = state.send_if_modified(|state| {
        if token.is_cancelled() {
            return false;
        }
        state.loading = false;

        match result {
            Ok((details, events)) => {
                debug!(events = events.len(), "applied match details");
                state.details = Some(details);
                state.events = events;
                state.error = None;
            }
            Err(FeedError::Cancelled) => debug!("source cancelled details request"),
            Err(FeedError::NotFound { match_id }) => {
                debug!(match_id, "match details not found");
                state.details = None;
                state.events.clear();
                state.error = Some(NOT_FOUND_ERROR.to_string());
            }
            Err(err) => {
                warn!(error = %err, "details request failed");
                state.error = Some(LOAD_ERROR.to_string());
            }
        }
        true
    });

    if !applied {
        debug!("discarded superseded details");
    }
}

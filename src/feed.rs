//! Paginated, cancellable feed of fixtures for one query.
//!
//! ```no_run
//! # async fn example() {
//! use std::sync::Arc;
//!
//! use matchfeed::{FeedConfig, FeedQuery, MatchFeed, MockSource};
//!
//! let source = Arc::new(MockSource::demo(chrono::Local::now().date_naive()));
//! let mut feed = MatchFeed::new(source, FeedQuery::default().with_league("4328"), FeedConfig::default());
//!
//! let first = feed.settled().await;
//! println!("{} fixtures, more: {}", first.matches.len(), first.has_more);
//!
//! if feed.load_more() {
//!     let next = feed.settled().await;
//!     println!("{} fixtures", next.matches.len());
//! }
//! # }
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn, Instrument};

use crate::config::FeedConfig;
use crate::error::{FeedError, Result};
use crate::model::{FeedQuery, Match};
use crate::source::{MatchCache, MatchSource, Page};

const LOAD_ERROR: &str = "Failed to load matches";

/// Snapshot of a feed, published after every transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedState {
    /// Fixtures accumulated for the current query, in arrival order.
    pub matches: Vec<Match>,
    /// Start of the next page to request.
    pub offset: usize,
    pub has_more: bool,
    /// Page 0 is in flight.
    pub loading: bool,
    /// A later page is in flight.
    pub loading_more: bool,
    pub error: Option<String>,
}

impl FeedState {
    pub fn is_busy(&self) -> bool {
        self.loading || self.loading_more
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Initial,
    More,
}

/// Owns the paged list of fixtures for a [`FeedQuery`].
///
/// Fetches run on spawned Tokio tasks; every transition is published on a
/// [`watch`] channel (see [`MatchFeed::subscribe`]). Only the latest request
/// may change the state: issuing a new one cancels the previous request's
/// token, which drops its pending future.
pub struct MatchFeed {
    source: Arc<dyn MatchSource>,
    config: FeedConfig,
    query: FeedQuery,
    state: Arc<watch::Sender<FeedState>>,
    cache: MatchCache,
    in_flight: CancellationToken,
}

impl MatchFeed {
    /// Create a feed and start loading page 0. Must be called inside a Tokio
    /// runtime.
    pub fn new(source: Arc<dyn MatchSource>, query: FeedQuery, config: FeedConfig) -> Self {
        Self::with_cache(source, query, config, MatchCache::new())
    }

    /// Like [`MatchFeed::new`], recording loaded fixtures into `cache`.
    pub fn with_cache(
        source: Arc<dyn MatchSource>,
        query: FeedQuery,
        config: FeedConfig,
        cache: MatchCache,
    ) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        let mut feed = Self {
            source,
            config,
            query,
            state: Arc::new(state),
            cache,
            in_flight: CancellationToken::new(),
        };
        feed.restart();
        feed
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    pub fn config(&self) -> FeedConfig {
        self.config
    }

    /// Fixtures loaded by this feed, shareable with a
    /// [`MatchDetailLoader`](crate::MatchDetailLoader).
    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    /// Switch to `query`. Returns `false` without doing anything when the
    /// query is unchanged.
    pub fn set_query(&mut self, query: FeedQuery) -> bool {
        if query == self.query {
            return false;
        }
        self.query = query;
        self.restart();
        true
    }

    /// Drop accumulated fixtures and load page 0 again.
    pub fn refetch(&mut self) {
        self.restart();
    }

    /// Request the next page. Returns `false` when a fetch is already in
    /// flight or the query has no more fixtures.
    pub fn load_more(&mut self) -> bool {
        let mut offset = 0;
        let accepted = self.state.send_if_modified(|state| {
            if state.is_busy() || !state.has_more {
                return false;
            }
            state.loading_more = true;
            state.error = None;
            offset = state.offset;
            true
        });
        if !accepted {
            debug!("load_more ignored");
            return false;
        }

        let token = self.supersede();
        self.spawn_fetch(token, FetchKind::More, offset);
        true
    }

    /// Cancel the in-flight request, if any, and clear the loading flags.
    pub fn cancel(&mut self) {
        self.in_flight.cancel();
        self.state.send_if_modified(|state| {
            let was_busy = state.is_busy();
            state.loading = false;
            state.loading_more = false;
            was_busy
        });
    }

    /// Wait until no request is in flight and return that snapshot.
    pub async fn settled(&self) -> FeedState {
        let mut rx = self.state.subscribe();
        let settled = rx.wait_for(|state| !state.is_busy()).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.snapshot())
    }

    fn restart(&mut self) {
        let token = self.supersede();
        self.state.send_modify(|state| {
            *state = FeedState {
                loading: true,
                ..FeedState::default()
            };
        });
        self.spawn_fetch(token, FetchKind::Initial, 0);
    }

    fn supersede(&mut self) -> CancellationToken {
        self.in_flight.cancel();
        self.in_flight = CancellationToken::new();
        self.in_flight.clone()
    }

    #[instrument(skip(self, token), fields(query = ?self.query))]
    fn spawn_fetch(&self, token: CancellationToken, kind: FetchKind, offset: usize) {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let cache = self.cache.clone();
        let query = self.query.clone();
        let limit = self.config.page_size();

        tokio::spawn(
            async move {
                let result = tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("page request cancelled");
                        return;
                    }
                    result = source.fetch_page(&query, offset, limit) => result,
                };
                apply_page(&state, &cache, &token, kind, offset, limit, result);
            }
            .in_current_span(),
        );
    }
}

impl Drop for MatchFeed {
    fn drop(&mut self) {
        self.in_flight.cancel();
    }
}

/// Fold a resolved page into the state, unless a newer request has
/// superseded it. The token is checked under the channel lock, so a
/// supersede either happens before the check or overwrites this write.
fn apply_page(
    state: &watch::Sender<FeedState>,
    cache: &MatchCache,
    token: &CancellationToken,
    kind: FetchKind,
    offset: usize,
    limit: usize,
    result: Result<Page>,
) {
    let applied = state.send_if_modified(|state| {
        if token.is_cancelled() {
            return false;
        }
        state.loading = false;
        state.loading_more = false;

        match result {
            Ok(page) => {
                state.has_more = page.has_more(offset, limit);
                state.offset = offset + limit;
                state.error = None;
                cache.insert_all(&page.matches);
                debug!(
                    offset,
                    count = page.matches.len(),
                    has_more = state.has_more,
                    "applied page"
                );
                match kind {
                    FetchKind::Initial => state.matches = page.matches,
                    FetchKind::More => {
                        let seen: HashSet<String> =
                            state.matches.iter().map(|m| m.id.clone()).collect();
                        state
                            .matches
                            .extend(page.matches.into_iter().filter(|m| !seen.contains(&m.id)));
                    }
                }
            }
            Err(FeedError::Cancelled) => debug!(offset, "source cancelled page request"),
            Err(err) => {
                warn!(offset, error = %err, "page request failed");
                state.error = Some(LOAD_ERROR.to_string());
            }
        }
        true
    });

    if !applied {
        debug!(offset, "discarded superseded page");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use parking_lot::Mutex;
    use tokio::sync::oneshot;

    use super::*;
    use crate::model::matchlist::fixtures::fixture;
    use crate::source::MockSource;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn premier_league() -> FeedQuery {
        FeedQuery::default().with_league("4328")
    }

    fn ids(state: &FeedState) -> Vec<&str> {
        state.matches.iter().map(|m| m.id.as_str()).collect()
    }

    /// Source whose requests stay pending until the test resolves them.
    #[derive(Default)]
    struct GatedSource {
        pending: Mutex<Vec<oneshot::Sender<Result<Page>>>>,
    }

    impl GatedSource {
        async fn wait_pending(&self, n: usize) {
            while self.pending.lock().len() < n {
                tokio::task::yield_now().await;
            }
        }

        fn resolve(&self, index: usize, result: Result<Page>) {
            let tx = self.pending.lock().remove(index);
            let _ = tx.send(result);
        }
    }

    #[async_trait]
    impl MatchSource for GatedSource {
        async fn fetch_page(&self, _query: &FeedQuery, _offset: usize, _limit: usize) -> Result<Page> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().push(tx);
            rx.await.unwrap_or(Err(FeedError::Cancelled))
        }
    }

    /// Source that never answers.
    struct SilentSource;

    #[async_trait]
    impl MatchSource for SilentSource {
        async fn fetch_page(&self, _query: &FeedQuery, _offset: usize, _limit: usize) -> Result<Page> {
            std::future::pending().await
        }
    }

    async fn wait_released<T: ?Sized>(source: &Arc<T>, expected: usize) {
        for _ in 0..100 {
            if Arc::strong_count(source) == expected {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("fetch task still holds the source");
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_load() {
        let source = Arc::new(MockSource::demo(day()));
        let feed = MatchFeed::new(source, premier_league(), FeedConfig::default());

        let initial = feed.snapshot();
        assert!(initial.loading);
        assert!(initial.matches.is_empty());

        let state = feed.settled().await;
        assert!(!state.loading);
        assert_eq!(ids(&state), ["m-0", "m-2", "m-4", "m-6", "m-8"]);
        assert_eq!(state.offset, 5);
        assert!(state.has_more);
        assert_eq!(state.error, None);
        assert_eq!(feed.cache().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_appends_until_exhausted() {
        let source = Arc::new(MockSource::demo(day()));
        let mut feed = MatchFeed::new(source.clone(), premier_league(), FeedConfig::default());
        let mut previous = feed.settled().await.matches.len();

        while feed.snapshot().has_more {
            assert!(feed.load_more());
            let state = feed.settled().await;
            let unique: HashSet<_> = state.matches.iter().map(|m| &m.id).collect();

            assert!(state.matches.len() > previous);
            assert!(state.matches.len() - previous <= 5);
            assert_eq!(unique.len(), state.matches.len());
            previous = state.matches.len();
        }

        assert_eq!(previous, 15);
        let requests = source.page_requests();
        assert!(!feed.load_more());
        assert_eq!(source.page_requests(), requests);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_load_more_is_rejected() {
        let source = Arc::new(MockSource::demo(day()));
        let mut feed = MatchFeed::new(source.clone(), premier_league(), FeedConfig::default());
        feed.settled().await;

        assert!(feed.load_more());
        let in_flight = feed.snapshot();
        assert!(in_flight.loading_more);

        assert!(!feed.load_more());
        assert_eq!(feed.snapshot(), in_flight);

        let state = feed.settled().await;
        assert_eq!(state.matches.len(), 10);
        assert_eq!(source.page_requests(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_rejected_while_initial_load_runs() {
        let source = Arc::new(MockSource::demo(day()));
        let mut feed = MatchFeed::new(source.clone(), premier_league(), FeedConfig::default());

        assert!(!feed.load_more());
        feed.settled().await;
        assert_eq!(source.page_requests(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_change_resets_accumulated_matches() {
        let source = Arc::new(MockSource::demo(day()));
        let mut feed = MatchFeed::new(source, premier_league(), FeedConfig::default());
        feed.settled().await;
        feed.load_more();
        feed.settled().await;

        assert!(!feed.set_query(premier_league()));
        assert!(feed.set_query(FeedQuery::default().with_league("4480")));
        let reset = feed.snapshot();
        assert!(reset.loading);
        assert!(reset.matches.is_empty());
        assert_eq!(reset.offset, 0);

        let state = feed.settled().await;
        assert_eq!(ids(&state), ["m-1", "m-3", "m-5", "m-7", "m-9"]);
        assert_eq!(state.offset, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_change_during_load_more_discards_old_page() {
        let source = Arc::new(MockSource::demo(day()));
        let mut feed = MatchFeed::new(source, premier_league(), FeedConfig::default());
        feed.settled().await;

        assert!(feed.load_more());
        feed.set_query(FeedQuery::default().with_league("4480"));
        tokio::time::sleep(Duration::from_secs(5)).await;

        let state = feed.snapshot();
        assert!(state.matches.iter().all(|m| m.league_id == "4480"));
        assert_eq!(state.matches.len(), 5);
        assert!(!state.is_busy());
    }

    #[tokio::test]
    async fn test_superseded_response_never_mutates_state() {
        let source = Arc::new(GatedSource::default());
        let mut feed = MatchFeed::new(source.clone(), premier_league(), FeedConfig::default());
        source.wait_pending(1).await;

        feed.set_query(FeedQuery::default().with_league("4480"));
        source.wait_pending(2).await;

        let stale = Page::from_filtered(vec![fixture("stale", "Premier League", "NS")], 0, 5);
        source.resolve(0, Ok(stale));
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let state = feed.snapshot();
        assert!(state.loading);
        assert!(state.matches.is_empty());
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_current_response_after_supersede() {
        let source = Arc::new(GatedSource::default());
        let mut feed = MatchFeed::new(source.clone(), premier_league(), FeedConfig::default());
        source.wait_pending(1).await;
        feed.refetch();
        source.wait_pending(2).await;

        let fresh = Page::from_filtered(vec![fixture("fresh", "Premier League", "NS")], 0, 5);
        source.resolve(1, Ok(fresh));

        let state = feed.settled().await;
        assert_eq!(ids(&state), ["fresh"]);
        assert!(!state.has_more);
    }

    #[tokio::test]
    async fn test_cancelled_error_from_source_resets_flags_silently() {
        let source = Arc::new(GatedSource::default());
        let feed = MatchFeed::new(source.clone(), premier_league(), FeedConfig::default());
        source.wait_pending(1).await;

        source.resolve(0, Err(FeedError::Cancelled));
        let state = feed.settled().await;
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert!(state.matches.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_sets_error_and_refetch_recovers() {
        let source = Arc::new(MockSource::demo(day()));
        source.fail_pages(1);
        let mut feed = MatchFeed::new(source, premier_league(), FeedConfig::default());

        let failed = feed.settled().await;
        assert_eq!(failed.error.as_deref(), Some(LOAD_ERROR));
        assert!(failed.matches.is_empty());
        assert!(!failed.loading);

        feed.refetch();
        let state = feed.settled().await;
        assert_eq!(state.error, None);
        assert_eq!(state.matches.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_load_more_keeps_matches() {
        let source = Arc::new(MockSource::demo(day()));
        let mut feed = MatchFeed::new(source.clone(), premier_league(), FeedConfig::default());
        feed.settled().await;

        source.fail_pages(1);
        assert!(feed.load_more());
        let failed = feed.settled().await;
        assert!(failed.error.is_some());
        assert_eq!(failed.matches.len(), 5);
        assert_eq!(failed.offset, 5);
        assert!(failed.has_more);

        assert!(feed.load_more());
        let state = feed.settled().await;
        assert_eq!(state.error, None);
        assert_eq!(state.matches.len(), 10);
    }

    #[tokio::test]
    async fn test_cancel_preempts_pending_request() {
        let source = Arc::new(SilentSource);
        let mut feed = MatchFeed::new(source.clone(), premier_league(), FeedConfig::default());
        tokio::task::yield_now().await;
        assert_eq!(Arc::strong_count(&source), 3);

        feed.cancel();
        wait_released(&source, 2).await;
        assert!(!feed.snapshot().is_busy());
        assert_eq!(feed.snapshot().error, None);
    }

    #[tokio::test]
    async fn test_drop_cancels_in_flight_request() {
        let source = Arc::new(SilentSource);
        let feed = MatchFeed::new(source.clone(), premier_league(), FeedConfig::default());
        tokio::task::yield_now().await;

        drop(feed);
        wait_released(&source, 1).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_size_from_config() {
        let source = Arc::new(MockSource::demo(day()));
        let feed = MatchFeed::new(
            source,
            FeedQuery::default(),
            FeedConfig::default().with_page_size(25),
        );

        let state = feed.settled().await;
        assert_eq!(state.matches.len(), 25);
        assert_eq!(state.offset, 25);
        assert!(state.has_more);
    }
}

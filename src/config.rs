use serde::{Deserialize, Serialize};

/// Number of fixtures requested per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Tunables for a [`MatchFeed`](crate::MatchFeed).
///
/// ```
/// use matchfeed::FeedConfig;
///
/// let config = FeedConfig::default().with_page_size(20);
/// assert_eq!(config.page_size(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    page_size: usize,
}

impl FeedConfig {
    /// Set the page size. Zero is clamped to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

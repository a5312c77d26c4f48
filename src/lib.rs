//! Paged, cancellable loading of football fixtures for match dashboards.
//!
//! A [`MatchFeed`] pages through the fixtures matching a [`FeedQuery`], a
//! [`MatchDetailLoader`] loads one fixture's details and timeline, and the
//! [`status`], [`grouping`], [`timeline`] and [`dashboard`] modules derive
//! what a dashboard shows from the loaded data.

pub use config::FeedConfig;
pub use detail::{DetailState, MatchDetailLoader, NOT_FOUND_ERROR};
pub use error::{FeedError, Result};
pub use favorites::FavoritesStore;
pub use feed::{FeedState, MatchFeed};
pub use model::*;
pub use source::{MatchCache, MatchDetailSource, MatchSource, MockSource, Page};

pub mod config;
pub mod dashboard;
mod detail;
mod error;
mod favorites;
pub mod feed;
pub mod grouping;
mod model;
pub mod source;
pub mod status;
pub mod timeline;

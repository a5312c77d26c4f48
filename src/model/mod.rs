mod common;
mod event;
mod match_detail;
pub(crate) mod matchlist;
mod query;

pub use common::*;
pub use event::*;
pub use match_detail::*;
pub use matchlist::*;
pub use query::*;

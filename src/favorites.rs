use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::error::{FeedError, Result};

/// Favorite fixture ids, persisted as a JSON array and rewritten on every
/// toggle.
///
/// Independent of the feed and the detail loader; consumers combine the two
/// through [`dashboard::apply_tab`](crate::dashboard::apply_tab).
#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    ids: watch::Sender<BTreeSet<String>>,
}

impl FavoritesStore {
    /// Read the store at `path`. A missing or empty file is an empty store.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let ids = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeSet::new(),
            Ok(raw) => serde_json::from_str::<Vec<String>>(&raw)?
                .into_iter()
                .collect(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeSet::new(),
            Err(source) => return Err(FeedError::Io { path, source }),
        };
        debug!(count = ids.len(), "loaded favorites");

        let (ids, _) = watch::channel(ids);
        Ok(Self { path, ids })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, match_id: &str) -> bool {
        self.ids.borrow().contains(match_id)
    }

    pub fn ids(&self) -> BTreeSet<String> {
        self.ids.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.ids.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.borrow().is_empty()
    }

    /// Flip membership of `match_id` and persist. Returns whether it is a
    /// favorite afterwards. Nothing changes when the write fails.
    pub fn toggle(&mut self, match_id: &str) -> Result<bool> {
        let mut next = self.ids();
        let favorite = if next.remove(match_id) {
            false
        } else {
            next.insert(match_id.to_string());
            true
        };

        self.persist(&next)?;
        self.ids.send_replace(next);
        debug!(match_id, favorite, "toggled favorite");
        Ok(favorite)
    }

    /// Notified after every successful toggle.
    pub fn subscribe(&self) -> watch::Receiver<BTreeSet<String>> {
        self.ids.subscribe()
    }

    fn persist(&self, ids: &BTreeSet<String>) -> Result<()> {
        let io_err = |source| FeedError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string(ids)?;
        std::fs::write(&self.path, body).map_err(io_err)
    }
}

use crate::errors::PoolError;
use crate::pool::CursorPool;
use crate::pool::options::PoolOptions;
use dashmap::DashMap;
use error_stack::ResultExt;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;
use trackpool_nub::common::errors::TrackError;
use trackpool_nub::common::id::TrackId;
use trackpool_nub::track::{Track, TrackHandle};

/// One lazily created [`CursorPool`] per track. Entries live as long as the registry.
pub struct PoolRegistry<T: Track> {
  pools: DashMap<TrackId, Arc<CursorPool<T>>>,
  options: PoolOptions,
}

impl<T: Track> Default for PoolRegistry<T> {
  fn default() -> Self {
    PoolRegistry::new()
  }
}

impl<T: Track> Debug for PoolRegistry<T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PoolRegistry")
      .field("options", &self.options)
      .field("tracks", &self.track_ids())
      .finish()
  }
}

impl<T: Track> PoolRegistry<T> {
  pub fn new() -> PoolRegistry<T> {
    PoolRegistry::with_options(PoolOptions::default())
  }

  /// Every pool the registry creates is built with `options`.
  pub fn with_options(options: PoolOptions) -> PoolRegistry<T> {
    PoolRegistry {
      pools: DashMap::new(),
      options,
    }
  }

  #[inline]
  pub fn options(&self) -> PoolOptions {
    self.options
  }

  /// Returns the pool for `track_id`, opening the track with `factory` on first use. The factory is
  /// not called when the pool exists. A failed factory stores nothing.
  pub fn pool_for<F>(
    &self, track_id: &TrackId, factory: F,
  ) -> crate::Result<Arc<CursorPool<T>>, PoolError>
  where
    F: FnOnce() -> trackpool_nub::Result<T, TrackError>,
  {
    if let Some(pool) = self.pools.get(track_id) {
      return Ok(pool.value().clone());
    }
    let entry = self
      .pools
      .entry(track_id.clone())
      .or_try_insert_with(|| {
        let track = factory().change_context_lazy(|| PoolError::Open(track_id.clone()))?;
        debug!(track = %track_id, "registering cursor pool");
        CursorPool::with_options(TrackHandle::new(track_id.clone(), track), self.options)
          .map(Arc::new)
      })?;
    Ok(entry.value().clone())
  }

  pub fn get(&self, track_id: &TrackId) -> Option<Arc<CursorPool<T>>> {
    self.pools.get(track_id).map(|pool| pool.value().clone())
  }

  pub fn len(&self) -> usize {
    self.pools.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pools.is_empty()
  }

  pub fn track_ids(&self) -> Vec<TrackId> {
    let mut ids: Vec<TrackId> = self.pools.iter().map(|entry| entry.key().clone()).collect();
    ids.sort();
    ids
  }
}

use crate::common::errors::{CursorError, TrackError};
use crate::common::id::TrackId;
use error_stack::ResultExt;
use std::fmt::Debug;
use std::sync;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

pub mod memory;

/// Records sharing one coordinate.
pub trait RecordGroup {
  type Position;
  type Record;

  fn position(&self) -> &Self::Position;

  fn records(&self) -> &[Self::Record];

  #[inline]
  fn len(&self) -> usize {
    self.records().len()
  }

  #[inline]
  fn is_empty(&self) -> bool {
    self.records().is_empty()
  }
}

/// A forward-only reader over one track.
///
/// `Ok(None)` from either read operation is end-of-data and marks the cursor exhausted. It is not an
/// error. The position only ever moves forward.
pub trait OrderedCursor: Send {
  type Position: Ord + Copy + Debug + Send + Sync + 'static;
  type Group: RecordGroup<Position = Self::Position>;

  /// Last position records were yielded for. `None` while unstarted.
  fn position(&self) -> Option<Self::Position>;

  fn is_exhausted(&self) -> bool;

  /// Reads the group immediately after the current position.
  fn advance(&mut self) -> crate::Result<Option<Self::Group>, CursorError>;

  /// Reads the first group at or after `target`. Seeking to exactly the current position yields the
  /// current group again. A `target` before the current position is a
  /// [`CursorError::BackwardSeek`].
  fn seek_forward(
    &mut self, target: &Self::Position,
  ) -> crate::Result<Option<Self::Group>, CursorError>;
}

pub trait Track: Send + Sync {
  type Cursor: OrderedCursor;

  /// Opens a fresh, unstarted cursor. Expected to be expensive.
  fn open_cursor(&self) -> crate::Result<Self::Cursor, TrackError>;
}

pub type TrackPosition<T> = <<T as Track>::Cursor as OrderedCursor>::Position;
pub type TrackGroup<T> = <<T as Track>::Cursor as OrderedCursor>::Group;

struct InnerTrackHandle<T> {
  id: TrackId,
  track: T,
  opened: AtomicUsize,
}

/// Immutable shared reference to an opened track. Every clone points at the same track.
pub struct TrackHandle<T> {
  inner: sync::Arc<InnerTrackHandle<T>>,
}

impl<T> Clone for TrackHandle<T> {
  fn clone(&self) -> Self {
    TrackHandle {
      inner: self.inner.clone(),
    }
  }
}

impl<T> Debug for TrackHandle<T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("TrackHandle")
      .field("id", &self.inner.id)
      .field("opened", &self.cursors_opened())
      .finish()
  }
}

impl<T> TrackHandle<T> {
  pub fn new(id: impl Into<TrackId>, track: T) -> TrackHandle<T> {
    let inner = InnerTrackHandle {
      id: id.into(),
      track,
      opened: AtomicUsize::new(0),
    };
    TrackHandle {
      inner: sync::Arc::new(inner),
    }
  }

  #[inline]
  pub fn id(&self) -> &TrackId {
    &self.inner.id
  }

  #[inline]
  pub fn track(&self) -> &T {
    &self.inner.track
  }

  /// Number of cursors ever opened through this handle.
  #[inline]
  pub fn cursors_opened(&self) -> usize {
    self.inner.opened.load(Ordering::Acquire)
  }

  pub fn ptr_eq(&self, other: &TrackHandle<T>) -> bool {
    sync::Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl<T> TrackHandle<T>
where
  T: Track,
{
  pub fn new_cursor(&self) -> crate::Result<T::Cursor, TrackError> {
    let cursor = self
      .inner
      .track
      .open_cursor()
      .attach_printable_lazy(|| format!("track handle `{}`", self.inner.id))?;
    let opened = self.inner.opened.fetch_add(1, Ordering::AcqRel) + 1;
    debug!(track = %self.inner.id, opened, "opened track cursor");
    Ok(cursor)
  }
}

use crate::errors::PoolError;
use crate::pool::options::{PoolOptions, TieBreak};
use delegate::delegate;
use error_stack::{Report, ResultExt};
use getset::CopyGetters;
use hashbrown::HashSet;
use parking_lot::Mutex;
use std::cmp::Reverse;
use std::fmt::Debug;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};
use trackpool_nub::common::errors::CursorError;
use trackpool_nub::common::id::{CursorId, PoolId, RsrcId};
use trackpool_nub::common::segment::SegmentRequest;
use trackpool_nub::track::{OrderedCursor, Track, TrackGroup, TrackHandle, TrackPosition};

pub mod options;

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(0);

enum Slot<C> {
  Idle(C),
  // the cursor lives in a PooledCursor
  Busy,
}

struct PoolState<C> {
  slots: Vec<Slot<C>>,
  idle: HashSet<CursorId>,
  busy: HashSet<CursorId>,
  reused: u64,
}

impl<C> PoolState<C>
where
  C: OrderedCursor,
{
  fn new() -> PoolState<C> {
    PoolState {
      slots: vec![],
      idle: HashSet::new(),
      busy: HashSet::new(),
      reused: 0,
    }
  }

  fn select(&self, request: &SegmentRequest<C::Position>, tie_break: TieBreak) -> Option<CursorId> {
    let candidates = self
      .idle
      .iter()
      .filter_map(|id| match &self.slots[id.index()] {
        Slot::Idle(cursor) => Some((*id, cursor.position())),
        Slot::Busy => None,
      })
      .filter(|(_, position)| request.accepts(position.as_ref()));
    match tie_break {
      // None orders below every Some, so unstarted cursors only win when nothing else qualifies
      TieBreak::NearestPreceding => candidates
        .max_by_key(|(id, position)| (*position, Reverse(*id)))
        .map(|(id, _)| id),
      TieBreak::FirstFit => candidates.min_by_key(|(id, _)| *id).map(|(id, _)| id),
    }
  }

  fn checkout_idle(
    &mut self, request: &SegmentRequest<C::Position>, tie_break: TieBreak,
  ) -> Option<(CursorId, C)> {
    let id = self.select(request, tie_break)?;
    // select only yields ids whose slot holds an idle cursor
    let Slot::Idle(cursor) = mem::replace(&mut self.slots[id.index()], Slot::Busy) else {
      unreachable!("idle set holds checked out {id}");
    };
    self.idle.remove(&id);
    self.busy.insert(id);
    self.reused += 1;
    Some((id, cursor))
  }

  fn push(&mut self, slot: Slot<C>) -> CursorId {
    let id = CursorId::of(self.slots.len() as u64);
    match slot {
      Slot::Idle(_) => self.idle.insert(id),
      Slot::Busy => self.busy.insert(id),
    };
    self.slots.push(slot);
    id
  }

  fn restore(&mut self, id: CursorId, cursor: C) -> bool {
    if !self.busy.remove(&id) {
      return false;
    }
    self.slots[id.index()] = Slot::Idle(cursor);
    self.idle.insert(id);
    true
  }

  fn stats(&self) -> PoolStats {
    debug_assert!(self.idle.is_disjoint(&self.busy));
    debug_assert_eq!(self.slots.len(), self.idle.len() + self.busy.len());
    PoolStats {
      size: self.slots.len(),
      available: self.idle.len(),
      reused: self.reused,
    }
  }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct PoolStats {
  /// Every cursor the pool has created, idle or checked out. Cursors are never discarded.
  size: usize,
  /// Idle cursors.
  available: usize,
  /// Checkouts served by an idle cursor.
  reused: u64,
}

/// Recycles forward-only cursors over one track.
///
/// A checkout reuses an idle cursor whose position is at or before the request's target and only
/// opens a new one when none qualifies. The lock covers selection and bookkeeping. Opening a cursor
/// and every read on a checked-out cursor happen outside it.
pub struct CursorPool<T: Track> {
  id: PoolId,
  track: TrackHandle<T>,
  options: PoolOptions,
  state: Mutex<PoolState<T::Cursor>>,
}

impl<T: Track> Debug for CursorPool<T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("CursorPool")
      .field("id", &self.id)
      .field("track", &self.track)
      .field("options", &self.options)
      .field("stats", &self.stats())
      .finish()
  }
}

impl<T: Track> CursorPool<T> {
  pub fn new(track: TrackHandle<T>) -> CursorPool<T> {
    let id = PoolId::of(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed));
    debug!(pool = %id, track = %track.id(), "created cursor pool");
    CursorPool {
      id,
      track,
      options: PoolOptions::default(),
      state: Mutex::new(PoolState::new()),
    }
  }

  pub fn with_options(
    track: TrackHandle<T>, options: PoolOptions,
  ) -> crate::Result<CursorPool<T>, PoolError> {
    let mut pool = CursorPool::new(track);
    pool.options = options;
    for _ in 0..options.prime() {
      let cursor = pool.open()?;
      pool.state.get_mut().push(Slot::Idle(cursor));
    }
    Ok(pool)
  }

  #[inline]
  pub fn id(&self) -> PoolId {
    self.id
  }

  #[inline]
  pub fn track(&self) -> &TrackHandle<T> {
    &self.track
  }

  #[inline]
  pub fn options(&self) -> PoolOptions {
    self.options
  }

  fn open(&self) -> crate::Result<T::Cursor, PoolError> {
    self
      .track
      .new_cursor()
      .change_context_lazy(|| PoolError::Open(self.track.id().clone()))
  }

  /// Hands out a cursor positioned at or before the request's target, or an unstarted one. The
  /// caller owns it until [`CursorPool::release`].
  pub fn checkout(
    &self, request: &SegmentRequest<TrackPosition<T>>,
  ) -> crate::Result<PooledCursor<T>, PoolError> {
    let reused = self
      .state
      .lock()
      .checkout_idle(request, self.options.tie_break());
    if let Some((id, cursor)) = reused {
      trace!(
        pool = %self.id, cursor = %id, position = ?cursor.position(), target = ?request.target(),
        "reusing idle cursor"
      );
      return Ok(PooledCursor {
        pool: self.id,
        id,
        cursor,
      });
    }

    let cursor = self.open()?;
    let id = self.state.lock().push(Slot::Busy);
    debug!(pool = %self.id, cursor = %id, target = ?request.target(), "created cursor");
    Ok(PooledCursor {
      pool: self.id,
      id,
      cursor,
    })
  }

  /// Returns a cursor to the idle set exactly where its holder left it.
  pub fn release(&self, cursor: PooledCursor<T>) -> crate::Result<(), PoolError> {
    let PooledCursor { pool, id, cursor } = cursor;
    if pool != self.id {
      return Err(
        Report::new(PoolError::ForeignCursor(id, pool))
          .attach_printable(format!("released into `{}`", self.id)),
      );
    }
    let position = cursor.position();
    if !self.state.lock().restore(id, cursor) {
      return Err(Report::new(PoolError::NotCheckedOut(id)));
    }
    trace!(pool = %self.id, cursor = %id, position = ?position, "released cursor");
    Ok(())
  }

  /// Idle plus checked-out cursors.
  pub fn size(&self) -> usize {
    self.state.lock().slots.len()
  }

  /// Idle cursors.
  pub fn available_count(&self) -> usize {
    self.state.lock().idle.len()
  }

  pub fn stats(&self) -> PoolStats {
    self.state.lock().stats()
  }
}

/// A cursor checked out of a [`CursorPool`]. Hand it back with [`CursorPool::release`]; dropping it
/// instead leaves its slot checked out for good.
pub struct PooledCursor<T: Track> {
  pool: PoolId,
  id: CursorId,
  cursor: T::Cursor,
}

impl<T: Track> PooledCursor<T> {
  #[inline]
  pub fn id(&self) -> CursorId {
    self.id
  }

  #[inline]
  pub fn pool_id(&self) -> PoolId {
    self.pool
  }
}

impl<T: Track> Debug for PooledCursor<T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PooledCursor")
      .field("pool", &self.pool)
      .field("id", &self.id)
      .field("position", &self.cursor.position())
      .field("exhausted", &self.cursor.is_exhausted())
      .finish()
  }
}

impl<T: Track> OrderedCursor for PooledCursor<T> {
  type Position = TrackPosition<T>;
  type Group = TrackGroup<T>;

  delegate! {
    to self.cursor {
      fn position(&self) -> Option<Self::Position>;
      fn is_exhausted(&self) -> bool;
      fn advance(&mut self) -> trackpool_nub::Result<Option<Self::Group>, CursorError>;
      fn seek_forward(
        &mut self, target: &Self::Position,
      ) -> trackpool_nub::Result<Option<Self::Group>, CursorError>;
    }
  }
}

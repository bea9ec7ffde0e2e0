use trackpool_nub::common::id::{CursorId, PoolId, TrackId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
  #[error("OpenError: unable to open a cursor on track `{0}`.")]
  Open(TrackId),
  #[error("ReleaseError: `{0}` belongs to `{1}`.")]
  ForeignCursor(CursorId, PoolId),
  #[error("ReleaseError: `{0}` is not checked out.")]
  NotCheckedOut(CursorId),
}

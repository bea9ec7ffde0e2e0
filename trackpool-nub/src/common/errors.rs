use crate::common::id::TrackId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CursorError {
  #[error("BackwardSeek: cursor at `{current}` cannot seek back to `{target}`.")]
  BackwardSeek { current: String, target: String },
  #[error("ReadError: unable to read the next record group.")]
  ReadError,
}

#[derive(Debug, Error)]
pub enum TrackError {
  #[error("OpenError: unable to open a cursor on track `{0}`.")]
  OpenError(TrackId),
}

#[derive(Debug, Error)]
pub enum LocusError {
  #[error("InvertedInterval: interval start `{start}` is after end `{end}`.")]
  InvertedInterval { start: String, end: String },
}

use crate::common::errors::{CursorError, TrackError};
use crate::track::{OrderedCursor, RecordGroup, Track};
use error_stack::Report;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryGroup<P, R> {
  position: P,
  records: SmallVec<[R; 1]>,
}

impl<P, R> RecordGroup for MemoryGroup<P, R> {
  type Position = P;
  type Record = R;

  #[inline]
  fn position(&self) -> &P {
    &self.position
  }

  #[inline]
  fn records(&self) -> &[R] {
    &self.records
  }
}

/// A sorted track held in memory. Cursors share the group storage.
#[derive(Debug, Clone)]
pub struct MemoryTrack<P, R> {
  groups: triomphe::Arc<Vec<MemoryGroup<P, R>>>,
}

impl<P, R> MemoryTrack<P, R>
where
  P: Ord + Copy,
{
  /// Records are sorted by position. Records at the same position form one group and keep their
  /// input order.
  pub fn from_records<I: IntoIterator<Item = (P, R)>>(records: I) -> MemoryTrack<P, R> {
    let mut records = records.into_iter().collect_vec();
    records.sort_by_key(|(position, _)| *position);
    let chunks = records.into_iter().chunk_by(|(position, _)| *position);
    let groups = chunks
      .into_iter()
      .map(|(position, chunk)| MemoryGroup {
        position,
        records: chunk.map(|(_, record)| record).collect(),
      })
      .collect_vec();
    MemoryTrack {
      groups: triomphe::Arc::new(groups),
    }
  }

  /// Number of record groups.
  pub fn len(&self) -> usize {
    self.groups.len()
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  pub fn groups(&self) -> &[MemoryGroup<P, R>] {
    &self.groups
  }
}

impl<P, R> Track for MemoryTrack<P, R>
where
  P: Ord + Copy + Debug + Send + Sync + 'static,
  R: Clone + Send + Sync,
{
  type Cursor = MemoryCursor<P, R>;

  fn open_cursor(&self) -> crate::Result<Self::Cursor, TrackError> {
    Ok(MemoryCursor {
      groups: self.groups.clone(),
      next: 0,
      position: None,
      exhausted: false,
    })
  }
}

pub struct MemoryCursor<P, R> {
  groups: triomphe::Arc<Vec<MemoryGroup<P, R>>>,
  // index of the group `advance` yields next
  next: usize,
  position: Option<P>,
  exhausted: bool,
}

impl<P, R> Debug for MemoryCursor<P, R>
where
  P: Debug,
{
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("MemoryCursor")
      .field("next", &self.next)
      .field("position", &self.position)
      .field("exhausted", &self.exhausted)
      .finish()
  }
}

impl<P, R> MemoryCursor<P, R>
where
  P: Copy,
  R: Clone,
{
  fn yield_group(&mut self, index: usize) -> Option<MemoryGroup<P, R>> {
    let group = self.groups.get(index)?.clone();
    self.next = index + 1;
    self.position = Some(group.position);
    Some(group)
  }
}

impl<P, R> OrderedCursor for MemoryCursor<P, R>
where
  P: Ord + Copy + Debug + Send + Sync + 'static,
  R: Clone + Send + Sync,
{
  type Position = P;
  type Group = MemoryGroup<P, R>;

  #[inline]
  fn position(&self) -> Option<P> {
    self.position
  }

  #[inline]
  fn is_exhausted(&self) -> bool {
    self.exhausted
  }

  fn advance(&mut self) -> crate::Result<Option<Self::Group>, CursorError> {
    let group = self.yield_group(self.next);
    self.exhausted = group.is_none();
    Ok(group)
  }

  fn seek_forward(&mut self, target: &P) -> crate::Result<Option<Self::Group>, CursorError> {
    if let Some(current) = self.position {
      if *target < current {
        return Err(Report::new(CursorError::BackwardSeek {
          current: format!("{current:?}"),
          target: format!("{target:?}"),
        }));
      }
    }
    // Start at the last yielded group so a seek to the current position re-reads it.
    let start = self.next.saturating_sub(1);
    let index = start + self.groups[start..].partition_point(|group| group.position < *target);
    match self.yield_group(index) {
      Some(group) => {
        self.exhausted = false;
        Ok(Some(group))
      }
      None => {
        // Nothing at or after target. Park at target so the skipped range is never reported
        // as empty to a later reuse.
        self.next = self.groups.len();
        self.position = Some(*target);
        self.exhausted = true;
        Ok(None)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::common::locus::Locus;
  use fake::Fake;

  fn table() -> MemoryTrack<Locus, [&'static str; 3]> {
    MemoryTrack::from_records([
      (Locus::new(0, 30), ["F", "G", "H"]),
      (Locus::new(0, 10), ["A", "B", "C"]),
      (Locus::new(0, 20), ["C", "D", "E"]),
    ])
  }

  #[test]
  fn groups_are_sorted_and_merged() {
    let track = MemoryTrack::from_records([(2u64, 'b'), (1, 'a'), (2, 'c'), (5, 'd')]);
    assert_eq!(track.len(), 3);
    let group = &track.groups()[1];
    assert_eq!(group.position(), &2);
    assert_eq!(group.records(), &['b', 'c']);
    assert_eq!(group.len(), 2);
  }

  #[test]
  fn advance_walks_every_group_then_exhausts() {
    let mut cursor = table().open_cursor().unwrap();
    assert_eq!(cursor.position(), None);
    let group = cursor.advance().unwrap().unwrap();
    assert_eq!(group.position(), &Locus::new(0, 10));
    assert_eq!(group.records()[0], ["A", "B", "C"]);
    assert_eq!(cursor.advance().unwrap().unwrap().records()[0][0], "C");
    assert_eq!(cursor.advance().unwrap().unwrap().records()[0][0], "F");
    assert!(!cursor.is_exhausted());
    assert!(cursor.advance().unwrap().is_none());
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.position(), Some(Locus::new(0, 30)));
    assert!(cursor.advance().unwrap().is_none());
  }

  #[test]
  fn seek_lands_on_first_group_at_or_after_target() {
    let mut cursor = table().open_cursor().unwrap();
    let group = cursor.seek_forward(&Locus::new(0, 15)).unwrap().unwrap();
    assert_eq!(group.position(), &Locus::new(0, 20));
    assert_eq!(cursor.position(), Some(Locus::new(0, 20)));
    let group = cursor.advance().unwrap().unwrap();
    assert_eq!(group.records()[0], ["F", "G", "H"]);
  }

  #[test]
  fn seek_to_current_position_rereads_the_group() {
    let mut cursor = table().open_cursor().unwrap();
    cursor.advance().unwrap();
    let group = cursor.seek_forward(&Locus::new(0, 10)).unwrap().unwrap();
    assert_eq!(group.position(), &Locus::new(0, 10));
    assert_eq!(cursor.advance().unwrap().unwrap().position(), &Locus::new(0, 20));
  }

  #[test]
  fn backward_seek_is_rejected_without_moving() {
    let mut cursor = table().open_cursor().unwrap();
    cursor.seek_forward(&Locus::new(0, 30)).unwrap();
    let err = cursor.seek_forward(&Locus::new(0, 10)).unwrap_err();
    assert!(matches!(
      err.current_context(),
      CursorError::BackwardSeek { .. }
    ));
    assert_eq!(cursor.position(), Some(Locus::new(0, 30)));
  }

  #[test]
  fn seek_past_the_end_parks_at_target() {
    let mut cursor = table().open_cursor().unwrap();
    cursor.advance().unwrap();
    assert!(cursor.seek_forward(&Locus::new(1, 5)).unwrap().is_none());
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.position(), Some(Locus::new(1, 5)));
  }

  #[test]
  fn empty_track_exhausts_immediately() {
    let mut cursor = MemoryTrack::<u64, u8>::from_records([]).open_cursor().unwrap();
    assert!(cursor.advance().unwrap().is_none());
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.position(), None);
  }

  #[test]
  fn forward_seeks_match_a_linear_scan() {
    let positions: Vec<u64> = (0..64).map(|_| (0..500u64).fake::<u64>()).collect();
    let track = MemoryTrack::from_records(positions.iter().map(|p| (*p, *p)));
    let mut targets: Vec<u64> = (0..32).map(|_| (0..520u64).fake::<u64>()).collect();
    targets.sort();

    let mut cursor = track.open_cursor().unwrap();
    for target in targets {
      // a previous seek may have landed past this target
      if cursor.position().is_some_and(|position| target < position) {
        continue;
      }
      let expected = track
        .groups()
        .iter()
        .find(|group| group.position >= target)
        .map(|group| group.position);
      let found = cursor.seek_forward(&target).unwrap();
      assert_eq!(found.map(|group| group.position), expected);
    }
  }
}

use crate::common::errors::LocusError;
use crate::common::locus::Interval;
use std::fmt::Debug;

/// Where a consumer wants a cursor positioned at or before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentRequest<P> {
  At(P),
  Span(Interval<P>),
  /// The whole track from its first record group.
  EntireStream,
}

impl<P> SegmentRequest<P>
where
  P: Ord + Debug,
{
  pub fn at(target: P) -> SegmentRequest<P> {
    SegmentRequest::At(target)
  }

  pub fn span(start: P, end: P) -> crate::Result<SegmentRequest<P>, LocusError> {
    Interval::new(start, end).map(SegmentRequest::Span)
  }

  /// `None` for [`SegmentRequest::EntireStream`].
  pub fn target(&self) -> Option<&P> {
    match self {
      SegmentRequest::At(target) => Some(target),
      SegmentRequest::Span(interval) => Some(interval.start()),
      SegmentRequest::EntireStream => None,
    }
  }

  /// Whether a cursor last positioned at `position` can serve this request with forward seeks only.
  /// An unstarted cursor (`None`) serves anything.
  pub fn accepts(&self, position: Option<&P>) -> bool {
    match (position, self.target()) {
      (None, _) => true,
      (Some(position), Some(target)) => position <= target,
      (Some(_), None) => false,
    }
  }
}

use crate::common::errors::LocusError;
use error_stack::Report;
use getset::CopyGetters;
use std::fmt::{Debug, Display, Formatter};

#[derive(Default, Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash)]
pub struct ContigId(pub u32);

impl Display for ContigId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "contig{}", self.0)
  }
}

/// A single coordinate. Ordered by contig index, then by position within the contig.
#[derive(Default, Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Locus {
  contig: ContigId,
  position: u64,
}

impl Locus {
  pub fn new(contig: u32, position: u64) -> Locus {
    Locus {
      contig: ContigId(contig),
      position,
    }
  }

  #[inline]
  pub fn is_before(&self, other: &Locus) -> bool {
    self < other
  }
}

impl Display for Locus {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}", self.contig, self.position)
  }
}

/// Inclusive on both ends.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Interval<P> {
  start: P,
  end: P,
}

impl<P> Interval<P>
where
  P: Ord + Debug,
{
  pub fn new(start: P, end: P) -> crate::Result<Interval<P>, LocusError> {
    if start > end {
      return Err(Report::new(LocusError::InvertedInterval {
        start: format!("{start:?}"),
        end: format!("{end:?}"),
      }));
    }
    Ok(Interval { start, end })
  }

  #[inline]
  pub fn start(&self) -> &P {
    &self.start
  }

  #[inline]
  pub fn end(&self) -> &P {
    &self.end
  }

  pub fn contains(&self, position: &P) -> bool {
    &self.start <= position && position <= &self.end
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn loci_order_by_contig_first() {
    let chr_m_30 = Locus::new(0, 30);
    let chr_1_10 = Locus::new(1, 10);
    assert!(chr_m_30.is_before(&chr_1_10));
    assert!(Locus::new(0, 10) < Locus::new(0, 20));
    assert_eq!(Locus::new(0, 20).to_string(), "contig0:20");
  }

  #[test]
  fn interval_rejects_inverted_bounds() {
    let err = Interval::new(Locus::new(0, 30), Locus::new(0, 10)).unwrap_err();
    assert!(matches!(
      err.current_context(),
      LocusError::InvertedInterval { .. }
    ));
  }

  #[test]
  fn interval_is_inclusive() {
    let interval = Interval::new(10u64, 20).unwrap();
    assert!(interval.contains(&10));
    assert!(interval.contains(&20));
    assert!(!interval.contains(&21));
    assert_eq!(interval.start(), &10);
  }
}

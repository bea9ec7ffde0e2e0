use bon::Builder;
use getset::CopyGetters;

/// How checkout chooses among several compatible idle cursors.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TieBreak {
  /// The idle cursor closest to the target from below. Unstarted cursors rank last.
  #[default]
  NearestPreceding,
  /// The compatible idle cursor with the lowest id.
  FirstFit,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Builder, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct PoolOptions {
  #[builder(default)]
  tie_break: TieBreak,
  /// Unstarted cursors opened when the pool is built.
  #[builder(default)]
  prime: usize,
}

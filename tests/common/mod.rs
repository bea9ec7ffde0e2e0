use tracing_subscriber::EnvFilter;
use trackpool::nub::common::locus::Locus;
use trackpool::nub::track::memory::MemoryTrack;

pub type Row = [&'static str; 3];
pub type Table = MemoryTrack<Locus, Row>;

pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

pub fn site(position: u64) -> Locus {
  Locus::new(0, position)
}

/// One row every ten bases on contig 0, then a second contig.
pub fn table(rows: u64) -> Table {
  let contig0 = (1..=rows).map(|n| (site(n * 10), ["A", "B", "C"]));
  let contig1 = (1..=rows).map(|n| (Locus::new(1, n * 10), ["X", "Y", "Z"]));
  MemoryTrack::from_records(contig0.chain(contig1))
}

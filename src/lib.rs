pub use error_stack::{Result, ResultExt};
pub use trackpool_nub as nub;

pub mod errors;
pub mod pool;
pub mod registry;

pub use pool::options::{PoolOptions, TieBreak};
pub use pool::{CursorPool, PoolStats, PooledCursor};
pub use registry::PoolRegistry;

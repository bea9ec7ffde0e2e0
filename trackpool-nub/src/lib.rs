pub use error_stack::{Result, ResultExt};

pub mod common;
pub mod track;

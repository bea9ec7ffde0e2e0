pub mod errors;
pub mod id;
pub mod locus;
pub mod segment;

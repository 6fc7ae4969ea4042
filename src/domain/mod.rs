pub mod indicators;
pub mod types;

pub use types::*;

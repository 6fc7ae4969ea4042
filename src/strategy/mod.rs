pub mod features;
pub mod patterns;

pub use features::*;
pub use patterns::*;

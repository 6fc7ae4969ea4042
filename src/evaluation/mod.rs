pub mod metrics;
pub mod scorer;

pub use metrics::*;
pub use scorer::*;

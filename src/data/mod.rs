pub mod csv_store;
pub mod history;

pub use csv_store::*;
pub use history::*;

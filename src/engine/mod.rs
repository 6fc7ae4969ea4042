pub mod adaptive;
pub mod session;
pub mod strategy;

pub use adaptive::*;
pub use session::*;
pub use strategy::*;

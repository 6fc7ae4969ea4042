use crate::domain::indicators::{contains_sequence, count, ends_with, is_strictly_alternating, tail};
use crate::domain::Candle::{Green as G, Red as R, Volatile as V};
use crate::domain::Window;

/// Length of the "recent" slice used for volatility counting.
pub const RECENT_LEN: usize = 5;

/// Everything the pattern rules look at, extracted once per window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowFeatures {
    pub green_count: usize,
    pub red_count: usize,
    /// Volatile candles among the last `RECENT_LEN`.
    pub recent_volatile: usize,
    pub ends_green_pair: bool,
    pub ends_red_pair: bool,
    pub volatile_to_green: bool,
    pub volatile_to_red: bool,
    pub green_triple: bool,
    pub red_triple: bool,
    pub alternating: bool,
}

impl WindowFeatures {
    pub fn extract(window: &Window) -> Self {
        let c = window.candles();
        Self {
            green_count: count(c, G),
            red_count: count(c, R),
            recent_volatile: count(tail(c, RECENT_LEN), V),
            ends_green_pair: ends_with(c, &[G, G]),
            ends_red_pair: ends_with(c, &[R, R]),
            volatile_to_green: contains_sequence(c, &[V, G]),
            volatile_to_red: contains_sequence(c, &[V, R]),
            green_triple: contains_sequence(c, &[G, G, G]),
            red_triple: contains_sequence(c, &[R, R, R]),
            alternating: is_strictly_alternating(c),
        }
    }
}

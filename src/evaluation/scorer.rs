use crate::domain::{Candle, Label};

/// A joined row is correct when the label calls the color that appeared.
/// "Likely" labels count as calls for their color. "No Clear Edge" calls
/// nothing, so it always scores as a miss; a volatile candle is never a hit.
pub fn is_correct(label: Label, actual: Candle) -> bool {
    label.direction() == Some(actual)
}

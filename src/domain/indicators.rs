use super::types::Candle;

/// Number of occurrences of `target` in `candles`.
pub fn count(candles: &[Candle], target: Candle) -> usize {
    candles.iter().filter(|&&c| c == target).count()
}

/// The last `n` candles, or all of them if fewer exist.
pub fn tail(candles: &[Candle], n: usize) -> &[Candle] {
    &candles[candles.len().saturating_sub(n)..]
}

/// Whether `pattern` appears as a contiguous run anywhere in `candles`.
pub fn contains_sequence(candles: &[Candle], pattern: &[Candle]) -> bool {
    if pattern.is_empty() {
        return true;
    }
    candles.windows(pattern.len()).any(|w| w == pattern)
}

/// Whether `candles` ends with exactly `pattern`.
pub fn ends_with(candles: &[Candle], pattern: &[Candle]) -> bool {
    candles.ends_with(pattern)
}

/// Every adjacent pair differs. Fewer than two candles never alternate.
pub fn is_strictly_alternating(candles: &[Candle]) -> bool {
    candles.len() >= 2 && candles.windows(2).all(|w| w[0] != w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Window;

    fn candles(s: &str) -> Vec<Candle> {
        s.chars().filter_map(Candle::from_char).collect()
    }

    #[test]
    fn test_count() {
        let w = Window::parse("RGGGGGGRGG").unwrap();
        assert_eq!(count(w.candles(), Candle::Green), 8);
        assert_eq!(count(w.candles(), Candle::Red), 2);
        assert_eq!(count(w.candles(), Candle::Volatile), 0);
    }

    #[test]
    fn test_tail() {
        let c = candles("GRVGRVGRVG");
        assert_eq!(tail(&c, 2), &candles("VG")[..]);
        assert_eq!(tail(&c, 5), &candles("VGRVG")[..]);
        assert_eq!(tail(&c, 20).len(), 10);
    }

    #[test]
    fn test_contains_sequence() {
        let c = candles("VVVVVGGGGG");
        assert!(contains_sequence(&c, &candles("VG")));
        assert!(contains_sequence(&c, &candles("GGG")));
        assert!(!contains_sequence(&c, &candles("VR")));
        assert!(!contains_sequence(&c, &candles("GV")));
    }

    #[test]
    fn test_contains_sequence_longer_than_input() {
        let c = candles("GG");
        assert!(!contains_sequence(&c, &candles("GGG")));
        assert!(contains_sequence(&c, &[]));
    }

    #[test]
    fn test_ends_with() {
        let c = candles("RRRRRRRRGG");
        assert!(ends_with(&c, &candles("GG")));
        assert!(!ends_with(&c, &candles("RR")));
    }

    #[test]
    fn test_alternating() {
        assert!(is_strictly_alternating(&candles("GRGRGRGRGR")));
        assert!(is_strictly_alternating(&candles("GRVGRVGRVG")));
        assert!(!is_strictly_alternating(&candles("GRGRGRGRGG")));
        assert!(!is_strictly_alternating(&candles("G")));
    }
}

use super::features::WindowFeatures;
use crate::domain::{Label, Window};
use serde::{Deserialize, Serialize};

/// Minimum absolute score difference for a strong call.
pub const STRONG_EDGE: i32 = 3;
/// Color count at which a color is considered dominant.
pub const MAJORITY_COUNT: usize = 6;
/// Volatile candles in the recent slice that add red pressure.
pub const RECENT_VOLATILE_THRESHOLD: usize = 2;

pub const STRONG_CONFIDENCE: u8 = 70;
pub const LEANING_CONFIDENCE: u8 = 60;
pub const NEUTRAL_CONFIDENCE: u8 = 50;

/// Which score a rule contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Green,
    Red,
}

/// Fixed rule set of the static scorer. Every rule is evaluated, none short-circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternRule {
    RecentGreenRun,
    RecentRedRun,
    VolatilityToGreen,
    VolatilityToRed,
    TripleGreenReversal,
    TripleRedReversal,
    FullAlternation,
    GreenMajority,
    RedMajority,
    RecentVolatility,
}

impl PatternRule {
    pub const ALL: [PatternRule; 10] = [
        PatternRule::RecentGreenRun,
        PatternRule::RecentRedRun,
        PatternRule::VolatilityToGreen,
        PatternRule::VolatilityToRed,
        PatternRule::TripleGreenReversal,
        PatternRule::TripleRedReversal,
        PatternRule::FullAlternation,
        PatternRule::GreenMajority,
        PatternRule::RedMajority,
        PatternRule::RecentVolatility,
    ];

    pub fn fires(self, f: &WindowFeatures) -> bool {
        match self {
            PatternRule::RecentGreenRun => f.ends_green_pair,
            PatternRule::RecentRedRun => f.ends_red_pair,
            PatternRule::VolatilityToGreen => f.volatile_to_green,
            PatternRule::VolatilityToRed => f.volatile_to_red,
            PatternRule::TripleGreenReversal => f.green_triple,
            PatternRule::TripleRedReversal => f.red_triple,
            PatternRule::FullAlternation => f.alternating,
            PatternRule::GreenMajority => f.green_count >= MAJORITY_COUNT,
            PatternRule::RedMajority => f.red_count >= MAJORITY_COUNT,
            PatternRule::RecentVolatility => f.recent_volatile >= RECENT_VOLATILE_THRESHOLD,
        }
    }

    /// Side credited and points awarded when the rule fires.
    /// Triple runs are treated as exhaustion and credit the opposite color.
    pub fn effect(self) -> (Side, u32) {
        match self {
            PatternRule::RecentGreenRun => (Side::Green, 2),
            PatternRule::RecentRedRun => (Side::Red, 2),
            PatternRule::VolatilityToGreen => (Side::Green, 2),
            PatternRule::VolatilityToRed => (Side::Red, 2),
            PatternRule::TripleGreenReversal => (Side::Red, 2),
            PatternRule::TripleRedReversal => (Side::Green, 2),
            PatternRule::FullAlternation => (Side::Red, 1),
            PatternRule::GreenMajority => (Side::Green, 2),
            PatternRule::RedMajority => (Side::Red, 2),
            PatternRule::RecentVolatility => (Side::Red, 1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PatternRule::RecentGreenRun => "recent-green-run",
            PatternRule::RecentRedRun => "recent-red-run",
            PatternRule::VolatilityToGreen => "volatility-to-green",
            PatternRule::VolatilityToRed => "volatility-to-red",
            PatternRule::TripleGreenReversal => "triple-green-reversal",
            PatternRule::TripleRedReversal => "triple-red-reversal",
            PatternRule::FullAlternation => "full-alternation",
            PatternRule::GreenMajority => "green-majority",
            PatternRule::RedMajority => "red-majority",
            PatternRule::RecentVolatility => "recent-volatility",
        }
    }
}

/// Ephemeral green/red evidence for one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub green: u32,
    pub red: u32,
    /// Rules that fired, in rule-table order.
    pub fired: Vec<PatternRule>,
}

impl Score {
    pub fn diff(&self) -> i32 {
        self.green as i32 - self.red as i32
    }

    /// Map the score difference to a label and a confidence percentage.
    pub fn decide(&self) -> (Label, u8) {
        let diff = self.diff();
        if diff >= STRONG_EDGE {
            (Label::Green, STRONG_CONFIDENCE)
        } else if diff <= -STRONG_EDGE {
            (Label::Red, STRONG_CONFIDENCE)
        } else if diff > 0 {
            (Label::LikelyGreen, LEANING_CONFIDENCE)
        } else if diff < 0 {
            (Label::LikelyRed, LEANING_CONFIDENCE)
        } else {
            (Label::NoClearEdge, NEUTRAL_CONFIDENCE)
        }
    }
}

/// Evaluate every rule against the window and sum the points.
pub fn score_window(window: &Window) -> Score {
    let features = WindowFeatures::extract(window);
    let mut score = Score {
        green: 0,
        red: 0,
        fired: Vec::new(),
    };

    for rule in PatternRule::ALL {
        if !rule.fires(&features) {
            continue;
        }
        match rule.effect() {
            (Side::Green, pts) => score.green += pts,
            (Side::Red, pts) => score.red += pts,
        }
        score.fired.push(rule);
    }
    score
}

/// Static pattern scorer: pure function of the window.
pub fn score(window: &Window) -> (Label, u8) {
    score_window(window).decide()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn w(s: &str) -> Window {
        Window::parse(s).unwrap()
    }

    fn random_window(rng: &mut StdRng) -> Window {
        let mut s = String::with_capacity(10);
        for _ in 0..10 {
            s.push(['G', 'R', 'V'][rng.gen_range(0..3)]);
        }
        w(&s)
    }

    #[test]
    fn test_long_green_run_leans_green() {
        let s = score_window(&w("RGGGGGGRGG"));
        assert_eq!(s.green, 4);
        assert_eq!(s.red, 2);
        assert_eq!(
            s.fired,
            vec![
                PatternRule::RecentGreenRun,
                PatternRule::TripleGreenReversal,
                PatternRule::GreenMajority,
            ]
        );
        assert_eq!(s.decide(), (Label::LikelyGreen, 60));
    }

    #[test]
    fn test_full_alternation_leans_red() {
        let s = score_window(&w("GRGRGRGRGR"));
        assert_eq!(s.fired, vec![PatternRule::FullAlternation]);
        assert_eq!(s.diff(), -1);
        assert_eq!(score(&w("GRGRGRGRGR")), (Label::LikelyRed, 60));
    }

    #[test]
    fn test_volatile_then_green_run() {
        let s = score_window(&w("VVVVVGGGGG"));
        assert_eq!(s.green, 4);
        assert_eq!(s.red, 2);
        assert!(!s.fired.contains(&PatternRule::GreenMajority));
        assert!(!s.fired.contains(&PatternRule::RecentVolatility));
        assert_eq!(s.decide(), (Label::LikelyGreen, 60));
    }

    #[test]
    fn test_strong_green() {
        // GG tail, VG, GGG, RRR, 6 greens
        let s = score_window(&w("RRRGGVGGGG"));
        assert_eq!(s.green, 8);
        assert_eq!(s.red, 2);
        assert_eq!(s.decide(), (Label::Green, 70));
    }

    #[test]
    fn test_strong_red() {
        // RR tail, VR, two volatiles in the last five
        let s = score_window(&w("GVRVRVRVRR"));
        assert_eq!(s.green, 0);
        assert_eq!(s.red, 5);
        assert_eq!(s.decide(), (Label::Red, 70));
    }

    #[test]
    fn test_balanced_is_no_clear_edge() {
        let s = score_window(&w("GRVGRVGRVG"));
        assert_eq!(s.diff(), 0);
        assert_eq!(s.decide(), (Label::NoClearEdge, 50));
    }

    #[test]
    fn test_all_green_and_all_red() {
        assert_eq!(score(&w("GGGGGGGGGG")), (Label::LikelyGreen, 60));
        assert_eq!(score(&w("RRRRRRRRRR")), (Label::LikelyRed, 60));
    }

    #[test]
    fn test_decision_boundaries() {
        let mk = |green, red| Score { green, red, fired: vec![] };
        assert_eq!(mk(3, 0).decide().0, Label::Green);
        assert_eq!(mk(2, 0).decide().0, Label::LikelyGreen);
        assert_eq!(mk(1, 1).decide().0, Label::NoClearEdge);
        assert_eq!(mk(0, 2).decide().0, Label::LikelyRed);
        assert_eq!(mk(0, 3).decide().0, Label::Red);
    }

    #[test]
    fn test_score_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let window = random_window(&mut rng);
            assert_eq!(score_window(&window), score_window(&window));
        }
    }

    #[test]
    fn test_static_confidence_in_known_set() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let (_, conf) = score(&random_window(&mut rng));
            assert!([50, 60, 70].contains(&conf), "unexpected confidence {}", conf);
        }
    }

    #[test]
    fn test_points_sum_matches_fired_rules() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let s = score_window(&random_window(&mut rng));
            let (mut g, mut r) = (0, 0);
            for rule in &s.fired {
                match rule.effect() {
                    (Side::Green, p) => g += p,
                    (Side::Red, p) => r += p,
                }
            }
            assert_eq!((g, r), (s.green, s.red));
        }
    }

    #[test]
    fn test_rule_names_unique() {
        let names: std::collections::HashSet<_> =
            PatternRule::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(names.len(), PatternRule::ALL.len());
    }
}

use crate::domain::{Label, Window};
use crate::error::Result;
use crate::strategy::patterns::{score_window, Score};
use serde::Serialize;

/// How a prediction was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Basis {
    /// Static pattern rules.
    Rules(Score),
    /// Majority vote over earlier predictions for the identical window.
    /// `tally` lists each label once, in first-seen order.
    MajorityVote {
        matches: usize,
        tally: Vec<(Label, usize)>,
    },
}

/// Engine output: a label plus an integer confidence in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Label,
    pub confidence: u8,
    pub basis: Basis,
}

impl Prediction {
    pub fn from_score(score: Score) -> Self {
        let (label, confidence) = score.decide();
        Self {
            label,
            confidence,
            basis: Basis::Rules(score),
        }
    }
}

/// Anything that turns a validated window into a prediction.
///
/// Validation happens before `predict`; `predict_raw` is the gate for
/// untrusted strings and returns `InvalidInput` instead of a label.
pub trait Predictor {
    fn predict(&self, window: &Window) -> Prediction;

    fn predict_raw(&self, raw: &str) -> Result<Prediction> {
        let window = Window::parse(raw)?;
        Ok(self.predict(&window))
    }
}

/// The static pattern scorer as a `Predictor`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedPredictor;

impl Predictor for RuleBasedPredictor {
    fn predict(&self, window: &Window) -> Prediction {
        Prediction::from_score(score_window(window))
    }
}

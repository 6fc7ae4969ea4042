use super::strategy::{Basis, Prediction, Predictor};
use crate::data::HistoryReader;
use crate::domain::{Label, Window};
use crate::strategy::patterns::score_window;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Earlier predictions for the identical window needed before the
    /// majority vote overrides the static rules.
    pub min_history_matches: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_history_matches: 5,
        }
    }
}

/// Result of a majority vote over recorded labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Vote {
    pub label: Label,
    pub votes: usize,
    pub total: usize,
    /// Each label once, in first-seen order.
    pub tally: Vec<(Label, usize)>,
}

impl Vote {
    /// Winning share as a rounded integer percentage.
    pub fn confidence(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.votes as f64 / self.total as f64 * 100.0).round() as u8
    }
}

/// Most frequent label. Ties go to the label seen first.
/// Returns `None` for an empty input.
pub fn majority_vote(labels: impl IntoIterator<Item = Label>) -> Option<Vote> {
    let mut tally: Vec<(Label, usize)> = Vec::new();
    let mut total = 0usize;

    for label in labels {
        total += 1;
        match tally.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut best: Option<(Label, usize)> = None;
    for &(label, n) in &tally {
        // strict '>' keeps the earliest label on ties
        if best.map_or(true, |(_, b)| n > b) {
            best = Some((label, n));
        }
    }

    best.map(|(label, votes)| Vote {
        label,
        votes,
        total,
        tally,
    })
}

/// Static rules until the exact window has enough history, then a
/// majority vote over what was predicted for it before.
///
/// Reads history only; never appends.
#[derive(Debug, Clone)]
pub struct AdaptivePredictor<H: HistoryReader> {
    history: H,
    pub config: EngineConfig,
}

impl<H: HistoryReader> AdaptivePredictor<H> {
    pub fn new(history: H, config: EngineConfig) -> Self {
        Self { history, config }
    }

    /// Labels previously predicted for `window`, in history order.
    /// Unreadable history counts as no matches.
    fn matching_labels(&self, window: &Window) -> Vec<Label> {
        match self.history.read_all_predictions() {
            Ok(records) => records
                .into_iter()
                .filter(|r| r.window == *window)
                .map(|r| r.label)
                .collect(),
            Err(e) => {
                warn!(error = %e, "prediction history unavailable, using static rules");
                Vec::new()
            }
        }
    }
}

impl<H: HistoryReader> Predictor for AdaptivePredictor<H> {
    fn predict(&self, window: &Window) -> Prediction {
        let labels = self.matching_labels(window);
        let matches = labels.len();

        if matches >= self.config.min_history_matches {
            if let Some(vote) = majority_vote(labels) {
                let confidence = vote.confidence();
                debug!(
                    window = %window,
                    matches,
                    label = %vote.label,
                    confidence,
                    "majority vote"
                );
                return Prediction {
                    label: vote.label,
                    confidence,
                    basis: Basis::MajorityVote {
                        matches,
                        tally: vote.tally,
                    },
                };
            }
        }

        let score = score_window(window);
        debug!(
            window = %window,
            matches,
            green = score.green,
            red = score.red,
            "static rules"
        );
        Prediction::from_score(score)
    }
}

use super::scorer::is_correct;
use crate::data::HistoryReader;
use crate::domain::{Candle, Label, OutcomeRecord, PredictionRecord, Window};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Accuracy of one predicted label over the joined rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelAccuracy {
    pub label: Label,
    pub correct: usize,
    pub total: usize,
    pub accuracy_pct: f64,
}

/// Aggregate accuracy of logged predictions against logged outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyReport {
    /// 100 * correct / total, unrounded. Zero when nothing joined.
    pub accuracy_pct: f64,
    pub correct: usize,
    /// Number of joined (prediction, outcome) rows.
    pub total: usize,
    /// Breakdown by predicted label, labels with no joined rows omitted.
    pub by_label: Vec<LabelAccuracy>,
}

impl AccuracyReport {
    pub fn empty() -> Self {
        Self {
            accuracy_pct: 0.0,
            correct: 0,
            total: 0,
            by_label: Vec::new(),
        }
    }
}

fn percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * correct as f64 / total as f64
    }
}

/// Join predictions with outcomes on window value and score every row.
///
/// The join is many-to-many: P predictions and O outcomes sharing a window
/// contribute P * O rows.
pub fn calculate_accuracy(
    predictions: &[PredictionRecord],
    outcomes: &[OutcomeRecord],
) -> AccuracyReport {
    let mut actual_by_window: HashMap<Window, Vec<Candle>> = HashMap::new();
    for o in outcomes {
        actual_by_window.entry(o.window).or_default().push(o.actual);
    }

    let mut per_label: BTreeMap<Label, (usize, usize)> = BTreeMap::new();
    let mut correct = 0usize;
    let mut total = 0usize;

    for p in predictions {
        let Some(actuals) = actual_by_window.get(&p.window) else {
            continue;
        };
        let entry = per_label.entry(p.label).or_insert((0, 0));
        for &actual in actuals {
            total += 1;
            entry.1 += 1;
            if is_correct(p.label, actual) {
                correct += 1;
                entry.0 += 1;
            }
        }
    }

    let by_label = per_label
        .into_iter()
        .map(|(label, (c, t))| LabelAccuracy {
            label,
            correct: c,
            total: t,
            accuracy_pct: percent(c, t),
        })
        .collect();

    AccuracyReport {
        accuracy_pct: percent(correct, total),
        correct,
        total,
        by_label,
    }
}

/// Accuracy over a history store. Unreadable history yields an empty report.
pub fn accuracy_from_history(history: &impl HistoryReader) -> AccuracyReport {
    let predictions = match history.read_all_predictions() {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "prediction history unavailable");
            return AccuracyReport::empty();
        }
    };
    let outcomes = match history.read_all_outcomes() {
        Ok(o) => o,
        Err(e) => {
            warn!(error = %e, "outcome history unavailable");
            return AccuracyReport::empty();
        }
    };

    let report = calculate_accuracy(&predictions, &outcomes);
    debug!(
        predictions = predictions.len(),
        outcomes = outcomes.len(),
        joined = report.total,
        accuracy = report.accuracy_pct,
        "computed accuracy"
    );
    report
}

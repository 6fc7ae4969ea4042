use crate::domain::{Candle, Label, OutcomeRecord, PredictionRecord, Window};
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Read side of the prediction/outcome history.
///
/// Both scans return records in insertion order. An absent backing store
/// is an empty history, not an error.
pub trait HistoryReader {
    fn read_all_predictions(&self) -> Result<Vec<PredictionRecord>>;

    fn read_all_outcomes(&self) -> Result<Vec<OutcomeRecord>>;

    /// Last `n` prediction records, oldest first.
    fn recent_predictions(&self, n: usize) -> Result<Vec<PredictionRecord>> {
        let mut all = self.read_all_predictions()?;
        let start = all.len().saturating_sub(n);
        Ok(all.split_off(start))
    }
}

impl<T: HistoryReader + ?Sized> HistoryReader for &T {
    fn read_all_predictions(&self) -> Result<Vec<PredictionRecord>> {
        (**self).read_all_predictions()
    }

    fn read_all_outcomes(&self) -> Result<Vec<OutcomeRecord>> {
        (**self).read_all_outcomes()
    }
}

/// Append-only history. Implementations never rewrite or delete records.
pub trait HistoryStore: HistoryReader {
    fn append_prediction(
        &mut self,
        timestamp: DateTime<Utc>,
        window: &Window,
        label: Label,
    ) -> Result<()>;

    fn append_outcome(
        &mut self,
        timestamp: DateTime<Utc>,
        window: &Window,
        actual: Candle,
    ) -> Result<()>;
}

/// In-process history, used by tests and by callers that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    predictions: Vec<PredictionRecord>,
    outcomes: Vec<OutcomeRecord>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prediction_count(&self) -> usize {
        self.predictions.len()
    }

    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }
}

impl HistoryReader for MemoryHistory {
    fn read_all_predictions(&self) -> Result<Vec<PredictionRecord>> {
        Ok(self.predictions.clone())
    }

    fn read_all_outcomes(&self) -> Result<Vec<OutcomeRecord>> {
        Ok(self.outcomes.clone())
    }
}

impl HistoryStore for MemoryHistory {
    fn append_prediction(
        &mut self,
        timestamp: DateTime<Utc>,
        window: &Window,
        label: Label,
    ) -> Result<()> {
        self.predictions.push(PredictionRecord {
            timestamp,
            window: *window,
            label,
        });
        Ok(())
    }

    fn append_outcome(
        &mut self,
        timestamp: DateTime<Utc>,
        window: &Window,
        actual: Candle,
    ) -> Result<()> {
        self.outcomes.push(OutcomeRecord {
            timestamp,
            window: *window,
            actual,
        });
        Ok(())
    }
}

use super::adaptive::{AdaptivePredictor, EngineConfig};
use super::strategy::{Prediction, Predictor};
use crate::data::{HistoryReader, HistoryStore};
use crate::domain::{Candle, OutcomeRecord, PredictionRecord, Window};
use crate::error::Result;
use crate::evaluation::metrics::{accuracy_from_history, AccuracyReport};
use chrono::Utc;

/// One user's predicting session over a history store.
///
/// Validates input, predicts, and logs. Invalid input is rejected before
/// anything is read or written. Not safe for concurrent writers; callers
/// sharing a store across processes must serialize appends themselves.
pub struct PredictionSession<S: HistoryStore> {
    store: S,
    config: EngineConfig,
}

impl<S: HistoryStore> PredictionSession<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Predict without logging.
    pub fn preview(&self, window: &Window) -> Prediction {
        AdaptivePredictor::new(&self.store, self.config.clone()).predict(window)
    }

    /// Validate `raw`, predict, and append the prediction to history.
    pub fn predict(&mut self, raw: &str) -> Result<(Window, Prediction)> {
        let window = Window::parse(raw)?;
        let prediction = self.preview(&window);
        self.store
            .append_prediction(Utc::now(), &window, prediction.label)?;
        Ok((window, prediction))
    }

    /// Log the color that actually followed `raw_window`.
    pub fn record_outcome(&mut self, raw_window: &str, raw_actual: &str) -> Result<OutcomeRecord> {
        let window = Window::parse(raw_window)?;
        let actual: Candle = raw_actual.parse()?;
        let record = OutcomeRecord {
            timestamp: Utc::now(),
            window,
            actual,
        };
        self.store
            .append_outcome(record.timestamp, &record.window, record.actual)?;
        Ok(record)
    }

    pub fn recent_predictions(&self, n: usize) -> Result<Vec<PredictionRecord>> {
        self.store.recent_predictions(n)
    }

    pub fn accuracy(&self) -> AccuracyReport {
        accuracy_from_history(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CsvHistory, MemoryHistory, StoreConfig};
    use crate::domain::Label;
    use crate::engine::strategy::Basis;

    fn session() -> PredictionSession<MemoryHistory> {
        PredictionSession::new(MemoryHistory::new(), EngineConfig::default())
    }

    #[test]
    fn test_predict_logs_record() {
        let mut s = session();
        let (window, pred) = s.predict("rggggggrgg").unwrap();
        assert_eq!(window.to_string(), "RGGGGGGRGG");
        assert_eq!(pred.label, Label::LikelyGreen);

        let logged = s.store().read_all_predictions().unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].window, window);
        assert_eq!(logged[0].label, Label::LikelyGreen);
    }

    #[test]
    fn test_invalid_input_is_not_logged() {
        let mut s = session();
        assert!(s.predict("GRX").unwrap_err().is_invalid_input());
        assert!(s.predict("GGGGGGGGGX").unwrap_err().is_invalid_input());
        assert_eq!(s.store().prediction_count(), 0);

        assert!(s.record_outcome("GRX", "G").is_err());
        assert!(s.record_outcome("GGGGGGGGGG", "X").is_err());
        assert_eq!(s.store().outcome_count(), 0);
    }

    #[test]
    fn test_repeated_predictions_reinforce_themselves() {
        let mut s = session();
        for _ in 0..5 {
            let (_, pred) = s.predict("GRGRGRGRGR").unwrap();
            assert!(matches!(pred.basis, Basis::Rules(_)));
        }
        let (_, pred) = s.predict("GRGRGRGRGR").unwrap();
        assert_eq!(pred.label, Label::LikelyRed);
        assert_eq!(pred.confidence, 100);
        assert!(matches!(pred.basis, Basis::MajorityVote { matches: 5, .. }));
    }

    #[test]
    fn test_preview_does_not_log() {
        let s = session();
        s.preview(&Window::parse("GGGGGGGGGG").unwrap());
        assert_eq!(s.store().prediction_count(), 0);
    }

    #[test]
    fn test_outcome_and_accuracy() {
        let mut s = session();
        s.predict("GRGRGRGRGR").unwrap();
        s.predict("RGGGGGGRGG").unwrap();
        s.record_outcome("GRGRGRGRGR", "r").unwrap();
        s.record_outcome("RGGGGGGRGG", "R").unwrap();

        let report = s.accuracy();
        assert_eq!(report.total, 2);
        assert_eq!(report.correct, 1);
        assert!((report.accuracy_pct - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_accuracy_with_no_history() {
        let report = session().accuracy();
        assert_eq!(report.total, 0);
        assert_eq!(report.accuracy_pct, 0.0);
    }

    #[test]
    fn test_session_over_csv_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let mut s = PredictionSession::new(CsvHistory::new(config.clone()), EngineConfig::default());
        for _ in 0..5 {
            s.predict("VVVVVGGGGG").unwrap();
        }
        s.record_outcome("VVVVVGGGGG", "G").unwrap();
        assert!(s.predict("bad").is_err());

        // a fresh session sees what the first one wrote
        let s = PredictionSession::new(CsvHistory::new(config), EngineConfig::default());
        let pred = s.preview(&Window::parse("VVVVVGGGGG").unwrap());
        assert_eq!(pred.label, Label::LikelyGreen);
        assert!(matches!(pred.basis, Basis::MajorityVote { matches: 5, .. }));

        let recent = s.recent_predictions(10).unwrap();
        assert_eq!(recent.len(), 5);

        let report = s.accuracy();
        assert_eq!(report.total, 5);
        assert!((report.accuracy_pct - 100.0).abs() < 1e-10);
    }
}

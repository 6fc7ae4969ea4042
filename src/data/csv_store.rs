use super::history::{HistoryReader, HistoryStore};
use crate::domain::{Candle, Label, OutcomeRecord, PredictionRecord, Window};
use crate::error::{PredictorError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Timestamp layout of logs written by earlier versions of the tool.
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Where the history files live.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub predictions_file: String,
    pub outcomes_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            predictions_file: "predictions_log.csv".into(),
            outcomes_file: "outcomes_log.csv".into(),
        }
    }
}

impl StoreConfig {
    pub fn predictions_path(&self) -> PathBuf {
        self.data_dir.join(&self.predictions_file)
    }

    pub fn outcomes_path(&self) -> PathBuf {
        self.data_dir.join(&self.outcomes_file)
    }
}

/// Append-only history kept as two headerless CSV files of
/// `timestamp,window,value` rows.
///
/// Rows that fail to parse are skipped with a warning. A missing file
/// reads as an empty history.
#[derive(Debug, Clone)]
pub struct CsvHistory {
    config: StoreConfig,
}

impl CsvHistory {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn append_row(&self, path: &Path, row: [String; 3]) -> Result<()> {
        std::fs::create_dir_all(&self.config.data_dir)?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(&row)?;
        writer.flush()?;
        Ok(())
    }
}

impl HistoryReader for CsvHistory {
    fn read_all_predictions(&self) -> Result<Vec<PredictionRecord>> {
        let rows = read_rows(&self.config.predictions_path(), |s| Label::from_str(s))?;
        Ok(rows
            .into_iter()
            .map(|(timestamp, window, label)| PredictionRecord {
                timestamp,
                window,
                label,
            })
            .collect())
    }

    fn read_all_outcomes(&self) -> Result<Vec<OutcomeRecord>> {
        let rows = read_rows(&self.config.outcomes_path(), |s| Candle::from_str(s.trim()))?;
        Ok(rows
            .into_iter()
            .map(|(timestamp, window, actual)| OutcomeRecord {
                timestamp,
                window,
                actual,
            })
            .collect())
    }
}

impl HistoryStore for CsvHistory {
    fn append_prediction(
        &mut self,
        timestamp: DateTime<Utc>,
        window: &Window,
        label: Label,
    ) -> Result<()> {
        let path = self.config.predictions_path();
        self.append_row(
            &path,
            [timestamp.to_rfc3339(), window.to_string(), label.to_string()],
        )?;
        info!(window = %window, label = %label, path = %path.display(), "logged prediction");
        Ok(())
    }

    fn append_outcome(
        &mut self,
        timestamp: DateTime<Utc>,
        window: &Window,
        actual: Candle,
    ) -> Result<()> {
        let path = self.config.outcomes_path();
        self.append_row(
            &path,
            [timestamp.to_rfc3339(), window.to_string(), actual.to_string()],
        )?;
        info!(window = %window, actual = %actual, path = %path.display(), "logged outcome");
        Ok(())
    }
}

/// RFC 3339, or the naive legacy layout interpreted as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, LEGACY_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_row<T>(
    record: &csv::StringRecord,
    line: u64,
    parse_value: &impl Fn(&str) -> Result<T>,
) -> Result<(DateTime<Utc>, Window, T)> {
    let malformed = |reason: String| PredictorError::MalformedRecord { line, reason };

    if record.len() != 3 {
        return Err(malformed(format!("expected 3 fields, got {}", record.len())));
    }
    let timestamp = parse_timestamp(&record[0])
        .ok_or_else(|| malformed(format!("bad timestamp {:?}", &record[0])))?;
    let window = Window::parse(&record[1]).map_err(|e| malformed(e.to_string()))?;
    let value = parse_value(&record[2]).map_err(|e| malformed(e.to_string()))?;
    Ok((timestamp, window, value))
}

fn read_rows<T>(
    path: &Path,
    parse_value: impl Fn(&str) -> Result<T>,
) -> Result<Vec<(DateTime<Utc>, Window, T)>> {
    if !path.exists() {
        debug!(path = %path.display(), "history file not found, treating as empty");
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    let mut last_timestamp: Option<DateTime<Utc>> = None;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable history row");
                skipped += 1;
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());

        match parse_row(&record, line, &parse_value) {
            Ok(row) => {
                if last_timestamp.is_some_and(|prev| row.0 < prev) {
                    warn!(path = %path.display(), line, "history timestamps go backwards");
                }
                last_timestamp = Some(row.0);
                rows.push(row);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping malformed history row");
                skipped += 1;
            }
        }
    }

    debug!(path = %path.display(), rows = rows.len(), skipped, "read history");
    Ok(rows)
}

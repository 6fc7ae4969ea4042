use crate::error::{PredictorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of candles a prediction is conditioned on.
pub const WINDOW_LEN: usize = 10;

/// Observed candle color. `V` marks a volatile candle.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Candle {
    #[serde(rename = "G")]
    Green,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "V")]
    Volatile,
}

impl Candle {
    pub const ALL: [Candle; 3] = [Candle::Green, Candle::Red, Candle::Volatile];

    /// Case-insensitive single-character parse.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'G' => Some(Candle::Green),
            'R' => Some(Candle::Red),
            'V' => Some(Candle::Volatile),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Candle::Green => 'G',
            Candle::Red => 'R',
            Candle::Volatile => 'V',
        }
    }
}

impl fmt::Display for Candle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Candle {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Candle::from_char(c)
                .ok_or_else(|| PredictorError::invalid(s, "symbol must be one of G, R, V")),
            _ => Err(PredictorError::invalid(s, "expected a single symbol")),
        }
    }
}

/// A validated, uppercase-normalized sequence of exactly `WINDOW_LEN` candles.
/// Constructing one is the only way past the validity gate.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Window([Candle; WINDOW_LEN]);

impl Window {
    /// Sequence validator: normalizes case, rejects wrong lengths and unknown symbols.
    pub fn parse(raw: &str) -> Result<Self> {
        let len = raw.chars().count();
        if len != WINDOW_LEN {
            return Err(PredictorError::invalid(
                raw,
                format!("expected {} symbols, got {}", WINDOW_LEN, len),
            ));
        }

        let mut candles = [Candle::Green; WINDOW_LEN];
        for (slot, c) in candles.iter_mut().zip(raw.chars()) {
            *slot = Candle::from_char(c).ok_or_else(|| {
                PredictorError::invalid(raw, format!("symbol {:?} is not one of G, R, V", c))
            })?;
        }
        Ok(Self(candles))
    }

    pub fn from_candles(candles: [Candle; WINDOW_LEN]) -> Self {
        Self(candles)
    }

    /// Candles oldest first.
    pub fn candles(&self) -> &[Candle] {
        &self.0
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl FromStr for Window {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self> {
        Window::parse(s)
    }
}

impl TryFrom<String> for Window {
    type Error = PredictorError;

    fn try_from(s: String) -> Result<Self> {
        Window::parse(&s)
    }
}

impl From<Window> for String {
    fn from(w: Window) -> String {
        w.to_string()
    }
}

/// Categorical prediction output.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "GREEN")]
    Green,
    #[serde(rename = "Likely GREEN")]
    LikelyGreen,
    #[serde(rename = "No Clear Edge")]
    NoClearEdge,
    #[serde(rename = "Likely RED")]
    LikelyRed,
    #[serde(rename = "RED")]
    Red,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Green => "GREEN",
            Label::LikelyGreen => "Likely GREEN",
            Label::NoClearEdge => "No Clear Edge",
            Label::LikelyRed => "Likely RED",
            Label::Red => "RED",
        }
    }

    /// The candle this label calls, if any. "Likely" labels call the same
    /// color as their strong counterparts; "No Clear Edge" calls nothing.
    pub fn direction(self) -> Option<Candle> {
        match self {
            Label::Green | Label::LikelyGreen => Some(Candle::Green),
            Label::Red | Label::LikelyRed => Some(Candle::Red),
            Label::NoClearEdge => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = PredictorError;

    /// Accepts current labels and the variants older prediction logs carry.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "GREEN" => Ok(Label::Green),
            "RED" => Ok(Label::Red),
            "Likely GREEN" | "Likely GREEN (~60%)" => Ok(Label::LikelyGreen),
            "Likely RED" | "Likely RED (~60%)" => Ok(Label::LikelyRed),
            "No Clear Edge" | "50/50 - No Clear Edge" => Ok(Label::NoClearEdge),
            other => Err(PredictorError::invalid(other, "unknown prediction label")),
        }
    }
}

/// One logged prediction. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub timestamp: DateTime<Utc>,
    pub window: Window,
    pub label: Label,
}

/// One logged ground-truth observation. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub timestamp: DateTime<Utc>,
    pub window: Window,
    pub actual: Candle,
}

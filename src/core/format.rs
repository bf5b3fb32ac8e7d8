// Wire types for the LightWAVE JSON endpoint

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::constants::{DEFAULT_GAIN, DEFAULT_UNITS_LABEL};

/// Result of one endpoint request: either the payload, or the
/// "not available" state the viewer shows instead of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Available(T),
    Unavailable(Option<String>),
}

impl<T> Outcome<T> {
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Available(v) => Outcome::Available(f(v)),
            Outcome::Unavailable(reason) => Outcome::Unavailable(reason),
        }
    }

    pub fn available(self) -> Option<T> {
        match self {
            Outcome::Available(v) => Some(v),
            Outcome::Unavailable(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedEntry {
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseList {
    #[serde(default)]
    pub database: Vec<NamedEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordList {
    #[serde(default)]
    pub record: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotatorList {
    #[serde(default)]
    pub annotator: Vec<NamedEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfoResponse {
    pub info: Option<RecordInfo>,
}

/// Record metadata returned by `action=info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordInfo {
    pub db: String,
    pub record: String,
    pub tfreq: f64,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub signal: Vec<SignalInfo>,
    #[serde(default)]
    pub note: Vec<String>,
}

impl RecordInfo {
    /// Absolute start time, when the record header defines one.
    /// The endpoint sends it as `[HH:MM:SS.mmm DD/MM/YYYY]`.
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        let raw = self.start.as_deref()?;
        let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']').trim();
        NaiveDateTime::parse_from_str(trimmed, "%H:%M:%S%.f %d/%m/%Y").ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalInfo {
    pub name: String,
    #[serde(default = "default_tps_f64")]
    pub tps: f64,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub gain: Option<f64>,
    #[serde(default)]
    pub adcres: i32,
    #[serde(default)]
    pub adczero: i32,
    #[serde(default)]
    pub baseline: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchResponse {
    pub fetch: Option<FetchData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchData {
    #[serde(default)]
    pub annotator: Option<Vec<AnnotatorSet>>,
    #[serde(default)]
    pub signal: Option<Vec<RawSignal>>,
}

impl FetchData {
    /// Only the first annotator set is ever rendered.
    pub fn first_annotations(&mut self) -> Vec<Annotation> {
        self.annotator
            .take()
            .and_then(|sets| sets.into_iter().next())
            .map(|set| set.annotation)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.annotator.as_ref().map_or(true, Vec::is_empty)
            && self.signal.as_ref().map_or(true, Vec::is_empty)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotatorSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub annotation: Vec<Annotation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Annotation {
    pub t: i64,
    pub a: String,
    #[serde(default)]
    pub s: i32,
    #[serde(default)]
    pub c: i32,
    #[serde(default)]
    pub n: i32,
    #[serde(default)]
    pub x: Option<String>,
}

impl Annotation {
    /// Aux text, treating an empty string like an absent one.
    pub fn aux(&self) -> Option<&str> {
        self.x.as_deref().filter(|x| !x.is_empty())
    }
}

/// One signal as received: `samp` holds first differences.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSignal {
    pub name: String,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub t0: Option<i64>,
    #[serde(default)]
    pub tf: Option<i64>,
    #[serde(default)]
    pub gain: Option<f64>,
    #[serde(default, alias = "baseline")]
    pub base: i64,
    #[serde(default = "default_tps")]
    pub tps: i64,
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub samp: Vec<i64>,
}

/// A signal with absolute sample values.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: String,
    pub units: Option<String>,
    pub gain: f64,
    pub baseline: i64,
    pub scale: f64,
    pub tps: i64,
    pub samples: Vec<i64>,
}

impl Signal {
    /// Units for display; `[mV]` when the record declares none.
    pub fn units(&self) -> &str {
        self.units.as_deref().unwrap_or(DEFAULT_UNITS_LABEL)
    }
}

pub(crate) fn effective_gain(gain: Option<f64>) -> f64 {
    match gain {
        Some(g) if g != 0.0 && g.is_finite() => g,
        _ => DEFAULT_GAIN,
    }
}

fn default_tps() -> i64 {
    1
}

fn default_tps_f64() -> f64 {
    1.0
}

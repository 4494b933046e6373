//! Analysis payload produced by the offline analysis step.
//!
//! Two payload shapes exist in the wild: one carries pre-normalized
//! `barValues`, an image spectrogram reference and a tempo; the other carries
//! a raw `chromagram`, a dB spectrogram matrix and beat timestamps. Both are
//! accepted here and resolved explicitly through [`AnalysisPayload::bar_source`]
//! and [`AnalysisPayload::spectrogram_source`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::any::type_name;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;

/// Every element field is read leniently: a wrong type or `null` leaves the
/// field empty so only the element it feeds degrades.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub filename: Option<String>,
    /// Track length in seconds
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration: Option<f64>,
    /// Raw tempo reading; may be absent, null, or a non-numeric string
    #[serde(default, deserialize_with = "lenient_number")]
    pub tempo: Option<f64>,
    #[serde(
        default,
        rename = "barValues",
        alias = "bar_values",
        deserialize_with = "lenient"
    )]
    pub bar_values: Option<Vec<f32>>,
    #[serde(default, deserialize_with = "lenient")]
    pub chromagram: Option<Vec<Vec<f32>>>,
    #[serde(default, deserialize_with = "lenient")]
    pub spectrogram: Option<SpectrogramField>,
    #[serde(
        default,
        rename = "spectrogramUri",
        alias = "spectrogram_uri",
        deserialize_with = "lenient"
    )]
    pub spectrogram_uri: Option<String>,
    /// Beat timestamps in seconds
    #[serde(default, deserialize_with = "lenient_list")]
    pub beats: Vec<f64>,
    #[serde(
        default,
        alias = "audioUri",
        alias = "audio_source",
        alias = "audioSource",
        deserialize_with = "lenient"
    )]
    pub audio_uri: Option<String>,
}

/// `spectrogram` is either an image reference or a dB matrix
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpectrogramField {
    Image(String),
    Matrix(SpectrogramMatrix),
}

/// Magnitudes in dB, indexed `data[freq_bin][time_bin]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpectrogramMatrix {
    pub data: Vec<Vec<f32>>,
    #[serde(default)]
    pub time_bins: Option<usize>,
    #[serde(default)]
    pub freq_bins: Option<usize>,
}

impl SpectrogramMatrix {
    pub fn freq_bins(&self) -> usize {
        self.data.len()
    }

    pub fn time_bins(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }
}

/// Where the bar chart values come from
#[derive(Debug, Clone, Copy)]
pub enum BarSource<'a> {
    Values(&'a [f32]),
    Chromagram(&'a [Vec<f32>]),
}

/// Where the heatmap comes from
#[derive(Debug, Clone, Copy)]
pub enum SpectrogramSource<'a> {
    Image(&'a str),
    Matrix(&'a SpectrogramMatrix),
}

impl AnalysisPayload {
    /// Parses a payload from JSON, or from the `const audioData = {...};`
    /// script the analysis step writes next to the page.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(strip_js_assignment(text))?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Pre-aggregated bar values win over a raw chromagram
    pub fn bar_source(&self) -> Option<BarSource<'_>> {
        if let Some(values) = self.bar_values.as_deref() {
            return Some(BarSource::Values(values));
        }
        self.chromagram
            .as_deref()
            .map(BarSource::Chromagram)
    }

    /// A matrix wins over an image reference
    pub fn spectrogram_source(&self) -> Option<SpectrogramSource<'_>> {
        match &self.spectrogram {
            Some(SpectrogramField::Matrix(matrix)) => Some(SpectrogramSource::Matrix(matrix)),
            Some(SpectrogramField::Image(reference)) => Some(SpectrogramSource::Image(reference)),
            None => self
                .spectrogram_uri
                .as_deref()
                .map(SpectrogramSource::Image),
        }
    }

    pub fn title_or_default(&self) -> &str {
        non_empty(self.title.as_deref()).unwrap_or("Unknown title")
    }

    pub fn artist_or_default(&self) -> &str {
        non_empty(self.artist.as_deref()).unwrap_or("Unknown artist")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A media reference resolved for opening
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRef<'a> {
    Local(PathBuf),
    Remote(&'a str),
}

impl<'a> MediaRef<'a> {
    pub fn parse(reference: &'a str) -> Self {
        let reference = reference.trim();
        if let Some(path) = reference.strip_prefix("file://") {
            return MediaRef::Local(PathBuf::from(path));
        }
        let is_remote = ["http://", "https://", "data:"]
            .iter()
            .any(|scheme| reference.starts_with(scheme));
        if is_remote {
            MediaRef::Remote(reference)
        } else {
            MediaRef::Local(PathBuf::from(reference))
        }
    }
}

/// Strips `const audioData = ` and the trailing `;` from a script payload
fn strip_js_assignment(text: &str) -> &str {
    let trimmed = text.trim();
    let is_script = ["const ", "let ", "var "]
        .iter()
        .any(|keyword| trimmed.starts_with(keyword));
    if !is_script {
        return trimmed;
    }
    let body = match trimmed.find('=') {
        Some(idx) => &trimmed[idx + 1..],
        None => return trimmed,
    };
    body.trim().trim_end_matches(';').trim_end()
}

/// Reads a field as `T`, dropping it when the value has the wrong shape
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            warn!(expected = type_name::<T>(), %err, "ignoring malformed payload field");
            Ok(None)
        }
    }
}

fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

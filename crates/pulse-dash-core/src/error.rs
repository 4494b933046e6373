//! Error types for the dashboard engine.
//!
//! Every failure is scoped to one dashboard element so the caller can
//! degrade that element and keep rendering the others.

use std::fmt;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, VizError>;

/// Dashboard element a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Header,
    BarChart,
    Heatmap,
    Pulse,
    Audio,
    Volume,
    Theme,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::Header => "header",
            Element::BarChart => "bar chart",
            Element::Heatmap => "heatmap",
            Element::Pulse => "pulse layer",
            Element::Audio => "audio",
            Element::Volume => "volume control",
            Element::Theme => "theme",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VizError {
    /// A payload field the element needs is absent or malformed
    #[error("missing data for {element}: {detail}")]
    MissingData { element: Element, detail: String },

    /// A number that cannot be used (NaN, infinite, non-positive tempo)
    #[error("invalid value for {field}: {value}")]
    InvalidNumeric { field: &'static str, value: String },

    /// An image or audio reference could not be opened or decoded
    #[error("failed to load {element} media from {reference}: {reason}")]
    MediaLoadFailure {
        element: Element,
        reference: String,
        reason: String,
    },

    /// The host did not provide an output target for the element
    #[error("no mount point for {0}")]
    MountPointMissing(Element),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl VizError {
    pub fn missing(element: Element, detail: impl Into<String>) -> Self {
        Self::MissingData {
            element,
            detail: detail.into(),
        }
    }

    pub fn media(element: Element, reference: &str, reason: impl fmt::Display) -> Self {
        Self::MediaLoadFailure {
            element,
            reference: reference.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Element affected by this error, if it is scoped to one
    pub fn element(&self) -> Option<Element> {
        match self {
            Self::MissingData { element, .. } | Self::MediaLoadFailure { element, .. } => {
                Some(*element)
            }
            Self::MountPointMissing(element) => Some(*element),
            Self::InvalidNumeric { .. } | Self::Io(_) | Self::Json(_) => None,
        }
    }
}

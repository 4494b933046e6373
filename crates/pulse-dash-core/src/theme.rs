//! Pushes the palette into the surrounding chrome: heading text fills and
//! the volume slider.

use tracing::debug;

use crate::color::{Gradient, Rgb};
use crate::error::{Element, Result, VizError};
use crate::palette::Palette;

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub text: String,
    /// 1 for the page title, 2 for section headings
    pub level: u8,
    pub font_size: u32,
    /// Gradient text fill; `None` draws with the default foreground
    pub fill: Option<Gradient>,
}

impl Heading {
    pub fn new(text: impl Into<String>, level: u8, font_size: u32) -> Self {
        Self {
            text: text.into(),
            level,
            font_size,
            fill: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliderStyle {
    pub track: Option<Gradient>,
    pub thumb: Option<Rgb>,
}

/// Chrome that follows the palette
#[derive(Debug, Clone, Default)]
pub struct ThemeTargets {
    pub headings: Vec<Heading>,
    /// `None` when the host has no volume slider
    pub slider: Option<SliderStyle>,
}

/// Sets the palette ramp as every heading's fill and as the slider track,
/// and the second palette color as the slider thumb.
///
/// Only the fill is touched; text, level and size stay as the host set them.
/// Headings are themed even when the slider is missing.
pub fn apply_theme(palette: &Palette, targets: &mut ThemeTargets) -> Result<()> {
    let ramp = palette.ramp();
    for heading in &mut targets.headings {
        heading.fill = Some(ramp);
    }

    let slider = targets
        .slider
        .as_mut()
        .ok_or(VizError::MountPointMissing(Element::Volume))?;
    slider.track = Some(ramp);
    slider.thumb = Some(palette.colors[1]);

    debug!(headings = targets.headings.len(), band = %palette.band, "applied theme");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::select_palette;

    fn targets() -> ThemeTargets {
        ThemeTargets {
            headings: vec![Heading::new("Song", 1, 32), Heading::new("Spectrogram", 2, 20)],
            slider: Some(SliderStyle::default()),
        }
    }

    #[test]
    fn test_theme_sets_fills_and_slider() {
        let palette = select_palette(Some(130.0));
        let mut t = targets();
        apply_theme(&palette, &mut t).unwrap();

        for h in &t.headings {
            assert_eq!(h.fill, Some(palette.ramp()));
        }
        assert_eq!(t.headings[1].font_size, 20);
        assert_eq!(t.headings[0].text, "Song");

        let slider = t.slider.unwrap();
        assert_eq!(slider.track, Some(palette.ramp()));
        assert_eq!(slider.thumb, Some(palette.colors[1]));
    }

    #[test]
    fn test_reapply_supersedes() {
        let mut t = targets();
        apply_theme(&select_palette(Some(60.0)), &mut t).unwrap();
        let fast = select_palette(Some(160.0));
        apply_theme(&fast, &mut t).unwrap();

        assert_eq!(t.headings[0].fill, Some(fast.ramp()));
        assert_eq!(t.slider.unwrap().thumb, Some(fast.colors[1]));
    }

    #[test]
    fn test_missing_slider_still_themes_headings() {
        let palette = select_palette(Some(100.0));
        let mut t = targets();
        t.slider = None;

        let err = apply_theme(&palette, &mut t).unwrap_err();
        assert!(matches!(err, VizError::MountPointMissing(Element::Volume)));
        assert!(t.headings.iter().all(|h| h.fill.is_some()));
    }
}

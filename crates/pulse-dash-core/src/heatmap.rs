//! Time-frequency heatmap.
//!
//! Rasterizes a dB spectrogram matrix (or a pre-rendered spectrogram image)
//! onto a fixed-size RGBA surface. Low frequencies are drawn at the bottom.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::color::{unit, Hsl, Rgb};
use crate::error::{Element, Result, VizError};
use crate::palette::Palette;
use crate::payload::{MediaRef, SpectrogramMatrix};
use crate::rect::{cell_edge, PixelRect};

pub const DEFAULT_MIN_DB: f32 = -80.0;
pub const DEFAULT_MAX_DB: f32 = 0.0;

/// Shown in place of an image that failed to load
pub const IMAGE_FALLBACK_MESSAGE: &str = "Could not load the spectrogram";

/// How matrix values map onto the 0-1 color range
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DbRange {
    Fixed { min_db: f32, max_db: f32 },
    /// Bounds taken from the matrix's own distribution (percent, 0-100)
    Percentile { low: f32, high: f32 },
}

impl Default for DbRange {
    fn default() -> Self {
        DbRange::Fixed {
            min_db: DEFAULT_MIN_DB,
            max_db: DEFAULT_MAX_DB,
        }
    }
}

impl DbRange {
    /// Concrete `(min_db, max_db)` for this matrix
    pub fn resolve(&self, matrix: &SpectrogramMatrix) -> (f32, f32) {
        match *self {
            DbRange::Fixed { min_db, max_db } => (min_db, max_db),
            DbRange::Percentile { low, high } => {
                let mut values: Vec<f32> = matrix
                    .data
                    .iter()
                    .flatten()
                    .copied()
                    .filter(|v| v.is_finite())
                    .collect();
                if values.is_empty() {
                    return (DEFAULT_MIN_DB, DEFAULT_MAX_DB);
                }
                values.sort_by(f32::total_cmp);
                (percentile(&values, low), percentile(&values, high))
            }
        }
    }
}

/// Linear-interpolated percentile of sorted values
fn percentile(sorted: &[f32], pct: f32) -> f32 {
    let pos = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f32;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f32)
}

/// `clamp((v - min_db) / (max_db - min_db), 0, 1)`; a degenerate range maps to 0
pub fn normalize_db(value: f32, min_db: f32, max_db: f32) -> f32 {
    let span = max_db - min_db;
    if !(span > 0.0) || !span.is_finite() {
        return 0.0;
    }
    unit((value - min_db) / span)
}

/// Value to color mapping for matrix cells
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeatmapColoring {
    /// Fixed hue, lightness rising with value
    HueRamp { hue: f32, saturation: f32 },
    /// The palette's four colors spread evenly over the range
    Palette,
}

impl Default for HeatmapColoring {
    fn default() -> Self {
        HeatmapColoring::HueRamp {
            hue: 200.0,
            saturation: 80.0,
        }
    }
}

impl HeatmapColoring {
    pub fn color(&self, value: f32, palette: &Palette) -> Rgb {
        let value = unit(value);
        match *self {
            HeatmapColoring::HueRamp { hue, saturation } => {
                Hsl::new(hue, saturation, 8.0 + 62.0 * value).to_rgb()
            }
            HeatmapColoring::Palette => palette.ramp().sample(value),
        }
    }
}

/// Output target for the heatmap renderers; size is fixed at creation
#[derive(Debug, Clone)]
pub struct HeatmapSurface {
    image: RgbaImage,
    notice: Option<String>,
}

impl HeatmapSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(Rgb::BACKGROUND.to_rgba())),
            notice: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Fallback message shown when the surface could not be filled
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let [r, g, b, _] = self.image.get_pixel(x, y).0;
        Some(Rgb::new(r, g, b))
    }

    pub fn clear(&mut self) {
        let background = Rgba(Rgb::BACKGROUND.to_rgba());
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
        self.notice = None;
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        let rect = rect.clipped(self.width(), self.height());
        let fill = Rgba(color.to_rgba());
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                self.image.put_pixel(x, y, fill);
            }
        }
    }

    fn show_notice(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }
}

/// Draws every matrix cell as a rectangle of `width/time_bins` by
/// `height/freq_bins` pixels, frequency bin 0 at the bottom.
pub fn render_matrix(
    surface: &mut HeatmapSurface,
    matrix: &SpectrogramMatrix,
    range: DbRange,
    coloring: &HeatmapColoring,
    palette: &Palette,
) -> Result<()> {
    surface.clear();
    validate(matrix)?;

    let (min_db, max_db) = range.resolve(matrix);
    let freq_bins = matrix.freq_bins();
    let time_bins = matrix.time_bins();
    let (width, height) = (surface.width(), surface.height());

    for (f, row) in matrix.data.iter().enumerate() {
        // Row f occupies the f-th band counted from the bottom
        let top = cell_edge(freq_bins - f - 1, freq_bins, height);
        let bottom = cell_edge(freq_bins - f, freq_bins, height);
        if top == bottom {
            continue;
        }
        for (t, &value) in row.iter().enumerate() {
            let left = cell_edge(t, time_bins, width);
            let right = cell_edge(t + 1, time_bins, width);
            if left == right {
                continue;
            }
            let value = if value.is_finite() { value } else { min_db };
            let color = coloring.color(normalize_db(value, min_db, max_db), palette);
            surface.fill_rect(PixelRect::new(left, top, right - left, bottom - top), color);
        }
    }

    debug!(freq_bins, time_bins, min_db, max_db, "rendered spectrogram matrix");
    Ok(())
}

fn validate(matrix: &SpectrogramMatrix) -> Result<()> {
    let freq_bins = matrix.freq_bins();
    let time_bins = matrix.time_bins();
    if freq_bins == 0 || time_bins == 0 {
        return Err(VizError::missing(Element::Heatmap, "spectrogram matrix is empty"));
    }
    if let Some(row) = matrix.data.iter().position(|row| row.len() != time_bins) {
        return Err(VizError::missing(
            Element::Heatmap,
            format!("spectrogram row {} has {} bins, expected {}", row, matrix.data[row].len(), time_bins),
        ));
    }
    if matrix.freq_bins.is_some_and(|declared| declared != freq_bins)
        || matrix.time_bins.is_some_and(|declared| declared != time_bins)
    {
        return Err(VizError::missing(
            Element::Heatmap,
            format!(
                "spectrogram shape {}x{} does not match declared {:?}x{:?}",
                freq_bins, time_bins, matrix.freq_bins, matrix.time_bins
            ),
        ));
    }
    Ok(())
}

/// Clears the surface and draws a decoded image scaled to its width.
///
/// On failure the surface stays cleared and carries a fallback notice; the
/// error is returned for diagnostics only.
pub fn render_image(surface: &mut HeatmapSurface, reference: &str) -> Result<()> {
    surface.clear();
    match load_scaled(reference, surface.width(), surface.height()) {
        Ok(scaled) => {
            imageops::replace(&mut surface.image, &scaled, 0, 0);
            debug!(reference, "spectrogram image loaded");
            Ok(())
        }
        Err(err) => {
            warn!("error loading the spectrogram: {}", err);
            surface.show_notice(IMAGE_FALLBACK_MESSAGE);
            Err(err)
        }
    }
}

fn load_scaled(reference: &str, width: u32, height: u32) -> Result<RgbaImage> {
    let path = match MediaRef::parse(reference) {
        MediaRef::Local(path) => path,
        MediaRef::Remote(_) => {
            return Err(VizError::media(
                Element::Heatmap,
                reference,
                "remote images are not fetched",
            ))
        }
    };

    let decoded = image::open(&path)
        .map_err(|e| VizError::media(Element::Heatmap, reference, e))?
        .to_rgba8();
    if decoded.width() == 0 || decoded.height() == 0 || width == 0 || height == 0 {
        return Err(VizError::media(Element::Heatmap, reference, "image has no pixels"));
    }

    // Full width, height follows the aspect ratio up to the surface height
    let scaled_height = ((width as u64 * decoded.height() as u64) / decoded.width() as u64)
        .clamp(1, height as u64) as u32;
    Ok(imageops::resize(&decoded, width, scaled_height, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::select_palette;
    use proptest::prelude::*;

    fn matrix(data: Vec<Vec<f32>>) -> SpectrogramMatrix {
        SpectrogramMatrix {
            data,
            time_bins: None,
            freq_bins: None,
        }
    }

    #[test]
    fn test_normalize_endpoints() {
        assert_eq!(normalize_db(-80.0, -80.0, 0.0), 0.0);
        assert_eq!(normalize_db(0.0, -80.0, 0.0), 1.0);
        assert_eq!(normalize_db(-40.0, -80.0, 0.0), 0.5);
        assert_eq!(normalize_db(-120.0, -80.0, 0.0), 0.0);
        assert_eq!(normalize_db(12.0, -80.0, 0.0), 1.0);
        assert_eq!(normalize_db(-10.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_low_frequency_renders_at_bottom() {
        let palette = select_palette(Some(100.0));
        // Bin 0 loud, bin 1 silent
        let m = matrix(vec![vec![0.0, 0.0], vec![-80.0, -80.0]]);
        let mut surface = HeatmapSurface::new(4, 4);
        render_matrix(&mut surface, &m, DbRange::default(), &HeatmapColoring::default(), &palette).unwrap();

        let loud = HeatmapColoring::default().color(1.0, &palette);
        let quiet = HeatmapColoring::default().color(0.0, &palette);
        assert_eq!(surface.pixel(0, 3), Some(loud));
        assert_eq!(surface.pixel(3, 2), Some(loud));
        assert_eq!(surface.pixel(0, 0), Some(quiet));
        assert_eq!(surface.pixel(3, 1), Some(quiet));
    }

    #[test]
    fn test_cells_cover_surface() {
        let palette = select_palette(Some(100.0));
        let m = matrix(vec![vec![-20.0; 3]; 3]);
        let mut surface = HeatmapSurface::new(10, 7);
        render_matrix(&mut surface, &m, DbRange::default(), &HeatmapColoring::Palette, &palette).unwrap();

        let expected = HeatmapColoring::Palette.color(0.75, &palette);
        for y in 0..7 {
            for x in 0..10 {
                assert_eq!(surface.pixel(x, y), Some(expected));
            }
        }
    }

    #[test]
    fn test_invalid_matrices() {
        let palette = select_palette(Some(100.0));
        let mut surface = HeatmapSurface::new(4, 4);
        let coloring = HeatmapColoring::default();

        let empty = matrix(vec![]);
        assert!(render_matrix(&mut surface, &empty, DbRange::default(), &coloring, &palette).is_err());

        let ragged = matrix(vec![vec![0.0, 0.0], vec![0.0]]);
        assert!(render_matrix(&mut surface, &ragged, DbRange::default(), &coloring, &palette).is_err());

        let mut mislabeled = matrix(vec![vec![0.0, 0.0]]);
        mislabeled.time_bins = Some(3);
        let err = render_matrix(&mut surface, &mislabeled, DbRange::default(), &coloring, &palette)
            .unwrap_err();
        assert_eq!(err.element(), Some(Element::Heatmap));
    }

    #[test]
    fn test_percentile_range() {
        let m = matrix(vec![(0..=100).map(|v| -(v as f32)).collect()]);
        let (lo, hi) = DbRange::Percentile { low: 5.0, high: 95.0 }.resolve(&m);
        assert!((lo + 95.0).abs() < 1e-4);
        assert!((hi + 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_missing_image_shows_fallback() {
        let mut surface = HeatmapSurface::new(8, 8);
        surface.fill_rect(PixelRect::from_w_h(8, 8), Rgb::WHITE);

        let result = render_image(&mut surface, "/nonexistent/spectrogram.png");
        assert!(result.is_err());
        assert_eq!(surface.notice(), Some(IMAGE_FALLBACK_MESSAGE));
        assert_eq!(surface.pixel(4, 4), Some(Rgb::BACKGROUND));
    }

    #[test]
    fn test_remote_image_is_not_fetched() {
        let mut surface = HeatmapSurface::new(8, 8);
        let err = render_image(&mut surface, "https://example.com/s.png").unwrap_err();
        assert!(matches!(err, VizError::MediaLoadFailure { .. }));
    }

    #[test]
    fn test_image_scaled_to_width() {
        let path = std::env::temp_dir().join(format!("pulse-dash-heatmap-{}.png", std::process::id()));
        RgbaImage::from_pixel(4, 2, Rgba([200, 10, 10, 255]))
            .save(&path)
            .unwrap();

        let mut surface = HeatmapSurface::new(8, 8);
        render_image(&mut surface, path.to_str().unwrap()).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(surface.notice(), None);
        assert_eq!(surface.pixel(7, 0), Some(Rgb::new(200, 10, 10)));
        assert_eq!(surface.pixel(0, 3), Some(Rgb::new(200, 10, 10)));
        // Aspect ratio keeps the lower half empty
        assert_eq!(surface.pixel(0, 6), Some(Rgb::BACKGROUND));
    }

    proptest! {
        #[test]
        fn prop_normalized_values_stay_in_unit_range(v in -500.0f32..500.0, min in -120.0f32..-1.0, max in 0.0f32..20.0) {
            let n = normalize_db(v, min, max);
            prop_assert!((0.0..=1.0).contains(&n));
        }
    }
}

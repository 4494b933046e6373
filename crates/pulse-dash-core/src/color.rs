//! Color types shared by every renderer.
//!
//! Palettes are authored as 8-bit sRGB stops and HSL gradient endpoints, so
//! both representations live here along with the conversions between them.

use std::fmt;

/// 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Dashboard background (#121212)
    pub const BACKGROUND: Rgb = Rgb::new(18, 18, 18);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Channels in the 0.0-1.0 range
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }

    /// Per-channel linear interpolation, `t` clamped to 0-1
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = unit(t);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Hue in degrees, saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Interpolates hue, saturation and lightness independently.
    ///
    /// Hue is not wrapped around the color wheel: a ramp from 220° to 20°
    /// passes through green, which is what the tempo gradients rely on.
    pub fn lerp(self, other: Hsl, t: f32) -> Hsl {
        let t = unit(t);
        Hsl::new(
            self.h + (other.h - self.h) * t,
            self.s + (other.s - self.s) * t,
            self.l + (other.l - self.l) * t,
        )
    }

    pub fn to_rgb(self) -> Rgb {
        let hue = self.h.rem_euclid(360.0);
        let saturation = (self.s / 100.0).clamp(0.0, 1.0);
        let lightness = (self.l / 100.0).clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
        let m = lightness - c / 2.0;

        let (r1, g1, b1) = if hue < 60.0 {
            (c, x, 0.0)
        } else if hue < 120.0 {
            (x, c, 0.0)
        } else if hue < 180.0 {
            (0.0, c, x)
        } else if hue < 240.0 {
            (0.0, x, c)
        } else if hue < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(r1), channel(g1), channel(b1))
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({:.1}, {:.1}%, {:.1}%)", self.h, self.s, self.l)
    }
}

/// Horizontal four-stop gradient, evenly spaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub stops: [Rgb; 4],
}

impl Gradient {
    pub const fn new(stops: [Rgb; 4]) -> Self {
        Self { stops }
    }

    /// Color at position `t` (0 = left, 1 = right)
    pub fn sample(&self, t: f32) -> Rgb {
        let segments = (self.stops.len() - 1) as f32;
        let pos = unit(t) * segments;
        let idx = (pos.floor() as usize).min(self.stops.len() - 2);
        self.stops[idx].lerp(self.stops[idx + 1], pos - idx as f32)
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.stops;
        write!(f, "linear-gradient(to right, {}, {}, {}, {})", a, b, c, d)
    }
}

/// Clamps to 0-1, mapping NaN to 0
pub(crate) fn unit(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(Hsl::new(0.0, 100.0, 50.0).to_rgb(), Rgb::new(255, 0, 0));
        assert_eq!(Hsl::new(120.0, 100.0, 50.0).to_rgb(), Rgb::new(0, 255, 0));
        assert_eq!(Hsl::new(240.0, 100.0, 50.0).to_rgb(), Rgb::new(0, 0, 255));
        assert_eq!(Hsl::new(360.0, 100.0, 50.0).to_rgb(), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_hsl_greys() {
        assert_eq!(Hsl::new(200.0, 0.0, 0.0).to_rgb(), Rgb::new(0, 0, 0));
        assert_eq!(Hsl::new(200.0, 0.0, 100.0).to_rgb(), Rgb::new(255, 255, 255));
        assert_eq!(Hsl::new(10.0, 0.0, 50.0).to_rgb(), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_hsl_lerp_endpoints() {
        let start = Hsl::new(220.0, 75.0, 40.0);
        let end = Hsl::new(20.0, 90.0, 55.0);
        assert_eq!(start.lerp(end, 0.0), start);
        assert_eq!(start.lerp(end, 1.0), end);

        let mid = start.lerp(end, 0.5);
        assert!((mid.h - 120.0).abs() < 1e-4);
        assert!((mid.s - 82.5).abs() < 1e-4);
        assert!((mid.l - 47.5).abs() < 1e-4);
    }

    #[test]
    fn test_lerp_clamps_factor() {
        let a = Hsl::new(0.0, 0.0, 0.0);
        let b = Hsl::new(100.0, 100.0, 100.0);
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
        assert_eq!(a.lerp(b, f32::NAN), a);
    }

    #[test]
    fn test_gradient_sample_hits_stops() {
        let gradient = Gradient::new([
            Rgb::new(0, 0, 0),
            Rgb::new(90, 0, 0),
            Rgb::new(180, 0, 0),
            Rgb::new(255, 0, 0),
        ]);
        assert_eq!(gradient.sample(0.0), gradient.stops[0]);
        assert_eq!(gradient.sample(1.0 / 3.0), gradient.stops[1]);
        assert_eq!(gradient.sample(1.0), gradient.stops[3]);
        assert_eq!(gradient.sample(1.0 / 6.0), Rgb::new(45, 0, 0));
    }

    #[test]
    fn test_css_formatting() {
        assert_eq!(Rgb::new(8, 48, 107).to_string(), "rgb(8, 48, 107)");
        let gradient = Gradient::new([Rgb::new(1, 2, 3); 4]);
        assert!(gradient
            .to_string()
            .starts_with("linear-gradient(to right, rgb(1, 2, 3),"));
    }
}

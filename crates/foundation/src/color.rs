/// Marker saturation and lightness; only the hue varies per city.
pub const MARKER_SATURATION: f64 = 1.0;
pub const MARKER_LIGHTNESS: f64 = 0.5;

/// RGB color with channels in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xff) as f64 / 255.0,
            ((hex >> 8) & 0xff) as f64 / 255.0,
            (hex & 0xff) as f64 / 255.0,
        )
    }

    /// Packed `0xRRGGBB`; channels are clamped and rounded.
    pub fn to_hex(self) -> u32 {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }
}

/// Hue, saturation, lightness; every component nominally in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Hue wraps into `[0, 1)`; saturation and lightness clamp to `[0, 1]`.
    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(1.0);
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);

        if h.is_nan() {
            return Rgb::new(f64::NAN, f64::NAN, f64::NAN);
        }
        if s == 0.0 {
            return Rgb::new(l, l, l);
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;
        Rgb::new(
            hue_to_channel(q, p, h + 1.0 / 3.0),
            hue_to_channel(q, p, h),
            hue_to_channel(q, p, h - 1.0 / 3.0),
        )
    }
}

/// Marker tint for a per-city seed. Seeds outside `[0, 1]` wrap; NaN yields NaN channels.
pub fn color_from_seed(seed: f64) -> Rgb {
    Hsl::new(seed, MARKER_SATURATION, MARKER_LIGHTNESS).to_rgb()
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}

#[cfg(test)]
mod tests {
    use super::{Hsl, Rgb, color_from_seed};

    fn assert_rgb_close(a: Rgb, b: Rgb) {
        let d = (a.r - b.r).abs().max((a.g - b.g).abs()).max((a.b - b.b).abs());
        assert!(d <= 1e-9, "expected {a:?} ~= {b:?}");
    }

    #[test]
    fn primary_hues() {
        assert_rgb_close(color_from_seed(0.0), Rgb::new(1.0, 0.0, 0.0));
        assert_rgb_close(color_from_seed(1.0 / 3.0), Rgb::new(0.0, 1.0, 0.0));
        assert_rgb_close(color_from_seed(2.0 / 3.0), Rgb::new(0.0, 0.0, 1.0));
        assert_rgb_close(color_from_seed(0.5), Rgb::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn hue_wraps_at_one() {
        assert_eq!(color_from_seed(0.0), color_from_seed(1.0));
        assert_rgb_close(color_from_seed(1.25), color_from_seed(0.25));
        assert_rgb_close(color_from_seed(-0.75), color_from_seed(0.25));
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(Hsl::new(0.7, 0.0, 0.4).to_rgb(), Rgb::new(0.4, 0.4, 0.4));
    }

    #[test]
    fn saturation_and_lightness_clamp() {
        assert_eq!(Hsl::new(0.1, 3.0, 2.0).to_rgb(), Rgb::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn nan_seed_propagates() {
        assert!(color_from_seed(f64::NAN).r.is_nan());
    }

    #[test]
    fn hex_round_trip_for_line_grey() {
        assert_eq!(Rgb::from_hex(0xcccccc).to_hex(), 0xcccccc);
        assert_eq!(color_from_seed(0.0).to_hex(), 0xff0000);
    }
}

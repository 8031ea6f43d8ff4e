use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-channel mean of a frame in 8-bit HSV space.
///
/// Hue uses the half-degree convention (`0..180`), saturation and value use `0..=255`,
/// so a fully saturated white-free frame and a black frame are directly comparable
/// against thresholds expressed in 8-bit units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorVector {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl ColorVector {
    pub const ZERO: ColorVector = ColorVector {
        hue: 0.0,
        saturation: 0.0,
        value: 0.0,
    };

    pub fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// A vector with only the value channel set. Handy for brightness-only footage.
    pub fn gray(value: f64) -> Self {
        Self::new(0.0, 0.0, value)
    }

    /// Brightness is the V channel.
    pub fn brightness(&self) -> f64 {
        self.value
    }

    pub fn abs_diff(&self, other: &ColorVector) -> ColorVector {
        ColorVector {
            hue: (self.hue - other.hue).abs(),
            saturation: (self.saturation - other.saturation).abs(),
            value: (self.value - other.value).abs(),
        }
    }

    /// Average of the three channels.
    pub fn channel_average(&self) -> f64 {
        (self.hue + self.saturation + self.value) / 3.0
    }
}

/// Convert one RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (r as f64, g as f64, b as f64);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let s = if max > 0.0 { delta * 255.0 / max } else { 0.0 };

    let mut h = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    // 360 degrees folds into 180 so hue fits a byte.
    let h = (h / 2.0).round() as u16 % 180;
    (h as u8, s.round() as u8, max as u8)
}

/// Mean HSV color of a packed RGB24 buffer. Returns `None` for an empty frame.
pub fn mean_hsv(rgb: &[u8], width: u32, height: u32) -> Option<ColorVector> {
    let pixel_count = width as usize * height as usize;
    if pixel_count == 0 || rgb.len() < pixel_count * 3 {
        return None;
    }

    let row_bytes = width as usize * 3;
    let (h, s, v) = rgb[..pixel_count * 3]
        .par_chunks_exact(row_bytes)
        .map(|row| {
            let mut sums = (0u64, 0u64, 0u64);
            for px in row.chunks_exact(3) {
                let (h, s, v) = rgb_to_hsv(px[0], px[1], px[2]);
                sums.0 += h as u64;
                sums.1 += s as u64;
                sums.2 += v as u64;
            }
            sums
        })
        .reduce(|| (0, 0, 0), |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2));

    let n = pixel_count as f64;
    Some(ColorVector::new(h as f64 / n, s as f64 / n, v as f64 / n))
}

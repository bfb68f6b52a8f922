//! Frame brightness sampling and lighting curves.
//!
//! Sources are read through [`ImageSource`], so any decoded image or video
//! frame can be sampled without this crate knowing its concrete type. Only
//! the 32x18 grid is read; no pixel data is retained.

use physique_core::tuning::*;
use physique_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// 8-bit RGB sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// ITU-R BT.601 luma
    pub fn luma(&self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }
}

/// Read access to a decoded image or video frame
pub trait ImageSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Pixel at `(x, y)`; callers keep coordinates inside the frame
    fn sample(&self, x: u32, y: u32) -> Rgb;
}

/// Owned row-major RGB buffer
#[derive(Debug, Clone, PartialEq)]
pub struct RgbFrame {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl RgbFrame {
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::InvalidInput(format!(
                "frame {}x{} needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from packed RGBA bytes (alpha ignored)
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(Error::InvalidInput(format!(
                "RGBA buffer length {} is not a multiple of 4",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }
}

impl ImageSource for RgbFrame {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn sample(&self, x: u32, y: u32) -> Rgb {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Average luma (0..255) over a nearest-neighbour 32x18 sampling grid
///
/// Empty sources report mid-gray.
pub fn sample_average_luma<S: ImageSource + ?Sized>(source: &S) -> f64 {
    let (w, h) = (source.width(), source.height());
    if w == 0 || h == 0 {
        return FALLBACK_LUMA;
    }

    let mut total = 0.0;
    for gy in 0..BRIGHTNESS_SAMPLE_HEIGHT {
        let y = grid_coord(gy, BRIGHTNESS_SAMPLE_HEIGHT, h);
        for gx in 0..BRIGHTNESS_SAMPLE_WIDTH {
            let x = grid_coord(gx, BRIGHTNESS_SAMPLE_WIDTH, w);
            total += source.sample(x, y).luma();
        }
    }

    total / (BRIGHTNESS_SAMPLE_WIDTH * BRIGHTNESS_SAMPLE_HEIGHT) as f64
}

/// Source coordinate at the center of grid cell `cell`
fn grid_coord(cell: u32, cells: u32, extent: u32) -> u32 {
    let pos = ((cell as f64 + 0.5) * extent as f64 / cells as f64) as u32;
    pos.min(extent - 1)
}

/// Confidence sub-score (0..20) for an average luma
///
/// Full marks inside 60..=200; mild underexposure ramps 4..20, mild
/// overexposure ramps 20..8; severe exposure floors at 4 (dark) or 8 (bright).
pub fn brightness_score(luma: f64) -> f64 {
    exposure_curve(luma, CONFIDENCE_BRIGHTNESS_MAX, 4.0, 8.0)
}

/// Classifier lighting score (0..100), same breakpoints as [`brightness_score`]
pub fn lighting_score(luma: f64) -> f64 {
    exposure_curve(luma, 100.0, 20.0, 30.0)
}

fn exposure_curve(luma: f64, max: f64, dark_floor: f64, bright_floor: f64) -> f64 {
    if (LUMA_IDEAL_MIN..=LUMA_IDEAL_MAX).contains(&luma) {
        max
    } else if luma < LUMA_SEVERE_DARK {
        dark_floor
    } else if luma > LUMA_SEVERE_BRIGHT {
        bright_floor
    } else if luma < LUMA_IDEAL_MIN {
        let t = (luma - LUMA_SEVERE_DARK) / (LUMA_IDEAL_MIN - LUMA_SEVERE_DARK);
        dark_floor + t * (max - dark_floor)
    } else {
        let t = (luma - LUMA_IDEAL_MAX) / (LUMA_SEVERE_BRIGHT - LUMA_IDEAL_MAX);
        max - t * (max - bright_floor)
    }
}

/// Coarse exposure verdict used for photo warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exposure {
    TooDark,
    Normal,
    Overexposed,
}

impl Exposure {
    pub fn from_luma(luma: f64) -> Self {
        if luma < LUMA_WARN_DARK {
            Exposure::TooDark
        } else if luma > LUMA_WARN_BRIGHT {
            Exposure::Overexposed
        } else {
            Exposure::Normal
        }
    }
}

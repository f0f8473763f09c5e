use image::RgbaImage;
use crate::error::{MonitorError, Result};

/// Default distance, in pixels of buffer order, between two samples
pub const DEFAULT_SAMPLE_STRIDE: usize = 5;

/// One retained pixel with its colour in RGB and HSV
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
    /// Hue in degrees, `[0, 360)`; 0 for greys
    pub h: f64,
    pub s: f64,
    pub v: f64,
    pub x: u32,
    pub y: u32,
}

impl PixelSample {
    pub fn new(r: u8, g: u8, b: u8, a: u8, x: u32, y: u32) -> Self {
        let (h, s, v) = rgb_to_hsv(r, g, b);
        Self { r, g, b, a, h, s, v, x, y }
    }

    pub fn brightness(&self) -> f64 {
        (self.r as f64 + self.g as f64 + self.b as f64) / 3.0
    }

    /// Sum of absolute per-channel differences
    pub fn edge_strength(&self, previous: &PixelSample) -> u32 {
        self.r.abs_diff(previous.r) as u32
            + self.g.abs_diff(previous.g) as u32
            + self.b.abs_diff(previous.b) as u32
    }
}

/// Standard RGB to HSV conversion on 8-bit channels
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (rf, gf, bf) = (r as f64, g as f64, b as f64);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = max / 255.0;
    if delta == 0.0 {
        return (0.0, 0.0, v);
    }

    let s = delta / max;
    let mut h = if max == rf {
        60.0 * (((gf - bf) / delta) % 6.0)
    } else if max == gf {
        60.0 * (((bf - rf) / delta) + 2.0)
    } else {
        60.0 * (((rf - gf) / delta) + 4.0)
    };
    if h < 0.0 {
        h += 360.0;
    }
    (h, s, v)
}

/// Walks an RGBA buffer at a fixed stride in buffer order, skipping fully
/// transparent pixels.
///
/// Stride is applied to the flat pixel index, so rows are not sampled
/// uniformly when the width is not a multiple of the stride.
#[derive(Debug, Clone)]
pub struct PixelSampler<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
    next_pixel: usize,
}

impl<'a> PixelSampler<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32, stride: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MonitorError::EmptyImage { width, height });
        }
        if stride == 0 {
            return Err(MonitorError::InvalidParameter {
                parameter: "sample_stride".to_string(),
                value: stride.to_string(),
            });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(MonitorError::InvalidBuffer {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
            stride,
            next_pixel: 0,
        })
    }

    pub fn from_image(image: &'a RgbaImage, stride: usize) -> Result<Self> {
        Self::new(image.as_raw(), image.width(), image.height(), stride)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl Iterator for PixelSampler<'_> {
    type Item = PixelSample;

    fn next(&mut self) -> Option<PixelSample> {
        let pixel_count = self.width as usize * self.height as usize;
        while self.next_pixel < pixel_count {
            let pixel = self.next_pixel;
            self.next_pixel += self.stride;

            let offset = pixel * 4;
            let a = self.data[offset + 3];
            if a == 0 {
                continue;
            }

            let x = (pixel % self.width as usize) as u32;
            let y = (pixel / self.width as usize) as u32;
            return Some(PixelSample::new(
                self.data[offset],
                self.data[offset + 1],
                self.data[offset + 2],
                a,
                x,
                y,
            ));
        }
        None
    }
}

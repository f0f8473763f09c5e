use image::RgbaImage;
use tracing::debug;
use crate::{
    algorithms::sampling::{DEFAULT_SAMPLE_STRIDE, PixelSample, PixelSampler},
    error::Result,
    traits::FeatureExtractor,
    types::{ImageFeatures, RegionSummary},
};

/// Edge strength above which a pair of consecutive samples counts as an edge
pub const DEFAULT_EDGE_THRESHOLD: u32 = 50;

const DARK_BRIGHTNESS: f64 = 60.0;
const BRIGHT_BRIGHTNESS: f64 = 200.0;
const LOWER_BAND_LIMIT: f64 = 0.33;
const UPPER_BAND_LIMIT: f64 = 0.67;

/// Hue inside the red wedge around 0/360 degrees
pub fn is_red_hue(h: f64) -> bool {
    h <= 30.0 || h >= 330.0
}

fn is_red_dominant(sample: &PixelSample) -> bool {
    is_red_hue(sample.h) && sample.s > 0.3 && sample.v > 0.3
}

fn is_pink(sample: &PixelSample) -> bool {
    is_red_dominant(sample)
        && sample.r > 200
        && sample.g > 150
        && sample.g < 200
        && sample.b > 150
}

fn is_brown(sample: &PixelSample) -> bool {
    (15.0..=45.0).contains(&sample.h)
        && sample.s > 0.2
        && sample.s < 0.6
        && sample.v > 0.2
        && sample.v < 0.7
}

fn is_white(sample: &PixelSample) -> bool {
    sample.s < 0.2 && sample.v > 0.7
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    fn locate(position: u32, extent: u32) -> Self {
        let normalized = position as f64 / extent as f64;
        if normalized < LOWER_BAND_LIMIT {
            Band::Low
        } else if normalized > UPPER_BAND_LIMIT {
            Band::High
        } else {
            Band::Mid
        }
    }

    fn index(self) -> usize {
        match self {
            Band::Low => 0,
            Band::Mid => 1,
            Band::High => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BandAccumulator {
    count: u64,
    brightness_sum: f64,
    hue_sum: f64,
    red_count: u64,
}

impl BandAccumulator {
    fn push(&mut self, sample: &PixelSample) {
        self.count += 1;
        self.brightness_sum += sample.brightness();
        self.hue_sum += sample.h;
        if is_red_hue(sample.h) && sample.s > 0.3 {
            self.red_count += 1;
        }
    }

    fn summary(&self) -> RegionSummary {
        if self.count == 0 {
            return RegionSummary::default();
        }
        let n = self.count as f64;
        RegionSummary {
            avg_brightness: self.brightness_sum / n,
            avg_hue: self.hue_sum / n,
            red_ratio: self.red_count as f64 / n,
        }
    }
}

/// Folds a stream of retained samples into an [`ImageFeatures`] record.
///
/// The previous-sample reference used for contrast and edges is the last
/// *retained* sample; transparent pixels in between do not reset it.
#[derive(Debug, Clone)]
pub struct FeatureAggregator {
    edge_threshold: u32,
    retained: u64,
    red_sum: f64,
    green_sum: f64,
    blue_sum: f64,
    hue_sum: f64,
    saturation_sum: f64,
    value_sum: f64,
    dark: u64,
    bright: u64,
    mid: u64,
    red_dominant: u64,
    pink: u64,
    brown: u64,
    white: u64,
    contrast_sum: f64,
    edges: u64,
    previous: Option<PixelSample>,
    rows: [BandAccumulator; 3],
    columns: [BandAccumulator; 3],
}

impl Default for FeatureAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_EDGE_THRESHOLD)
    }
}

impl FeatureAggregator {
    pub fn new(edge_threshold: u32) -> Self {
        Self {
            edge_threshold,
            retained: 0,
            red_sum: 0.0,
            green_sum: 0.0,
            blue_sum: 0.0,
            hue_sum: 0.0,
            saturation_sum: 0.0,
            value_sum: 0.0,
            dark: 0,
            bright: 0,
            mid: 0,
            red_dominant: 0,
            pink: 0,
            brown: 0,
            white: 0,
            contrast_sum: 0.0,
            edges: 0,
            previous: None,
            rows: [BandAccumulator::default(); 3],
            columns: [BandAccumulator::default(); 3],
        }
    }

    /// Account for one retained sample of an image of the given size
    pub fn push(&mut self, sample: &PixelSample, width: u32, height: u32) {
        self.retained += 1;
        self.red_sum += sample.r as f64;
        self.green_sum += sample.g as f64;
        self.blue_sum += sample.b as f64;
        self.hue_sum += sample.h;
        self.saturation_sum += sample.s;
        self.value_sum += sample.v;

        let brightness = sample.brightness();
        if brightness < DARK_BRIGHTNESS {
            self.dark += 1;
        } else if brightness > BRIGHT_BRIGHTNESS {
            self.bright += 1;
        } else {
            self.mid += 1;
        }

        if is_red_dominant(sample) {
            self.red_dominant += 1;
            if is_pink(sample) {
                self.pink += 1;
            }
        }
        if is_brown(sample) {
            self.brown += 1;
        }
        if is_white(sample) {
            self.white += 1;
        }

        if let Some(previous) = &self.previous {
            let strength = sample.edge_strength(previous);
            self.contrast_sum += strength as f64;
            if strength > self.edge_threshold {
                self.edges += 1;
            }
        }
        self.previous = Some(*sample);

        self.rows[Band::locate(sample.y, height).index()].push(sample);
        self.columns[Band::locate(sample.x, width).index()].push(sample);
    }

    /// Number of samples accounted for so far
    pub fn retained(&self) -> u64 {
        self.retained
    }

    /// Mean brightness of the retained samples (0 when nothing was retained)
    pub fn mean_brightness(&self) -> f64 {
        if self.retained == 0 {
            return 0.0;
        }
        (self.red_sum + self.green_sum + self.blue_sum) / (3.0 * self.retained as f64)
    }

    /// Produce the feature record; `variance_sum` is the sum of squared
    /// deviations of sample brightness from [`Self::mean_brightness`].
    pub fn finish(&self, width: u32, height: u32, variance_sum: f64) -> ImageFeatures {
        let aspect_ratio = width as f64 / height as f64;
        let mut features = ImageFeatures {
            aspect_ratio,
            is_portrait: height > width,
            is_square: (aspect_ratio - 1.0).abs() < 0.1,
            width,
            height,
            total_pixels: width as u64 * height as u64,
            sampled_pixels: self.retained,
            ..ImageFeatures::default()
        };
        if self.retained == 0 {
            return features;
        }

        let n = self.retained as f64;
        features.avg_red = self.red_sum / n;
        features.avg_green = self.green_sum / n;
        features.avg_blue = self.blue_sum / n;
        features.brightness = (features.avg_red + features.avg_green + features.avg_blue) / 3.0;
        features.avg_hue = self.hue_sum / n;
        features.avg_saturation = self.saturation_sum / n;
        features.avg_value = self.value_sum / n;

        features.red_ratio = self.red_dominant as f64 / n;
        features.pink_ratio = self.pink as f64 / n;
        features.brown_ratio = self.brown as f64 / n;
        features.white_ratio = self.white as f64 / n;
        features.dark_ratio = self.dark as f64 / n;
        features.bright_ratio = self.bright as f64 / n;
        features.mid_ratio = self.mid as f64 / n;

        features.contrast = self.contrast_sum / n;
        features.color_variance = variance_sum / n;
        features.edge_density = self.edges as f64 / n;

        features.top_region = self.rows[0].summary();
        features.middle_region = self.rows[1].summary();
        features.bottom_region = self.rows[2].summary();
        features.left_region = self.columns[0].summary();
        features.center_region = self.columns[1].summary();
        features.right_region = self.columns[2].summary();

        features
    }
}

/// Run both aggregation passes over a sampler
pub fn aggregate(sampler: PixelSampler<'_>, edge_threshold: u32) -> ImageFeatures {
    let (width, height) = (sampler.width(), sampler.height());

    let mut aggregator = FeatureAggregator::new(edge_threshold);
    for sample in sampler.clone() {
        aggregator.push(&sample, width, height);
    }

    let mean = aggregator.mean_brightness();
    let variance_sum: f64 = sampler
        .map(|sample| (sample.brightness() - mean).powi(2))
        .sum();

    aggregator.finish(width, height, variance_sum)
}

/// Default extractor: strided sampling followed by aggregation
#[derive(Debug, Clone)]
pub struct StridedFeatureExtractor {
    pub stride: usize,
    pub edge_threshold: u32,
}

impl Default for StridedFeatureExtractor {
    fn default() -> Self {
        Self {
            stride: DEFAULT_SAMPLE_STRIDE,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
        }
    }
}

impl FeatureExtractor for StridedFeatureExtractor {
    fn extract(&self, image: &RgbaImage) -> Result<ImageFeatures> {
        let sampler = PixelSampler::from_image(image, self.stride)?;
        let features = aggregate(sampler, self.edge_threshold);
        debug!(
            brightness = features.brightness.round(),
            saturation = %format!("{:.2}", features.avg_saturation),
            hue = features.avg_hue.round(),
            white_ratio = %format!("{:.2}", features.white_ratio),
            red_ratio = %format!("{:.2}", features.red_ratio),
            pink_ratio = %format!("{:.2}", features.pink_ratio),
            dark_ratio = %format!("{:.2}", features.dark_ratio),
            contrast = features.contrast.round(),
            is_portrait = features.is_portrait,
            "Image features"
        );
        Ok(features)
    }
}

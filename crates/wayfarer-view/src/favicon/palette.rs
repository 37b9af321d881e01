//! Dominant "vibrant" colour extraction from favicon bytes.
//!
//! Pixels are quantised into 5-bit-per-channel buckets. Each bucket's mean
//! colour is scored on closeness to a saturated mid-luminance target plus
//! its share of the image; the best bucket inside the vibrant range wins.

use std::collections::HashMap;

use wayfarer_common::Color;

use crate::error::ViewError;

const MIN_SATURATION: f64 = 0.35;
const MIN_LUMA: f64 = 0.3;
const MAX_LUMA: f64 = 0.7;
const TARGET_LUMA: f64 = 0.5;

const WEIGHT_SATURATION: f64 = 3.0;
const WEIGHT_LUMA: f64 = 6.5;
const WEIGHT_POPULATION: f64 = 0.5;

#[derive(Default)]
struct Bucket {
    count: u64,
    r: u64,
    g: u64,
    b: u64,
}

impl Bucket {
    fn mean(&self) -> Color {
        Color::from_rgb(
            (self.r / self.count) as u8,
            (self.g / self.count) as u8,
            (self.b / self.count) as u8,
        )
    }
}

/// Returns `Ok(None)` when the image decodes but has no vibrant colour.
pub fn vibrant_color(bytes: &[u8]) -> Result<Option<Color>, ViewError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| ViewError::Decode(e.to_string()))?
        .to_rgba8();

    let mut buckets: HashMap<(u8, u8, u8), Bucket> = HashMap::new();
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < 125 || (r > 250 && g > 250 && b > 250) {
            continue;
        }
        let bucket = buckets.entry((r >> 3, g >> 3, b >> 3)).or_default();
        bucket.count += 1;
        bucket.r += u64::from(r);
        bucket.g += u64::from(g);
        bucket.b += u64::from(b);
    }

    let max_population = buckets.values().map(|b| b.count).max().unwrap_or(0);
    if max_population == 0 {
        return Ok(None);
    }

    let best = buckets
        .values()
        .filter_map(|bucket| {
            let color = bucket.mean();
            let (saturation, luma) = saturation_and_lightness(color);
            if saturation < MIN_SATURATION || !(MIN_LUMA..=MAX_LUMA).contains(&luma) {
                return None;
            }
            let score = (closeness(saturation, 1.0) * WEIGHT_SATURATION
                + closeness(luma, TARGET_LUMA) * WEIGHT_LUMA
                + (bucket.count as f64 / max_population as f64) * WEIGHT_POPULATION)
                / (WEIGHT_SATURATION + WEIGHT_LUMA + WEIGHT_POPULATION);
            Some((score, color))
        })
        .max_by(|a, b| a.0.total_cmp(&b.0));

    Ok(best.map(|(_, color)| color))
}

fn closeness(value: f64, target: f64) -> f64 {
    1.0 - (value - target).abs()
}

/// HSL saturation and lightness, both in `[0, 1]`.
fn saturation_and_lightness(color: Color) -> (f64, f64) {
    let r = f64::from(color.r) / 255.0;
    let g = f64::from(color.g) / 255.0;
    let b = f64::from(color.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    if (max - min).abs() < f64::EPSILON {
        return (0.0, lightness);
    }
    let delta = max - min;
    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    (saturation, lightness)
}

use serde::Serialize;

use crate::model::bucket::CategoryBucket;
use crate::model::profile::LegendProfile;
use crate::report::to_fixed;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    #[error("invalid domain [{min}, {max}]")]
    InvalidDomain { min: f64, max: f64 },
    #[error("bucket count must be at least 1")]
    InvalidBucketCount,
    #[error("value {value} outside domain [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
    #[error("cannot derive a domain from an empty dataset")]
    EmptyDataset,
}

fn check_domain(min: f64, max: f64, bucket_count: u32) -> Result<(), ClassifyError> {
    if bucket_count == 0 {
        return Err(ClassifyError::InvalidBucketCount);
    }
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(ClassifyError::InvalidDomain { min, max });
    }
    Ok(())
}

/// The top edge is closed, so `max` lands in the last bucket.
pub fn classify(
    min: f64,
    max: f64,
    bucket_count: u32,
    value: f64,
) -> Result<CategoryBucket, ClassifyError> {
    check_domain(min, max, bucket_count)?;
    if value.is_nan() || value < min || value > max {
        return Err(ClassifyError::OutOfRange { value, min, max });
    }
    if value == max {
        return Ok(CategoryBucket::new(bucket_count));
    }
    let (lo, hi, v) = if (max - min).is_finite() {
        (min, max, value)
    } else {
        (min / 2.0, max / 2.0, value / 2.0)
    };
    let width = (hi - lo) / bucket_count as f64;
    let offset = ((v - lo) / width).floor();
    let index = if offset >= bucket_count as f64 {
        bucket_count
    } else {
        offset as u32 + 1
    };
    Ok(CategoryBucket::new(index.min(bucket_count)))
}

pub fn tick_values(min: f64, max: f64, bucket_count: u32) -> Result<Vec<f64>, ClassifyError> {
    check_domain(min, max, bucket_count)?;
    let n = bucket_count as f64;
    let ticks = (0..=bucket_count)
        .map(|i| {
            let t = i as f64 / n;
            let raw = if i == bucket_count {
                max
            } else if (max - min).is_finite() {
                (min + (max - min) * (i as f64) / n).min(max)
            } else {
                (min * (1.0 - t) + max * t).clamp(min, max)
            };
            round_to_tenth(raw)
        })
        .collect();
    Ok(ticks)
}

pub fn scaled_tick_values(
    min: f64,
    max: f64,
    bucket_count: u32,
    divisor: f64,
) -> Result<Vec<f64>, ClassifyError> {
    let ticks = tick_values(min, max, bucket_count)?;
    Ok(ticks.into_iter().map(|t| t / divisor).collect())
}

pub fn round_to_tenth(value: f64) -> f64 {
    to_fixed(value, 1).parse::<f64>().unwrap_or(value)
}

pub fn extent<I>(values: I) -> Result<(f64, f64), ClassifyError>
where
    I: IntoIterator<Item = f64>,
{
    let mut bounds: Option<(f64, f64)> = None;
    for v in values.into_iter().filter(|v| v.is_finite()) {
        bounds = Some(match bounds {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }
    bounds.ok_or(ClassifyError::EmptyDataset)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendCell {
    pub bucket: CategoryBucket,
    pub color: &'static str,
    pub x: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendTick {
    pub value: f64,
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub width: f64,
    pub height: f64,
    pub cells: Vec<LegendCell>,
    pub ticks: Vec<LegendTick>,
}

#[derive(Debug, Clone)]
pub struct Classifier {
    pub min: f64,
    pub max: f64,
    colors: &'static [&'static str],
}

impl Classifier {
    pub fn new(min: f64, max: f64, colors: &'static [&'static str]) -> Result<Self, ClassifyError> {
        check_domain(min, max, colors.len() as u32)?;
        Ok(Self { min, max, colors })
    }

    pub fn from_values<I>(values: I, colors: &'static [&'static str]) -> Result<Self, ClassifyError>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = extent(values)?;
        Self::new(min, max, colors)
    }

    pub fn bucket_count(&self) -> u32 {
        self.colors.len() as u32
    }

    pub fn bucket(&self, value: f64) -> Result<CategoryBucket, ClassifyError> {
        classify(self.min, self.max, self.bucket_count(), value)
    }

    pub fn color_of(&self, bucket: CategoryBucket) -> &'static str {
        self.colors[bucket.offset().min(self.colors.len() - 1)]
    }

    #[cfg(test)]
    pub fn color(&self, value: f64) -> Result<&'static str, ClassifyError> {
        Ok(self.color_of(self.bucket(value)?))
    }

    pub fn legend(&self, profile: &LegendProfile) -> Result<Legend, ClassifyError> {
        let n = self.bucket_count();
        let cell_width = profile.width / n as f64;
        let cells = (1..=n)
            .map(|i| {
                let bucket = CategoryBucket::new(i);
                LegendCell {
                    bucket,
                    color: self.color_of(bucket),
                    x: (i - 1) as f64 * cell_width,
                    width: cell_width,
                }
            })
            .collect();

        let lo = self.min / profile.tick_divisor;
        let hi = self.max / profile.tick_divisor;
        let span = hi - lo;
        let rounded = tick_values(self.min, self.max, n)?;
        let scaled = scaled_tick_values(self.min, self.max, n, profile.tick_divisor)?;
        let ticks = rounded
            .into_iter()
            .zip(scaled)
            .map(|(rounded, value)| {
                let position = if span > 0.0 {
                    (value - lo) / span * profile.width
                } else {
                    0.0
                };
                LegendTick {
                    value,
                    position,
                    label: format!(
                        "{}{}",
                        to_fixed(rounded, profile.tick_decimals),
                        profile.tick_suffix
                    ),
                }
            })
            .collect();

        Ok(Legend {
            width: profile.width,
            height: profile.height,
            cells,
            ticks,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_classify.rs"]
mod tests;

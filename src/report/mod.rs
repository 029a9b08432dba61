pub mod json;
pub mod text;

#[derive(Debug, Clone)]
pub struct BucketStat {
    pub label: String,
    pub color: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct ReportContext {
    pub chart: &'static str,
    pub title: String,
    pub n_marks: usize,
    pub n_unmatched: usize,
    pub duplicate_keys: usize,
    pub out_of_range: usize,
    pub domain: Option<(f64, f64)>,
    pub values: Vec<f64>,
    pub buckets: Vec<BucketStat>,
    pub notes: Vec<String>,
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

/// Formats like `Number.prototype.toFixed`: exact halves round away from
/// zero, everything else to the nearest representation.
pub fn to_fixed(value: f64, digits: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    let magnitude = value.abs();
    let scaled_pow2 = magnitude * 2f64.powi(digits as i32 + 1);
    let is_tie = scaled_pow2.fract() == 0.0 && scaled_pow2 % 2.0 == 1.0;
    if !is_tie || !magnitude.is_finite() {
        return format!("{:.*}", digits, value);
    }
    let units = (magnitude * 10f64.powi(digits as i32)).ceil() as u64;
    let mut body = units.to_string();
    if digits > 0 {
        if body.len() <= digits {
            body = format!("{}{}", "0".repeat(digits + 1 - body.len()), body);
        }
        body.insert(body.len() - digits, '.');
    }
    if value < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}

pub fn quantile_indexed(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    let idx = ((n - 1) as f64 * p).ceil() as usize;
    sorted[idx]
}

pub fn median(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.5)
}

pub fn p10(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.10)
}

pub fn p90(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.90)
}

pub fn fraction(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;

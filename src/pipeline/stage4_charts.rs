use serde::Serialize;

use crate::input::datasets::{
    AREA_NAME, BACHELORS_OR_HIGHER, COUNTIES_OBJECT, EDUCATION, FIPS, GlobalTemperature, MONTH,
    STATE, STATES_OBJECT, TEMPERATURE, VARIANCE, YEAR,
};
use crate::input::topology::{Feature, Geometry, Topology};
use crate::input::{InputError, Record};
use crate::model::bucket::CategoryBucket;
use crate::model::palette::ordinal_color;
use crate::model::profile::ChartProfile;
use crate::model::rect::Rectangle;
use crate::model::tree::TreeNode;
use crate::pipeline::stage1_normalize::{
    JoinKey, derive_field, index_by, index_by_fields, join, normalize, number_field, text_field,
};
use crate::pipeline::stage2_classify::{ClassifyError, Classifier, Legend};
use crate::pipeline::stage3_layout::{LaidOutNode, LayoutError, layout};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("classification failed: {0}")]
    Classify(#[from] ClassifyError),
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct CountyMark {
    pub fips: Option<JoinKey>,
    pub area_name: Option<String>,
    pub state: Option<String>,
    pub education: Option<f64>,
    pub bucket: Option<CategoryBucket>,
    pub color: Option<&'static str>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethChart {
    pub title: String,
    pub description: String,
    pub width: f64,
    pub height: f64,
    pub min: f64,
    pub max: f64,
    pub counties: Vec<CountyMark>,
    pub states: Vec<Feature>,
    pub legend: Legend,
    pub join_misses: usize,
    pub duplicate_keys: usize,
    pub out_of_range: usize,
}

pub fn build_choropleth(
    topology: &Topology,
    education: &[Record],
    profile: &ChartProfile,
) -> Result<ChoroplethChart, ChartError> {
    let counties = topology.features(COUNTIES_OBJECT)?;
    let states = topology.features(STATES_OBJECT)?;

    let records = normalize(education, &[(BACHELORS_OR_HIGHER, EDUCATION)]);
    let classifier = Classifier::from_values(
        records.iter().filter_map(|r| number_field(r, EDUCATION)),
        profile.colors,
    )?;
    let index = index_by(&records, FIPS);
    let joined = join(counties, &index, "id");

    let join_misses = joined.misses;
    let mut out_of_range = 0usize;
    let counties = joined
        .features
        .into_iter()
        .map(|j| {
            let record = j.record.as_ref();
            let education = record.and_then(|r| number_field(r, EDUCATION));
            let bucket = education.and_then(|v| bucket_or_warn(&classifier, v, &mut out_of_range));
            CountyMark {
                fips: j.key,
                area_name: record.and_then(|r| text_field(r, AREA_NAME)).map(str::to_string),
                state: record.and_then(|r| text_field(r, STATE)).map(str::to_string),
                education,
                bucket,
                color: bucket.map(|b| classifier.color_of(b)),
                geometry: j.feature.geometry,
            }
        })
        .collect::<Vec<_>>();

    let legend = classifier.legend(&profile.legend)?;
    tracing::info!(
        counties = counties.len(),
        states = states.len(),
        min = classifier.min,
        max = classifier.max,
        join_misses,
        "choropleth assembled"
    );

    Ok(ChoroplethChart {
        title: profile.title.clone(),
        description: profile.description.clone(),
        width: profile.width,
        height: profile.height,
        min: classifier.min,
        max: classifier.max,
        counties,
        states,
        legend,
        join_misses,
        duplicate_keys: index.duplicates,
        out_of_range,
    })
}

fn bucket_or_warn(classifier: &Classifier, value: f64, out_of_range: &mut usize) -> Option<CategoryBucket> {
    match classifier.bucket(value) {
        Ok(bucket) => Some(bucket),
        Err(err) => {
            *out_of_range += 1;
            tracing::warn!(%err, "value left unclassified");
            None
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatCell {
    pub year: i64,
    pub month: u32,
    pub month_name: &'static str,
    pub variance: f64,
    pub temperature: f64,
    pub bucket: Option<CategoryBucket>,
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatMapChart {
    pub title: String,
    pub description: String,
    pub width: f64,
    pub height: f64,
    pub base_temperature: f64,
    pub first_year: i64,
    pub last_year: i64,
    pub min: f64,
    pub max: f64,
    pub cells: Vec<HeatCell>,
    pub legend: Legend,
    pub duplicate_keys: usize,
    pub skipped: usize,
}

pub fn build_heatmap(data: &GlobalTemperature, profile: &ChartProfile) -> Result<HeatMapChart, ChartError> {
    let base = data.base_temperature;
    let mut records = data.monthly_variance.clone();
    derive_field(&mut records, VARIANCE, TEMPERATURE, |v| base + v);
    let index = index_by_fields(&records, &[YEAR, MONTH]);

    let mut skipped = index.unkeyed;
    let mut cells = Vec::with_capacity(index.len());
    for (_, record) in index.iter() {
        match heat_cell(record) {
            Some(cell) => cells.push(cell),
            None => skipped += 1,
        }
    }
    cells.sort_by_key(|c| (c.year, c.month));
    if skipped > 0 {
        tracing::warn!(skipped, "monthly records without a usable year, month or variance");
    }

    let classifier = Classifier::from_values(cells.iter().map(|c| c.temperature), profile.colors)?;
    let mut out_of_range = 0usize;
    for cell in &mut cells {
        cell.bucket = bucket_or_warn(&classifier, cell.temperature, &mut out_of_range);
        cell.color = cell.bucket.map(|b| classifier.color_of(b));
    }

    let first_year = cells.first().map(|c| c.year).unwrap_or_default();
    let last_year = cells.last().map(|c| c.year).unwrap_or_default();
    let legend = classifier.legend(&profile.legend)?;
    tracing::info!(cells = cells.len(), first_year, last_year, "heat map assembled");

    Ok(HeatMapChart {
        title: profile.title.clone(),
        description: format!(
            "{first_year} - {last_year}: base temperature {base}\u{b0}C"
        ),
        width: profile.width,
        height: profile.height,
        base_temperature: base,
        first_year,
        last_year,
        min: classifier.min,
        max: classifier.max,
        cells,
        legend,
        duplicate_keys: index.duplicates,
        skipped: skipped + out_of_range,
    })
}

fn heat_cell(record: &Record) -> Option<HeatCell> {
    let year = number_field(record, YEAR)?;
    let month = number_field(record, MONTH)?;
    if year.fract() != 0.0 || month.fract() != 0.0 || !(1.0..=12.0).contains(&month) {
        return None;
    }
    let month = month as u32;
    Some(HeatCell {
        year: year as i64,
        month,
        month_name: MONTH_NAMES[(month - 1) as usize],
        variance: number_field(record, VARIANCE)?,
        temperature: number_field(record, TEMPERATURE)?,
        bucket: None,
        color: None,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeMapTile {
    pub name: String,
    pub category: String,
    pub value: f64,
    pub rect: Rectangle,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub category: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeMapChart {
    pub title: String,
    pub description: String,
    pub width: f64,
    pub height: f64,
    pub total: f64,
    pub root: LaidOutNode,
    pub tiles: Vec<TreeMapTile>,
    pub legend: Vec<CategoryEntry>,
}

pub fn build_treemap(root: &TreeNode, profile: &ChartProfile) -> Result<TreeMapChart, ChartError> {
    let laid_out = layout(root, profile.width, profile.height, profile.padding, profile.tiling)?;

    let mut legend: Vec<CategoryEntry> = Vec::new();
    let mut tiles = Vec::new();
    for leaf in laid_out.leaves() {
        let category = leaf.category.as_deref().unwrap_or(UNCATEGORIZED);
        let color = match legend.iter().find(|e| e.category == category) {
            Some(entry) => entry.color,
            None => {
                let color = ordinal_color(profile.colors, legend.len());
                legend.push(CategoryEntry {
                    category: category.to_string(),
                    color,
                });
                color
            }
        };
        tiles.push(TreeMapTile {
            name: leaf.name.clone(),
            category: category.to_string(),
            value: leaf.value,
            rect: leaf.rect,
            color,
        });
    }
    tracing::info!(
        tiles = tiles.len(),
        categories = legend.len(),
        depth = laid_out.height(),
        "treemap assembled"
    );

    Ok(TreeMapChart {
        title: profile.title.clone(),
        description: profile.description.clone(),
        width: profile.width,
        height: profile.height,
        total: laid_out.value,
        root: laid_out,
        tiles,
        legend,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_charts.rs"]
mod tests;

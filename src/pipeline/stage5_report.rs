use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::model::bucket::CategoryBucket;
use crate::pipeline::stage2_classify::Legend;
use crate::pipeline::stage4_charts::{ChartError, ChoroplethChart, HeatMapChart, TreeMapChart};
use crate::report::json::render_json;
use crate::report::text::render_report_text;
use crate::report::{BucketStat, ReportContext};

pub fn write_choropleth(chart: &ChoroplethChart, out_dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
    let ctx = choropleth_context(chart);
    write_chart(chart, &ctx, out_dir)
}

pub fn write_heatmap(chart: &HeatMapChart, out_dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
    let ctx = heatmap_context(chart);
    write_chart(chart, &ctx, out_dir)
}

pub fn write_treemap(chart: &TreeMapChart, out_dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
    let ctx = treemap_context(chart);
    write_chart(chart, &ctx, out_dir)
}

fn write_chart<T: Serialize>(
    chart: &T,
    ctx: &ReportContext,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ChartError> {
    fs::create_dir_all(out_dir)?;

    let json_path = out_dir.join(format!("{}.json", ctx.chart));
    write_text(&json_path, &render_json(chart)?)?;

    let report_path = out_dir.join(format!("{}_report.txt", ctx.chart));
    write_text(&report_path, &render_report_text(ctx))?;

    tracing::info!(
        json = %json_path.display(),
        report = %report_path.display(),
        "reports written"
    );
    Ok(vec![json_path, report_path])
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

pub fn choropleth_context(chart: &ChoroplethChart) -> ReportContext {
    let mut notes = Vec::new();
    if chart.join_misses > 0 {
        notes.push(format!(
            "{} counties have no education record and are drawn without fill",
            chart.join_misses
        ));
    }
    ReportContext {
        chart: "choropleth",
        title: chart.title.clone(),
        n_marks: chart.counties.len(),
        n_unmatched: chart.join_misses,
        duplicate_keys: chart.duplicate_keys,
        out_of_range: chart.out_of_range,
        domain: Some((chart.min, chart.max)),
        values: chart.counties.iter().filter_map(|c| c.education).collect(),
        buckets: bucket_stats(&chart.legend, chart.counties.iter().map(|c| c.bucket)),
        notes,
    }
}

pub fn heatmap_context(chart: &HeatMapChart) -> ReportContext {
    let mut notes = vec![format!(
        "years {}-{}, base temperature {}",
        chart.first_year, chart.last_year, chart.base_temperature
    )];
    if chart.skipped > 0 {
        notes.push(format!("{} monthly records skipped", chart.skipped));
    }
    ReportContext {
        chart: "heatmap",
        title: chart.title.clone(),
        n_marks: chart.cells.len(),
        n_unmatched: 0,
        duplicate_keys: chart.duplicate_keys,
        out_of_range: chart.cells.iter().filter(|c| c.bucket.is_none()).count(),
        domain: Some((chart.min, chart.max)),
        values: chart.cells.iter().map(|c| c.temperature).collect(),
        buckets: bucket_stats(&chart.legend, chart.cells.iter().map(|c| c.bucket)),
        notes,
    }
}

pub fn treemap_context(chart: &TreeMapChart) -> ReportContext {
    let buckets = chart
        .legend
        .iter()
        .map(|entry| BucketStat {
            label: entry.category.clone(),
            color: entry.color,
            count: chart
                .tiles
                .iter()
                .filter(|t| t.category == entry.category)
                .count(),
        })
        .collect();
    let zero_tiles = chart.tiles.iter().filter(|t| t.rect.area() <= 0.0).count();
    let mut notes = vec![format!("total value {}", chart.total)];
    if zero_tiles > 0 {
        notes.push(format!("{zero_tiles} tiles have zero area"));
    }
    ReportContext {
        chart: "treemap",
        title: chart.title.clone(),
        n_marks: chart.tiles.len(),
        n_unmatched: 0,
        duplicate_keys: 0,
        out_of_range: 0,
        domain: None,
        values: chart.tiles.iter().map(|t| t.value).collect(),
        buckets,
        notes,
    }
}

fn bucket_stats<I>(legend: &Legend, assigned: I) -> Vec<BucketStat>
where
    I: Iterator<Item = Option<CategoryBucket>>,
{
    let mut counts = vec![0usize; legend.cells.len()];
    for bucket in assigned.flatten() {
        if let Some(slot) = counts.get_mut(bucket.offset()) {
            *slot += 1;
        }
    }
    legend
        .cells
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (cell, count))| {
            let label = match (legend.ticks.get(i), legend.ticks.get(i + 1)) {
                (Some(lo), Some(hi)) => format!("{} - {}", lo.label, hi.label),
                _ => format!("bucket {}", cell.bucket),
            };
            BucketStat {
                label,
                color: cell.color,
                count,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;

mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::input::datasets::{load_education, load_temperature, load_tree};
use crate::input::topology::Topology;
use crate::model::profile::{ChartProfile, TilingMethod};
use crate::pipeline::stage4_charts::{ChartError, build_choropleth, build_heatmap, build_treemap};
use crate::pipeline::stage5_report::{write_choropleth, write_heatmap, write_treemap};

#[derive(Debug, Parser)]
#[command(name = "kira-vizprep", version, about)]
struct Cli {
    /// Log level used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// County education choropleth from a topology and education records.
    Choropleth {
        #[arg(long)]
        topology: PathBuf,
        #[arg(long)]
        education: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Monthly temperature heat map.
    Heatmap {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Treemap layout of a hierarchical dataset.
    Treemap {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        padding: Option<f64>,
        #[arg(long, value_enum, default_value_t = TilingArg::Squarify)]
        tiling: TilingArg,
        #[arg(long)]
        title: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TilingArg {
    Squarify,
    SliceDice,
}

impl From<TilingArg> for TilingMethod {
    fn from(value: TilingArg) -> Self {
        match value {
            TilingArg::Squarify => TilingMethod::Squarify,
            TilingArg::SliceDice => TilingMethod::SliceDice,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log_level);
    if let Err(err) = run(cli.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), ChartError> {
    match command {
        Command::Choropleth {
            topology,
            education,
            out,
        } => {
            let topology = Topology::load(&topology)?;
            let records = load_education(&education)?;
            let chart = build_choropleth(&topology, &records, &ChartProfile::education_v1())?;
            write_choropleth(&chart, &out)?;
        }
        Command::Heatmap { data, out } => {
            let series = load_temperature(&data)?;
            let chart = build_heatmap(&series, &ChartProfile::temperature_v1())?;
            write_heatmap(&chart, &out)?;
        }
        Command::Treemap {
            data,
            out,
            width,
            height,
            padding,
            tiling,
            title,
        } => {
            let root = load_tree(&data)?;
            let profile = treemap_profile(width, height, padding, tiling, title);
            let chart = build_treemap(&root, &profile)?;
            write_treemap(&chart, &out)?;
        }
    }
    Ok(())
}

fn treemap_profile(
    width: Option<f64>,
    height: Option<f64>,
    padding: Option<f64>,
    tiling: TilingArg,
    title: Option<String>,
) -> ChartProfile {
    let mut profile = ChartProfile::sales_v1();
    if let Some(w) = width {
        profile.width = w;
    }
    if let Some(h) = height {
        profile.height = h;
    }
    if let Some(p) = padding {
        profile.padding = p;
    }
    if let Some(t) = title {
        profile.title = t;
    }
    profile.tiling = tiling.into();
    profile
}

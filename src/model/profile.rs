use crate::model::palette::{CATEGORY_20, EDUCATION_BLUES, TEMPERATURE_DIVERGING};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilingMethod {
    Squarify,
    SliceDice,
}

#[derive(Debug, Clone)]
pub struct LegendProfile {
    pub width: f64,
    pub height: f64,
    pub tick_divisor: f64,
    pub tick_suffix: &'static str,
    pub tick_decimals: usize,
}

#[derive(Debug, Clone)]
pub struct ChartProfile {
    pub title: String,
    pub description: String,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub colors: &'static [&'static str],
    pub legend: LegendProfile,
    pub tiling: TilingMethod,
}

impl ChartProfile {
    pub fn education_v1() -> Self {
        Self {
            title: "United States Educational Attainment".to_string(),
            description: "Percentage of adults age 25 and older with a bachelor's degree or higher (2010-2014)".to_string(),
            width: 960.0,
            height: 600.0,
            padding: 50.0,
            colors: EDUCATION_BLUES,
            legend: LegendProfile {
                width: 250.0,
                height: 8.0,
                tick_divisor: 100.0,
                // d3.format("0.0%"): whole percent after scaling back up.
                tick_suffix: "%",
                tick_decimals: 0,
            },
            tiling: TilingMethod::Squarify,
        }
    }

    pub fn temperature_v1() -> Self {
        Self {
            title: "Monthly Global Land-Surface Temperature".to_string(),
            description: "Temperature by year and month".to_string(),
            width: 1200.0,
            height: 540.0,
            padding: 60.0,
            colors: TEMPERATURE_DIVERGING,
            legend: LegendProfile {
                width: 400.0,
                height: 20.0,
                tick_divisor: 1.0,
                tick_suffix: "\u{b0}C",
                tick_decimals: 1,
            },
            tiling: TilingMethod::Squarify,
        }
    }

    pub fn sales_v1() -> Self {
        Self {
            title: "Video Game Sales".to_string(),
            description: "Top 100 Most Sold Video Games Grouped by Platform".to_string(),
            width: 1000.0,
            height: 600.0,
            padding: 1.0,
            colors: CATEGORY_20,
            legend: LegendProfile {
                width: 500.0,
                height: 15.0,
                tick_divisor: 1.0,
                tick_suffix: "",
                tick_decimals: 0,
            },
            tiling: TilingMethod::Squarify,
        }
    }
}

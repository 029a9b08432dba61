use std::path::Path;

use serde::Deserialize;
use crate::input::{InputError, Record, load_records, read_json};
use crate::model::tree::TreeNode;

pub const FIPS: &str = "fips";
pub const STATE: &str = "state";
pub const AREA_NAME: &str = "area_name";
pub const BACHELORS_OR_HIGHER: &str = "bachelorsOrHigher";
pub const EDUCATION: &str = "education";

pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const VARIANCE: &str = "variance";
pub const TEMPERATURE: &str = "temperature";

pub const COUNTIES_OBJECT: &str = "counties";
pub const STATES_OBJECT: &str = "states";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalTemperature {
    pub base_temperature: f64,
    pub monthly_variance: Vec<Record>,
}

pub fn load_education(path: &Path) -> Result<Vec<Record>, InputError> {
    load_records(path)
}

pub fn load_temperature(path: &Path) -> Result<GlobalTemperature, InputError> {
    let data: GlobalTemperature = read_json(path)?;
    if !data.base_temperature.is_finite() {
        return Err(InputError::InvalidInput(
            "baseTemperature is not a finite number".to_string(),
        ));
    }
    tracing::info!(
        path = %path.display(),
        months = data.monthly_variance.len(),
        base = data.base_temperature,
        "loaded temperature series"
    );
    Ok(data)
}

pub fn load_tree(path: &Path) -> Result<TreeNode, InputError> {
    let root: TreeNode = read_json(path)?;
    tracing::info!(
        path = %path.display(),
        root = %root.name,
        leaves = root.leaf_count(),
        "loaded hierarchy"
    );
    Ok(root)
}

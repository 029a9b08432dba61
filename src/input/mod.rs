use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub mod datasets;
pub mod topology;

pub type Record = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing object: {0}")]
    MissingObject(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let reader = open_maybe_gz(path)?;
    let value = serde_json::from_reader(reader)?;
    tracing::debug!(path = %path.display(), "parsed JSON document");
    Ok(value)
}

pub fn records_from_value(value: Value) -> Result<Vec<Record>, InputError> {
    let Value::Array(items) = value else {
        return Err(InputError::InvalidInput(
            "expected a JSON array of records".to_string(),
        ));
    };
    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => records.push(map),
            other => {
                return Err(InputError::InvalidInput(format!(
                    "record {idx} is not an object: {other}"
                )));
            }
        }
    }
    Ok(records)
}

pub fn load_records(path: &Path) -> Result<Vec<Record>, InputError> {
    let value: Value = read_json(path)?;
    let records = records_from_value(value)?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded records");
    Ok(records)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;

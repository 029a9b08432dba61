use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::input::Record;
use crate::input::topology::Feature;

/// Canonical form of a join identifier. Integral numbers print without a
/// fraction and digit-only strings lose leading zeros, so `"01001"`,
/// `1001` and `1001.0` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct JoinKey(String);

impl JoinKey {
    pub fn from_value(value: &Value) -> Option<Self> {
        key_part(value).map(JoinKey)
    }

    pub fn composite(values: &[&Value]) -> Option<Self> {
        let mut parts = Vec::with_capacity(values.len());
        for v in values {
            parts.push(key_part(v)?);
        }
        Some(JoinKey(parts.join("|")))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JoinKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn key_part(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                let f = n.as_f64()?;
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                    Some(format!("{}", f as i64))
                } else {
                    Some(f.to_string())
                }
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else if s.bytes().all(|b| b.is_ascii_digit()) {
                let stripped = s.trim_start_matches('0');
                Some(if stripped.is_empty() { "0" } else { stripped }.to_string())
            } else {
                Some(s.to_string())
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn normalize(records: &[Record], rename: &[(&str, &str)]) -> Vec<Record> {
    records
        .iter()
        .map(|record| {
            let mut out = record.clone();
            for &(old, new) in rename {
                if old == new {
                    continue;
                }
                if let Some(value) = out.remove(old) {
                    out.insert(new.to_string(), value);
                }
            }
            out
        })
        .collect()
}

pub fn derive_field<F>(records: &mut [Record], source: &str, target: &str, f: F)
where
    F: Fn(f64) -> f64,
{
    for record in records.iter_mut() {
        let Some(v) = record.get(source).and_then(Value::as_f64) else {
            continue;
        };
        if let Some(n) = serde_json::Number::from_f64(f(v)) {
            record.insert(target.to_string(), Value::Number(n));
        }
    }
}

pub fn number_field(record: &Record, field: &str) -> Option<f64> {
    record.get(field).and_then(Value::as_f64).filter(|v| v.is_finite())
}

pub fn text_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    entries: BTreeMap<JoinKey, Record>,
    pub duplicates: usize,
    pub unkeyed: usize,
}

impl RecordIndex {
    fn insert(&mut self, key: Option<JoinKey>, record: &Record) {
        match key {
            Some(key) => {
                // Last write wins.
                if self.entries.insert(key.clone(), record.clone()).is_some() {
                    self.duplicates += 1;
                    tracing::debug!(key = %key, "duplicate join key replaced earlier record");
                }
            }
            None => self.unkeyed += 1,
        }
    }

    pub fn get(&self, key: &JoinKey) -> Option<&Record> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JoinKey, &Record)> {
        self.entries.iter()
    }

    fn report(&self, what: &str) {
        if self.duplicates > 0 {
            tracing::warn!(
                duplicates = self.duplicates,
                "{what}: duplicate join keys, later records replaced earlier ones"
            );
        }
        if self.unkeyed > 0 {
            tracing::warn!(unkeyed = self.unkeyed, "{what}: records without a join key skipped");
        }
    }
}

pub fn index_by(records: &[Record], key_field: &str) -> RecordIndex {
    let mut index = RecordIndex::default();
    for record in records {
        let key = record.get(key_field).and_then(JoinKey::from_value);
        index.insert(key, record);
    }
    index.report(key_field);
    index
}

pub fn index_by_fields(records: &[Record], key_fields: &[&str]) -> RecordIndex {
    let mut index = RecordIndex::default();
    for record in records {
        let values: Option<Vec<&Value>> = key_fields.iter().map(|f| record.get(*f)).collect();
        let key = values.and_then(|v| JoinKey::composite(&v));
        index.insert(key, record);
    }
    index.report(&key_fields.join("+"));
    index
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedFeature {
    pub feature: Feature,
    pub key: Option<JoinKey>,
    pub record: Option<Record>,
}

impl JoinedFeature {
    pub fn is_miss(&self) -> bool {
        self.record.is_none()
    }
}

pub fn feature_key(feature: &Feature, geometry_key_field: &str) -> Option<JoinKey> {
    if geometry_key_field == "id" {
        feature.id.as_ref().and_then(JoinKey::from_value)
    } else {
        feature
            .properties
            .get(geometry_key_field)
            .and_then(JoinKey::from_value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinResult {
    pub features: Vec<JoinedFeature>,
    pub misses: usize,
}

/// Attaches the matching record to each feature. Unmatched features keep
/// an absent attachment and are counted in `misses`.
pub fn join(features: Vec<Feature>, index: &RecordIndex, geometry_key_field: &str) -> JoinResult {
    let features: Vec<JoinedFeature> = features
        .into_iter()
        .map(|feature| {
            let key = feature_key(&feature, geometry_key_field);
            let record = key.as_ref().and_then(|k| index.get(k)).cloned();
            JoinedFeature {
                feature,
                key,
                record,
            }
        })
        .collect();
    let misses = features.iter().filter(|j| j.is_miss()).count();
    if misses > 0 {
        tracing::warn!(misses, total = features.len(), "features without a matching record");
    }
    JoinResult { features, misses }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_normalize.rs"]
mod tests;

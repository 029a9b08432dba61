use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::{InputError, Record, read_json};

pub type Position = [f64; 2];

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    fn apply(&self, x: f64, y: f64) -> Position {
        [
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeometryObject {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub arcs: Option<Value>,
    #[serde(default)]
    pub coordinates: Option<Value>,
    #[serde(default)]
    pub geometries: Option<Vec<GeometryObject>>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Option<Record>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    pub objects: BTreeMap<String, GeometryObject>,
    #[serde(default)]
    pub arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub transform: Option<Transform>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub id: Option<Value>,
    pub properties: Record,
    pub geometry: Option<Geometry>,
}

impl Topology {
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let topology: Topology = read_json(path)?;
        tracing::info!(
            path = %path.display(),
            objects = topology.objects.len(),
            arcs = topology.arcs.len(),
            "loaded topology"
        );
        Ok(topology)
    }

    pub fn object_names(&self) -> Vec<&str> {
        self.objects.keys().map(String::as_str).collect()
    }

    /// Converts the named object into features. Geometry collections are
    /// flattened, so every returned feature carries a single geometry.
    pub fn features(&self, object_name: &str) -> Result<Vec<Feature>, InputError> {
        let object = self.objects.get(object_name).ok_or_else(|| {
            InputError::MissingObject(format!(
                "{object_name} (available: {})",
                self.object_names().join(", ")
            ))
        })?;
        let arcs = self.decode_arcs()?;
        let mut out = Vec::new();
        self.collect_features(object, &arcs, &mut out)?;
        Ok(out)
    }

    fn collect_features(
        &self,
        object: &GeometryObject,
        arcs: &[Vec<Position>],
        out: &mut Vec<Feature>,
    ) -> Result<(), InputError> {
        if object.kind.as_deref() == Some("GeometryCollection") {
            for child in object.geometries.iter().flatten() {
                self.collect_features(child, arcs, out)?;
            }
            return Ok(());
        }
        out.push(Feature {
            id: object.id.clone(),
            properties: object.properties.clone().unwrap_or_default(),
            geometry: self.geometry(object, arcs)?,
        });
        Ok(())
    }

    fn decode_arcs(&self) -> Result<Vec<Vec<Position>>, InputError> {
        let mut decoded = Vec::with_capacity(self.arcs.len());
        for (idx, arc) in self.arcs.iter().enumerate() {
            let mut points = Vec::with_capacity(arc.len());
            let (mut x, mut y) = (0.0, 0.0);
            for p in arc {
                let (px, py) = match p.as_slice() {
                    [px, py, ..] => (*px, *py),
                    _ => {
                        return Err(InputError::InvalidInput(format!(
                            "arc {idx} has a position with fewer than two coordinates"
                        )));
                    }
                };
                match &self.transform {
                    // Quantized topologies store arcs delta-encoded.
                    Some(t) => {
                        x += px;
                        y += py;
                        points.push(t.apply(x, y));
                    }
                    None => points.push([px, py]),
                }
            }
            decoded.push(points);
        }
        Ok(decoded)
    }

    fn position(&self, value: &[f64]) -> Result<Position, InputError> {
        match value {
            [x, y, ..] => Ok(match &self.transform {
                Some(t) => t.apply(*x, *y),
                None => [*x, *y],
            }),
            _ => Err(InputError::InvalidInput(
                "point has fewer than two coordinates".to_string(),
            )),
        }
    }

    fn geometry(
        &self,
        object: &GeometryObject,
        arcs: &[Vec<Position>],
    ) -> Result<Option<Geometry>, InputError> {
        let Some(kind) = object.kind.as_deref() else {
            return Ok(None);
        };
        let geometry = match kind {
            "Point" => {
                let coords: Vec<f64> = field(&object.coordinates, "coordinates")?;
                Geometry::Point(self.position(&coords)?)
            }
            "MultiPoint" => {
                let coords: Vec<Vec<f64>> = field(&object.coordinates, "coordinates")?;
                let points = coords
                    .iter()
                    .map(|c| self.position(c))
                    .collect::<Result<Vec<_>, _>>()?;
                Geometry::MultiPoint(points)
            }
            "LineString" => {
                let refs: Vec<i64> = field(&object.arcs, "arcs")?;
                Geometry::LineString(stitch(&refs, arcs)?)
            }
            "MultiLineString" => {
                let lines: Vec<Vec<i64>> = field(&object.arcs, "arcs")?;
                Geometry::MultiLineString(stitch_all(&lines, arcs)?)
            }
            "Polygon" => {
                let rings: Vec<Vec<i64>> = field(&object.arcs, "arcs")?;
                Geometry::Polygon(stitch_all(&rings, arcs)?)
            }
            "MultiPolygon" => {
                let polygons: Vec<Vec<Vec<i64>>> = field(&object.arcs, "arcs")?;
                let mut out = Vec::with_capacity(polygons.len());
                for rings in &polygons {
                    out.push(stitch_all(rings, arcs)?);
                }
                Geometry::MultiPolygon(out)
            }
            other => {
                return Err(InputError::InvalidInput(format!(
                    "unsupported geometry type: {other}"
                )));
            }
        };
        Ok(Some(geometry))
    }
}

fn field<T: serde::de::DeserializeOwned>(
    value: &Option<Value>,
    name: &str,
) -> Result<T, InputError> {
    let value = value
        .as_ref()
        .ok_or_else(|| InputError::InvalidInput(format!("geometry is missing {name}")))?;
    Ok(serde_json::from_value(value.clone())?)
}

fn stitch_all(lines: &[Vec<i64>], arcs: &[Vec<Position>]) -> Result<Vec<Vec<Position>>, InputError> {
    lines.iter().map(|refs| stitch(refs, arcs)).collect()
}

/// Concatenates referenced arcs; a negative reference `!i` walks arc `i`
/// backwards. Consecutive arcs share their joint point, kept once.
fn stitch(refs: &[i64], arcs: &[Vec<Position>]) -> Result<Vec<Position>, InputError> {
    let mut out: Vec<Position> = Vec::new();
    for &r in refs {
        let (idx, reversed) = if r < 0 { (!r, true) } else { (r, false) };
        let arc = usize::try_from(idx)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or_else(|| InputError::InvalidInput(format!("arc reference {r} out of range")))?;
        if !out.is_empty() {
            out.pop();
        }
        if reversed {
            out.extend(arc.iter().rev().copied());
        } else {
            out.extend(arc.iter().copied());
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/topology.rs"]
mod tests;

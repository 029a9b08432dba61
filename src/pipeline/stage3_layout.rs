use serde::Serialize;

use crate::model::profile::TilingMethod;
use crate::model::rect::Rectangle;
use crate::model::tree::TreeNode;

// Target aspect ratio of squarified rows.
const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("node {name:?} has invalid value {value}")]
    InvalidValue { name: String, value: f64 },
    #[error("invalid layout extent {width}x{height} with padding {padding}")]
    InvalidExtent { width: f64, height: f64, padding: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaidOutNode {
    pub name: String,
    pub category: Option<String>,
    pub value: f64,
    pub depth: usize,
    pub rect: Rectangle,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LaidOutNode>,
}

impl LaidOutNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn leaves(&self) -> Vec<&LaidOutNode> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }
}

fn collect_leaves<'a>(node: &'a LaidOutNode, out: &mut Vec<&'a LaidOutNode>) {
    if node.is_leaf() {
        out.push(node);
    } else {
        for child in &node.children {
            collect_leaves(child, out);
        }
    }
}

pub fn layout(
    root: &TreeNode,
    width: f64,
    height: f64,
    padding: f64,
    tiling: TilingMethod,
) -> Result<LaidOutNode, LayoutError> {
    let extent_ok = width.is_finite()
        && height.is_finite()
        && padding.is_finite()
        && width >= 0.0
        && height >= 0.0
        && padding >= 0.0;
    if !extent_ok {
        return Err(LayoutError::InvalidExtent {
            width,
            height,
            padding,
        });
    }
    validate_values(root)?;
    let total = root.aggregate_value();
    if !total.is_finite() {
        return Err(LayoutError::InvalidValue {
            name: root.name.clone(),
            value: total,
        });
    }
    let rect = Rectangle::new(0.0, 0.0, width, height);
    Ok(place(root, rect, 0, padding, tiling))
}

fn validate_values(node: &TreeNode) -> Result<(), LayoutError> {
    if node.is_leaf() {
        if let Some(value) = node.value {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidValue {
                    name: node.name.clone(),
                    value,
                });
            }
        }
        return Ok(());
    }
    node.children.iter().try_for_each(validate_values)
}

fn place(node: &TreeNode, rect: Rectangle, depth: usize, padding: f64, tiling: TilingMethod) -> LaidOutNode {
    let value = node.aggregate_value();
    if node.is_leaf() {
        return LaidOutNode {
            name: node.name.clone(),
            category: node.category.clone(),
            value,
            depth,
            rect,
            children: Vec::new(),
        };
    }

    let mut order: Vec<(&TreeNode, f64)> = node
        .children
        .iter()
        .map(|c| (c, c.aggregate_value()))
        .collect();
    // Stable, so equal values keep insertion order.
    order.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let values: Vec<f64> = order.iter().map(|(_, v)| *v).collect();
    let inner = rect.inset(padding);
    let rects = tile(&values, inner, tiling, depth);
    debug_assert!(rects.iter().all(|r| inner.contains(r, 1e-6)));

    let children = order
        .iter()
        .zip(rects)
        .map(|((child, _), r)| place(child, r, depth + 1, padding, tiling))
        .collect();

    LaidOutNode {
        name: node.name.clone(),
        category: node.category.clone(),
        value,
        depth,
        rect,
        children,
    }
}

pub fn tile(values: &[f64], rect: Rectangle, tiling: TilingMethod, depth: usize) -> Vec<Rectangle> {
    if values.is_empty() {
        return Vec::new();
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        let equal = vec![1.0; values.len()];
        return if rect.width() >= rect.height() {
            dice(&equal, rect)
        } else {
            slice(&equal, rect)
        };
    }
    match tiling {
        TilingMethod::SliceDice if depth % 2 == 0 => dice(values, rect),
        TilingMethod::SliceDice => slice(values, rect),
        TilingMethod::Squarify => squarify(values, rect),
    }
}

fn dice(values: &[f64], rect: Rectangle) -> Vec<Rectangle> {
    let total: f64 = values.iter().sum();
    let k = if total > 0.0 { rect.width() / total } else { 0.0 };
    let mut x = rect.x0;
    let last = values.len().saturating_sub(1);
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x1 = if i == last { rect.x1 } else { x + v * k };
            let r = Rectangle::new(x, rect.y0, x1, rect.y1);
            x = x1;
            r
        })
        .collect()
}

fn slice(values: &[f64], rect: Rectangle) -> Vec<Rectangle> {
    let total: f64 = values.iter().sum();
    let k = if total > 0.0 { rect.height() / total } else { 0.0 };
    let mut y = rect.y0;
    let last = values.len().saturating_sub(1);
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let y1 = if i == last { rect.y1 } else { y + v * k };
            let r = Rectangle::new(rect.x0, y, rect.x1, y1);
            y = y1;
            r
        })
        .collect()
}

fn squarify(values: &[f64], rect: Rectangle) -> Vec<Rectangle> {
    let n = values.len();
    let mut out = Vec::with_capacity(n);
    let mut r = rect;
    let mut i0 = 0usize;

    while i0 < n {
        let remaining: f64 = values[i0..].iter().sum();
        if remaining <= 0.0 {
            // Only zero-valued nodes are left.
            for _ in i0..n {
                out.push(Rectangle::new(r.x0, r.y0, r.x0, r.y0));
            }
            break;
        }

        let dx = r.width();
        let dy = r.height();
        let mut i1 = i0 + 1;
        let mut row_sum = values[i0];

        if dx > 0.0 && dy > 0.0 {
            let alpha = (dy / dx).max(dx / dy) / (remaining * GOLDEN_RATIO);
            let mut min_value = row_sum;
            let mut max_value = row_sum;
            let beta = row_sum * row_sum * alpha;
            let mut min_ratio = (max_value / beta).max(beta / min_value);

            while i1 < n {
                let v = values[i1];
                if v <= 0.0 {
                    break;
                }
                let sum = row_sum + v;
                let lo = min_value.min(v);
                let hi = max_value.max(v);
                let beta = sum * sum * alpha;
                let ratio = (hi / beta).max(beta / lo);
                if ratio > min_ratio {
                    break;
                }
                row_sum = sum;
                min_value = lo;
                max_value = hi;
                min_ratio = ratio;
                i1 += 1;
            }
        } else {
            while i1 < n && values[i1] > 0.0 {
                row_sum += values[i1];
                i1 += 1;
            }
        }

        let consumes_rest = values[i1..].iter().all(|v| *v <= 0.0);
        let row = &values[i0..i1];
        if dx < dy {
            let y1 = if consumes_rest {
                r.y1
            } else {
                r.y0 + dy * row_sum / remaining
            };
            out.extend(dice(row, Rectangle::new(r.x0, r.y0, r.x1, y1)));
            r.y0 = y1;
        } else {
            let x1 = if consumes_rest {
                r.x1
            } else {
                r.x0 + dx * row_sum / remaining
            };
            out.extend(slice(row, Rectangle::new(r.x0, r.y0, x1, r.y1)));
            r.x0 = x1;
        }
        i0 = i1;
    }

    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_layout.rs"]
mod tests;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rectangle {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rectangle {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn inset(&self, padding: f64) -> Self {
        let (x0, x1) = shrink_axis(self.x0, self.x1, padding);
        let (y0, y1) = shrink_axis(self.y0, self.y1, padding);
        Self { x0, y0, x1, y1 }
    }

    #[cfg(test)]
    pub fn is_disjoint(&self, other: &Rectangle, tolerance: f64) -> bool {
        self.x1 <= other.x0 + tolerance
            || other.x1 <= self.x0 + tolerance
            || self.y1 <= other.y0 + tolerance
            || other.y1 <= self.y0 + tolerance
    }

    pub fn contains(&self, other: &Rectangle, tolerance: f64) -> bool {
        other.x0 >= self.x0 - tolerance
            && other.y0 >= self.y0 - tolerance
            && other.x1 <= self.x1 + tolerance
            && other.y1 <= self.y1 + tolerance
    }
}

fn shrink_axis(lo: f64, hi: f64, padding: f64) -> (f64, f64) {
    if padding <= 0.0 {
        return (lo, hi);
    }
    if hi - lo <= 2.0 * padding {
        let mid = (lo + hi) / 2.0;
        return (mid, mid);
    }
    (lo + padding, hi - padding)
}

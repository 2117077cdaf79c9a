use crate::{
    foundation::core::{BezPath, Point, Rgba8, Vec2},
    foundation::error::LiveResult,
    render::raster::Rasterizer,
};

/// A freehand stroke: width plus the ordered points the pointer visited.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Curve {
    pub width: f64,
    pub points: Vec<Point>,
}

impl Curve {
    pub fn new(width: f64, points: Vec<Point>) -> Self {
        Self { width, points }
    }

    /// Polyline through every point; `None` when there are no points.
    pub fn to_path(&self) -> Option<BezPath> {
        let first = *self.points.first()?;
        let mut path = BezPath::new();
        path.move_to(first);
        for p in &self.points {
            path.line_to(*p);
        }
        Some(path)
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            width: self.width,
            points: self.points.iter().map(|p| *p + offset).collect(),
        }
    }
}

/// Stroked circle outline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CircleStroke {
    pub center: Point,
    pub radius: f64,
    pub color: Rgba8,
    pub width: f64,
}

impl CircleStroke {
    pub fn to_path(&self) -> BezPath {
        use kurbo::Shape as _;
        kurbo::Circle::new(self.center, self.radius).to_path(0.1)
    }
}

/// One entry of a picture's draw log. Immutable once created.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawAction {
    Pencil { curve: Curve, color: Rgba8 },
    Erase { curve: Curve },
    Circle(CircleStroke),
}

impl DrawAction {
    pub fn pencil(width: f64, points: Vec<Point>, color: Rgba8) -> Self {
        Self::Pencil {
            curve: Curve::new(width, points),
            color,
        }
    }

    pub fn erase(width: f64, points: Vec<Point>) -> Self {
        Self::Erase {
            curve: Curve::new(width, points),
        }
    }

    pub fn circle(center: Point, radius: f64, color: Rgba8, width: f64) -> Self {
        Self::Circle(CircleStroke {
            center,
            radius,
            color,
            width,
        })
    }

    /// Replay this action onto `raster`.
    ///
    /// Erase clears what is underneath it instead of painting a colour.
    pub fn draw<R: Rasterizer + ?Sized>(&self, raster: &mut R) -> LiveResult<()> {
        match self {
            Self::Pencil { curve, color } => raster.stroke_polyline(curve, *color),
            Self::Erase { curve } => raster.clear_polyline(curve),
            Self::Circle(circle) => raster.stroke_circle(circle),
        }
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        match self {
            Self::Pencil { curve, color } => Self::Pencil {
                curve: curve.translated(offset),
                color: *color,
            },
            Self::Erase { curve } => Self::Erase {
                curve: curve.translated(offset),
            },
            Self::Circle(c) => Self::Circle(CircleStroke {
                center: c.center + offset,
                ..c.clone()
            }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/picture/action.rs"]
mod tests;

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::animation::dynamic::Lerp;
use crate::assets::color::Color;
use crate::foundation::math::lerp_f64;

/// Color stop of a gradient, `offset` in `0..=1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradientStop {
    /// Position along the gradient.
    pub offset: f64,
    /// Color at `offset`.
    pub color: Color,
}

/// Paint used for layer backgrounds and movie backgrounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", deny_unknown_fields)]
pub enum Fill {
    /// Single color.
    Solid {
        /// Fill color.
        color: Color,
    },
    /// Gradient along the segment `start -> end`, in surface pixels.
    Linear {
        /// Point where offset 0 sits.
        start: Point,
        /// Point where offset 1 sits.
        end: Point,
        /// Stops sorted by offset.
        stops: Vec<GradientStop>,
    },
    /// Gradient by distance from `center`.
    Radial {
        /// Center of the gradient, in surface pixels.
        center: Point,
        /// Distance mapped to offset 1.
        radius: f64,
        /// Stops sorted by offset.
        stops: Vec<GradientStop>,
    },
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Self::Solid { color }
    }
}

impl Fill {
    /// Solid fill shortcut.
    pub fn solid(color: Color) -> Self {
        Self::Solid { color }
    }

    /// Color of the fill at a point.
    pub fn color_at(&self, p: Point) -> Color {
        match self {
            Self::Solid { color } => *color,
            Self::Linear { start, end, stops } => {
                let axis = *end - *start;
                let len2 = axis.hypot2();
                let t = if len2 <= f64::EPSILON {
                    0.0
                } else {
                    (p - *start).dot(axis) / len2
                };
                sample_stops(stops, t)
            }
            Self::Radial {
                center,
                radius,
                stops,
            } => {
                let t = if *radius <= f64::EPSILON {
                    1.0
                } else {
                    p.distance(*center) / radius
                };
                sample_stops(stops, t)
            }
        }
    }

    /// Return `true` when the fill paints the same color everywhere.
    pub fn is_uniform(&self) -> bool {
        match self {
            Self::Solid { .. } => true,
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => stops.len() <= 1,
        }
    }
}

fn sample_stops(stops: &[GradientStop], t: f64) -> Color {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    let i = stops.partition_point(|s| s.offset <= t);
    let (a, b) = (&stops[i - 1], &stops[i]);
    let span = b.offset - a.offset;
    if span <= f64::EPSILON {
        return b.color;
    }
    Color::lerp(&a.color, &b.color, (t - a.offset) / span)
}

// Solid pairs blend, any other pair holds the first fill until `t` reaches 1.
impl Lerp for Fill {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Self::Solid { color: ca }, Self::Solid { color: cb }) => Self::Solid {
                color: Color::lerp(ca, cb, t),
            },
            _ if t >= 1.0 => b.clone(),
            _ => a.clone(),
        }
    }
}

impl Lerp for GradientStop {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            offset: lerp_f64(a.offset, b.offset, t),
            color: Color::lerp(&a.color, &b.color, t),
        }
    }
}

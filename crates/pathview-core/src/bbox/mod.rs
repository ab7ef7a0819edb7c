//! Axis-aligned bounding boxes and their mapping onto surface axes.

use serde::{Deserialize, Serialize};

use crate::surface::{Axis, Bounds, Surface};

/// Optional per-axis bounds, in data coordinates.
///
/// Deserializes from the flat `x0, x1, y0, y1, z0, z1` keys; an axis is
/// constrained only when both of its keys are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FlatBoundingBox", into = "FlatBoundingBox")]
pub struct BoundingBox {
    pub x: Option<Bounds>,
    pub y: Option<Bounds>,
    pub z: Option<Bounds>,
}

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_x(mut self, lower: f64, upper: f64) -> Self {
        self.x = Some(Bounds::new(lower, upper));
        self
    }

    pub fn with_y(mut self, lower: f64, upper: f64) -> Self {
        self.y = Some(Bounds::new(lower, upper));
        self
    }

    pub fn with_z(mut self, lower: f64, upper: f64) -> Self {
        self.z = Some(Bounds::new(lower, upper));
        self
    }

    /// Build from `(key, value)` pairs such as `("x0", -1.0)`. Unknown keys
    /// are ignored.
    pub fn from_keys<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut flat = FlatBoundingBox::default();
        for (key, value) in entries {
            let slot = match key {
                "x0" => &mut flat.x0,
                "x1" => &mut flat.x1,
                "y0" => &mut flat.y0,
                "y1" => &mut flat.y1,
                "z0" => &mut flat.z0,
                "z1" => &mut flat.z1,
                _ => continue,
            };
            *slot = Some(value);
        }
        flat.into()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }

    /// Apply the present bounds to `surface`.
    ///
    /// With `up_axis` set, the box's y (vertical in data) goes to the surface's
    /// vertical `Z` axis and the box's z to the depth `Y` axis; both only on a
    /// spatial surface. Without it, x/y/z map straight across and z applies
    /// only on a spatial surface. x always maps to `X`.
    pub fn apply_to(&self, surface: &mut Surface, up_axis: bool) {
        if let Some(x) = self.x {
            surface.set_limits(Axis::X, x);
        }

        if up_axis {
            if surface.is_spatial() {
                if let Some(y) = self.y {
                    surface.set_limits(Axis::Z, y);
                }
                if let Some(z) = self.z {
                    surface.set_limits(Axis::Y, z);
                }
            }
        } else {
            if let Some(y) = self.y {
                surface.set_limits(Axis::Y, y);
            }
            if let Some(z) = self.z {
                surface.set_limits(Axis::Z, z);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct FlatBoundingBox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    z0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    z1: Option<f64>,
}

fn pair(lower: Option<f64>, upper: Option<f64>) -> Option<Bounds> {
    Some(Bounds::new(lower?, upper?))
}

impl From<FlatBoundingBox> for BoundingBox {
    fn from(flat: FlatBoundingBox) -> Self {
        Self {
            x: pair(flat.x0, flat.x1),
            y: pair(flat.y0, flat.y1),
            z: pair(flat.z0, flat.z1),
        }
    }
}

impl From<BoundingBox> for FlatBoundingBox {
    fn from(bbox: BoundingBox) -> Self {
        Self {
            x0: bbox.x.map(|b| b.lower),
            x1: bbox.x.map(|b| b.upper),
            y0: bbox.y.map(|b| b.lower),
            y1: bbox.y.map(|b| b.upper),
            z0: bbox.z.map(|b| b.lower),
            z1: bbox.z.map(|b| b.upper),
        }
    }
}

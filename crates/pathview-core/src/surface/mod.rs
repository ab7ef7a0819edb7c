//! Retained-mode rendering surface.
//!
//! A `Surface` records what was drawn (lines, time-colored scatters, vector
//! glyphs), axis labels and explicit limits. It is passed explicitly through
//! every drawing call and rasterized by a separate backend.
//!
//! Axis naming follows the usual plotting convention: `X` is horizontal; on a
//! spatial surface `Y` is depth and `Z` is vertical; on a planar surface `Y`
//! is vertical and there is no `Z`.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Relative padding added around data extents when a limit is not fixed
pub const AUTOSCALE_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Planar,
    Spatial,
}

/// Closed interval `[lower, upper]` on one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    /// Normalized position of `value` within the interval
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.span();
        if span == 0.0 {
            0.5
        } else {
            (value - self.lower) / span
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, PartialEq)]
pub struct LineArtist {
    pub points: Vec<Point3<f64>>,
}

/// Points colored by a scalar (time) through the colormap
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterArtist {
    pub points: Vec<Point3<f64>>,
    pub values: Vec<f64>,
    pub size: f64,
}

impl ScatterArtist {
    /// Color normalization range: min and max of `values`
    pub fn value_range(&self) -> Option<Bounds> {
        let mut iter = self.values.iter().copied().filter(|v| v.is_finite());
        let first = iter.next()?;
        let (lo, hi) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Bounds::new(lo, hi))
    }
}

/// One arrow per origin, drawn from `origin` to `origin + vector`
#[derive(Debug, Clone, PartialEq)]
pub struct QuiverArtist {
    pub origins: Vec<Point3<f64>>,
    pub vectors: Vec<Vector3<f64>>,
    pub color: Rgb,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Line(LineArtist),
    Scatter(ScatterArtist),
    Quiver(QuiverArtist),
}

/// Reference to a scatter previously drawn on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatterHandle(usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colorbar {
    pub scatter: ScatterHandle,
    pub range: Bounds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    kind: SurfaceKind,
    labels: [Option<String>; 3],
    limits: [Option<Bounds>; 3],
    artists: Vec<Artist>,
    colorbar: Option<Colorbar>,
    panes_filled: bool,
}

impl Surface {
    pub fn new(kind: SurfaceKind) -> Self {
        Self {
            kind,
            labels: Default::default(),
            limits: [None; 3],
            artists: Vec::new(),
            colorbar: None,
            panes_filled: true,
        }
    }

    pub fn planar() -> Self {
        Self::new(SurfaceKind::Planar)
    }

    pub fn spatial() -> Self {
        Self::new(SurfaceKind::Spatial)
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// Whether the surface has a third (`Z`) axis
    pub fn is_spatial(&self) -> bool {
        self.kind == SurfaceKind::Spatial
    }

    fn has_axis(&self, axis: Axis) -> bool {
        axis != Axis::Z || self.is_spatial()
    }

    pub fn set_label(&mut self, axis: Axis, label: &str) {
        if self.has_axis(axis) {
            self.labels[axis.index()] = Some(label.to_string());
        }
    }

    pub fn label(&self, axis: Axis) -> Option<&str> {
        self.labels[axis.index()].as_deref()
    }

    /// Fix the display limits of `axis`. Returns false when the surface has
    /// no such axis.
    pub fn set_limits(&mut self, axis: Axis, bounds: Bounds) -> bool {
        if !self.has_axis(axis) {
            return false;
        }
        self.limits[axis.index()] = Some(bounds);
        true
    }

    pub fn explicit_limits(&self, axis: Axis) -> Option<Bounds> {
        self.limits[axis.index()]
    }

    /// Effective limits: explicit ones when set, otherwise the padded data extent.
    pub fn limits(&self, axis: Axis) -> Option<Bounds> {
        if !self.has_axis(axis) {
            return None;
        }
        Some(
            self.explicit_limits(axis)
                .unwrap_or_else(|| self.autoscale(axis)),
        )
    }

    fn autoscale(&self, axis: Axis) -> Bounds {
        let i = axis.index();
        let mut extent: Option<(f64, f64)> = None;
        let mut include = |v: f64| {
            if v.is_finite() {
                extent = Some(match extent {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        };

        for artist in &self.artists {
            match artist {
                Artist::Line(line) => line.points.iter().for_each(|p| include(p[i])),
                Artist::Scatter(sc) => sc.points.iter().for_each(|p| include(p[i])),
                Artist::Quiver(q) => {
                    for (o, v) in q.origins.iter().zip(&q.vectors) {
                        include(o[i]);
                        include(o[i] + v[i]);
                    }
                }
            }
        }

        match extent {
            None => Bounds::new(0.0, 1.0),
            Some((lo, hi)) if hi - lo <= f64::EPSILON => Bounds::new(lo - 0.5, hi + 0.5),
            Some((lo, hi)) => {
                let pad = (hi - lo) * AUTOSCALE_MARGIN;
                Bounds::new(lo - pad, hi + pad)
            }
        }
    }

    /// Connected line through `points` in order
    pub fn plot(&mut self, points: Vec<Point3<f64>>) {
        self.artists.push(Artist::Line(LineArtist { points }));
    }

    /// Points colored by `values`
    pub fn scatter(
        &mut self,
        points: Vec<Point3<f64>>,
        values: Vec<f64>,
        size: f64,
    ) -> ScatterHandle {
        self.artists.push(Artist::Scatter(ScatterArtist {
            points,
            values,
            size,
        }));
        ScatterHandle(self.artists.len() - 1)
    }

    pub fn quiver(
        &mut self,
        origins: Vec<Point3<f64>>,
        vectors: Vec<Vector3<f64>>,
        color: Rgb,
        alpha: f64,
    ) {
        self.artists.push(Artist::Quiver(QuiverArtist {
            origins,
            vectors,
            color,
            alpha,
        }));
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn scatter_artist(&self, handle: ScatterHandle) -> Option<&ScatterArtist> {
        match self.artists.get(handle.0) {
            Some(Artist::Scatter(sc)) => Some(sc),
            _ => None,
        }
    }

    pub fn line_count(&self) -> usize {
        self.artists
            .iter()
            .filter(|a| matches!(a, Artist::Line(_)))
            .count()
    }

    pub fn scatter_count(&self) -> usize {
        self.artists
            .iter()
            .filter(|a| matches!(a, Artist::Scatter(_)))
            .count()
    }

    pub fn quiver_count(&self) -> usize {
        self.artists
            .iter()
            .filter(|a| matches!(a, Artist::Quiver(_)))
            .count()
    }

    /// Attach a colorbar keyed to the color range of `handle`.
    pub fn add_colorbar(&mut self, handle: ScatterHandle) {
        let range = self
            .scatter_artist(handle)
            .and_then(ScatterArtist::value_range)
            .unwrap_or(Bounds::new(0.0, 1.0));
        self.colorbar = Some(Colorbar {
            scatter: handle,
            range,
        });
    }

    pub fn colorbar(&self) -> Option<&Colorbar> {
        self.colorbar.as_ref()
    }

    /// Remove the colored fill of the 3D axis panes.
    pub fn clear_panes(&mut self) {
        self.panes_filled = false;
    }

    pub fn panes_filled(&self) -> bool {
        self.panes_filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn planar_surface_has_no_z_axis() {
        let mut surface = Surface::planar();
        assert!(!surface.set_limits(Axis::Z, Bounds::new(0.0, 1.0)));
        assert!(surface.limits(Axis::Z).is_none());
        surface.set_label(Axis::Z, "z");
        assert!(surface.label(Axis::Z).is_none());
    }

    #[test]
    fn clear_panes_drops_pane_fill() {
        let mut surface = Surface::spatial();
        assert!(surface.panes_filled());
        surface.clear_panes();
        assert!(!surface.panes_filled());
    }

    #[test]
    fn autoscale_pads_data_extent() {
        let mut surface = Surface::spatial();
        surface.plot(vec![Point3::new(0.0, 1.0, 2.0), Point3::new(10.0, 1.0, 4.0)]);

        let x = surface.limits(Axis::X).unwrap();
        assert_relative_eq!(x.lower, -0.5);
        assert_relative_eq!(x.upper, 10.5);

        let y = surface.limits(Axis::Y).unwrap();
        assert_relative_eq!(y.lower, 0.5);
        assert_relative_eq!(y.upper, 1.5);
    }

    #[test]
    fn explicit_limits_take_precedence() {
        let mut surface = Surface::spatial();
        surface.plot(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(5.0, 5.0, 5.0)]);
        surface.set_limits(Axis::Z, Bounds::new(-1.0, 1.0));
        assert_eq!(surface.limits(Axis::Z), Some(Bounds::new(-1.0, 1.0)));
    }

    #[test]
    fn quiver_tips_extend_autoscale() {
        let mut surface = Surface::planar();
        surface.quiver(
            vec![Point3::new(0.0, 0.0, 0.0)],
            vec![Vector3::new(2.0, 0.0, 0.0)],
            Rgb(128, 128, 128),
            0.2,
        );
        let x = surface.limits(Axis::X).unwrap();
        assert_relative_eq!(x.upper, 2.1);
    }

    #[test]
    fn colorbar_uses_scatter_value_range() {
        let mut surface = Surface::planar();
        let handle = surface.scatter(
            vec![Point3::origin(), Point3::new(1.0, 1.0, 0.0)],
            vec![3.0, 7.0],
            1.0,
        );
        surface.add_colorbar(handle);
        assert_eq!(surface.colorbar().unwrap().range, Bounds::new(3.0, 7.0));
        assert_eq!(surface.scatter_count(), 1);
    }
}

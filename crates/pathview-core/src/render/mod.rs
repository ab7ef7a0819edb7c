//! Path rendering: trajectory line, time-colored samples and direction glyphs.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::errors::{PathviewError, Result};
use crate::series::VectorSeries;
use crate::surface::{Axis, Rgb, ScatterHandle, Surface};

/// Muted color of direction glyphs
pub const DIRECTION_COLOR: Rgb = Rgb(128, 128, 128);
/// Opacity of direction glyphs
pub const DIRECTION_ALPHA: f64 = 0.2;

/// Drawing options for `draw_path`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathStyle {
    /// Treat data y as the vertical axis (Y-up data); otherwise z is vertical
    pub up_axis: bool,
    /// Attach a colorbar keyed to the time-colored scatter
    pub colorbar: bool,
    pub point_size: f64,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            up_axis: true,
            colorbar: false,
            point_size: 1.0,
        }
    }
}

fn validate(path: &VectorSeries, direction: Option<&VectorSeries>) -> Result<()> {
    if !matches!(path.width(), 3 | 4) {
        return Err(PathviewError::UnsupportedDimensionality {
            columns: path.width(),
        });
    }

    if let Some(direction) = direction {
        if direction.width() != path.width() {
            return Err(PathviewError::DimensionMismatch {
                position: path.width(),
                direction: direction.width(),
            });
        }
        if direction.len() != path.len() {
            return Err(PathviewError::SeriesLengthMismatch {
                position: path.len(),
                direction: direction.len(),
            });
        }
    }
    Ok(())
}

/// Reorders data components onto surface axes `(X, Y, Z)`.
///
/// With `up_axis`, data y is drawn on the vertical `Z` axis and data z on
/// the depth `Y` axis.
fn to_surface(v: Vector3<f64>, up_axis: bool) -> Vector3<f64> {
    if up_axis {
        Vector3::new(v.x, v.z, v.y)
    } else {
        v
    }
}

/// Per-sample components of columns 1..width as 3-vectors (z = 0 for 2D).
fn components(series: &VectorSeries) -> Vec<Vector3<f64>> {
    let m = series.as_matrix();
    (0..series.len())
        .map(|r| {
            let z = if series.width() == 4 { m[(r, 3)] } else { 0.0 };
            Vector3::new(m[(r, 1)], m[(r, 2)], z)
        })
        .collect()
}

/// Draw one session's path.
///
/// `path` is `N x 4` (t, x, y, z) or `N x 3` (t, x, y); `direction`, when
/// given, must have the same shape. A spatial surface is created for 4
/// columns and a planar one for 3 unless `surface` is supplied. Returns the
/// surface and the last time-colored scatter drawn.
pub fn draw_path(
    path: &VectorSeries,
    direction: Option<&VectorSeries>,
    bbox: Option<&BoundingBox>,
    surface: Option<Surface>,
    style: &PathStyle,
) -> Result<(Surface, ScatterHandle)> {
    validate(path, direction)?;
    let spatial = path.width() == 4;

    let mut surface = match surface {
        Some(surface) if spatial && !surface.is_spatial() => {
            return Err(PathviewError::PlanarSurface);
        }
        Some(surface) => surface,
        None if spatial => Surface::spatial(),
        None => Surface::planar(),
    };

    surface.set_label(Axis::X, "x");
    let up_axis = spatial && style.up_axis;
    if !spatial {
        surface.set_label(Axis::Y, "y");
    } else if up_axis {
        surface.set_label(Axis::Y, "z");
        surface.set_label(Axis::Z, "y");
    } else {
        surface.set_label(Axis::Y, "y");
        surface.set_label(Axis::Z, "z");
    }

    let time = path.time();
    let points: Vec<Point3<f64>> = components(path)
        .into_iter()
        .map(|v| Point3::from(to_surface(v, up_axis)))
        .collect();

    surface.plot(points.clone());
    let mut handle = surface.scatter(points.clone(), time.clone(), style.point_size);

    if let Some(direction) = direction {
        let vectors: Vec<Vector3<f64>> = components(direction)
            .into_iter()
            .map(|v| to_surface(v, up_axis))
            .collect();

        surface.quiver(
            points.clone(),
            vectors.clone(),
            DIRECTION_COLOR,
            DIRECTION_ALPHA,
        );

        if spatial {
            let tips = points.iter().zip(&vectors).map(|(p, v)| p + v).collect();
            handle = surface.scatter(tips, time, style.point_size);
        }
    }

    if style.colorbar {
        surface.add_colorbar(handle);
    }

    if let Some(bbox) = bbox {
        bbox.apply_to(&mut surface, style.up_axis);
    }

    Ok((surface, handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Artist, Bounds};
    use approx::assert_relative_eq;

    fn path3d() -> VectorSeries {
        VectorSeries::from_rows(&[
            [1.0, -0.57, 1.57, 3.5],
            [2.0, -0.569, 1.6, 3.49],
            [3.0, -0.566, 1.63, 3.48],
        ])
    }

    fn dir3d() -> VectorSeries {
        VectorSeries::from_rows(&[
            [1.0, 0.2, -0.919, -0.341],
            [2.0, 0.222, -0.779, -0.586],
            [3.0, 0.254, -0.648, -0.718],
        ])
    }

    #[test]
    fn four_columns_create_spatial_surface() {
        let (surface, handle) =
            draw_path(&path3d(), None, None, None, &PathStyle::default()).unwrap();
        assert!(surface.is_spatial());
        assert_eq!(surface.line_count(), 1);
        assert_eq!(surface.scatter_count(), 1);
        assert_eq!(surface.label(Axis::X), Some("x"));

        let scatter = surface.scatter_artist(handle).unwrap();
        assert_eq!(scatter.values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn up_axis_swaps_y_and_z() {
        let (surface, handle) =
            draw_path(&path3d(), None, None, None, &PathStyle::default()).unwrap();
        assert_eq!(surface.label(Axis::Y), Some("z"));
        assert_eq!(surface.label(Axis::Z), Some("y"));

        let p = surface.scatter_artist(handle).unwrap().points[0];
        assert_relative_eq!(p.x, -0.57);
        assert_relative_eq!(p.y, 3.5);
        assert_relative_eq!(p.z, 1.57);
    }

    #[test]
    fn standard_convention_keeps_native_order() {
        let style = PathStyle {
            up_axis: false,
            ..PathStyle::default()
        };
        let (surface, handle) = draw_path(&path3d(), None, None, None, &style).unwrap();
        assert_eq!(surface.label(Axis::Y), Some("y"));
        assert_eq!(surface.label(Axis::Z), Some("z"));

        let p = surface.scatter_artist(handle).unwrap().points[2];
        assert_relative_eq!(p.y, 1.63);
        assert_relative_eq!(p.z, 3.48);
    }

    #[test]
    fn direction_adds_glyphs_and_offset_scatter() {
        let (surface, handle) =
            draw_path(&path3d(), Some(&dir3d()), None, None, &PathStyle::default()).unwrap();
        assert_eq!(surface.quiver_count(), 1);
        assert_eq!(surface.scatter_count(), 2);

        let tip = surface.scatter_artist(handle).unwrap().points[0];
        assert_relative_eq!(tip.x, -0.57 + 0.2);
        assert_relative_eq!(tip.y, 3.5 - 0.341);
        assert_relative_eq!(tip.z, 1.57 - 0.919);

        let quiver = surface
            .artists()
            .iter()
            .find_map(|a| match a {
                Artist::Quiver(q) => Some(q),
                _ => None,
            })
            .unwrap();
        assert_eq!(quiver.color, DIRECTION_COLOR);
        assert_relative_eq!(quiver.vectors[1].y, -0.586);
        assert_relative_eq!(quiver.vectors[1].z, -0.779);
    }

    #[test]
    fn three_columns_render_planar() {
        let path = VectorSeries::from_rows(&[[0.0, 0.0, 0.0], [1.0, 1.0, 2.0]]);
        let dir = VectorSeries::from_rows(&[[0.0, 1.0, 0.0], [1.0, 0.0, 1.0]]);
        let style = PathStyle {
            up_axis: true,
            ..PathStyle::default()
        };
        let (surface, _) = draw_path(&path, Some(&dir), None, None, &style).unwrap();

        assert!(!surface.is_spatial());
        assert_eq!(surface.label(Axis::Y), Some("y"));
        assert_eq!(surface.quiver_count(), 1);
        assert_eq!(surface.scatter_count(), 1);
    }

    #[test]
    fn unsupported_column_count_fails() {
        let path = VectorSeries::from_rows(&[[0.0, 1.0]]);
        let err = draw_path(&path, None, None, None, &PathStyle::default()).unwrap_err();
        assert!(matches!(err, PathviewError::UnsupportedDimensionality { columns: 2 }));
    }

    #[test]
    fn mismatched_direction_length_fails() {
        let dir = VectorSeries::from_rows(&[[1.0, 0.2, -0.9, -0.3]]);
        let err =
            draw_path(&path3d(), Some(&dir), None, None, &PathStyle::default()).unwrap_err();
        assert!(matches!(
            err,
            PathviewError::SeriesLengthMismatch {
                position: 3,
                direction: 1
            }
        ));
    }

    #[test]
    fn planar_direction_for_spatial_path_fails() {
        let dir = VectorSeries::from_rows(&[[1.0, 0.2, -0.9], [2.0, 0.2, -0.8], [3.0, 0.3, -0.6]]);
        let err =
            draw_path(&path3d(), Some(&dir), None, None, &PathStyle::default()).unwrap_err();
        assert!(matches!(
            err,
            PathviewError::DimensionMismatch {
                position: 4,
                direction: 3
            }
        ));
    }

    #[test]
    fn spatial_path_on_planar_surface_fails() {
        let err = draw_path(
            &path3d(),
            None,
            None,
            Some(Surface::planar()),
            &PathStyle::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PathviewError::PlanarSurface));
    }

    #[test]
    fn bounding_box_round_trip() {
        let bbox = BoundingBox::new()
            .with_x(-1.0, 1.0)
            .with_y(0.0, 2.0)
            .with_z(2.0, 4.0);

        let (up, _) = draw_path(&path3d(), None, Some(&bbox), None, &PathStyle::default()).unwrap();
        assert_eq!(up.limits(Axis::X), Some(Bounds::new(-1.0, 1.0)));
        assert_eq!(up.limits(Axis::Z), Some(Bounds::new(0.0, 2.0)));
        assert_eq!(up.limits(Axis::Y), Some(Bounds::new(2.0, 4.0)));

        let style = PathStyle {
            up_axis: false,
            ..PathStyle::default()
        };
        let (flat, _) = draw_path(&path3d(), None, Some(&bbox), None, &style).unwrap();
        assert_eq!(flat.limits(Axis::Y), Some(Bounds::new(0.0, 2.0)));
        assert_eq!(flat.limits(Axis::Z), Some(Bounds::new(2.0, 4.0)));
    }

    #[test]
    fn colorbar_follows_last_scatter() {
        let style = PathStyle {
            colorbar: true,
            ..PathStyle::default()
        };
        let (surface, handle) = draw_path(&path3d(), Some(&dir3d()), None, None, &style).unwrap();
        let colorbar = surface.colorbar().unwrap();
        assert_eq!(colorbar.scatter, handle);
        assert_eq!(colorbar.range, Bounds::new(1.0, 3.0));
    }

    #[test]
    fn existing_surface_is_reused() {
        let mut surface = Surface::spatial();
        surface.set_limits(Axis::X, Bounds::new(-5.0, 5.0));
        let (surface, _) =
            draw_path(&path3d(), None, None, Some(surface), &PathStyle::default()).unwrap();
        assert_eq!(surface.explicit_limits(Axis::X), Some(Bounds::new(-5.0, 5.0)));
    }
}

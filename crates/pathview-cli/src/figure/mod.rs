//! Raster backend: draws a `Surface` into an RGB buffer with plotters and
//! writes it out with the `image` encoders.

use std::path::Path;

use image::{ImageFormat, RgbImage, RgbaImage};
use nalgebra::{Point3, Vector3};
use pathview_core::surface::{Artist, Colorbar, QuiverArtist, ScatterArtist};
use pathview_core::{Axis, Bounds, Surface};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::errors::{Result, ThumbnailError};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Figure size the style constants below are tuned for
const REFERENCE_SIZE: f64 = 600.0;
const BACKGROUND: RGBColor = WHITE;
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);
const PANE_COLOR: RGBColor = RGBColor(230, 230, 230);
const COLORBAR_WIDTH: f64 = 80.0;
const PROJECTION_YAW: f64 = 0.6;
const PROJECTION_PITCH: f64 = 0.3;
/// Arrowhead length relative to the arrow
const ARROW_HEAD_RATIO: f64 = 0.3;

/// Viridis anchor colors, evenly spaced on [0, 1]
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

fn plot_err<E: std::fmt::Display>(err: E) -> ThumbnailError {
    ThumbnailError::Plot(err.to_string())
}

/// Viridis color at `fraction` in [0, 1] (clamped)
pub fn viridis(fraction: f64) -> RGBColor {
    let f = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let pos = f * (VIRIDIS.len() - 1) as f64;
    let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let w = pos - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * w).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

fn text_style(px: f64) -> TextStyle<'static> {
    TextStyle::from(FontDesc::new(FontFamily::SansSerif, px, FontStyle::Normal)).color(&BLACK)
}

/// Plotting range for a bound pair; zero-width bounds are widened.
fn range(bounds: Bounds) -> std::ops::Range<f64> {
    if bounds.span() == 0.0 {
        bounds.lower - 0.5..bounds.upper + 0.5
    } else {
        bounds.lower..bounds.upper
    }
}

fn arrow_head(tip: Point3<f64>, vector: Vector3<f64>) -> [(Point3<f64>, Point3<f64>); 2] {
    let length = vector.norm();
    if length == 0.0 {
        return [(tip, tip), (tip, tip)];
    }
    let dir = vector / length;
    let reference = if dir.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let side = dir.cross(&reference).normalize() * (length * ARROW_HEAD_RATIO * 0.5);
    let base = tip - dir * (length * ARROW_HEAD_RATIO);
    [(tip, base + side), (tip, base - side)]
}

/// Segments of a quiver: the shaft plus two head strokes per arrow
fn quiver_segments(quiver: &QuiverArtist) -> Vec<(Point3<f64>, Point3<f64>)> {
    let mut segments = Vec::with_capacity(quiver.origins.len() * 3);
    for (origin, vector) in quiver.origins.iter().zip(&quiver.vectors) {
        let tip = origin + vector;
        segments.push((*origin, tip));
        segments.extend(arrow_head(tip, *vector));
    }
    segments
}

fn scatter_color(scatter: &ScatterArtist, value: f64) -> RGBColor {
    let range = scatter.value_range().unwrap_or(Bounds::new(0.0, 1.0));
    viridis(range.fraction(value))
}

/// An in-memory RGB raster of one rendered surface
pub struct Figure {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![255; width as usize * height as usize * 3],
        }
    }

    /// Run `f` with a fresh figure that is released as soon as `f` returns,
    /// whether it succeeded or not.
    pub fn scoped<T, F>(width: u32, height: u32, f: F) -> Result<T>
    where
        F: FnOnce(&mut Figure) -> Result<T>,
    {
        let mut figure = Figure::new(width, height);
        let result = f(&mut figure);
        drop(figure);
        result
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB8 pixels, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    pub fn render(&mut self, surface: &Surface) -> Result<()> {
        let (width, height) = (self.width, self.height);
        let scale = width.min(height) as f64 / REFERENCE_SIZE;

        let root =
            BitMapBackend::with_buffer(&mut self.buffer, (width, height)).into_drawing_area();
        root.fill(&BACKGROUND).map_err(plot_err)?;

        let plot_area = match surface.colorbar() {
            Some(colorbar) => {
                let split = width.saturating_sub((COLORBAR_WIDTH * scale) as u32);
                let (plot, bar) = root.split_horizontally(split);
                draw_colorbar(&bar, colorbar, scale)?;
                plot
            }
            None => root.clone(),
        };

        if surface.is_spatial() {
            draw_spatial(&plot_area, surface, scale)?;
        } else {
            draw_planar(&plot_area, surface, scale)?;
        }

        root.present().map_err(plot_err)?;
        Ok(())
    }

    /// Encode to `path`, choosing the format from its extension.
    ///
    /// With `transparent`, background pixels get alpha 0 in formats that
    /// carry alpha; other formats are written opaque.
    pub fn save<P: AsRef<Path>>(&self, path: P, transparent: bool) -> Result<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;
        let rgb = RgbImage::from_raw(self.width, self.height, self.buffer.clone())
            .ok_or_else(|| ThumbnailError::Plot("figure buffer has wrong size".to_string()))?;

        if transparent && supports_alpha(format) {
            let bg = [BACKGROUND.0, BACKGROUND.1, BACKGROUND.2];
            let rgba = RgbaImage::from_fn(self.width, self.height, |x, y| {
                let image::Rgb([r, g, b]) = *rgb.get_pixel(x, y);
                let alpha = if [r, g, b] == bg { 0 } else { 255 };
                image::Rgba([r, g, b, alpha])
            });
            rgba.save_with_format(path, format)?;
        } else {
            rgb.save_with_format(path, format)?;
        }
        Ok(())
    }
}

fn supports_alpha(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Tiff
    )
}

fn draw_spatial(area: &Area<'_>, surface: &Surface, scale: f64) -> Result<()> {
    let limits = |axis| surface.limits(axis).unwrap_or(Bounds::new(0.0, 1.0));
    let (bx, by, bz) = (limits(Axis::X), limits(Axis::Y), limits(Axis::Z));

    // plotters draws its second axis vertically: surface Z goes there, depth Y last.
    let to_chart = |p: &Point3<f64>| (p.x, p.z, p.y);

    let mut chart = ChartBuilder::on(area)
        .margin((20.0 * scale) as u32)
        .build_cartesian_3d(range(bx), range(bz), range(by))
        .map_err(plot_err)?;

    chart.with_projection(|mut pb| {
        pb.yaw = PROJECTION_YAW;
        pb.pitch = PROJECTION_PITCH;
        pb.scale = 0.8;
        pb.into_matrix()
    });

    let panel = if surface.panes_filled() {
        PANE_COLOR.mix(0.5).filled()
    } else {
        TRANSPARENT.filled()
    };
    if let Err(e) = chart
        .configure_axes()
        .axis_panel_style(panel)
        .light_grid_style(BLACK.mix(0.08))
        .max_light_lines(2)
        .label_style(text_style(10.0 * scale))
        .draw()
    {
        log::warn!("3D axes not fully drawn: {}", e);
    }

    for artist in surface.artists() {
        match artist {
            Artist::Line(line) => {
                chart
                    .draw_series(LineSeries::new(line.points.iter().map(to_chart), &LINE_COLOR))
                    .map_err(plot_err)?;
            }
            Artist::Scatter(scatter) => {
                let radius = point_radius(scatter.size, scale);
                chart
                    .draw_series(scatter.points.iter().zip(&scatter.values).map(|(p, &t)| {
                        Circle::new(to_chart(p), radius, scatter_color(scatter, t).filled())
                    }))
                    .map_err(plot_err)?;
            }
            Artist::Quiver(quiver) => {
                let color =
                    RGBColor(quiver.color.0, quiver.color.1, quiver.color.2).mix(quiver.alpha);
                chart
                    .draw_series(quiver_segments(quiver).into_iter().map(|(a, b)| {
                        PathElement::new(vec![to_chart(&a), to_chart(&b)], color)
                    }))
                    .map_err(plot_err)?;
            }
        }
    }

    let labels = [
        (Axis::X, Point3::new(bx.upper, by.lower, bz.lower)),
        (Axis::Y, Point3::new(bx.lower, by.upper, bz.lower)),
        (Axis::Z, Point3::new(bx.lower, by.lower, bz.upper)),
    ];
    for (axis, anchor) in labels {
        if let Some(label) = surface.label(axis) {
            let text = Text::new(label.to_string(), to_chart(&anchor), text_style(14.0 * scale));
            if let Err(e) = chart.draw_series(std::iter::once(text)) {
                log::warn!("Axis label '{}' not drawn: {}", label, e);
                break;
            }
        }
    }

    Ok(())
}

fn draw_planar(area: &Area<'_>, surface: &Surface, scale: f64) -> Result<()> {
    let limits = |axis| surface.limits(axis).unwrap_or(Bounds::new(0.0, 1.0));
    let (bx, by) = (limits(Axis::X), limits(Axis::Y));
    let to_chart = |p: &Point3<f64>| (p.x, p.y);

    let mut chart = ChartBuilder::on(area)
        .margin((15.0 * scale) as u32)
        .x_label_area_size((40.0 * scale) as u32)
        .y_label_area_size((50.0 * scale) as u32)
        .build_cartesian_2d(range(bx), range(by))
        .map_err(plot_err)?;

    if let Err(e) = chart
        .configure_mesh()
        .x_desc(surface.label(Axis::X).unwrap_or_default())
        .y_desc(surface.label(Axis::Y).unwrap_or_default())
        .light_line_style(BLACK.mix(0.05))
        .label_style(text_style(10.0 * scale))
        .draw()
    {
        log::warn!("Axes not fully drawn: {}", e);
    }

    for artist in surface.artists() {
        match artist {
            Artist::Line(line) => {
                chart
                    .draw_series(LineSeries::new(line.points.iter().map(to_chart), &LINE_COLOR))
                    .map_err(plot_err)?;
            }
            Artist::Scatter(scatter) => {
                let radius = point_radius(scatter.size, scale);
                chart
                    .draw_series(scatter.points.iter().zip(&scatter.values).map(|(p, &t)| {
                        Circle::new(to_chart(p), radius, scatter_color(scatter, t).filled())
                    }))
                    .map_err(plot_err)?;
            }
            Artist::Quiver(quiver) => {
                let color =
                    RGBColor(quiver.color.0, quiver.color.1, quiver.color.2).mix(quiver.alpha);
                chart
                    .draw_series(quiver_segments(quiver).into_iter().map(|(a, b)| {
                        PathElement::new(vec![to_chart(&a), to_chart(&b)], color)
                    }))
                    .map_err(plot_err)?;
            }
        }
    }

    Ok(())
}

fn draw_colorbar(area: &Area<'_>, colorbar: &Colorbar, scale: f64) -> Result<()> {
    let (_, height) = area.dim_in_pixel();
    let top = (height as f64 * 0.1) as i32;
    let bottom = (height as f64 * 0.9) as i32;
    let left = (10.0 * scale) as i32;
    let right = left + (16.0 * scale).max(4.0) as i32;

    let steps = (bottom - top).max(1);
    for i in 0..steps {
        let color = viridis(1.0 - i as f64 / steps as f64);
        area.draw(&Rectangle::new(
            [(left, top + i), (right, top + i + 1)],
            color.filled(),
        ))
        .map_err(plot_err)?;
    }
    area.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.stroke_width(1)))
        .map_err(plot_err)?;

    let range = colorbar.range;
    for (value, y) in [(range.upper, top), (range.lower, bottom)] {
        let text = Text::new(format!("{:.2}", value), (right + 4, y), text_style(10.0 * scale));
        if let Err(e) = area.draw(&text) {
            log::warn!("Colorbar labels not drawn: {}", e);
            break;
        }
    }
    Ok(())
}

/// Marker radius in pixels for a marker size given in points squared
fn point_radius(size: f64, scale: f64) -> i32 {
    (size.sqrt() * 1.5 * scale).round().max(1.0) as i32
}

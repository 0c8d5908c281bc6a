//! Chart rasterization: a labeled-value series in, a PNG image out.
//!
//! The pipeline only depends on the `ChartRenderer` trait; the default
//! implementation draws with plotters' bitmap backend and encodes the
//! raw RGB buffer as PNG.

use std::f64::consts::TAU;
use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use crate::aggregation::NamedSeries;
use crate::currency::{floor_currency, format_usd};
use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
}

pub trait ChartRenderer {
    /// Render `series` as a chart image of the given pixel dimensions.
    /// Returns encoded PNG bytes.
    fn render(
        &self,
        series: &NamedSeries,
        kind: ChartKind,
        width_px: u32,
        height_px: u32,
    ) -> Result<Vec<u8>, ReportError>;
}

/// Default renderer backed by plotters.
#[derive(Debug, Default)]
pub struct PlottersRenderer;

impl ChartRenderer for PlottersRenderer {
    fn render(
        &self,
        series: &NamedSeries,
        kind: ChartKind,
        width_px: u32,
        height_px: u32,
    ) -> Result<Vec<u8>, ReportError> {
        if series.is_empty() {
            return Err(ReportError::EmptySeries(format!("{kind:?}")));
        }

        let mut buf = vec![0u8; (width_px * height_px * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width_px, height_px))
                .into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;
            match kind {
                ChartKind::Pie => draw_pie(&root, series)?,
                ChartKind::Bar => draw_bar(&root, series)?,
            }
            root.present().map_err(chart_err)?;
        }

        let img = RgbImage::from_raw(width_px, height_px, buf)
            .ok_or_else(|| ReportError::Chart("pixel buffer size mismatch".to_string()))?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }
}

fn chart_err<E: std::error::Error>(err: E) -> ReportError {
    ReportError::Chart(err.to_string())
}

/// One wedge per group, first wedge exploded for emphasis.
///
/// Wedge labels re-derive their currency figure from the wedge's share of
/// the total rather than reusing the per-group value; with floor-rounding
/// on both paths the label can differ from the underlying value by one
/// cent. Known quirk, kept for output compatibility.
fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &NamedSeries,
) -> Result<(), ReportError> {
    let total = series.total();
    if total <= 0.0 {
        return Err(ReportError::EmptySeries("pie of non-positive total".to_string()));
    }

    let (width, height) = root.dim_in_pixel();
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let radius = 0.35 * width.min(height) as f64;

    let name_style = TextStyle::from(("sans-serif", 16).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let value_style = TextStyle::from(("sans-serif", 14).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    let mut angle = 0.0f64;
    for (i, (label, value)) in series.iter().enumerate() {
        let sweep = (value / total).max(0.0) * TAU;
        let mid = angle + sweep / 2.0;

        // First wedge is offset outward along its mid-angle.
        let offset = if i == 0 { 0.1 * radius } else { 0.0 };
        let wx = cx + offset * mid.cos();
        let wy = cy - offset * mid.sin();

        let steps = (sweep.to_degrees().ceil() as usize).max(2);
        let mut points = Vec::with_capacity(steps + 2);
        points.push((wx as i32, wy as i32));
        for s in 0..=steps {
            let a = angle + sweep * s as f64 / steps as f64;
            points.push((
                (wx + radius * a.cos()) as i32,
                (wy - radius * a.sin()) as i32,
            ));
        }
        root.draw(&Polygon::new(points, Palette99::pick(i).filled()))
            .map_err(chart_err)?;

        root.draw(&Text::new(
            label.clone(),
            (
                (wx + 1.15 * radius * mid.cos()) as i32,
                (wy - 1.15 * radius * mid.sin()) as i32,
            ),
            name_style.clone(),
        ))
        .map_err(chart_err)?;

        // Label text derived from the percentage share, not from the
        // already-rounded group value.
        let pct = 100.0 * value / total;
        let wedge_label = format_usd(floor_currency(pct / 100.0 * total));
        root.draw(&Text::new(
            wedge_label,
            (
                (wx + 0.6 * radius * mid.cos()) as i32,
                (wy - 0.6 * radius * mid.sin()) as i32,
            ),
            value_style.clone(),
        ))
        .map_err(chart_err)?;

        angle += sweep;
    }
    Ok(())
}

/// One bar per item; y labels formatted as whole percentages, rotated item
/// labels on the x axis, no x-axis title.
fn draw_bar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &NamedSeries,
) -> Result<(), ReportError> {
    let n = series.len() as u32;
    let max = series.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let y_max = if max > 0.0 { max * 1.05 } else { 0.05 };
    let labels: Vec<String> = series.iter().map(|(l, _)| l.clone()).collect();

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..n).into_segmented(), 0f64..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n as usize)
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) => {
                labels.get(*i as usize).cloned().unwrap_or_default()
            }
            _ => String::new(),
        })
        .x_label_style(
            ("sans-serif", 14)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_label_formatter(&|v| format!("{:.0}%", v * 100.0))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(Palette99::pick(0).filled())
                .margin(6)
                .data(series.iter().enumerate().map(|(i, (_, v))| (i as u32, *v))),
        )
        .map_err(chart_err)?;
    Ok(())
}

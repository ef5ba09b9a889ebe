use std::ops::Range;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::IntoTextStyle;

use crate::math::histogram::Histogram;
use crate::report::backend::CanvasBackend;

pub type Area<'a> = DrawingArea<CanvasBackend<'a>, Shift>;

const LEGEND_LIMIT: usize = 20;
const LABEL_FONT: u32 = 14;
const DESC_FONT: u32 = 18;
const ZERO_LINE_SEGMENTS: usize = 80;

pub struct Trace<'a> {
    pub label: String,
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub color: RGBAColor,
    pub width: u32,
}

impl<'a> Trace<'a> {
    pub fn new(label: impl Into<String>, x: &'a [f64], y: &'a [f64], color: RGBAColor) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            color,
            width: 3,
        }
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(self.y)
            .map(|(&x, &y)| (x, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

pub struct LinePanel<'a> {
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub traces: Vec<Trace<'a>>,
    /// Dotted red reference at y = 0 across the x range.
    pub zero_line: bool,
    pub placeholder: &'a str,
}

pub struct HistogramSeries<'a> {
    pub label: &'a str,
    pub hist: &'a Histogram,
    pub color: RGBAColor,
}

pub fn draw_line_panel(area: &Area<'_>, panel: &LinePanel<'_>) -> Result<()> {
    let Some((x_range, y_range)) = line_bounds(panel) else {
        return draw_placeholder(area, panel.placeholder, panel.x_desc, panel.y_desc);
    };

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.clone(), y_range)?;
    chart
        .configure_mesh()
        .x_desc(panel.x_desc)
        .y_desc(panel.y_desc)
        .label_style(("sans-serif", LABEL_FONT))
        .axis_desc_style(("sans-serif", DESC_FONT))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    if panel.zero_line {
        let step = (x_range.end - x_range.start) / ZERO_LINE_SEGMENTS as f64;
        let dots = (0..ZERO_LINE_SEGMENTS).step_by(2).map(|i| {
            let x0 = x_range.start + step * i as f64;
            PathElement::new(vec![(x0, 0.0), (x0 + step, 0.0)], RED.stroke_width(2))
        });
        chart.draw_series(dots)?;
    }

    let legend = panel.traces.len() <= LEGEND_LIMIT;
    for trace in &panel.traces {
        let color = trace.color;
        let series = chart.draw_series(LineSeries::new(
            trace.points(),
            color.stroke_width(trace.width),
        ))?;
        if legend {
            series
                .label(trace.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
        }
    }

    if legend && !panel.traces.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(("sans-serif", LABEL_FONT))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

/// Overlaid density histograms on a logarithmic y axis. Empty bins are not
/// drawn since they have no place on a log scale.
pub fn draw_histogram_panel(
    area: &Area<'_>,
    x_desc: &str,
    series: &[HistogramSeries<'_>],
    placeholder: &str,
) -> Result<()> {
    let y_desc = "Probability density";
    let Some((x_range, (d_lo, d_hi))) = histogram_bounds(series) else {
        return draw_placeholder(area, placeholder, x_desc, y_desc);
    };
    let y_lo = d_lo / 2.0;
    let y_hi = d_hi * 2.0;

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, (y_lo..y_hi).log_scale())?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .y_label_formatter(&|v: &f64| format!("{:.0e}", v))
        .label_style(("sans-serif", LABEL_FONT))
        .axis_desc_style(("sans-serif", DESC_FONT))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    for s in series {
        let color = s.color;
        let bars = s
            .hist
            .bins()
            .filter(|(_, _, d)| *d > 0.0)
            .map(move |(left, right, d)| Rectangle::new([(left, y_lo), (right, d)], color.filled()));
        chart
            .draw_series(bars)?
            .label(s.label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(("sans-serif", LABEL_FONT))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_placeholder(area: &Area<'_>, message: &str, x_desc: &str, y_desc: &str) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style(("sans-serif", LABEL_FONT))
        .axis_desc_style(("sans-serif", DESC_FONT))
        .draw()?;
    let style = ("sans-serif", DESC_FONT).into_text_style(area);
    chart.draw_series(std::iter::once(Text::new(
        message.to_string(),
        (0.38, 0.5),
        style,
    )))?;
    Ok(())
}

fn line_bounds(panel: &LinePanel<'_>) -> Option<(Range<f64>, Range<f64>)> {
    let mut x = Extent::default();
    let mut y = Extent::default();
    for trace in &panel.traces {
        for (px, py) in trace.points() {
            x.add(px);
            y.add(py);
        }
    }
    if panel.zero_line {
        y.add(0.0);
    }
    Some((x.range(0.0)?, y.range(0.05)?))
}

fn histogram_bounds(series: &[HistogramSeries<'_>]) -> Option<(Range<f64>, (f64, f64))> {
    let mut x = Extent::default();
    let mut d_lo = f64::INFINITY;
    let mut d_hi = 0.0f64;
    for s in series {
        if let Some((lo, hi)) = s.hist.positive_range() {
            d_lo = d_lo.min(lo);
            d_hi = d_hi.max(hi);
            for edge in [s.hist.edges.first(), s.hist.edges.last()].into_iter().flatten() {
                x.add(*edge);
            }
        }
    }
    if d_hi <= 0.0 {
        return None;
    }
    Some((x.range(0.02)?, (d_lo, d_hi)))
}

#[derive(Default)]
struct Extent {
    lo: Option<f64>,
    hi: Option<f64>,
}

impl Extent {
    fn add(&mut self, v: f64) {
        self.lo = Some(self.lo.map_or(v, |lo| lo.min(v)));
        self.hi = Some(self.hi.map_or(v, |hi| hi.max(v)));
    }

    /// Padded range; a single value is widened to a unit span.
    fn range(&self, pad: f64) -> Option<Range<f64>> {
        let (lo, hi) = (self.lo?, self.hi?);
        if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
            return Some((lo - 0.5)..(hi + 0.5));
        }
        let margin = (hi - lo) * pad;
        Some((lo - margin)..(hi + margin))
    }
}

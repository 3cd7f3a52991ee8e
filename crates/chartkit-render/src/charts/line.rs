use super::{Cartesian, label_slot, open_chart};
use crate::scale::{Margins, PlotArea, x_position};
use crate::shapes::line_series;
use crate::svg::{close_document, escape_xml, fmt};
use chartkit_core::ChartSpec;
use std::fmt::Write as _;

pub const LINE_MARGINS: Margins = Margins {
    top: 24.0,
    right: 24.0,
    bottom: 52.0,
    left: 48.0,
};
pub const LINE_GRID_LINES: usize = 5;
const MARKER_RADIUS: f64 = 3.5;

/// Renders one polyline (with point markers) per series over a shared value axis.
pub fn render_line_chart(spec: &ChartSpec) -> String {
    let area = PlotArea::new(LINE_MARGINS.with_title(spec.title.is_some()));
    let chart = Cartesian::new(spec, area, LINE_GRID_LINES);
    let series = line_series(spec, &chart.scale, area.inner_width());
    tracing::trace!(
        rows = spec.data.len(),
        series = series.len(),
        axis_max = chart.scale.max,
        "laid out line chart"
    );

    let mut out = String::new();
    open_chart(&mut out, spec);
    chart.open_plot(&mut out);
    chart.write_grid(&mut out);

    for s in series.iter().filter(|s| !s.points.is_empty()) {
        let color = escape_xml(&s.color);
        let _ = write!(
            &mut out,
            r#"<g class="series" data-series="{key}">"#,
            key = escape_xml(&s.key)
        );
        let points = s
            .points
            .iter()
            .map(|p| format!("{},{}", fmt(p.x), fmt(p.y)))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            &mut out,
            r#"<polyline class="series-line" points="{points}" fill="none" stroke="{color}" stroke-width="2" stroke-linejoin="round" stroke-linecap="round"/>"#,
        );
        for p in &s.points {
            let _ = write!(
                &mut out,
                r##"<circle class="series-marker" cx="{cx}" cy="{cy}" r="{r}" fill="{color}" stroke="#ffffff" stroke-width="1.5"/>"##,
                cx = fmt(p.x),
                cy = fmt(p.y),
                r = fmt(MARKER_RADIUS),
            );
        }
        out.push_str("</g>");
    }

    let count = spec.data.len();
    let labels: Vec<(f64, String)> = spec
        .data
        .iter()
        .enumerate()
        .map(|(i, row)| (x_position(i, count, area.inner_width()), spec.label(row)))
        .collect();
    let spacing = area.inner_width() / count.saturating_sub(1).max(1) as f64;
    chart.write_axes(&mut out, &labels, label_slot(&chart.measurer, spacing));
    out.push_str("</g>");

    chart.write_series_legend(&mut out, spec);
    close_document(&mut out);
    out
}

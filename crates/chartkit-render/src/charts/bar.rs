use super::{Cartesian, label_slot, open_chart};
use crate::scale::{Margins, PlotArea};
use crate::shapes::bar_groups;
use crate::svg::{TEXT_COLOR, close_document, escape_xml, fmt};
use chartkit_core::ChartSpec;
use std::fmt::Write as _;

pub const BAR_MARGINS: Margins = Margins {
    top: 24.0,
    right: 16.0,
    bottom: 52.0,
    left: 48.0,
};
pub const BAR_GRID_LINES: usize = 4;
const VALUE_LABEL_GAP: f64 = 4.0;
const VALUE_FONT_SIZE: f64 = 10.0;

/// Renders grouped vertical bars: one group per row, one bar per series.
pub fn render_bar_chart(spec: &ChartSpec) -> String {
    let area = PlotArea::new(BAR_MARGINS.with_title(spec.title.is_some()));
    let chart = Cartesian::new(spec, area, BAR_GRID_LINES);
    let layout = bar_groups(spec, &chart.scale, area.inner_width());
    tracing::trace!(
        rows = spec.data.len(),
        bar_width = layout.bar_width,
        axis_max = chart.scale.max,
        "laid out bar chart"
    );

    let mut out = String::new();
    open_chart(&mut out, spec);
    chart.open_plot(&mut out);
    chart.write_grid(&mut out);

    out.push_str(r#"<g class="bars">"#);
    for bar in &layout.bars {
        let _ = write!(
            &mut out,
            r#"<rect class="bar" x="{x}" y="{y}" width="{w}" height="{h}" rx="3" fill="{fill}"/>"#,
            x = fmt(bar.rect.origin.x),
            y = fmt(bar.rect.origin.y),
            w = fmt(bar.rect.size.width),
            h = fmt(bar.rect.size.height),
            fill = escape_xml(&bar.color),
        );
    }
    for bar in layout.bars.iter().filter(|b| b.show_label) {
        let _ = write!(
            &mut out,
            r#"<text class="bar-value" x="{x}" y="{y}" text-anchor="middle" font-size="{size}" fill="{fill}">{value}</text>"#,
            x = fmt(bar.rect.origin.x + bar.rect.size.width / 2.0),
            y = fmt(bar.rect.origin.y - VALUE_LABEL_GAP),
            size = fmt(VALUE_FONT_SIZE),
            fill = TEXT_COLOR,
            value = fmt(bar.value),
        );
    }
    out.push_str("</g>");

    let labels: Vec<(f64, String)> = spec
        .data
        .iter()
        .enumerate()
        .map(|(i, row)| (layout.group_center(i), spec.label(row)))
        .collect();
    chart.write_axes(
        &mut out,
        &labels,
        label_slot(&chart.measurer, layout.group_width),
    );
    out.push_str("</g>");

    chart.write_series_legend(&mut out, spec);
    close_document(&mut out);
    out
}

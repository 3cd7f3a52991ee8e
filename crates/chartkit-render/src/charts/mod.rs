pub mod bar;
pub mod line;
pub mod pie;

use crate::scale::{CANVAS_HEIGHT, GridLine, LinearScale, PlotArea, axis_max, grid_lines};
use crate::shapes::{LegendEntry, LegendItem, legend_row};
use crate::svg::{
    AXIS_COLOR, GRID_COLOR, MUTED_TEXT_COLOR, TEXT_COLOR, escape_xml, escape_xml_into, fmt,
};
use crate::text::{DeterministicTextMeasurer, TextMeasurer, TextStyle, truncate_to_width};
use chartkit_core::ChartSpec;
use std::fmt::Write as _;

pub use bar::render_bar_chart;
pub use line::render_line_chart;
pub use pie::render_pie_chart;

const AXIS_FONT_SIZE: f64 = 10.0;
const AXIS_LABEL_OFFSET: f64 = 16.0;
const LEGEND_BASELINE_FROM_BOTTOM: f64 = 12.0;

/// Label shown for the whole document when the chart has no title.
fn aria_label(spec: &ChartSpec) -> String {
    match spec.title.as_deref() {
        Some(t) => t.to_string(),
        None => format!("{} chart", spec.chart_type),
    }
}

/// Everything a cartesian (line or bar) chart shares before drawing its series.
pub(crate) struct Cartesian {
    pub area: PlotArea,
    pub scale: LinearScale,
    pub grid: Vec<GridLine>,
    pub measurer: DeterministicTextMeasurer,
}

impl Cartesian {
    pub fn new(spec: &ChartSpec, area: PlotArea, grid_count: usize) -> Self {
        let scale = LinearScale::new(axis_max(spec.all_values()), area.inner_height());
        let grid = grid_lines(&scale, grid_count);
        Self {
            area,
            scale,
            grid,
            measurer: DeterministicTextMeasurer::default(),
        }
    }

    pub fn open_plot(&self, out: &mut String) {
        let _ = write!(
            out,
            r#"<g class="plot" transform="translate({x},{y})">"#,
            x = fmt(self.area.margins.left),
            y = fmt(self.area.margins.top),
        );
    }

    pub fn write_grid(&self, out: &mut String) {
        out.push_str(r#"<g class="grid">"#);
        for line in &self.grid {
            let _ = write!(
                out,
                r#"<line x1="0" y1="{y}" x2="{w}" y2="{y}" stroke="{stroke}" stroke-width="1"/>"#,
                y = fmt(line.y),
                w = fmt(self.area.inner_width()),
                stroke = GRID_COLOR,
            );
            let _ = write!(
                out,
                r#"<text x="-8" y="{y}" dy="0.32em" text-anchor="end" font-size="{size}" fill="{fill}">{value}</text>"#,
                y = fmt(line.y),
                size = fmt(AXIS_FONT_SIZE),
                fill = MUTED_TEXT_COLOR,
                value = fmt(line.value),
            );
        }
        out.push_str("</g>");
    }

    /// Axis lines plus one category label per row, each shortened to `slot_width`.
    pub fn write_axes(&self, out: &mut String, labels: &[(f64, String)], slot_width: f64) {
        let w = fmt(self.area.inner_width());
        let h = fmt(self.area.inner_height());
        out.push_str(r#"<g class="axis">"#);
        let _ = write!(
            out,
            r#"<line x1="0" y1="{h}" x2="{w}" y2="{h}" stroke="{stroke}" stroke-width="1"/>"#,
            stroke = AXIS_COLOR,
        );
        let _ = write!(
            out,
            r#"<line x1="0" y1="0" x2="0" y2="{h}" stroke="{stroke}" stroke-width="1"/>"#,
            stroke = AXIS_COLOR,
        );

        let style = TextStyle::sized(AXIS_FONT_SIZE);
        let max_width = (slot_width - 4.0).max(0.0);
        let y = fmt(self.area.inner_height() + AXIS_LABEL_OFFSET);
        for (x, label) in labels {
            let text = truncate_to_width(&self.measurer, label, &style, max_width);
            let _ = write!(
                out,
                r#"<text x="{x}" y="{y}" text-anchor="middle" font-size="{size}" fill="{fill}">"#,
                x = fmt(*x),
                size = fmt(AXIS_FONT_SIZE),
                fill = MUTED_TEXT_COLOR,
            );
            escape_xml_into(out, &text);
            out.push_str("</text>");
        }
        out.push_str("</g>");
    }

    /// Series legend along the bottom strip; only drawn for more than one series.
    pub fn write_series_legend(&self, out: &mut String, spec: &ChartSpec) {
        if spec.y_keys.len() <= 1 {
            return;
        }
        let items: Vec<LegendItem> = spec
            .y_keys
            .iter()
            .enumerate()
            .map(|(i, key)| LegendItem {
                label: key.clone(),
                detail: None,
                color: spec.color_at(i).to_string(),
            })
            .collect();
        let margins = self.area.margins;
        let entries = legend_row(
            &self.measurer,
            &items,
            margins.left,
            crate::scale::CANVAS_WIDTH - margins.right,
            CANVAS_HEIGHT - LEGEND_BASELINE_FROM_BOTTOM,
        );
        write_legend(out, &entries);
    }
}

pub(crate) fn write_legend(out: &mut String, entries: &[LegendEntry]) {
    out.push_str(r#"<g class="legend">"#);
    for entry in entries {
        let _ = write!(
            out,
            r#"<rect class="legend-swatch" x="{x}" y="{y}" width="{s}" height="{s}" rx="2" fill="{fill}"/>"#,
            x = fmt(entry.swatch.x),
            y = fmt(entry.swatch.y),
            s = fmt(entry.swatch_size),
            fill = escape_xml(&entry.color),
        );
        let _ = write!(
            out,
            r#"<text class="legend-label" x="{x}" y="{y}" font-size="{size}" fill="{fill}">{text}</text>"#,
            x = fmt(entry.text_at.x),
            y = fmt(entry.text_at.y),
            size = fmt(entry.font_size),
            fill = TEXT_COLOR,
            text = escape_xml(&entry.text),
        );
    }
    out.push_str("</g>");
}

pub(crate) fn open_chart(out: &mut String, spec: &ChartSpec) {
    crate::svg::open_document(out, &aria_label(spec));
    crate::svg::write_title(out, spec.title.as_deref());
}

/// Width available to a single category label when labels sit `spacing` apart.
pub(crate) fn label_slot(measurer: &dyn TextMeasurer, spacing: f64) -> f64 {
    let min = measurer
        .measure("\u{2026}", &TextStyle::sized(AXIS_FONT_SIZE))
        .width
        + 4.0;
    spacing.max(min)
}

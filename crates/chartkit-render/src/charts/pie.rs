use super::{open_chart, write_legend};
use crate::scale::{CANVAS_HEIGHT, CANVAS_WIDTH, Margins, PlotArea};
use crate::shapes::{LegendItem, legend_column, pie_sectors, sector_path};
use crate::svg::{close_document, escape_xml};
use crate::text::DeterministicTextMeasurer;
use chartkit_core::ChartSpec;
use chartkit_core::geom::point;
use std::fmt::Write as _;

/// The right margin doubles as the legend column.
pub const PIE_MARGINS: Margins = Margins {
    top: 16.0,
    right: 196.0,
    bottom: 16.0,
    left: 16.0,
};
const RADIUS_INSET: f64 = 4.0;
const LEGEND_INSET: f64 = 16.0;

pub fn render_pie_chart(spec: &ChartSpec) -> String {
    let area = PlotArea::new(PIE_MARGINS.with_title(spec.title.is_some()));
    let margins = area.margins;
    let center = point(
        margins.left + area.inner_width() / 2.0,
        margins.top + area.inner_height() / 2.0,
    );
    let radius = (area.inner_width().min(area.inner_height()) / 2.0 - RADIUS_INSET).max(0.0);
    let sectors = pie_sectors(spec);
    tracing::trace!(slices = sectors.len(), radius, "laid out pie chart");

    let mut out = String::new();
    open_chart(&mut out, spec);

    out.push_str(r#"<g class="slices">"#);
    for sector in &sectors {
        let _ = write!(
            &mut out,
            r##"<path class="slice" d="{d}" fill="{fill}" stroke="#ffffff" stroke-width="1.5"/>"##,
            d = sector_path(center, radius, sector),
            fill = escape_xml(&sector.color),
        );
    }
    out.push_str("</g>");

    let items: Vec<LegendItem> = sectors
        .iter()
        .map(|s| LegendItem {
            label: s.label.clone(),
            detail: Some(format!(" ({}%)", s.percent)),
            color: s.color.clone(),
        })
        .collect();
    let legend_x = CANVAS_WIDTH - margins.right + LEGEND_INSET;
    let entries = legend_column(
        &DeterministicTextMeasurer::default(),
        &items,
        legend_x,
        margins.top + LEGEND_INSET,
        CANVAS_HEIGHT - margins.bottom,
        margins.right - 2.0 * LEGEND_INSET,
    );
    write_legend(&mut out, &entries);

    close_document(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartkit_core::{ChartType, FieldValue};

    fn slices(values: &[f64]) -> ChartSpec {
        let mut spec = ChartSpec::new(ChartType::Pie, "name", ["value"]);
        for (i, v) in values.iter().enumerate() {
            spec = spec.with_row([
                ("name", FieldValue::from(format!("S{i}"))),
                ("value", FieldValue::from(*v)),
            ]);
        }
        spec
    }

    #[test]
    fn legend_is_always_present() {
        let svg = render_pie_chart(&slices(&[5.0]));
        assert!(svg.contains(r#"class="legend""#));
        assert!(svg.contains(">S0 (100%)</text>"));
    }

    #[test]
    fn large_arc_flag_follows_the_span() {
        let svg = render_pie_chart(&slices(&[3.0, 1.0]));
        let paths: Vec<&str> = svg
            .match_indices(r#" d=""#)
            .filter_map(|(i, _)| svg[i + 4..].split('"').next())
            .collect();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].contains(",0,1,1,"));
        assert!(paths[1].contains(",0,0,1,"));
    }

    #[test]
    fn title_shrinks_the_radius() {
        let plain = render_pie_chart(&slices(&[1.0, 1.0]));
        let titled = render_pie_chart(&slices(&[1.0, 1.0]).with_title("Share"));
        assert!(plain.contains("A115,115,"));
        assert!(titled.contains("A101,101,"));
    }

    #[test]
    fn legend_has_one_entry_per_slice() {
        for count in [20, 75] {
            let values = vec![5.0; count];
            let svg = render_pie_chart(&slices(&values));
            assert_eq!(svg.matches(r#"class="slice""#).count(), count);
            assert_eq!(svg.matches(r#"class="legend-label""#).count(), count);
        }
        assert!(render_pie_chart(&slices(&[5.0; 20])).contains(">S19 (5%)</text>"));
    }
}

#![forbid(unsafe_code)]

//! Headless chart layout + SVG rendering.
//!
//! Every renderer is a pure function of its [`ChartSpec`]: no I/O, no shared state, and the same
//! input always yields byte-identical SVG. Renders may run concurrently without coordination.

pub mod charts;
pub mod scale;
pub mod shapes;
pub mod svg;
pub mod text;

use chartkit_core::{ChartSpec, ChartType};

pub use charts::{render_bar_chart, render_line_chart, render_pie_chart};

/// Renders `spec` with the renderer for its chart type.
///
/// Returns an empty string for [`ChartType::Unsupported`]; callers should read that as
/// "unsupported chart type", not as a transient failure.
pub fn render_chart_svg(spec: &ChartSpec) -> String {
    match &spec.chart_type {
        ChartType::Line => render_line_chart(spec),
        ChartType::Bar => render_bar_chart(spec),
        ChartType::Pie => render_pie_chart(spec),
        ChartType::Unsupported(tag) => {
            tracing::debug!(chart_type = %tag, "unsupported chart type; nothing rendered");
            String::new()
        }
    }
}

#![forbid(unsafe_code)]

//! `chartkit` renders declarative chart specs (line, bar, pie) into standalone SVG, without a
//! display surface, for embedding in reports and emails.
//!
//! # Features
//!
//! - `render` (default): SVG rendering (`chartkit::render`)
//! - `raster`: PNG/JPG output via pure-Rust SVG rasterization (`chartkit::render::raster`)

pub use chartkit_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use chartkit_render::scale::{CANVAS_HEIGHT, CANVAS_WIDTH};
    pub use chartkit_render::text::{DeterministicTextMeasurer, TextMeasurer, TextStyle};
    pub use chartkit_render::{
        render_bar_chart, render_chart_svg, render_line_chart, render_pie_chart,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    /// Renders `spec` to SVG, or `None` when its chart type is not supported.
    pub fn render_svg(spec: &crate::ChartSpec) -> Option<String> {
        let svg = render_chart_svg(spec);
        if svg.is_empty() { None } else { Some(svg) }
    }
}

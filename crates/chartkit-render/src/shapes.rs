//! Turns scaled data into drawable primitives: series polylines, grouped bars, pie sectors and
//! legend entries. Nothing here writes SVG; the chart renderers do that.

use crate::scale::{LinearScale, x_position};
use crate::text::{TextMeasurer, TextStyle, truncate_to_width};
use chartkit_core::ChartSpec;
use chartkit_core::geom::{Point, Rect, point, rect};
use std::f64::consts::{PI, TAU};

/// Share of a bar group's width left empty on each side.
pub const BAR_GROUP_PADDING: f64 = 0.18;
pub const BAR_GAP: f64 = 4.0;
pub const MAX_BAR_WIDTH: f64 = 28.0;
/// Bars narrower than this get no value label.
pub const MIN_LABELED_BAR_WIDTH: f64 = 20.0;

pub const LEGEND_FONT_SIZE: f64 = 11.0;
pub const LEGEND_SWATCH: f64 = 10.0;
const LEGEND_SWATCH_GAP: f64 = 6.0;
const LEGEND_ENTRY_GAP: f64 = 16.0;
const LEGEND_ROW_LABEL_MAX: f64 = 120.0;
pub const LEGEND_LINE_HEIGHT: f64 = 20.0;
/// Tightest line spacing a legend column is compressed to before it splits into more columns.
pub const LEGEND_MIN_LINE_HEIGHT: f64 = 10.0;
const LEGEND_MIN_COLUMN_WIDTH: f64 = 40.0;
const LEGEND_COLUMN_GAP: f64 = 6.0;
const LEGEND_FONT_TO_LINE: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPath {
    pub key: String,
    pub color: String,
    pub points: Vec<Point>,
}

/// One polyline per `y_keys` entry, in declaration order, through every row.
pub fn line_series(spec: &ChartSpec, scale: &LinearScale, inner_width: f64) -> Vec<SeriesPath> {
    let count = spec.data.len();
    spec.y_keys
        .iter()
        .enumerate()
        .map(|(si, key)| SeriesPath {
            key: key.clone(),
            color: spec.color_at(si).to_string(),
            points: spec
                .series_values(key)
                .enumerate()
                .map(|(i, v)| point(x_position(i, count, inner_width), scale.y(v)))
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub row: usize,
    pub series: usize,
    pub value: f64,
    pub rect: Rect,
    pub color: String,
    pub show_label: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub group_width: f64,
    pub bar_width: f64,
    pub bars: Vec<Bar>,
}

impl BarLayout {
    /// Horizontal center of group `row`, where its category label goes.
    pub fn group_center(&self, row: usize) -> f64 {
        (row as f64 + 0.5) * self.group_width
    }
}

/// Splits the inner width into one group per row and one bar per series inside each group.
///
/// Bars start at the left edge of the padded group area. Once the width cap kicks in a group no
/// longer fills its slot.
pub fn bar_groups(spec: &ChartSpec, scale: &LinearScale, inner_width: f64) -> BarLayout {
    let group_width = inner_width / spec.data.len().max(1) as f64;
    let padding = group_width * BAR_GROUP_PADDING;
    let series_count = spec.y_keys.len().max(1) as f64;
    let usable = group_width - 2.0 * padding;
    let bar_width = ((usable - BAR_GAP * (series_count - 1.0)) / series_count)
        .clamp(0.0, MAX_BAR_WIDTH);
    let show_label = bar_width >= MIN_LABELED_BAR_WIDTH;

    let mut bars = Vec::with_capacity(spec.data.len() * spec.y_keys.len());
    for (row_idx, row) in spec.data.iter().enumerate() {
        let group_x = row_idx as f64 * group_width + padding;
        for (si, key) in spec.y_keys.iter().enumerate() {
            let value = ChartSpec::value(row, key);
            let top = scale.y(value);
            let height = (scale.inner_height - top).max(0.0);
            let x = group_x + si as f64 * (bar_width + BAR_GAP);
            bars.push(Bar {
                row: row_idx,
                series: si,
                value,
                rect: rect(x, top.min(scale.inner_height), bar_width, height),
                color: spec.color_at(si).to_string(),
                show_label,
            });
        }
    }

    BarLayout {
        group_width,
        bar_width,
        bars,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub label: String,
    pub value: f64,
    /// Radians, clockwise from 12 o'clock.
    pub start_angle: f64,
    pub end_angle: f64,
    pub percent: i64,
    pub color: String,
}

impl Sector {
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// One sector per row, sized by the first `y_keys` field.
///
/// Negative and non-finite values count as 0. A zero total is replaced by 1, which collapses
/// every sector to a zero span instead of dividing by zero.
pub fn pie_sectors(spec: &ChartSpec) -> Vec<Sector> {
    let key = spec.y_keys.first().map(String::as_str).unwrap_or_default();
    let values: Vec<f64> = spec
        .series_values(key)
        .map(|v| if v > 0.0 { v } else { 0.0 })
        .collect();
    let mut total: f64 = values.iter().sum();
    if total == 0.0 {
        total = 1.0;
    }

    let mut start = 0.0;
    spec.data
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (row, value))| {
            let frac = value / total;
            let end = start + frac * TAU;
            let sector = Sector {
                label: spec.label(row),
                value,
                start_angle: start,
                end_angle: end,
                percent: (frac * 100.0).round() as i64,
                color: spec.color_at(i).to_string(),
            };
            start = end;
            sector
        })
        .collect()
}

/// Point on the circle at `angle`, using a 12-o'clock-is-zero, clockwise convention.
pub fn polar_point(center: Point, radius: f64, angle: f64) -> Point {
    point(
        center.x + radius * angle.sin(),
        center.y - radius * angle.cos(),
    )
}

/// SVG path data for a sector. A full-turn sector is drawn as a closed two-arc circle, since a
/// single arc whose endpoints coincide renders nothing.
pub fn sector_path(center: Point, radius: f64, sector: &Sector) -> String {
    use crate::svg::fmt;

    let r = fmt(radius);
    if sector.span() >= TAU - 1e-9 {
        return format!(
            "M{cx},{top}A{r},{r},0,1,1,{cx},{bottom}A{r},{r},0,1,1,{cx},{top}Z",
            cx = fmt(center.x),
            top = fmt(center.y - radius),
            bottom = fmt(center.y + radius),
        );
    }

    let p0 = polar_point(center, radius, sector.start_angle);
    let p1 = polar_point(center, radius, sector.end_angle);
    let large = if sector.span() > PI { 1 } else { 0 };
    format!(
        "M{cx},{cy}L{x0},{y0}A{r},{r},0,{large},1,{x1},{y1}Z",
        cx = fmt(center.x),
        cy = fmt(center.y),
        x0 = fmt(p0.x),
        y0 = fmt(p0.y),
        x1 = fmt(p1.x),
        y1 = fmt(p1.y),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub label: String,
    /// Suffix kept intact when the label has to be shortened, e.g. ` (25%)`.
    pub detail: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Top-left corner of the swatch.
    pub swatch: Point,
    pub swatch_size: f64,
    /// Text anchor (start, baseline).
    pub text_at: Point,
    pub font_size: f64,
    pub text: String,
    pub color: String,
}

impl LegendEntry {
    fn at(x: f64, baseline: f64, font_size: f64, text: String, color: &str) -> Self {
        let scale = font_size / LEGEND_FONT_SIZE;
        let swatch_size = LEGEND_SWATCH * scale;
        Self {
            swatch: point(x, baseline - swatch_size + scale),
            swatch_size,
            text_at: point(x + swatch_size + LEGEND_SWATCH_GAP * scale, baseline),
            font_size,
            text,
            color: color.to_string(),
        }
    }
}

fn legend_text(
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
    item: &LegendItem,
    max_width: f64,
) -> String {
    let detail = item.detail.as_deref().unwrap_or_default();
    let detail_width = measurer.measure(detail, style).width;
    let label = truncate_to_width(
        measurer,
        &item.label,
        style,
        (max_width - detail_width).max(0.0),
    );
    format!("{label}{detail}")
}

/// Packs every entry left to right on one baseline between `left` and `right`.
///
/// Labels share the width evenly and are shortened to their share. If even the shortened
/// entries overflow, the whole row is scaled down to fit.
pub fn legend_row(
    measurer: &dyn TextMeasurer,
    items: &[LegendItem],
    left: f64,
    right: f64,
    baseline: f64,
) -> Vec<LegendEntry> {
    if items.is_empty() {
        return Vec::new();
    }
    let style = TextStyle::sized(LEGEND_FONT_SIZE);
    let n = items.len() as f64;
    let available = (right - left).max(0.0);
    let share = (available - LEGEND_ENTRY_GAP * (n - 1.0)) / n;
    let label_max = (share - LEGEND_SWATCH - LEGEND_SWATCH_GAP).clamp(0.0, LEGEND_ROW_LABEL_MAX);

    let mut placed = Vec::with_capacity(items.len());
    let mut x = 0.0;
    for item in items {
        let text = legend_text(measurer, &style, item, label_max);
        let width = LEGEND_SWATCH + LEGEND_SWATCH_GAP + measurer.measure(&text, &style).width;
        placed.push((x, text, item));
        x += width + LEGEND_ENTRY_GAP;
    }

    let used = x - LEGEND_ENTRY_GAP;
    let factor = if used > available && used > 0.0 {
        available / used
    } else {
        1.0
    };
    placed
        .into_iter()
        .map(|(offset, text, item)| {
            LegendEntry::at(
                left + offset * factor,
                baseline,
                LEGEND_FONT_SIZE * factor,
                text,
                &item.color,
            )
        })
        .collect()
}

/// Stacks every entry top to bottom, with baselines from `top` to at most `bottom`.
///
/// Entries keep the default spacing while they fit. Past that the line height shrinks, and once
/// it would drop below [`LEGEND_MIN_LINE_HEIGHT`] the entries flow into side-by-side columns.
pub fn legend_column(
    measurer: &dyn TextMeasurer,
    items: &[LegendItem],
    x: f64,
    top: f64,
    bottom: f64,
    max_width: f64,
) -> Vec<LegendEntry> {
    if items.is_empty() {
        return Vec::new();
    }
    let n = items.len();
    let available = (bottom - top).max(0.0);

    let rows_at_min = (available / LEGEND_MIN_LINE_HEIGHT).floor() as usize + 1;
    let max_columns = ((max_width / LEGEND_MIN_COLUMN_WIDTH).floor() as usize).max(1);
    let columns = n.div_ceil(rows_at_min).clamp(1, max_columns);
    let rows = n.div_ceil(columns);

    let line_height = if rows > 1 {
        LEGEND_LINE_HEIGHT.min(available / (rows - 1) as f64)
    } else {
        LEGEND_LINE_HEIGHT
    };
    let font_size = LEGEND_FONT_SIZE.min(line_height * LEGEND_FONT_TO_LINE);
    let style = TextStyle::sized(font_size);

    let column_width = max_width / columns as f64;
    let gap = if columns > 1 { LEGEND_COLUMN_GAP } else { 0.0 };
    let text_width =
        column_width - gap - (LEGEND_SWATCH + LEGEND_SWATCH_GAP) * font_size / LEGEND_FONT_SIZE;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let column = i / rows;
            let row = i % rows;
            LegendEntry::at(
                x + column as f64 * column_width,
                top + row as f64 * line_height,
                font_size,
                legend_text(measurer, &style, item, text_width.max(0.0)),
                &item.color,
            )
        })
        .collect()
}

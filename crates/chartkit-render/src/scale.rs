//! Axis ranges and value-to-pixel mapping shared by the cartesian charts.

/// Every chart renders onto a canvas of this fixed size, whatever its data volume.
pub const CANVAS_WIDTH: f64 = 500.0;
pub const CANVAS_HEIGHT: f64 = 270.0;

/// Space reserved at the top of the canvas for a title.
pub const TITLE_SPACE: f64 = 28.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// Same margins with the title band added on top.
    pub fn with_title(self, has_title: bool) -> Self {
        if has_title {
            Self {
                top: self.top + TITLE_SPACE,
                ..self
            }
        } else {
            self
        }
    }
}

/// Canvas plus margins; the inner rectangle is where data is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub margins: Margins,
}

impl PlotArea {
    pub fn new(margins: Margins) -> Self {
        Self { margins }
    }

    pub fn inner_width(&self) -> f64 {
        CANVAS_WIDTH - self.margins.left - self.margins.right
    }

    pub fn inner_height(&self) -> f64 {
        CANVAS_HEIGHT - self.margins.top - self.margins.bottom
    }
}

/// Upper bound of the value axis.
///
/// Data that tops out at or below 100 keeps a stable 0..100 axis; anything larger rounds up to
/// the next multiple of 10. Non-finite values are ignored.
pub fn axis_max<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let max = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if max <= 100.0 {
        100.0
    } else {
        (max / 10.0).ceil() * 10.0
    }
}

/// Linear mapping from `[min, max]` onto `[inner_height, 0]`.
///
/// Values outside the domain are not clamped and land outside the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub min: f64,
    pub max: f64,
    pub inner_height: f64,
}

impl LinearScale {
    pub fn new(max: f64, inner_height: f64) -> Self {
        Self {
            min: 0.0,
            max,
            inner_height,
        }
    }

    pub fn y(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            return self.inner_height;
        }
        self.inner_height - ((value - self.min) / span) * self.inner_height
    }
}

/// Horizontal position of row `index` out of `count`, spread edge to edge across the width.
///
/// A single row sits at x = 0.
pub fn x_position(index: usize, count: usize, inner_width: f64) -> f64 {
    let divisor = count.saturating_sub(1).max(1) as f64;
    index as f64 * inner_width / divisor
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub y: f64,
    /// Axis value at this line, rounded to a whole number.
    pub value: f64,
}

/// `count` guide lines from the baseline to the top of the plot, evenly spaced.
pub fn grid_lines(scale: &LinearScale, count: usize) -> Vec<GridLine> {
    let steps = count.saturating_sub(1).max(1) as f64;
    (0..count)
        .map(|i| {
            let value = scale.min + (scale.max - scale.min) * (i as f64 / steps);
            GridLine {
                y: scale.y(value),
                value: value.round(),
            }
        })
        .collect()
}

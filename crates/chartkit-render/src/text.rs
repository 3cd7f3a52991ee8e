use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 11.0,
            font_weight: None,
        }
    }
}

impl TextStyle {
    pub fn sized(font_size: f64) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-free measurer: every column is `font_size * char_width_factor` wide.
///
/// East Asian wide characters count as two columns. Output depends only on the input text, so
/// layouts built on it are reproducible across machines.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let font_size = style.font_size.max(1.0);
        let columns: usize = text.chars().map(|ch| ch.width().unwrap_or(0)).sum();
        TextMetrics {
            width: columns as f64 * font_size * char_width_factor,
            height: font_size * line_height_factor,
        }
    }
}

const ELLIPSIS: char = '\u{2026}';

/// Shortens `text` so that it measures at most `max_width`, marking the cut with an ellipsis.
///
/// Text that already fits is returned unchanged. When not even the ellipsis fits, the result is
/// the bare ellipsis.
pub fn truncate_to_width(
    measurer: &dyn TextMeasurer,
    text: &str,
    style: &TextStyle,
    max_width: f64,
) -> String {
    if measurer.measure(text, style).width <= max_width {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        out.push(ch);
        out.push(ELLIPSIS);
        let fits = measurer.measure(&out, style).width <= max_width;
        out.pop();
        if !fits {
            out.pop();
            break;
        }
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push(ELLIPSIS);
    out
}

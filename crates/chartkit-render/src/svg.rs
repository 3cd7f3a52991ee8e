// Shared SVG writing helpers used by every chart renderer.
//
// All text and attribute values pass through `escape_xml` before they reach the document.

use crate::scale::{CANVAS_HEIGHT, CANVAS_WIDTH};
use std::fmt::Write as _;

pub(crate) const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";
pub(crate) const BACKGROUND_FILL: &str = "#ffffff";
pub(crate) const TEXT_COLOR: &str = "#1f2937";
pub(crate) const MUTED_TEXT_COLOR: &str = "#6b7280";
pub(crate) const GRID_COLOR: &str = "#e5e7eb";
pub(crate) const AXIS_COLOR: &str = "#9ca3af";

pub(crate) const TITLE_FONT_SIZE: f64 = 15.0;
pub(crate) const TITLE_BASELINE_Y: f64 = 26.0;

/// Magnitude from which [`fmt`] prints whole numbers only.
pub const FIXED_POINT_LIMIT: f64 = 1e12;

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

pub fn escape_xml_into(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut start = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        if start < i {
            out.push_str(&text[start..i]);
        }
        out.push_str(esc);
        start = i + 1;
    }
    if start < text.len() {
        out.push_str(&text[start..]);
    }
}

/// Formats a coordinate with at most three fractional digits and no trailing zeros.
///
/// Magnitudes past [`FIXED_POINT_LIMIT`] print as whole numbers.
pub fn fmt(v: f64) -> String {
    let mut out = String::new();
    fmt_into(&mut out, v);
    out
}

pub fn fmt_into(out: &mut String, v: f64) {
    if !v.is_finite() || v.abs() < 0.0005 {
        out.push('0');
        return;
    }

    if v.abs() >= FIXED_POINT_LIMIT {
        let _ = write!(out, "{}", v.round());
        return;
    }

    let k = (v * 1000.0).round() as i64;
    if k == 0 {
        out.push('0');
        return;
    }

    let abs = k.unsigned_abs();
    if k < 0 {
        out.push('-');
    }
    let _ = write!(out, "{}", abs / 1000);
    let frac = abs % 1000;
    if frac == 0 {
        return;
    }
    let digits = format!("{frac:03}");
    out.push('.');
    out.push_str(digits.trim_end_matches('0'));
}

pub(crate) fn open_document(out: &mut String, aria_label: &str) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{label}" font-family="{font}">"#,
        w = fmt(CANVAS_WIDTH),
        h = fmt(CANVAS_HEIGHT),
        label = escape_xml(aria_label),
        font = FONT_FAMILY,
    );
    let _ = write!(
        out,
        r#"<rect class="background" x="0" y="0" width="{w}" height="{h}" rx="12" ry="12" fill="{fill}"/>"#,
        w = fmt(CANVAS_WIDTH),
        h = fmt(CANVAS_HEIGHT),
        fill = BACKGROUND_FILL,
    );
}

pub(crate) fn write_title(out: &mut String, title: Option<&str>) {
    let Some(title) = title else {
        return;
    };
    let _ = write!(
        out,
        r#"<text class="chart-title" x="{x}" y="{y}" text-anchor="middle" font-size="{size}" font-weight="600" fill="{fill}">{text}</text>"#,
        x = fmt(CANVAS_WIDTH / 2.0),
        y = fmt(TITLE_BASELINE_Y),
        size = fmt(TITLE_FONT_SIZE),
        fill = TEXT_COLOR,
        text = escape_xml(title),
    );
}

pub(crate) fn close_document(out: &mut String) {
    out.push_str("</svg>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_reserved_characters() {
        assert_eq!(
            escape_xml(r#"a&b <c> "d" 'e'"#),
            "a&amp;b &lt;c&gt; &quot;d&quot; &#39;e&#39;"
        );
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn fmt_trims_trailing_zeros() {
        assert_eq!(fmt(12.0), "12");
        assert_eq!(fmt(12.5), "12.5");
        assert_eq!(fmt(1.0 / 3.0), "0.333");
        assert_eq!(fmt(-2.25), "-2.25");
        assert_eq!(fmt(-0.0001), "0");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn fmt_prints_huge_values_in_full() {
        assert_eq!(fmt(2e16), "20000000000000000");
        assert_eq!(fmt(-3.5e15), "-3500000000000000");
        assert_eq!(fmt(1e12 + 0.4), "1000000000000");
        assert_eq!(fmt(999_999_999_999.25), "999999999999.25");
    }

    #[test]
    fn title_is_omitted_when_absent() {
        let mut out = String::new();
        write_title(&mut out, None);
        assert!(out.is_empty());
        write_title(&mut out, Some("Q&A"));
        assert!(out.contains(">Q&amp;A</text>"));
    }
}

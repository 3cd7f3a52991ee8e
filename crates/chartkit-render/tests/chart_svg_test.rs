use chartkit_core::{ChartSpec, ChartType, DEFAULT_PALETTE, FieldValue};
use chartkit_render::render_chart_svg;
use chartkit_render::scale::{CANVAS_HEIGHT, PlotArea};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(name: &str) -> ChartSpec {
    let path = workspace_root().join("fixtures").join(name);
    let text = std::fs::read_to_string(&path).expect("fixture");
    ChartSpec::from_json_str(&text).expect("spec")
}

fn all_fixtures() -> Vec<ChartSpec> {
    ["line_multi.json", "bar_scores.json", "pie_share.json"]
        .into_iter()
        .map(fixture)
        .collect()
}

fn attr_f64(node: roxmltree::Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or_else(|| panic!("missing numeric attribute {name}"))
}

#[test]
fn every_chart_is_well_formed_with_one_background() {
    for spec in all_fixtures() {
        let svg = render_chart_svg(&spec);
        assert!(!svg.is_empty(), "{} rendered nothing", spec.chart_type);

        let doc = roxmltree::Document::parse(&svg).expect("well-formed SVG");
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "svg");
        assert_eq!(root.attribute("width"), Some("500"));
        assert_eq!(root.attribute("height"), Some("270"));

        let backgrounds = doc
            .descendants()
            .filter(|n| n.attribute("class") == Some("background"))
            .count();
        assert_eq!(backgrounds, 1);

        let titles: Vec<_> = doc
            .descendants()
            .filter(|n| n.attribute("class") == Some("chart-title"))
            .collect();
        assert_eq!(titles.len(), usize::from(spec.title.is_some()));
        if let Some(t) = spec.title.as_deref() {
            assert_eq!(titles[0].text(), Some(t));
        }
    }
}

#[test]
fn rendering_is_deterministic() {
    for spec in all_fixtures() {
        assert_eq!(render_chart_svg(&spec), render_chart_svg(&spec));
    }
}

#[test]
fn unsupported_chart_type_renders_nothing() {
    let mut spec = fixture("bar_scores.json");
    spec.chart_type = ChartType::from("donut");
    assert_eq!(render_chart_svg(&spec), "");
}

#[test]
fn empty_data_still_renders_a_frame() {
    for chart_type in [ChartType::Line, ChartType::Bar, ChartType::Pie] {
        let spec = ChartSpec::new(chart_type, "x", ["y"]);
        let svg = render_chart_svg(&spec);
        roxmltree::Document::parse(&svg).expect("well-formed SVG");
        assert_eq!(svg.matches(r#"class="background""#).count(), 1);
    }
}

#[test]
fn bar_scores_scenario() {
    let spec = fixture("bar_scores.json");
    let svg = render_chart_svg(&spec);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed SVG");

    let inner_height = PlotArea::new(
        chartkit_render::charts::bar::BAR_MARGINS.with_title(true),
    )
    .inner_height();
    assert_eq!(inner_height, CANVAS_HEIGHT - 52.0 - 52.0);

    let heights: Vec<f64> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("bar"))
        .map(|n| attr_f64(n, "height"))
        .collect();
    assert_eq!(heights.len(), 2);
    assert!((heights[0] - inner_height * 0.40).abs() < 1e-3);
    assert!((heights[1] - inner_height * 0.85).abs() < 1e-3);

    let labels: Vec<&str> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("bar-value"))
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(labels, vec!["40", "85"]);

    let grid_values: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("text") && n.attribute("text-anchor") == Some("end"))
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(grid_values, vec!["0", "33", "67", "100"]);
}

#[test]
fn large_values_extend_the_axis() {
    let spec = ChartSpec::new(ChartType::Line, "x", ["y"])
        .with_row([("y", 12.0)])
        .with_row([("y", 243.0)]);
    let svg = render_chart_svg(&spec);
    assert!(svg.contains(">250</text>"));
    assert!(!svg.contains(">100</text>"));
}

#[test]
fn series_colors_cycle_through_the_palette() {
    let keys: Vec<String> = (0..8).map(|i| format!("k{i}")).collect();
    let mut row = vec![("x".to_string(), FieldValue::from("a"))];
    row.extend(keys.iter().map(|k| (k.clone(), FieldValue::from(10.0))));
    let spec = ChartSpec::new(ChartType::Bar, "x", keys.clone()).with_row(row);

    let svg = render_chart_svg(&spec);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed SVG");
    let fills: Vec<&str> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("bar"))
        .filter_map(|n| n.attribute("fill"))
        .collect();
    assert_eq!(fills.len(), keys.len());
    for (i, fill) in fills.iter().enumerate() {
        assert_eq!(*fill, DEFAULT_PALETTE[i % DEFAULT_PALETTE.len()]);
    }
}

#[test]
fn custom_colors_are_used_positionally() {
    let spec = fixture("line_multi.json").with_colors(["#000001", "#000002"]);
    let svg = render_chart_svg(&spec);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed SVG");
    let strokes: Vec<&str> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("series-line"))
        .filter_map(|n| n.attribute("stroke"))
        .collect();
    assert_eq!(strokes, vec!["#000001", "#000002", "#000001"]);
}

#[test]
fn pie_equal_slices_scenario() {
    let spec = ChartSpec::new(ChartType::Pie, "name", ["v"])
        .with_row([("name", FieldValue::from("A")), ("v", FieldValue::from(10.0))])
        .with_row([("name", FieldValue::from("B")), ("v", FieldValue::from(10.0))])
        .with_row([("name", FieldValue::from("C")), ("v", FieldValue::from(10.0))]);
    let sectors = chartkit_render::shapes::pie_sectors(&spec);
    for s in &sectors {
        assert!((s.span().to_degrees() - 120.0).abs() < 1e-9);
    }

    let svg = render_chart_svg(&spec);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed SVG");
    let legend: Vec<&str> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("legend-label"))
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(legend, vec!["A (33%)", "B (33%)", "C (33%)"]);
}

#[test]
fn pie_percentages_sum_to_about_one_hundred() {
    let spec = fixture("pie_share.json");
    let svg = render_chart_svg(&spec);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed SVG");
    let percents: Vec<i64> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("legend-label"))
        .filter_map(|n| n.text())
        .filter_map(|t| {
            let start = t.rfind('(')? + 1;
            t[start..].trim_end_matches("%)").parse().ok()
        })
        .collect();
    assert_eq!(percents.len(), spec.data.len());
    let sum: i64 = percents.iter().sum();
    assert!((sum - 100).abs() <= percents.len() as i64, "sum was {sum}");
}

#[test]
fn crowded_pie_keeps_every_legend_entry() {
    let mut spec = ChartSpec::new(ChartType::Pie, "name", ["v"]);
    for i in 0..20 {
        spec = spec.with_row([
            ("name", FieldValue::from(format!("Channel {i}"))),
            ("v", FieldValue::from(5.0)),
        ]);
    }
    let svg = render_chart_svg(&spec);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed SVG");
    let labels: Vec<_> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("legend-label"))
        .collect();
    assert_eq!(labels.len(), 20);

    let percent_sum: i64 = labels
        .iter()
        .filter_map(|n| n.text())
        .filter_map(|t| t.rsplit('(').next()?.trim_end_matches("%)").parse::<i64>().ok())
        .sum();
    assert_eq!(percent_sum, 100);
    assert!(labels.iter().all(|n| attr_f64(*n, "y") <= CANVAS_HEIGHT));
}

#[test]
fn reserved_characters_are_escaped() {
    let spec = ChartSpec::new(ChartType::Bar, "label", ["v"])
        .with_title(r#"Q&A <draft> "v2""#)
        .with_row([
            ("label", FieldValue::from("R&D")),
            ("v", FieldValue::from(12.0)),
        ])
        .with_row([
            ("label", FieldValue::from("<ops>")),
            ("v", FieldValue::from(30.0)),
        ]);
    let svg = render_chart_svg(&spec);

    assert!(svg.contains("Q&amp;A &lt;draft&gt; &quot;v2&quot;"));
    assert!(svg.contains(">R&amp;D</text>"));
    assert!(svg.contains(">&lt;ops&gt;</text>"));
    assert!(!svg.contains("<draft>"));
    assert!(!svg.contains("<ops>"));
    assert!(!svg.contains("R&D"));

    let doc = roxmltree::Document::parse(&svg).expect("well-formed SVG");
    let title = doc
        .descendants()
        .find(|n| n.attribute("class") == Some("chart-title"))
        .and_then(|n| n.text());
    assert_eq!(title, Some(r#"Q&A <draft> "v2""#));
}

#[test]
fn hostile_colors_cannot_break_the_document() {
    let spec = ChartSpec::new(ChartType::Pie, "n", ["v"])
        .with_colors([r#"red" onload="x"#])
        .with_row([("v", 1.0)]);
    let svg = render_chart_svg(&spec);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed SVG");
    assert!(
        doc.descendants()
            .all(|n| n.attribute("onload").is_none())
    );
}

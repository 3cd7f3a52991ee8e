use chartkit_core::{ChartSpec, ChartType, FieldValue};

#[test]
fn loads_camel_case_spec() {
    let text = r##"{
        "chartType": "bar",
        "data": [{"month": "Jan", "score": 40}, {"month": "Feb", "score": "85"}],
        "xKey": "month",
        "yKeys": ["score"],
        "title": "Scores",
        "colors": ["#111111"]
    }"##;
    let spec = ChartSpec::from_json_str(text).expect("spec");

    assert_eq!(spec.chart_type, ChartType::Bar);
    assert_eq!(spec.x_key, "month");
    assert_eq!(spec.y_keys, vec!["score".to_string()]);
    assert_eq!(spec.title.as_deref(), Some("Scores"));
    assert_eq!(spec.colors, vec!["#111111".to_string()]);
    assert_eq!(
        spec.series_values("score").collect::<Vec<_>>(),
        vec![40.0, 85.0]
    );
    assert_eq!(
        spec.data[0].get("month"),
        Some(&FieldValue::Text("Jan".to_string()))
    );
}

#[test]
fn unknown_chart_type_still_deserializes() {
    let spec =
        ChartSpec::from_json_str(r#"{"chartType": "scatter", "xKey": "x", "yKeys": ["y"]}"#)
            .expect("spec");
    assert_eq!(
        spec.chart_type,
        ChartType::Unsupported("scatter".to_string())
    );
    assert!(!spec.chart_type.is_supported());
    assert!(spec.data.is_empty());
}

#[test]
fn null_optionals_fall_back_to_defaults() {
    let spec = ChartSpec::from_json_str(
        r#"{"chartType": "pie", "data": null, "xKey": "x", "yKeys": ["v"], "title": null, "colors": null}"#,
    )
    .expect("spec");
    assert!(spec.data.is_empty());
    assert!(spec.title.is_none());
    assert!(spec.colors.is_empty());
}

#[test]
fn null_cells_read_as_missing_fields() {
    let spec = ChartSpec::from_json_str(
        r#"{
            "chartType": "line",
            "data": [{"day": "Mon", "v": null}, {"day": null, "v": 7}],
            "xKey": "day",
            "yKeys": ["v"]
        }"#,
    )
    .expect("spec");
    assert_eq!(spec.data.len(), 2);
    assert!(!spec.data[0].contains_key("v"));
    assert_eq!(spec.series_values("v").collect::<Vec<_>>(), vec![0.0, 7.0]);
    assert_eq!(spec.label(&spec.data[0]), "Mon");
    assert_eq!(spec.label(&spec.data[1]), "undefined");
}

#[test]
fn malformed_json_is_an_error() {
    let err = ChartSpec::from_json_str(r#"{"chartType": "bar""#).unwrap_err();
    assert!(err.to_string().starts_with("invalid chart spec JSON"));
}

#[test]
fn row_field_order_is_preserved() {
    let spec = ChartSpec::from_json_str(
        r#"{"chartType": "line", "data": [{"z": 1, "a": 2, "m": 3}], "xKey": "z", "yKeys": ["a"]}"#,
    )
    .expect("spec");
    let keys: Vec<&str> = spec.data[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn serializes_back_with_string_chart_type() {
    let spec = ChartSpec::new(ChartType::Line, "x", ["y"]).with_row([("x", 1.0), ("y", 2.0)]);
    let json = serde_json::to_value(&spec).expect("json");
    assert_eq!(json["chartType"], "line");
    assert!(json.get("colors").is_none());
}

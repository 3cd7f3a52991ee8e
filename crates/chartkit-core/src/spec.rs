use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One data row: field name to value, in insertion order.
pub type Row = IndexMap<String, FieldValue>;

/// The closed set of chart kinds.
///
/// Tags outside the known set are kept as [`ChartType::Unsupported`] rather than rejected, so a
/// spec loaded from JSON always deserializes and the renderer decides what to do with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChartType {
    Line,
    Bar,
    Pie,
    Unsupported(String),
}

impl ChartType {
    pub fn as_str(&self) -> &str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Unsupported(tag) => tag.as_str(),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ChartType::Unsupported(_))
    }
}

impl From<&str> for ChartType {
    fn from(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "line" => ChartType::Line,
            "bar" => ChartType::Bar,
            "pie" => ChartType::Pie,
            _ => ChartType::Unsupported(tag.to_string()),
        }
    }
}

impl From<String> for ChartType {
    fn from(tag: String) -> Self {
        ChartType::from(tag.as_str())
    }
}

impl From<ChartType> for String {
    fn from(value: ChartType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell: either a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the cell. Non-numeric text and non-finite numbers coerce to 0.
    pub fn as_number(&self) -> f64 {
        let v = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        };
        if v.is_finite() { v } else { 0.0 }
    }

    /// Text view of the cell, used for axis categories and legend labels.
    pub fn as_label(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format_number(*n),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Shortest decimal form: whole numbers print without a fractional part.
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    format!("{v}")
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rows with `null` cells dropped, so a null reads exactly like a missing field.
fn rows_without_nulls<'de, D>(deserializer: D) -> std::result::Result<Vec<Row>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Option<Vec<IndexMap<String, Option<FieldValue>>>> =
        Option::deserialize(deserializer)?;
    Ok(rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .filter_map(|(key, cell)| Some((key, cell?)))
                .collect()
        })
        .collect())
}

/// Declarative description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub chart_type: ChartType,
    #[serde(default, deserialize_with = "rows_without_nulls")]
    pub data: Vec<Row>,
    pub x_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub y_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Series/slice colors. Empty means the default palette.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub colors: Vec<String>,
}

impl ChartSpec {
    pub fn new<I, S>(chart_type: ChartType, x_key: impl Into<String>, y_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chart_type,
            data: Vec::new(),
            x_key: x_key.into(),
            y_keys: y_keys.into_iter().map(Into::into).collect(),
            title: None,
            colors: Vec::new(),
        }
    }

    pub fn with_row<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.data.push(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Numeric value of `key` in `row`; missing fields read as 0.
    pub fn value(row: &Row, key: &str) -> f64 {
        row.get(key).map(FieldValue::as_number).unwrap_or(0.0)
    }

    /// Category label of `row`; a missing x field reads as `undefined`.
    pub fn label(&self, row: &Row) -> String {
        row.get(&self.x_key)
            .map(FieldValue::as_label)
            .unwrap_or_else(|| "undefined".to_string())
    }

    /// All values of series `key`, in row order.
    pub fn series_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = f64> + 'a {
        self.data.iter().map(move |row| Self::value(row, key))
    }

    /// Every plotted value across all `y_keys`.
    pub fn all_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.y_keys
            .iter()
            .flat_map(move |key| self.series_values(key.as_str()))
    }

    pub fn color_at(&self, index: usize) -> &str {
        crate::palette::color_at(&self.colors, index)
    }
}

//! HTML chart rendering
//!
//! Turns `(chart type, style, ChartData)` into a self-contained HTML page
//! that draws the chart in the browser with ECharts. Rendering is pure: the
//! generation time is passed in, nothing is read or written here.
//!
//! The chart option is built as a JSON tree (`ChartOption`) and the page
//! around it as maud markup (`ChartDocument`), so user and model text never
//! lands in the document unescaped.

pub mod template;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::agents::ChartData;

pub use template::ChartDocument;

/// Categories used when the chart data does not provide any
pub const DEFAULT_CATEGORIES: [&str; 5] = ["A", "B", "C", "D", "E"];
pub const DEFAULT_TITLE: &str = "AI 생성 차트";

pub const MONO_PALETTE: [&str; 5] = ["#666666", "#888888", "#aaaaaa", "#cccccc", "#eeeeee"];
pub const COLOR_PALETTE: [&str; 5] = ["#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Area,
}

impl ChartKind {
    /// Unknown chart types render as bar charts
    pub fn from_type(chart_type: &str) -> Self {
        match chart_type {
            "line" => ChartKind::Line,
            "pie" => ChartKind::Pie,
            "area" => ChartKind::Area,
            _ => ChartKind::Bar,
        }
    }

    pub fn has_axes(&self) -> bool {
        !matches!(self, ChartKind::Pie)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Mono,
    Color,
}

impl Palette {
    pub fn for_style(style: &str) -> Self {
        if style == "mono" {
            Palette::Mono
        } else {
            Palette::Color
        }
    }

    pub fn colors(&self) -> &'static [&'static str; 5] {
        match self {
            Palette::Mono => &MONO_PALETTE,
            Palette::Color => &COLOR_PALETTE,
        }
    }
}

/// JavaScript truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_or(value: Option<&Value>, default: Value) -> Value {
    match value {
        Some(v) if is_truthy(v) => v.clone(),
        _ => default,
    }
}

/// Display title for a chart, defaulting when the data has none
pub fn chart_title(data: &ChartData) -> String {
    match data.title() {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(v) if is_truthy(v) => v.to_string(),
        _ => DEFAULT_TITLE.to_string(),
    }
}

/// ECharts option tree for one chart
pub struct ChartOption;

impl ChartOption {
    pub fn build(kind: ChartKind, palette: Palette, data: &ChartData) -> Value {
        let series_data = truthy_or(data.data(), json!([]));

        let series = match kind {
            ChartKind::Bar => json!({ "type": "bar", "data": series_data }),
            ChartKind::Line => json!({ "type": "line", "data": series_data }),
            ChartKind::Pie => json!({ "type": "pie", "radius": "50%", "data": series_data }),
            ChartKind::Area => json!({ "type": "line", "areaStyle": {}, "data": series_data }),
        };

        let mut option = json!({
            "title": {
                "text": chart_title(data),
                "left": "center",
                "textStyle": { "color": "#333", "fontSize": 18 }
            },
            "tooltip": { "trigger": "axis" },
            "legend": { "orient": "vertical", "left": "left" },
            "color": palette.colors(),
            "series": [series],
        });

        if kind.has_axes() {
            let categories = truthy_or(data.categories(), json!(DEFAULT_CATEGORIES));
            option["xAxis"] = json!({ "type": "category", "data": categories });
            option["yAxis"] = json!({ "type": "value" });
        }

        option
    }
}

/// Render the full HTML page for a chart
pub fn render_chart_html(
    chart_type: &str,
    style: &str,
    data: &ChartData,
    generated_at: DateTime<Utc>,
) -> String {
    let kind = ChartKind::from_type(chart_type);
    let palette = Palette::for_style(style);

    ChartDocument {
        title: chart_title(data),
        chart_type: chart_type.to_string(),
        style: style.to_string(),
        generated_at,
        option: ChartOption::build(kind, palette, data),
    }
    .to_html()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn data(value: Value) -> ChartData {
        serde_json::from_value(value).unwrap()
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_kind_fallback_to_bar() {
        assert_eq!(ChartKind::from_type("bar"), ChartKind::Bar);
        assert_eq!(ChartKind::from_type("line"), ChartKind::Line);
        assert_eq!(ChartKind::from_type("pie"), ChartKind::Pie);
        assert_eq!(ChartKind::from_type("area"), ChartKind::Area);
        assert_eq!(ChartKind::from_type("scatter"), ChartKind::Bar);
        assert_eq!(ChartKind::from_type(""), ChartKind::Bar);
        assert_eq!(ChartKind::from_type("PIE"), ChartKind::Bar);
    }

    #[test]
    fn test_palette_selection() {
        assert_eq!(Palette::for_style("mono"), Palette::Mono);
        assert_eq!(Palette::for_style("color"), Palette::Color);
        assert_eq!(Palette::for_style("Mono"), Palette::Color);
        assert_eq!(Palette::for_style(""), Palette::Color);
        assert_eq!(Palette::Mono.colors()[0], "#666666");
        assert_eq!(Palette::Color.colors()[0], "#5470c6");
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!("text")));
        assert!(is_truthy(&json!(-1.5)));
    }

    #[test]
    fn test_pie_has_no_axes() {
        let option = ChartOption::build(ChartKind::Pie, Palette::Color, &data(json!({ "data": [1, 2] })));
        assert!(option.get("xAxis").is_none());
        assert!(option.get("yAxis").is_none());
        assert_eq!(option["series"][0]["type"], "pie");
        assert_eq!(option["series"][0]["radius"], "50%");
    }

    #[test]
    fn test_axes_default_categories() {
        for kind in [ChartKind::Bar, ChartKind::Line, ChartKind::Area] {
            let option = ChartOption::build(kind, Palette::Color, &data(json!({})));
            assert_eq!(option["xAxis"]["type"], "category");
            assert_eq!(option["xAxis"]["data"], json!(["A", "B", "C", "D", "E"]));
            assert_eq!(option["yAxis"]["type"], "value");
            assert_eq!(option["series"][0]["data"], json!([]));
        }
    }

    #[test]
    fn test_axes_use_provided_categories() {
        let option = ChartOption::build(
            ChartKind::Line,
            Palette::Mono,
            &data(json!({ "categories": ["Jan", "Feb"], "data": [3, 4] })),
        );
        assert_eq!(option["xAxis"]["data"], json!(["Jan", "Feb"]));
        assert_eq!(option["series"][0]["data"], json!([3, 4]));
        assert_eq!(option["color"], json!(MONO_PALETTE));
    }

    #[test]
    fn test_area_is_filled_line() {
        let option = ChartOption::build(ChartKind::Area, Palette::Color, &data(json!({})));
        assert_eq!(option["series"][0]["type"], "line");
        assert_eq!(option["series"][0]["areaStyle"], json!({}));
    }

    #[test]
    fn test_title_defaults() {
        assert_eq!(chart_title(&data(json!({}))), DEFAULT_TITLE);
        assert_eq!(chart_title(&data(json!({ "title": "" }))), DEFAULT_TITLE);
        assert_eq!(chart_title(&data(json!({ "title": "Revenue" }))), "Revenue");
    }

    #[test]
    fn test_fallback_text_data_is_passed_through() {
        let fallback = ChartData::fallback("bar", "model said no", "color");
        let option = ChartOption::build(ChartKind::Bar, Palette::Color, &fallback);
        assert_eq!(option["series"][0]["data"], "model said no");
        assert_eq!(option["title"]["text"], "bar 차트");
    }

    #[test]
    fn test_render_is_deterministic() {
        let chart = data(json!({ "title": "Sales", "data": [1, 2, 3] }));
        let first = render_chart_html("bar", "color", &chart, fixed_time());
        let second = render_chart_html("bar", "color", &chart, fixed_time());
        assert_eq!(first, second);
        assert!(first.contains("\"bar\""));
    }

    #[test]
    fn test_render_does_not_mutate_input() {
        let chart = data(json!({ "data": [1] }));
        let before = chart.clone();
        let _ = render_chart_html("line", "mono", &chart, fixed_time());
        assert_eq!(chart, before);
    }

    #[test]
    fn test_rendered_pie_has_no_axis_config() {
        let html = render_chart_html("pie", "mono", &data(json!({ "data": [] })), fixed_time());
        assert!(!html.contains("xAxis"));
        assert!(!html.contains("yAxis"));
        assert!(html.contains("#666666"));
    }
}

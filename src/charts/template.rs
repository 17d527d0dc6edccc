use chrono::{DateTime, Utc};
use maud::{html, Markup, PreEscaped, Render, DOCTYPE};
use serde_json::{json, Value};

/// Charting library loaded by every generated page
pub const ECHARTS_CDN_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.4.3/dist/echarts.min.js";

const STYLES: &str = r#"
        body {
            font-family: 'Arial', sans-serif;
            margin: 0;
            padding: 20px;
            background-color: #f5f5f5;
        }
        .chart-container {
            max-width: 800px;
            margin: 0 auto;
            background: white;
            padding: 20px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .chart-title {
            text-align: center;
            color: #333;
            margin-bottom: 20px;
            font-size: 24px;
            font-weight: bold;
        }
        #chart {
            width: 100%;
            height: 500px;
            margin: 20px 0;
        }
        .download-btn {
            display: block;
            width: 200px;
            margin: 20px auto;
            padding: 12px 24px;
            background-color: #007bff;
            color: white;
            border: none;
            text-align: center;
            border-radius: 6px;
            font-weight: bold;
            cursor: pointer;
            transition: background-color 0.3s;
        }
        .download-btn:hover {
            background-color: #0056b3;
        }
        .chart-info {
            background: #f8f9fa;
            padding: 15px;
            border-radius: 6px;
            margin: 20px 0;
            border-left: 4px solid #007bff;
        }
"#;

/// A generated chart page, ready to serialize
#[derive(Debug, Clone)]
pub struct ChartDocument {
    pub title: String,
    pub chart_type: String,
    pub style: String,
    pub generated_at: DateTime<Utc>,
    pub option: Value,
}

impl ChartDocument {
    /// Client-side state embedded next to the option
    fn meta(&self) -> Value {
        json!({
            "chartType": self.chart_type,
            "style": self.style,
            "generatedAt": self.generated_at.to_rfc3339(),
        })
    }

    fn script(&self) -> String {
        format!(
            r#"
        var chartMeta = {meta};
        var chartDom = document.getElementById('chart');
        var myChart = echarts.init(chartDom);

        var option = {option};

        myChart.setOption(option);

        window.addEventListener('resize', function() {{
            myChart.resize();
        }});

        function downloadChart() {{
            var url = myChart.getDataURL({{
                type: 'png',
                pixelRatio: 2,
                backgroundColor: '#fff'
            }});

            var link = document.createElement('a');
            link.download = 'chart-{millis}.png';
            link.href = url;
            document.body.appendChild(link);
            link.click();
            document.body.removeChild(link);
        }}
"#,
            meta = script_json(&self.meta()),
            option = script_json(&self.option),
            millis = self.generated_at.timestamp_millis(),
        )
    }

    pub fn to_html(&self) -> String {
        self.render().into_string()
    }
}

impl Render for ChartDocument {
    fn render(&self) -> Markup {
        let generated = self.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();

        html! {
          (DOCTYPE)
          html lang="ko" {
            head {
              meta charset="UTF-8";
              meta name="viewport" content="width=device-width, initial-scale=1.0";
              title { (self.title) }
              script src=(ECHARTS_CDN_URL) {}
              style { (PreEscaped(STYLES)) }
            }
            body {
              div class="chart-container" {
                h1 class="chart-title" { (self.title) }
                div class="chart-info" {
                  strong { "차트 타입:" } " " (self.chart_type) br;
                  strong { "스타일:" } " " (self.style) br;
                  strong { "생성 시간:" } " " (generated)
                }
                div id="chart" {}
                button class="download-btn" onclick="downloadChart()" { "차트 이미지 다운로드" }
              }
              script { (PreEscaped(self.script())) }
            }
          }
        }
    }
}

/// Serialize JSON for an inline `<script>` block. `<`, `>` and `&` only occur
/// inside JSON strings, where the `\u00XX` forms are equivalent.
pub fn script_json(value: &Value) -> String {
    value
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

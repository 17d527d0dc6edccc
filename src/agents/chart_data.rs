//! Chart Data Agent
//!
//! Asks the model to propose sample chart data for a requested chart and
//! pulls a JSON object out of its free-text reply. Callers always get a
//! `ChartData` back:
//!
//! - reply contains a parseable `{...}` block → that object, verbatim
//! - reply has no usable JSON → `{ title, data: <reply text>, style }`
//! - model call fails → `{ title, data: <error message>, style }`

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::charts::is_truthy;
use crate::config::LLMConfig;
use crate::llm::LLMAdapter;
use crate::types::{LLMMessage, LLMRequest};

pub const GENERATION_FAILED: &str = "데이터 생성 중 오류가 발생했습니다.";
const NO_FEEDBACK: &str = "없음";

/// Body of `POST /generate-chart`. Fields accept any JSON value and are
/// coerced to text the way a template literal would (`null` → "null").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    #[serde(default, deserialize_with = "text_from_any")]
    pub chart_type: String,
    #[serde(default, deserialize_with = "text_from_any")]
    pub style: String,
    #[serde(default, deserialize_with = "text_from_any")]
    pub data_analysis: String,
    /// Falsy values count as no feedback
    #[serde(default, deserialize_with = "feedback_from_any")]
    pub feedback: Option<String>,
}

/// JavaScript string conversion of a JSON value
pub fn js_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}

fn text_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|value| js_string(&value))
}

fn feedback_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value).then(|| js_string(&value)))
}

/// Chart description produced by the model, or a fallback wrapping its text.
/// No schema is enforced on model output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartData(Map<String, Value>);

impl ChartData {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// `{ title: "<chart_type> 차트", data, style }`
    pub fn fallback(chart_type: &str, data: impl Into<String>, style: &str) -> Self {
        let mut map = Map::new();
        map.insert("title".to_string(), Value::String(format!("{} 차트", chart_type)));
        map.insert("data".to_string(), Value::String(data.into()));
        map.insert("style".to_string(), Value::String(style.to_string()));
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn title(&self) -> Option<&Value> {
        self.get("title")
    }

    pub fn data(&self) -> Option<&Value> {
        self.get("data")
    }

    pub fn style(&self) -> Option<&Value> {
        self.get("style")
    }

    pub fn categories(&self) -> Option<&Value> {
        self.get("categories")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Best-effort structured extraction: the greedy `{...}` span from the first
/// `{` to the last `}`, parsed as a JSON object.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Reply contained a brace block that is not valid JSON");
            None
        }
    }
}

/// Interpret a model reply, falling back to wrapping the raw text
pub fn parse_chart_reply(reply: &str, chart_type: &str, style: &str) -> ChartData {
    match extract_json_object(reply) {
        Some(map) => ChartData::from_map(map),
        None => {
            info!("JSON parsing failed, returning reply text as chart data");
            ChartData::fallback(chart_type, reply, style)
        }
    }
}

pub struct ChartDataAgent;

impl ChartDataAgent {
    pub fn build_prompt(request: &ChartRequest) -> String {
        let feedback = request
            .feedback
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(NO_FEEDBACK);

        format!(
            r#"
차트 타입: {chart_type}
스타일: {style}
데이터 분석: {data_analysis}
피드백: {feedback}

위 정보를 바탕으로 차트에 사용할 샘플 데이터를 생성해주세요. 
데이터는 JSON 형식으로 제공하고, 차트의 제목, 축 레이블, 데이터 포인트 등을 포함해주세요.
"#,
            chart_type = request.chart_type,
            style = request.style,
            data_analysis = request.data_analysis,
            feedback = feedback,
        )
    }

    /// Synthesize chart data. Never fails.
    pub async fn generate(
        llm: &dyn LLMAdapter,
        config: &LLMConfig,
        request: &ChartRequest,
    ) -> ChartData {
        info!(chart_type = %request.chart_type, style = %request.style, "Generating chart data");

        let llm_request = LLMRequest {
            model: config.text_model.clone(),
            messages: vec![LLMMessage::user(Self::build_prompt(request))],
            max_tokens: Some(config.max_tokens),
        };

        match llm.create_chat_completion(&llm_request).await {
            Ok(response) => parse_chart_reply(&response.content, &request.chart_type, &request.style),
            Err(e) => {
                warn!(error = %e, "Chart data generation failed, returning fallback");
                ChartData::fallback(&request.chart_type, GENERATION_FAILED, &request.style)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedLLM;
    use serde_json::json;

    fn bar_request() -> ChartRequest {
        ChartRequest {
            chart_type: "bar".to_string(),
            style: "color".to_string(),
            data_analysis: "monthly sales".to_string(),
            feedback: None,
        }
    }

    #[test]
    fn test_extract_json_from_prose() {
        let reply = "Here is your data:\n```json\n{\"title\": \"Sales\", \"data\": [1, 2, 3]}\n```\nEnjoy!";
        let map = extract_json_object(reply).unwrap();
        assert_eq!(map["title"], "Sales");
        assert_eq!(map["data"], json!([1, 2, 3]));
    }

    #[test]
    fn test_extract_is_greedy_across_nested_objects() {
        let reply = r#"{"title": "T", "series": {"a": 1}} trailing"#;
        let map = extract_json_object(reply).unwrap();
        assert_eq!(map["series"]["a"], 1);
    }

    #[test]
    fn test_extract_rejects_two_separate_objects() {
        // Greedy span covers both objects, which is not valid JSON
        assert!(extract_json_object(r#"{"a": 1} and {"b": 2}"#).is_none());
    }

    #[test]
    fn test_extract_without_braces() {
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("} backwards {").is_none());
        assert!(extract_json_object("").is_none());
    }

    #[test]
    fn test_parse_reply_fallback_wraps_text() {
        let data = parse_chart_reply("just words", "line", "mono");
        assert_eq!(data.title(), Some(&json!("line 차트")));
        assert_eq!(data.data(), Some(&json!("just words")));
        assert_eq!(data.style(), Some(&json!("mono")));
    }

    #[test]
    fn test_parse_reply_returns_object_verbatim() {
        let data = parse_chart_reply(r#"{"title": "Q", "categories": ["x"], "extra": true}"#, "pie", "color");
        assert_eq!(data.title(), Some(&json!("Q")));
        assert_eq!(data.categories(), Some(&json!(["x"])));
        assert_eq!(data.get("extra"), Some(&json!(true)));
        assert!(data.style().is_none());
    }

    #[test]
    fn test_prompt_embeds_request_values() {
        let prompt = ChartDataAgent::build_prompt(&ChartRequest {
            feedback: Some("make it blue".to_string()),
            ..bar_request()
        });
        assert!(prompt.contains("차트 타입: bar"));
        assert!(prompt.contains("스타일: color"));
        assert!(prompt.contains("데이터 분석: monthly sales"));
        assert!(prompt.contains("피드백: make it blue"));
    }

    #[test]
    fn test_prompt_marks_missing_feedback() {
        assert!(ChartDataAgent::build_prompt(&bar_request()).contains("피드백: 없음"));
        let empty = ChartRequest {
            feedback: Some(String::new()),
            ..bar_request()
        };
        assert!(ChartDataAgent::build_prompt(&empty).contains("피드백: 없음"));
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: ChartRequest = serde_json::from_value(json!({
            "chartType": "area",
            "style": "mono",
            "dataAnalysis": "growth"
        }))
        .unwrap();
        assert_eq!(request.chart_type, "area");
        assert_eq!(request.data_analysis, "growth");
        assert!(request.feedback.is_none());
    }

    #[test]
    fn test_prompt_text_is_exact() {
        let prompt = ChartDataAgent::build_prompt(&bar_request());
        assert!(prompt.starts_with("\n차트 타입: bar\n"));
        assert!(prompt.contains("샘플 데이터를 생성해주세요. \n데이터는 JSON 형식으로"));
        assert!(prompt.ends_with("포함해주세요.\n"));
    }

    #[test]
    fn test_request_coerces_non_string_values() {
        let request: ChartRequest = serde_json::from_value(json!({
            "chartType": null,
            "style": 3,
            "dataAnalysis": ["a", null, 1.5],
            "feedback": 0
        }))
        .unwrap();
        assert_eq!(request.chart_type, "null");
        assert_eq!(request.style, "3");
        assert_eq!(request.data_analysis, "a,,1.5");
        assert!(request.feedback.is_none());
    }

    #[test]
    fn test_request_feedback_truthiness() {
        let with_null: ChartRequest = serde_json::from_value(json!({ "feedback": null })).unwrap();
        assert!(with_null.feedback.is_none());

        let with_flag: ChartRequest = serde_json::from_value(json!({ "feedback": true })).unwrap();
        assert_eq!(with_flag.feedback.as_deref(), Some("true"));
    }

    #[test]
    fn test_js_string() {
        assert_eq!(js_string(&json!(2.0)), "2");
        assert_eq!(js_string(&json!(false)), "false");
        assert_eq!(js_string(&json!({ "a": 1 })), "[object Object]");
        assert_eq!(js_string(&json!("차트")), "차트");
    }

    #[tokio::test]
    async fn test_generate_with_json_reply() {
        let llm = ScriptedLLM::replying(r#"Sure! {"title": "Sales", "data": [5, 10], "categories": ["A", "B"]}"#);
        let data = ChartDataAgent::generate(&llm, &LLMConfig::default(), &bar_request()).await;

        assert_eq!(data.title(), Some(&json!("Sales")));
        assert_eq!(data.data(), Some(&json!([5, 10])));
        assert!(llm.requests()[0].messages[0].content.as_text().unwrap().contains("monthly sales"));
    }

    #[tokio::test]
    async fn test_generate_with_unparseable_reply() {
        let llm = ScriptedLLM::replying("{ not json }");
        let data = ChartDataAgent::generate(&llm, &LLMConfig::default(), &bar_request()).await;

        assert_eq!(data, ChartData::fallback("bar", "{ not json }", "color"));
    }

    #[tokio::test]
    async fn test_generate_when_call_fails() {
        let llm = ScriptedLLM::failing("timeout");
        let data = ChartDataAgent::generate(&llm, &LLMConfig::default(), &bar_request()).await;

        assert_eq!(data.title(), Some(&json!("bar 차트")));
        assert_eq!(data.data(), Some(&json!(GENERATION_FAILED)));
        assert_eq!(data.style(), Some(&json!("color")));
    }
}

//! web_search 工具：Tavily 搜索 API
//!
//! POST /search，结果压成 "title (url)\nsnippet" 列表文本；
//! 响应超过 max_result_chars 时截断并追加 ...[truncated]。

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::Tool;

const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// Web 搜索工具：持有 HTTP 客户端与请求参数
pub struct WebSearchTool {
    client: reqwest::Client,
    api_key: String,
    max_results: usize,
    max_result_chars: usize,
}

impl WebSearchTool {
    pub fn new(api_key: &str, timeout_secs: u64, max_results: usize, max_result_chars: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.to_string(),
            max_results,
            max_result_chars,
        }
    }

    async fn search(&self, query: &str) -> Result<String, String> {
        let resp = self
            .client
            .post(TAVILY_ENDPOINT)
            .json(&json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": self.max_results,
                "include_answer": true,
            }))
            .send()
            .await
            .map_err(|e| format!("Search request failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("Search HTTP {}", resp.status()));
        }
        let body: TavilyResponse = resp
            .json()
            .await
            .map_err(|e| format!("Parse search response: {}", e))?;

        let text = render_results(&body);
        if text.trim().is_empty() {
            return Ok(format!("No results for '{}'", query));
        }
        Ok(truncate_chars(&text, self.max_result_chars))
    }
}

fn render_results(body: &TavilyResponse) -> String {
    let mut out = String::new();
    if let Some(answer) = body.answer.as_deref().filter(|a| !a.trim().is_empty()) {
        out.push_str(answer.trim());
        out.push_str("\n\n");
    }
    for r in &body.results {
        out.push_str(&format!("{} ({})\n{}\n\n", r.title, r.url, r.content.trim()));
    }
    out.trim_end().to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        text.chars().take(max_chars).collect::<String>() + "\n...[truncated]"
    } else {
        text.to_string()
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for up-to-date information. Args: {\"query\": \"search terms\"}"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| "Missing 'query' argument".to_string())?;
        tracing::info!(query = %query, "web search");
        self.search(query).await
    }
}

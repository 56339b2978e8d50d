use crate::config::Settings;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::json;
use crate::llm::{Provider, ReasoningBackend, StrategyPrompt};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";
const DEFAULT_MAX_TOKENS: u32 = 2048;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const TOOL_NAME_EMIT_STRATEGIES: &str = "emit_offer_strategies";

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_anthropic_api_key()?.to_string();
        let base_url =
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = std::env::var("ANTHROPIC_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let timeout_secs = std::env::var("ANTHROPIC_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
            max_tokens,
        })
    }

    async fn create_message(
        &self,
        req: CreateMessageRequest,
    ) -> anyhow::Result<CreateMessageResponse> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .post(url)
            .headers(headers)
            .json(&req)
            .send()
            .await
            .context("Anthropic request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Anthropic response body")?;
        if !status.is_success() {
            let raw_response_json = serde_json::from_str::<serde_json::Value>(&text).ok();
            return Err(LlmDiagnosticsError {
                provider: Provider::Anthropic,
                stage: "http",
                detail: format!("status={status}"),
                raw_output: Some(text),
                raw_response_json,
            }
            .into());
        }

        serde_json::from_str::<CreateMessageResponse>(&text)
            .context("failed to decode Anthropic response into CreateMessageResponse")
    }

    fn tools() -> Vec<Tool> {
        // Strict and explicit schema for the exact strategies contract to
        // maximize compliance.
        let strategy = strategy_schema();
        let schema = serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "required": [
                "primaryStrategy",
                "alternativeStrategies",
                "marketSummary",
                "competitiveAnalysis",
                "recommendedApproach"
            ],
            "properties": {
                "primaryStrategy": strategy.clone(),
                "alternativeStrategies": {
                    "type": "array",
                    "minItems": 1,
                    "maxItems": 3,
                    "items": strategy
                },
                "marketSummary": {"type": "string"},
                "competitiveAnalysis": {"type": "string"},
                "recommendedApproach": {"type": "string"}
            }
        });

        vec![Tool {
            name: TOOL_NAME_EMIT_STRATEGIES,
            description: "Emit the final offer strategies as structured JSON",
            input_schema: schema,
        }]
    }

    fn tool_choice() -> ToolChoice {
        ToolChoice::Tool {
            name: TOOL_NAME_EMIT_STRATEGIES,
        }
    }

    fn response_text(res: &CreateMessageResponse) -> String {
        let mut out = String::new();
        for block in &res.content {
            match block {
                ContentBlock::Text { text } => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(text);
                }
                ContentBlock::ToolUse { .. } => {
                    // Tool output is handled by `response_tool_input`.
                    continue;
                }
                ContentBlock::Thinking { .. } | ContentBlock::RedactedThinking { .. } => {
                    // Ignore.
                }
                ContentBlock::Unknown => {
                    // Ignore unknown blocks.
                }
            }
        }
        out
    }

    fn response_tool_input(res: &CreateMessageResponse) -> Option<serde_json::Value> {
        for block in &res.content {
            if let ContentBlock::ToolUse { name, input, .. } = block {
                if name == TOOL_NAME_EMIT_STRATEGIES {
                    return Some(input.clone());
                }
            }
        }
        None
    }
}

#[async_trait::async_trait]
impl ReasoningBackend for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn complete(&self, prompt: &StrategyPrompt) -> anyhow::Result<serde_json::Value> {
        let req = CreateMessageRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: Some(prompt.system.clone()),
            messages: vec![Message {
                role: "user",
                content: prompt.user.clone(),
            }],
            tools: Some(Self::tools()),
            tool_choice: Some(Self::tool_choice()),
        };

        // One round trip; the caller treats any failure as "no backend".
        let res = self.create_message(req).await?;

        if matches!(res.stop_reason.as_deref(), Some("max_tokens")) {
            tracing::warn!(
                max_tokens = self.max_tokens,
                "Anthropic stop_reason=max_tokens; output may be truncated"
            );
        }

        if let Some(input) = Self::response_tool_input(&res) {
            return Ok(input);
        }

        // The model answered in text despite the forced tool (rare).
        let text = Self::response_text(&res);
        json::parse_object(&text).map_err(|err| {
            LlmDiagnosticsError {
                provider: Provider::Anthropic,
                stage: "parse",
                detail: format!("{err:#}"),
                raw_output: Some(text),
                raw_response_json: None,
            }
            .into()
        })
    }
}

fn strategy_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "required": [
            "recommendedOffer", "offerPercentage", "confidence", "strategy",
            "reasoning", "terms", "negotiationTips", "riskFactors",
            "strengths", "timeline"
        ],
        "properties": {
            "recommendedOffer": {"type": "number", "exclusiveMinimum": 0},
            "offerPercentage": {"type": "number"},
            "confidence": {"type": "integer", "minimum": 20, "maximum": 95},
            "strategy": {"enum": ["aggressive", "competitive", "balanced", "conservative"]},
            "reasoning": {"type": "string"},
            "terms": {
                "type": "object",
                "additionalProperties": false,
                "required": ["inspectionPeriod", "financingContingency", "appraisalContingency"],
                "properties": {
                    "inspectionPeriod": {"type": "integer", "minimum": 0},
                    "financingContingency": {"type": "integer", "minimum": 0},
                    "appraisalContingency": {"type": "boolean"},
                    "escalationClause": {
                        "type": ["object", "null"],
                        "required": ["maxPrice", "increment"],
                        "properties": {
                            "maxPrice": {"type": "number"},
                            "increment": {"type": "number"}
                        }
                    }
                }
            },
            "negotiationTips": {"type": "array", "items": {"type": "string"}},
            "riskFactors": {"type": "array", "items": {"type": "string"}},
            "strengths": {"type": "array", "items": {"type": "string"}},
            "timeline": {
                "type": "object",
                "additionalProperties": false,
                "required": ["responseDeadline", "closeDate", "keyMilestones"],
                "properties": {
                    "responseDeadline": {"type": "string"},
                    "closeDate": {"type": "string"},
                    "keyMilestones": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["milestone", "date", "importance"],
                            "properties": {
                                "milestone": {"type": "string"},
                                "date": {"type": "string"},
                                "importance": {"enum": ["critical", "important", "flexible"]}
                            }
                        }
                    }
                }
            }
        }
    })
}

#[derive(Debug, Clone, Serialize)]
struct CreateMessageRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateMessageResponse {
    content: Vec<ContentBlock>,

    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct Tool {
    name: &'static str,
    description: &'static str,
    input_schema: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
enum ToolChoice {
    #[serde(rename = "tool")]
    Tool { name: &'static str },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool_use")]
    ToolUse {
        #[serde(default)]
        id: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },

    #[serde(rename = "thinking")]
    Thinking {
        #[serde(default)]
        thinking: String,
        #[serde(default)]
        signature: String,
    },

    #[serde(rename = "redacted_thinking")]
    RedactedThinking {
        #[serde(default)]
        data: String,
    },

    #[serde(other)]
    Unknown,
}

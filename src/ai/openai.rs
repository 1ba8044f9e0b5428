//! OpenAI-compatible chat completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::{AiError, ChatMessage, Completion, CompletionRequest, LanguageModel, Role, ToolCall, Usage};
use crate::config::Settings;

pub struct OpenAiModel {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiModel {
    /// `None` when no API key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>, AiError> {
        let Some(api_key) = settings.llm_api_key.clone() else {
            return Ok(None);
        };
        let client = Client::builder()
            .user_agent(concat!("airguard/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.llm_timeout())
            .build()?;
        Ok(Some(Self {
            client,
            base_url: settings.llm_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: settings.llm_model.clone(),
        }))
    }
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    }
}

fn encode_message(message: &ChatMessage) -> Value {
    let mut out = json!({
        "role": role_name(message.role),
        "content": message.content,
    });
    if !message.tool_calls.is_empty() {
        out["tool_calls"] = message
            .tool_calls
            .iter()
            .map(|call| {
                json!({
                    "id": call.id,
                    "type": "function",
                    "function": { "name": call.name, "arguments": call.arguments.to_string() },
                })
            })
            .collect();
    }
    if let Some(id) = &message.tool_call_id {
        out["tool_call_id"] = json!(id);
    }
    out
}

fn encode_request<'a>(model: &'a str, request: &CompletionRequest) -> WireRequest<'a> {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = &request.system {
        messages.push(json!({ "role": "system", "content": system }));
    }
    messages.extend(request.messages.iter().map(encode_message));
    let tools = request
        .tools
        .iter()
        .map(|spec| {
            json!({
                "type": "function",
                "function": {
                    "name": spec.name,
                    "description": spec.description,
                    "parameters": spec.parameters,
                },
            })
        })
        .collect();
    WireRequest {
        model,
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        tools,
    }
}

fn decode_response(response: WireResponse) -> Result<Completion, AiError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AiError::Decode("response carried no choices".into()))?;
    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            let arguments = if call.function.arguments.trim().is_empty() {
                Value::Object(Default::default())
            } else {
                serde_json::from_str(&call.function.arguments)
                    .map_err(|e| AiError::Decode(format!("tool arguments: {e}")))?
            };
            Ok(ToolCall {
                id: call.id,
                name: call.function.name,
                arguments,
            })
        })
        .collect::<Result<Vec<_>, AiError>>()?;
    let usage = response
        .usage
        .map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();
    Ok(Completion {
        text: choice.message.content.unwrap_or_default(),
        tool_calls,
        usage,
    })
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    #[instrument(skip(self, request), fields(model = %self.model, messages = request.messages.len()))]
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AiError> {
        let body = encode_request(&self.model, &request);
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(%status, body = %text, "language model call failed");
            return Err(AiError::Upstream(format!("status {status}")));
        }
        let payload: WireResponse = resp.json().await?;
        let completion = decode_response(payload)?;
        debug!(
            tool_calls = completion.tool_calls.len(),
            output_tokens = completion.usage.output_tokens,
            "language model responded"
        );
        Ok(completion)
    }
}

/// Stand-in used when no API key is configured.
pub struct DisabledModel;

#[async_trait]
impl LanguageModel for DisabledModel {
    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, AiError> {
        Err(AiError::NotConfigured("language model"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ToolSpec;

    #[test]
    fn system_prompt_leads_the_conversation() {
        let request = CompletionRequest {
            system: Some("be brief".into()),
            messages: vec![ChatMessage::user("hi")],
            max_tokens: 10,
            temperature: 0.7,
            tools: vec![ToolSpec {
                name: "noop",
                description: "does nothing",
                parameters: json!({"type": "object"}),
            }],
        };
        let wire = serde_json::to_value(encode_request("m", &request)).unwrap();
        assert_eq!(wire["messages"][0]["role"], "system");
        assert_eq!(wire["messages"][1]["content"], "hi");
        assert_eq!(wire["tools"][0]["function"]["name"], "noop");
    }

    #[test]
    fn tool_call_arguments_are_parsed() {
        let payload: WireResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": null, "tool_calls": [
                {"id": "c1", "type": "function", "function": {"name": "getHealthRecommendations", "arguments": "{\"aqi\": 120}"}}
            ]}}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 7}
        }))
        .unwrap();
        let completion = decode_response(payload).unwrap();
        assert_eq!(completion.text, "");
        assert_eq!(completion.tool_calls[0].arguments["aqi"], 120);
        assert_eq!(completion.usage.output_tokens, 7);
    }

    #[test]
    fn empty_choices_are_an_error() {
        let payload: WireResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(decode_response(payload), Err(AiError::Decode(_))));
    }
}

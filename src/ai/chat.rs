//! Prompted analysis and the tool-calling chat loop.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use super::{
    tools::{self, ToolBox},
    AiError, ChatMessage, CompletionRequest, LanguageModel, Role, Usage,
};

/// Rounds of tool use before the chat gives up.
pub const MAX_TOOL_ROUNDS: usize = 4;

const ANALYZE_MAX_TOKENS: u32 = 1000;
const CHAT_MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;

pub const SYSTEM_PROMPT: &str = "You are an air quality expert assistant. You help users understand air pollution data, health impacts, and provide recommendations. Use the available tools to fetch real-time data and provide accurate insights.";

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisInput {
    pub pollutants: Value,
    pub location: String,
    pub aqi: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub analysis: String,
    pub usage: Usage,
}

pub fn analysis_prompt(input: &AnalysisInput) -> String {
    let pollutants =
        serde_json::to_string_pretty(&input.pollutants).unwrap_or_else(|_| input.pollutants.to_string());
    format!(
        "Analyze this air quality data and provide health insights:\n\
         Location: {}\n\
         AQI: {}\n\
         Pollutants: {}\n\n\
         Provide:\n\
         1. Health risk assessment\n\
         2. Recommended activities\n\
         3. Vulnerable groups to watch\n\
         4. Short-term forecast implications",
        input.location, input.aqi, pollutants
    )
}

#[instrument(skip(model, input), fields(location = %input.location))]
pub async fn analyze(model: &dyn LanguageModel, input: &AnalysisInput) -> Result<Analysis, AiError> {
    let request = CompletionRequest {
        system: None,
        messages: vec![ChatMessage::user(analysis_prompt(input))],
        max_tokens: ANALYZE_MAX_TOKENS,
        temperature: TEMPERATURE,
        tools: Vec::new(),
    };
    let completion = model.complete(request).await?;
    Ok(Analysis {
        analysis: completion.text,
        usage: completion.usage,
    })
}

/// A tool invocation surfaced to the caller alongside the final answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolTrace {
    pub name: String,
    pub arguments: Value,
    pub result: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutcome {
    pub message: String,
    pub tool_calls: Vec<ToolTrace>,
}

/// Run the conversation, executing requested tools until the model answers
/// in plain text or [`MAX_TOOL_ROUNDS`] is exhausted.
#[instrument(skip_all, fields(turns = messages.len()))]
pub async fn chat(
    model: &dyn LanguageModel,
    toolbox: &ToolBox,
    mut messages: Vec<ChatMessage>,
) -> Result<ChatOutcome, AiError> {
    let mut traces = Vec::new();
    for round in 0..=MAX_TOOL_ROUNDS {
        let completion = model
            .complete(CompletionRequest {
                system: Some(SYSTEM_PROMPT.to_string()),
                messages: messages.clone(),
                max_tokens: CHAT_MAX_TOKENS,
                temperature: TEMPERATURE,
                tools: tools::specs(),
            })
            .await?;
        if completion.tool_calls.is_empty() {
            info!(rounds = round, tools = traces.len(), "chat finished");
            return Ok(ChatOutcome {
                message: completion.text,
                tool_calls: traces,
            });
        }
        if round == MAX_TOOL_ROUNDS {
            break;
        }

        let mut assistant = ChatMessage::new(Role::Assistant, completion.text);
        assistant.tool_calls = completion.tool_calls.clone();
        messages.push(assistant);
        for call in completion.tool_calls {
            let result = toolbox.execute(&call);
            let mut reply = ChatMessage::new(Role::Tool, result.to_string());
            reply.tool_call_id = Some(call.id.clone());
            messages.push(reply);
            traces.push(ToolTrace {
                name: call.name,
                arguments: call.arguments,
                result,
            });
        }
    }
    Err(AiError::ToolLoop(MAX_TOOL_ROUNDS))
}

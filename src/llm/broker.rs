use crate::error::{ClinicError, Result};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::models::LlmMessage;
use crate::llm::tools::LlmTool;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one broker generation: the final text plus every tool-call and tool-result
/// message produced on the way there, in order.
#[derive(Debug, Clone, Default)]
pub struct BrokerReply {
    pub content: String,
    pub tool_messages: Vec<LlmMessage>,
    pub tool_calls: usize,
}

/// Main interface for LLM interactions
pub struct LlmBroker {
    model: String,
    gateway: Arc<dyn LlmGateway>,
    max_tool_rounds: usize,
}

impl LlmBroker {
    /// Create a new LLM broker that allows one round of tool calls per generation
    pub fn new(model: impl Into<String>, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            model: model.into(),
            gateway,
            max_tool_rounds: 1,
        }
    }

    /// Set how many rounds of tool calls the model may request before it must answer
    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a response, executing any tool calls the model requests.
    ///
    /// Tools are offered for up to `max_tool_rounds` requests. The request after the last
    /// round goes out without tools so the model has to reply in text. A final response
    /// with no text is a gateway error.
    pub async fn generate(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: Option<CompletionConfig>,
    ) -> Result<BrokerReply> {
        let config = config.unwrap_or_default();
        let mut current_messages = messages.to_vec();
        let mut reply = BrokerReply::default();
        let mut rounds = 0;

        loop {
            let offered = tools.filter(|_| rounds < self.max_tool_rounds);
            let response =
                self.gateway.complete(&self.model, &current_messages, offered, &config).await?;

            let Some(tools) = offered.filter(|_| !response.tool_calls.is_empty()) else {
                if !response.tool_calls.is_empty() {
                    warn!("LLM requested tool calls but no tools are available, ignoring");
                }
                reply.content = match response.content {
                    Some(content) if !content.trim().is_empty() => content,
                    _ => {
                        warn!(rounds, "LLM returned no text reply");
                        return Err(ClinicError::GatewayError(
                            "Model returned no text reply".to_string(),
                        ));
                    }
                };
                return Ok(reply);
            };

            rounds += 1;
            info!("Tool calls requested: {}", response.tool_calls.len());

            let request =
                LlmMessage::assistant_tool_calls(response.content, response.tool_calls.clone());
            current_messages.push(request.clone());
            reply.tool_messages.push(request);

            for tool_call in response.tool_calls {
                let output = match tools.iter().find(|t| t.matches(&tool_call.name)) {
                    Some(tool) => {
                        info!("Executing tool: {}", tool_call.name);
                        tool.call(&tool_call)?
                    }
                    None => {
                        warn!("Tool not found: {}", tool_call.name);
                        json!({ "error": format!("Unknown tool: {}", tool_call.name) })
                    }
                };

                let result = LlmMessage::tool_result(tool_call, serde_json::to_string(&output)?);
                current_messages.push(result.clone());
                reply.tool_messages.push(result);
                reply.tool_calls += 1;
            }
        }
    }
}

//! OpenAI Gateway for LLM interactions.
//!
//! This module provides a gateway for OpenAI-compatible chat completion endpoints,
//! including tool calling.

use crate::error::{ClinicError, Result};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::gateways::openai_messages_adapter::{adapt_messages_to_openai, convert_tool_calls};
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use crate::llm::tools::LlmTool;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for connecting to OpenAI API.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<std::time::Duration>,
}

/// Gateway for OpenAI LLM service.
pub struct OpenAIGateway {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIGateway {
    /// Create a new OpenAI gateway with custom configuration.
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(Self { client, config })
    }

    /// Create gateway with custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(OpenAIConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: None,
        })
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build the request body for a chat completion.
    fn build_body(
        &self,
        model: &str,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: &CompletionConfig,
    ) -> Result<Value> {
        let mut body = json!({
            "model": model,
            "messages": adapt_messages_to_openai(messages)?,
            "temperature": config.temperature,
            "max_tokens": config.max_tokens,
        });

        if let Some(seed) = config.seed {
            body["seed"] = json!(seed);
        }

        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            let tool_defs: Vec<_> = tools.iter().map(|t| t.descriptor()).collect();
            body["tools"] = serde_json::to_value(tool_defs)?;
        }

        Ok(body)
    }
}

/// Pull content and tool calls out of a chat completion response body.
fn parse_completion(response_body: &Value) -> Result<LlmGatewayResponse> {
    let message = response_body["choices"]
        .get(0)
        .map(|choice| &choice["message"])
        .ok_or_else(|| ClinicError::GatewayError("No choices in response".to_string()))?;

    let content = message["content"].as_str().map(String::from);

    let tool_calls = match message["tool_calls"].as_array() {
        Some(calls) => convert_tool_calls(calls)?,
        None => vec![],
    };

    Ok(LlmGatewayResponse {
        content,
        tool_calls,
    })
}

#[async_trait]
impl LlmGateway for OpenAIGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        info!("Delegating to OpenAI for completion");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let body = self.build_body(model, messages, tools, config)?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClinicError::GatewayError(format!(
                "OpenAI API error: {} - {}",
                status, error_text
            )));
        }

        let response_body: Value = response.json().await?;
        let parsed = parse_completion(&response_body)?;
        debug!(tool_calls = parsed.tool_calls.len(), "OpenAI completion received");

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::tools::ToolDescriptor;
    use std::collections::HashMap;

    struct EchoTool;

    impl LlmTool for EchoTool {
        fn run(&self, _args: &HashMap<String, Value>) -> Result<Value> {
            Ok(json!({}))
        }

        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor::function("echo", "Echo", json!({}))
        }
    }

    fn gateway(url: String) -> OpenAIGateway {
        OpenAIGateway::with_api_key_and_base_url("test-key", url).unwrap()
    }

    #[test]
    fn test_gateway_with_api_key_and_base_url() {
        let gateway = gateway("https://custom.com".to_string());
        assert_eq!(gateway.config().api_key, "test-key");
        assert_eq!(gateway.config().base_url, "https://custom.com");
    }

    #[test]
    fn test_build_body_includes_seed_and_tools() {
        let gateway = gateway("http://localhost".to_string());
        let tools: Vec<Box<dyn LlmTool>> = vec![Box::new(EchoTool)];
        let body = gateway
            .build_body(
                "gpt-4o",
                &[LlmMessage::user("Hi")],
                Some(&tools),
                &CompletionConfig::default(),
            )
            .unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["seed"], 0);
        assert_eq!(body["max_tokens"], 16384);
        assert_eq!(body["tools"][0]["function"]["name"], "echo");
        assert_eq!(body["messages"][0]["content"], "Hi");
    }

    #[test]
    fn test_build_body_omits_empty_tools_and_seed() {
        let gateway = gateway("http://localhost".to_string());
        let config = CompletionConfig {
            seed: None,
            ..Default::default()
        };
        let no_tools: Vec<Box<dyn LlmTool>> = vec![];
        let body = gateway.build_body("gpt-4o", &[], Some(&no_tools), &config).unwrap();

        assert!(body.get("tools").is_none());
        assert!(body.get("seed").is_none());
    }

    #[test]
    fn test_parse_completion_without_choices() {
        let result = parse_completion(&json!({"choices": []}));
        assert!(matches!(result, Err(ClinicError::GatewayError(_))));
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}}]}"#)
            .create_async()
            .await;

        let gateway = gateway(server.url());
        let messages = vec![LlmMessage::user("Hi")];

        let result = gateway
            .complete("gpt-4o", &messages, None, &CompletionConfig::default())
            .await;

        mock.assert_async().await;
        let response = result.unwrap();
        assert_eq!(response.content, Some("Hello!".to_string()));
        assert!(response.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn test_complete_with_tool_calls() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":null,"tool_calls":[{"id":"call_1","type":"function","function":{"name":"is_doctor_available","arguments":"{\"doctor_name\": \"Jamil Ahmad\", \"requested_date\": \"2025-01-21\", \"requested_time\": \"09:00\"}"}}]}}]}"#)
            .create_async()
            .await;

        let gateway = gateway(server.url());
        let messages = vec![LlmMessage::user("Is Jamil Ahmad free at 9?")];

        let result = gateway
            .complete("gpt-4o", &messages, None, &CompletionConfig::default())
            .await;

        mock.assert_async().await;
        let response = result.unwrap();
        assert!(response.content.is_none());
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].id, Some("call_1".to_string()));
        assert_eq!(response.tool_calls[0].string_arg("doctor_name"), Some("Jamil Ahmad"));
    }

    #[tokio::test]
    async fn test_complete_sends_tools() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "gpt-4o",
                "seed": 0,
                "tools": [{
                    "type": "function",
                    "function": {"name": "echo", "description": "Echo", "parameters": {}}
                }]
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#)
            .create_async()
            .await;

        let gateway = gateway(server.url());
        let tools: Vec<Box<dyn LlmTool>> = vec![Box::new(EchoTool)];

        let result = gateway
            .complete(
                "gpt-4o",
                &[LlmMessage::user("Hi")],
                Some(&tools),
                &CompletionConfig::default(),
            )
            .await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_complete_error_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("Unauthorized")
            .create_async()
            .await;

        let gateway = gateway(server.url());
        let result = gateway
            .complete("gpt-4o", &[LlmMessage::user("Hi")], None, &CompletionConfig::default())
            .await;

        mock.assert_async().await;
        match result {
            Err(ClinicError::GatewayError(msg)) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Unauthorized"));
            }
            other => panic!("Expected GatewayError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let gateway = gateway(server.url());
        let result = gateway
            .complete("gpt-4o", &[LlmMessage::user("Hi")], None, &CompletionConfig::default())
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ClinicError::HttpError(_))));
    }
}

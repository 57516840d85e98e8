//! Adapter for converting LLM messages to and from the OpenAI chat format.

use crate::error::{ClinicError, Result};
use crate::llm::models::{LlmMessage, LlmToolCall, MessageRole};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Adapt LLM messages to OpenAI format.
pub fn adapt_messages_to_openai(messages: &[LlmMessage]) -> Result<Vec<Value>> {
    let mut result = Vec::with_capacity(messages.len());

    for msg in messages {
        let openai_msg = match msg.role {
            MessageRole::System => json!({
                "role": "system",
                "content": msg.content.as_deref().unwrap_or("")
            }),
            MessageRole::User => json!({
                "role": "user",
                "content": msg.content.as_deref().unwrap_or("")
            }),
            MessageRole::Assistant => {
                let mut assistant_msg = json!({ "role": "assistant" });

                if let Some(ref content) = msg.content {
                    assistant_msg["content"] = json!(content);
                }

                if let Some(ref tool_calls) = msg.tool_calls {
                    let mut formatted_calls = Vec::with_capacity(tool_calls.len());
                    for tc in tool_calls {
                        formatted_calls.push(json!({
                            "id": tc.id.as_deref().unwrap_or(""),
                            "type": "function",
                            "function": {
                                "name": tc.name,
                                "arguments": serde_json::to_string(&tc.arguments)?
                            }
                        }));
                    }
                    assistant_msg["tool_calls"] = json!(formatted_calls);
                }

                assistant_msg
            }
            MessageRole::Tool => json!({
                "role": "tool",
                "content": msg.content.as_deref().unwrap_or(""),
                "tool_call_id": msg.tool_call_id().unwrap_or_default()
            }),
        };

        result.push(openai_msg);
    }

    Ok(result)
}

/// Convert tool calls from OpenAI format to internal format.
///
/// Arguments arrive as a JSON-encoded string; a string that does not decode to an object
/// is a malformed response.
pub fn convert_tool_calls(tool_calls: &[Value]) -> Result<Vec<LlmToolCall>> {
    tool_calls
        .iter()
        .map(|tc| {
            let id = tc["id"].as_str().map(String::from);
            let name = tc["function"]["name"]
                .as_str()
                .ok_or_else(|| ClinicError::GatewayError("Tool call without a name".to_string()))?
                .to_string();
            let args_str = tc["function"]["arguments"].as_str().unwrap_or("{}");
            let arguments: HashMap<String, Value> = if args_str.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(args_str)?
            };

            Ok(LlmToolCall {
                id,
                name,
                arguments,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn availability_call() -> LlmToolCall {
        LlmToolCall {
            id: Some("call_123".to_string()),
            name: "is_doctor_available".to_string(),
            arguments: HashMap::from([("doctor_name".to_string(), json!("Jamil Ahmad"))]),
        }
    }

    #[test]
    fn test_adapt_system_and_user_messages() {
        let messages = vec![LlmMessage::system("You are helpful"), LlmMessage::user("Hello")];

        let result = adapt_messages_to_openai(&messages).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0]["role"], "system");
        assert_eq!(result[0]["content"], "You are helpful");
        assert_eq!(result[1]["role"], "user");
        assert_eq!(result[1]["content"], "Hello");
    }

    #[test]
    fn test_adapt_assistant_message() {
        let messages = vec![LlmMessage::assistant("Hi there")];

        let result = adapt_messages_to_openai(&messages).unwrap();

        assert_eq!(result[0]["role"], "assistant");
        assert_eq!(result[0]["content"], "Hi there");
        assert!(result[0].get("tool_calls").is_none());
    }

    #[test]
    fn test_adapt_assistant_with_tool_calls() {
        let messages = vec![LlmMessage::assistant_tool_calls(None, vec![availability_call()])];

        let result = adapt_messages_to_openai(&messages).unwrap();

        assert_eq!(result[0]["role"], "assistant");
        assert!(result[0].get("content").is_none());

        let calls = result[0]["tool_calls"].as_array().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["id"], "call_123");
        assert_eq!(calls[0]["type"], "function");
        assert_eq!(calls[0]["function"]["name"], "is_doctor_available");

        let args: Value =
            serde_json::from_str(calls[0]["function"]["arguments"].as_str().unwrap()).unwrap();
        assert_eq!(args["doctor_name"], "Jamil Ahmad");
    }

    #[test]
    fn test_adapt_tool_message() {
        let messages = vec![LlmMessage::tool_result(availability_call(), "true")];

        let result = adapt_messages_to_openai(&messages).unwrap();

        assert_eq!(result[0]["role"], "tool");
        assert_eq!(result[0]["content"], "true");
        assert_eq!(result[0]["tool_call_id"], "call_123");
    }

    #[test]
    fn test_convert_tool_calls() {
        let tool_calls = vec![json!({
            "id": "call_abc",
            "type": "function",
            "function": {
                "name": "is_doctor_available",
                "arguments": "{\"doctor_name\": \"Jamil Ahmad\", \"requested_date\": \"2025-01-21\", \"requested_time\": \"09:00\"}"
            }
        })];

        let result = convert_tool_calls(&tool_calls).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, Some("call_abc".to_string()));
        assert_eq!(result[0].name, "is_doctor_available");
        assert_eq!(result[0].string_arg("requested_time"), Some("09:00"));
    }

    #[test]
    fn test_convert_tool_calls_empty_args() {
        let tool_calls = vec![json!({
            "id": "call_xyz",
            "type": "function",
            "function": { "name": "no_args_tool", "arguments": "" }
        })];

        let result = convert_tool_calls(&tool_calls).unwrap();
        assert!(result[0].arguments.is_empty());
    }

    #[test]
    fn test_convert_tool_calls_malformed_arguments() {
        let tool_calls = vec![json!({
            "id": "call_bad",
            "type": "function",
            "function": { "name": "is_doctor_available", "arguments": "{not json" }
        })];

        let result = convert_tool_calls(&tool_calls);
        assert!(matches!(result, Err(ClinicError::SerializationError(_))));
    }

    #[test]
    fn test_convert_tool_calls_missing_name() {
        let tool_calls = vec![json!({ "id": "call_1", "type": "function", "function": {} })];

        let result = convert_tool_calls(&tool_calls);
        assert!(matches!(result, Err(ClinicError::GatewayError(_))));
    }
}

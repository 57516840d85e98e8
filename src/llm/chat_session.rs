//! Chat session management with an explicit transcript.
//!
//! A `ChatSession` holds everything that stays fixed for a conversation (broker, tools,
//! prompt, completion settings). The conversation itself lives in a `Transcript` value
//! that the caller passes into each turn and gets back, extended, on success.

use crate::error::Result;
use crate::llm::broker::LlmBroker;
use crate::llm::gateway::CompletionConfig;
use crate::llm::models::{LlmMessage, MessageRole};
use crate::llm::tools::LlmTool;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordered conversation history: system prompt first, then every turn in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<LlmMessage>,
}

impl Transcript {
    /// Start a transcript with the given system prompt
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![LlmMessage::system(system_prompt)],
        }
    }

    pub fn messages(&self) -> &[LlmMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: LlmMessage) {
        self.messages.push(message);
    }

    /// The most recent assistant text, if any
    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant && m.tool_calls.is_none())
            .and_then(|m| m.content.as_deref())
    }
}

/// What a successful turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub transcript: Transcript,
    pub reply: String,
    pub tool_calls: usize,
}

/// A chat session that turns user input into assistant replies.
///
/// # Examples
///
/// ```ignore
/// use clinic_chat::llm::{ChatSession, LlmBroker};
/// use clinic_chat::llm::gateways::OpenAIGateway;
/// use std::sync::Arc;
///
/// let gateway = Arc::new(OpenAIGateway::with_api_key_and_base_url(key, url)?);
/// let session = ChatSession::builder(LlmBroker::new("gpt-4o", gateway))
///     .system_prompt("You are the clinic receptionist.")
///     .build();
///
/// let transcript = session.start();
/// let outcome = session.turn(&transcript, "Is Dr. Ahmad free on Tuesday?").await?;
/// println!("{}", outcome.reply);
/// ```
pub struct ChatSession {
    broker: LlmBroker,
    tools: Vec<Box<dyn LlmTool>>,
    config: CompletionConfig,
    system_prompt: String,
    assistant_intro: Option<String>,
}

impl ChatSession {
    /// Create a new chat session with default settings.
    pub fn new(broker: LlmBroker) -> Self {
        Self::builder(broker).build()
    }

    /// Create a chat session builder for custom configuration.
    pub fn builder(broker: LlmBroker) -> ChatSessionBuilder {
        ChatSessionBuilder::new(broker)
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Build the opening transcript: the system prompt and, if configured, the assistant
    /// introduction.
    pub fn start(&self) -> Transcript {
        let mut transcript = Transcript::new(&self.system_prompt);
        if let Some(intro) = &self.assistant_intro {
            transcript.push(LlmMessage::assistant(intro));
        }
        transcript
    }

    /// Run one conversational turn.
    ///
    /// The given transcript is left untouched. On success the outcome carries a copy
    /// extended with the user message, any tool exchange, and the assistant reply.
    pub async fn turn(&self, transcript: &Transcript, input: &str) -> Result<TurnOutcome> {
        let mut next = transcript.clone();
        next.push(LlmMessage::user(input));

        let tools = (!self.tools.is_empty()).then_some(self.tools.as_slice());
        let reply = self.broker.generate(next.messages(), tools, Some(self.config.clone())).await?;

        debug!(
            tool_calls = reply.tool_calls,
            transcript_len = next.len() + reply.tool_messages.len() + 1,
            "Turn complete"
        );

        for message in reply.tool_messages {
            next.push(message);
        }
        next.push(LlmMessage::assistant(&reply.content));

        Ok(TurnOutcome {
            transcript: next,
            reply: reply.content,
            tool_calls: reply.tool_calls,
        })
    }
}

/// Builder for constructing a `ChatSession` with custom configuration.
pub struct ChatSessionBuilder {
    broker: LlmBroker,
    system_prompt: String,
    assistant_intro: Option<String>,
    tools: Vec<Box<dyn LlmTool>>,
    config: CompletionConfig,
}

impl ChatSessionBuilder {
    fn new(broker: LlmBroker) -> Self {
        Self {
            broker,
            system_prompt: "You are a helpful assistant.".to_string(),
            assistant_intro: None,
            tools: Vec::new(),
            config: CompletionConfig::default(),
        }
    }

    /// Set the system prompt (default: "You are a helpful assistant.")
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Assistant message placed right after the system prompt
    pub fn assistant_intro(mut self, intro: impl Into<String>) -> Self {
        self.assistant_intro = Some(intro.into());
        self
    }

    /// Set the tools available to the LLM
    pub fn tools(mut self, tools: Vec<Box<dyn LlmTool>>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the completion settings used for every turn
    pub fn config(mut self, config: CompletionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the temperature for generation (default: 1.0)
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    pub fn build(self) -> ChatSession {
        ChatSession {
            broker: self.broker,
            tools: self.tools,
            config: self.config,
            system_prompt: self.system_prompt,
            assistant_intro: self.assistant_intro,
        }
    }
}

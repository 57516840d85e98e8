pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod repl;
pub mod schedule;

pub use error::{ClinicError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{ClinicError, Result};
    pub use crate::llm::gateways::OpenAIGateway;
    pub use crate::llm::tools::{schedule_tools, FunctionDescriptor, LlmTool, ToolDescriptor};
    pub use crate::llm::{
        ChatSession, CompletionConfig, LlmBroker, LlmGateway, LlmMessage, MessageRole, Transcript,
    };
    pub use crate::schedule::{Availability, MatchMode, ScheduleStore};
}

use anyhow::Context;
use clap::Parser;
use clinic_chat::config::Settings;
use clinic_chat::llm::gateways::OpenAIGateway;
use clinic_chat::llm::tools::schedule_tools;
use clinic_chat::llm::{ChatSession, LlmBroker};
use clinic_chat::prompt::{system_prompt, ASSISTANT_INTRO};
use clinic_chat::repl;
use clinic_chat::schedule::ScheduleStore;
use std::io;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let settings = Settings::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level()));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    debug!(
        schedule = %settings.schedule.display(),
        model = %settings.model,
        match_mode = %settings.match_mode,
        "Starting clinic chat"
    );

    let store = ScheduleStore::open(&settings.schedule, settings.match_mode).with_context(|| {
        format!("Failed to load schedule from {}", settings.schedule.display())
    })?;
    let store = Arc::new(store);

    let gateway = OpenAIGateway::with_config(settings.openai_config()?)
        .context("Failed to create OpenAI client")?;
    let broker = LlmBroker::new(&settings.model, Arc::new(gateway))
        .with_max_tool_rounds(settings.max_tool_rounds);

    let session = ChatSession::builder(broker)
        .system_prompt(system_prompt(&settings.clinic_name))
        .assistant_intro(ASSISTANT_INTRO)
        .tools(schedule_tools(store.clone()))
        .config(settings.completion_config())
        .build();

    let transcript = repl::run(
        &session,
        &store,
        &settings.clinic_name,
        io::stdin().lock(),
        io::stdout(),
    )
    .await?;
    info!(messages = transcript.len(), "Session ended");

    Ok(())
}

//! Quickstart harness: wrap a mock chat client, run a session, and watch the
//! records a sink receives.
//!
//! Run with `cargo run --example quickstart -p tunerkit-sdk`.

use async_trait::async_trait;
use serde_json::json;
use tunerkit_sdk::{
    InvocationRecord, LoggingSink, SessionOptions, TunerkitClient, TunerkitConfig, TunerkitResult,
};

/// Sink that prints each record instead of shipping it anywhere
struct StdoutSink;

#[async_trait]
impl LoggingSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn log(&self, record: &InvocationRecord) -> TunerkitResult<()> {
        println!("--- record ---\n{}", serde_json::to_string_pretty(record)?);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let client = TunerkitClient::builder(TunerkitConfig::new("demo-key"))
        .without_log_endpoint()
        .with_sink(std::sync::Arc::new(StdoutSink))
        .build()?;

    // A stand-in for a real nested API client. Handlers own their receiver;
    // here the "receiver" is just a canned reply.
    client.register_value("chat.completions.create", |params| async move {
        Ok(json!({
            "model": params["model"],
            "choices": [{"message": {"role": "assistant", "content": "Hello from the mock!"}}],
        }))
    });

    let headers = client.start_session(
        json!({"purpose": "quickstart"}),
        "quickstart-dataset",
        SessionOptions::new(),
    );

    let response = client
        .at("chat")
        .at("completions")
        .at("create")
        .call(json!({"model": "mock-1", "prompt": "Say hello"}))
        .await?;
    println!("caller sees: {response}");

    client.end_session(json!({"response": response}), headers);
    client.flush().await;
    Ok(())
}

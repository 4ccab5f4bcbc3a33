use anyhow::Context;
use crop_check::config::Settings;
use crop_check::startup;
use crop_check::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Fails fast when GEMINI_API_KEY is absent.
    let settings = Settings::load().context("Failed to load configuration")?;

    init_tracing(&settings.server.log_level, settings.server.json_logs);

    startup::run(settings).await
}

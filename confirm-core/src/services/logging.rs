//! Logging service

use crate::models::LogLevel;
use tracing_subscriber::EnvFilter;

/// Initialize logging with the specified level. `RUST_LOG` overrides it when set.
pub fn init_logging(level: LogLevel) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let directive = match level {
        LogLevel::Error => "confirm=error,confirm_core=error",
        LogLevel::Warn => "confirm=warn,confirm_core=warn",
        LogLevel::Info => "confirm=info,confirm_core=info",
        LogLevel::Debug => "confirm=debug,confirm_core=debug",
        LogLevel::Trace => "confirm=trace,confirm_core=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()?;

    Ok(())
}

/// Log a prompt lifecycle event
pub fn log_prompt_event(event_type: &str, prompt_id: &str, details: Option<&str>) {
    tracing::info!(
        event_type = event_type,
        prompt_id = prompt_id,
        details = details.unwrap_or(""),
        "Prompt event"
    );
}

/// Log a secondary failure that does not change the prompt result
pub fn log_cleanup_failure(prompt_id: &str, step: &str, error: &str) {
    tracing::warn!(
        prompt_id = prompt_id,
        step = step,
        error = error,
        "Prompt cleanup step failed"
    );
}

/// Log a system error
pub fn log_error(error: &str, context: Option<&str>) {
    tracing::error!(
        error = error,
        context = context.unwrap_or(""),
        "System error occurred"
    );
}

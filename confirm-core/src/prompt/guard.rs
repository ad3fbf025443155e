//! Guard that takes the buttons off a rendered prompt on every exit path

use crate::gateway::MessagingGateway;
use crate::models::MessagePayload;
use crate::prompt::destination::RenderTarget;
use crate::services::logging;
use std::sync::Arc;

/// Armed while a prompt message carries controls.
///
/// `release` strips them in place. If the guard is dropped while still
/// armed (the waiting future was cancelled) the strip is spawned onto the
/// current tokio runtime instead.
pub(crate) struct ControlsGuard {
    gateway: Arc<dyn MessagingGateway>,
    target: Option<RenderTarget>,
    prompt_id: String,
}

impl ControlsGuard {
    pub(crate) fn arm(
        gateway: Arc<dyn MessagingGateway>,
        target: RenderTarget,
        prompt_id: String,
    ) -> Self {
        Self {
            gateway,
            target: Some(target),
            prompt_id,
        }
    }

    /// Strip the controls now. Failures are logged, never returned.
    pub(crate) async fn release(mut self) {
        if let Some(target) = self.target.take() {
            strip_controls(self.gateway.as_ref(), &target, &self.prompt_id).await;
        }
    }
}

impl Drop for ControlsGuard {
    fn drop(&mut self) {
        let Some(target) = self.target.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let gateway = Arc::clone(&self.gateway);
                let prompt_id = std::mem::take(&mut self.prompt_id);
                handle.spawn(async move {
                    strip_controls(gateway.as_ref(), &target, &prompt_id).await;
                });
            }
            Err(_) => logging::log_cleanup_failure(
                &self.prompt_id,
                "strip_controls",
                "no tokio runtime to run cleanup on",
            ),
        }
    }
}

async fn strip_controls(gateway: &dyn MessagingGateway, target: &RenderTarget, prompt_id: &str) {
    match target
        .edit(gateway, &MessagePayload::strip_controls())
        .await
    {
        Ok(()) => tracing::debug!(
            prompt_id,
            message_id = %target.message().message_id,
            "Prompt controls removed"
        ),
        Err(e) => logging::log_cleanup_failure(prompt_id, "strip_controls", &e.to_string()),
    }
}

use crate::error::{ChatError, Result};
use haven_assistant::{AssistantApi, Run};
use haven_types::{ChatMessage, PollingConfig};
use tracing::{debug, warn};

/// Waits for a run to finish and collects the assistant's reply.
///
/// This is the only place a polling policy is applied: one status check per
/// `interval`, at most `max_attempts` checks, and at most
/// `transient_retry_limit()` failed checks.
pub struct RunPoller<'a> {
    api: &'a dyn AssistantApi,
    config: &'a PollingConfig,
}

impl<'a> RunPoller<'a> {
    pub fn new(api: &'a dyn AssistantApi, config: &'a PollingConfig) -> Self {
        Self { api, config }
    }

    /// Poll until the run completes.
    ///
    /// `on_status` sees every successful status check with its 1-based
    /// attempt number. Non-success terminal statuses fail immediately.
    pub async fn wait_for_completion<F>(
        &self,
        thread_id: &str,
        run_id: &str,
        mut on_status: F,
    ) -> Result<Run>
    where
        F: FnMut(&Run, u32) + Send,
    {
        let mut failures = 0u32;

        for attempt in 1..=self.config.max_attempts {
            match self.api.run_status(thread_id, run_id).await {
                Ok(run) => {
                    on_status(&run, attempt);

                    if run.status.is_success() {
                        debug!(run_id, attempt, "run completed");
                        return Ok(run);
                    }
                    if run.status.is_terminal() {
                        let detail = run.last_error.as_ref().map(|e| e.message.as_str());
                        return Err(ChatError::from_terminal(run.status, detail));
                    }
                }
                Err(e) if e.kind().is_retryable_while_polling() => {
                    failures += 1;
                    warn!(run_id, attempt, failures, error = %e, "error checking run status");

                    if failures > self.config.transient_retry_limit() {
                        return Err(ChatError::RetriesExhausted {
                            failures,
                            last_error: e.to_string(),
                        });
                    }
                }
                Err(e) => return Err(e.into()),
            }

            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.interval).await;
            }
        }

        Err(ChatError::Timeout {
            attempts: self.config.max_attempts,
        })
    }

    /// Assistant replies from the newest message page, oldest first
    pub async fn fetch_replies(&self, thread_id: &str) -> Result<Vec<ChatMessage>> {
        let messages = self.api.latest_messages(thread_id).await?;

        let mut replies: Vec<ChatMessage> = messages
            .iter()
            .filter(|m| m.is_assistant_reply())
            .filter_map(|m| m.text())
            .map(ChatMessage::assistant)
            .collect();

        if replies.is_empty() {
            return Err(ChatError::NoValidResponse);
        }

        // the page is newest-first
        replies.reverse();
        Ok(replies)
    }
}

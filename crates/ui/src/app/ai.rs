use crate::app::{App, AppEvent};

use duet_core::{Dispatch, Reply, logging::redact};
use duet_providers::complete_with_timeout;
use std::sync::Arc;

impl App {
    /// Send a submitted question to the answer service
    ///
    /// Only the latest question travels with the system instruction; earlier
    /// turns are not replayed. Failures and timeouts come back as
    /// [`Reply::Failure`].
    pub(crate) fn ask_ai(&mut self, dispatch: Dispatch) {
        let request = self.answer.request(&dispatch.text);
        let provider = Arc::clone(&self.provider);
        let timeout = self.answer.timeout;
        let cancel = self.cancel_token.clone();
        let tx = self.sender();
        let ticket = dispatch.ticket;

        tracing::debug!(question = %redact(&dispatch.text, 80), provider = provider.name(), "asking answer service");

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                result = complete_with_timeout(provider.as_ref(), request, timeout) => {
                    let reply = match result {
                        Ok(answer) => Reply::Answer { content: answer.content, citations: answer.citations },
                        Err(e) => {
                            tracing::warn!("answer request failed: {}", e);
                            Reply::Failure
                        }
                    };
                    let _ = tx.send(AppEvent::AnswerFinished { ticket, reply });
                }
            }
        });
    }
}

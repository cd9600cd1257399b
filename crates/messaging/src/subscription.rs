//! Cancellable message subscriptions.
//!
//! A [`Subscription`] drains a [`MessageStream`] on a spawned task and hands
//! each item to a callback. Delivery and [`Subscription::cancel`] take the same
//! lock, so once `cancel` returns the callback is never invoked again.

use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::MessageStream;
use crate::error::Result;
use crate::types::Message;

pub struct Subscription {
    token: CancellationToken,
    active: Arc<Mutex<bool>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Start draining `stream` into `on_item`.
    ///
    /// `on_item` runs under the delivery lock and must not cancel its own
    /// subscription. Must be called within a tokio runtime.
    pub fn spawn<F>(stream: MessageStream, on_item: F) -> Self
    where
        F: FnMut(Result<Message>) + Send + 'static,
    {
        let token = CancellationToken::new();
        let active = Arc::new(Mutex::new(true));

        let task = tokio::spawn(drain(stream, on_item, token.clone(), Arc::clone(&active)));
        Self { token, active, task: Some(task) }
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Stop delivery. Idempotent.
    pub fn cancel(&self) {
        match self.active.lock() {
            Ok(mut active) => *active = false,
            Err(poisoned) => *poisoned.into_inner() = false,
        }
        self.token.cancel();
    }

    /// Cancel and wait for the drain task to exit
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

async fn drain<F>(mut stream: MessageStream, mut on_item: F, token: CancellationToken, active: Arc<Mutex<bool>>)
where
    F: FnMut(Result<Message>) + Send + 'static,
{
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            item = stream.next() => match item {
                Some(item) => {
                    if !deliver(&active, &mut on_item, item) {
                        break;
                    }
                }
                None => {
                    tracing::debug!("message stream ended");
                    break;
                }
            },
        }
    }
}

/// Invoke the callback unless cancelled; returns whether delivery is still live
fn deliver<F>(active: &Mutex<bool>, on_item: &mut F, item: Result<Message>) -> bool
where
    F: FnMut(Result<Message>),
{
    let Ok(guard) = active.lock() else {
        return false;
    };
    if !*guard {
        return false;
    }
    on_item(item);
    true
}

//! Async Operations
//!
//! Work runs on a background thread and reports back over a channel.
//! Operations are polled each frame to check for completion.

use super::FetchError;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// Result type for async operations
pub type AsyncResult<T> = Result<T, FetchError>;

/// A handle to a pending async operation that can be polled
pub struct AsyncOp<T> {
    receiver: Option<Receiver<AsyncResult<T>>>,
    result: Option<AsyncResult<T>>,
}

impl<T: Send + 'static> AsyncOp<T> {
    /// Run `work` on a background thread
    pub fn spawn<F>(work: F) -> Self
    where
        F: FnOnce() -> AsyncResult<T> + Send + 'static,
    {
        let (sender, receiver) = channel();
        thread::spawn(move || {
            let _ = sender.send(work());
        });
        Self {
            receiver: Some(receiver),
            result: None,
        }
    }
}

impl<T> AsyncOp<T> {
    /// An operation that is already finished
    pub fn ready(result: AsyncResult<T>) -> Self {
        Self {
            receiver: None,
            result: Some(result),
        }
    }

    /// Check if the operation has completed (polls the channel)
    pub fn is_complete(&mut self) -> bool {
        if self.result.is_some() {
            return true;
        }
        let Some(receiver) = &self.receiver else {
            return false;
        };

        match receiver.try_recv() {
            Ok(result) => {
                self.result = Some(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                // Worker panicked or dropped the sender
                self.result = Some(Err(FetchError::Disconnected));
                true
            }
        }
    }

    /// Take the result if complete
    pub fn take(mut self) -> Option<AsyncResult<T>> {
        self.is_complete();
        self.result
    }
}

use crate::error::AppError;
use tokio::sync::oneshot;

/// Messages that can be sent to the `LlmActor`.
#[derive(Debug)]
pub enum LlmMessage {
    /// A request for one chat completion.
    Complete {
        prompt: String,
        /// A channel to send the trimmed completion text back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}

/// Messages that can be sent to the dispatcher actor.
#[derive(Debug)]
pub enum DispatcherMessage {
    /// One line of chat input from a user.
    HandleInput {
        user_id: String,
        input: String,
        /// A channel to send the reply text back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
    /// Stops the dispatcher loop.
    Shutdown,
}

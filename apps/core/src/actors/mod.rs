//! Actor system: the chat dispatcher and the language-model client.
//!
//! Each actor runs in its own Tokio task and is driven through a cloneable
//! handle over an `mpsc` channel; replies come back on `oneshot` channels.

pub mod dispatcher;
pub mod llm;
pub mod messages;
pub mod traits;

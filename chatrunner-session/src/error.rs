use chatrunner_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("A reply is still pending; wait for it before submitting again")]
    AwaitingResponse,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Conversation is closed")]
    Closed,

    #[error("No tokio runtime available to schedule the reply")]
    NoRuntime,

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SessionResult<T> = Result<T, SessionError>;

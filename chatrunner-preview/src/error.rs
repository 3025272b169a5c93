use thiserror::Error;

use crate::isolation::ContextHandle;

pub type PreviewResult<T> = Result<T, PreviewError>;

#[derive(Error, Debug, Clone)]
pub enum PreviewError {
    #[error("Failed to assemble preview document: {0}")]
    Assembly(String),

    #[error("Unknown sandbox token '{token}'")]
    UnknownSandboxToken { token: String },

    #[error("Sandbox token '{token}' would let the preview escape its frame")]
    ForbiddenSandboxToken { token: String },

    #[error("Sandbox tokens 'allow-scripts' and 'allow-same-origin' cannot be combined: the frame could lift its own sandbox")]
    SameOriginWithScripts,

    #[error("Isolated context {0} is not mounted")]
    UnknownContext(ContextHandle),

    #[error(transparent)]
    Core(#[from] chatrunner_core::CoreError),
}

//! # Chat Runner session
//!
//! The conversation side of Chat Runner: classifies each submission, keeps the
//! message history and posts a deferred system reply on the tokio runtime.
//!
//! ## Example
//! ```
//! use chatrunner_core::RunnerConfig;
//! use chatrunner_session::Conversation;
//!
//! let mut conversation = Conversation::new(&RunnerConfig::default());
//! conversation.select_example("<h1>Hi</h1>").unwrap();
//! assert_eq!(conversation.message_count(), 2);
//! assert!(conversation.messages()[1].is_code());
//! ```

pub mod conversation;
pub mod error;
pub mod responder;

pub use conversation::Conversation;
pub use error::{SessionError, SessionResult};
pub use responder::{Acknowledger, Responder, CODE_ACK, EXAMPLE_INTRO, TEXT_ACK};

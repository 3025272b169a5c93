//! Conversation state: an append-only message list plus the pending-reply count.
//!
//! `submit` appends the classified user message right away and schedules the
//! system reply on the current tokio runtime after the configured delay.
//! `close` (and dropping the conversation) aborts every scheduled reply.

use chatrunner_core::compose::compose;
use chatrunner_core::{
    ChatConfig, Classifier, EditorSections, Language, Message, MessageId, OverlapPolicy,
    RunnerConfig,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::error::{SessionError, SessionResult};
use crate::responder::{Acknowledger, Responder};

struct ChatState {
    messages: Vec<Message>,
    pending_replies: usize,
    closed: bool,
}

/// State shared with the scheduled reply tasks.
struct Shared {
    state: Mutex<ChatState>,
    /// Bumped on every change to `state`.
    revision: watch::Sender<u64>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn deliver(&self, reply: String) {
        {
            let mut state = self.lock();
            if state.closed {
                debug!("conversation closed, dropping reply");
                return;
            }
            state.messages.push(Message::system(reply));
            state.pending_replies = state.pending_replies.saturating_sub(1);
        }
        self.bump();
    }
}

pub struct Conversation<R: Responder = Acknowledger> {
    shared: Arc<Shared>,
    classifier: Classifier,
    config: ChatConfig,
    responder: Arc<R>,
    scheduled: Vec<JoinHandle<()>>,
}

impl Conversation<Acknowledger> {
    pub fn new(config: &RunnerConfig) -> Self {
        Self::with_responder(config, Acknowledger)
    }
}

impl<R: Responder> Conversation<R> {
    pub fn with_responder(config: &RunnerConfig, responder: R) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(ChatState {
                    messages: Vec::new(),
                    pending_replies: 0,
                    closed: false,
                }),
                revision,
            }),
            classifier: Classifier::from_config(&config.classifier),
            config: config.chat.clone(),
            responder: Arc::new(responder),
            scheduled: Vec::new(),
        }
    }

    /// Append a user message and schedule the system reply.
    ///
    /// Must be called from within a tokio runtime. With [`OverlapPolicy::Reject`]
    /// a second submit before the reply lands fails with
    /// [`SessionError::AwaitingResponse`] and leaves the history untouched.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub fn submit(&mut self, text: &str) -> SessionResult<MessageId> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        {
            let state = self.shared.lock();
            if state.closed {
                return Err(SessionError::Closed);
            }
            if state.pending_replies > 0 && self.config.overlap_policy == OverlapPolicy::Reject {
                warn!(pending = state.pending_replies, "submit rejected while a reply is pending");
                return Err(SessionError::AwaitingResponse);
            }
        }
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;

        let message = Message::classified_user(text, &mut self.classifier);
        self.config.check_length(message.text(), message.kind())?;
        let id = message.id();
        let reply = self.responder.reply(&message);
        debug!(%id, kind = %message.kind(), "user message accepted");

        {
            let mut state = self.shared.lock();
            state.messages.push(message);
            state.pending_replies += 1;
        }
        self.shared.bump();

        self.scheduled.retain(|task| !task.is_finished());
        let shared = Arc::clone(&self.shared);
        let delay = self.config.response_delay();
        self.scheduled.push(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            shared.deliver(reply);
        }));

        Ok(id)
    }

    /// Compose editor sections into the fenced-block format and submit them.
    pub fn submit_sections(
        &mut self,
        language: Language,
        sections: &EditorSections,
    ) -> SessionResult<MessageId> {
        let text = compose(language, sections).ok_or(SessionError::EmptyMessage)?;
        self.submit(&text)
    }

    /// Post the example intro and the example itself, with no deferred reply.
    pub fn select_example(&mut self, code: &str) -> SessionResult<MessageId> {
        if code.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        if self.is_closed() {
            return Err(SessionError::Closed);
        }

        let message = Message::classified_user(code, &mut self.classifier);
        self.config.check_length(message.text(), message.kind())?;
        let id = message.id();
        debug!(%id, kind = %message.kind(), "example selected");

        {
            let mut state = self.shared.lock();
            state.messages.push(Message::system(self.responder.example_intro()));
            state.messages.push(message);
        }
        self.shared.bump();
        Ok(id)
    }

    /// Snapshot of the history, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.shared.lock().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.shared.lock().messages.len()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.shared.lock().pending_replies > 0
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// Receiver that changes whenever a message is appended or the conversation closes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Cancel every scheduled reply. Further submits fail with [`SessionError::Closed`].
    pub fn close(&mut self) {
        let dropped = {
            let mut state = self.shared.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            std::mem::take(&mut state.pending_replies)
        };
        for task in self.scheduled.drain(..) {
            task.abort();
        }
        if dropped > 0 {
            debug!(dropped, "pending replies cancelled");
        }
        self.shared.bump();
    }
}

impl<R: Responder> Drop for Conversation<R> {
    fn drop(&mut self) {
        self.close();
    }
}

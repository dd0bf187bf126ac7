use std::sync::Arc;

use parley_storage::{ChatId, MessageRecord};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::composer::Composer;
use crate::conversation::{ConversationEvent, ConversationStore};
use crate::delivery::DeliverySimulator;
use crate::theme::ThemeHandle;
use crate::view::ConversationView;

/// State behind one open chat screen.
///
/// Closing the session (or dropping it) cancels the chat's pending delivery chains and
/// discards its live conversation.
pub struct ChatSession {
    composer: Composer,
    view: ConversationView,
    simulator: Arc<DeliverySimulator>,
    events: broadcast::Receiver<ConversationEvent>,
    closed: bool,
}

impl ChatSession {
    pub fn open(chat_id: ChatId, simulator: Arc<DeliverySimulator>, theme: ThemeHandle) -> Self {
        let store = simulator.store().clone();
        let events = store.subscribe();
        let view = ConversationView::open(chat_id, store, theme);
        tracing::debug!(chat_id = %view.chat_id(), messages = view.len(), "chat session opened");

        Self {
            composer: Composer::new(),
            view,
            simulator,
            events,
            closed: false,
        }
    }

    pub fn chat_id(&self) -> &ChatId {
        self.view.chat_id()
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        self.simulator.store()
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    pub fn view(&self) -> &ConversationView {
        &self.view
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Single send entry point for input collaborators.
    ///
    /// A closed session leaves the draft untouched.
    pub fn send_message(&mut self, text: impl Into<String>) -> Option<MessageRecord> {
        if self.closed {
            tracing::warn!(chat_id = %self.chat_id(), "ignored send on closed chat session");
            return None;
        }

        self.composer.set_draft(text);
        self.submit_draft()
    }

    /// Submits the current draft. Blank drafts are a no-op and stay in place.
    pub fn submit_draft(&mut self) -> Option<MessageRecord> {
        if self.closed {
            tracing::warn!(chat_id = %self.chat_id(), "ignored send on closed chat session");
            return None;
        }

        let event = self.composer.take_submission()?;
        let record = self.simulator.send(self.view.chat_id(), event);
        self.view.refresh();
        Some(record)
    }

    /// Applies every queued store event for this chat. Returns whether the view changed.
    pub fn sync_pending(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => changed |= self.view.apply(&event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(chat_id = %self.chat_id(), skipped, "conversation events lagged");
                    self.view.refresh();
                    changed = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        changed
    }

    /// Tears the session down. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let chat_id = self.view.chat_id().clone();
        let cancelled = self.simulator.cancel_chat(&chat_id);
        self.simulator.store().release(&chat_id);
        tracing::debug!(chat_id = %chat_id, cancelled, "chat session closed");
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}

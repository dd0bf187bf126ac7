use std::sync::{Arc, Mutex, PoisonError};

use parley_storage::{ChatId, DeliveryStatus, MessageId, MessageRecord, MessageSource};
use snafu::{OptionExt, ResultExt};
use tokio::sync::broadcast;

use crate::delivery::DeliveryTransition;
use crate::error::{CoreResult, MessageNotFoundSnafu, SourceSnafu, TransitionRejectedSnafu};

/// Buffered change notifications per subscriber before it starts lagging.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Change notification for conversation subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    Appended {
        chat_id: ChatId,
        message_id: MessageId,
    },
    StatusChanged {
        chat_id: ChatId,
        message_id: MessageId,
        status: DeliveryStatus,
    },
    Released {
        chat_id: ChatId,
    },
}

impl ConversationEvent {
    pub fn chat_id(&self) -> &ChatId {
        match self {
            Self::Appended { chat_id, .. }
            | Self::StatusChanged { chat_id, .. }
            | Self::Released { chat_id } => chat_id,
        }
    }
}

/// Conversation access for views and the delivery simulator.
///
/// Every mutation is broadcast so views can re-render without polling.
pub struct ConversationStore {
    source: Arc<dyn MessageSource>,
    events: broadcast::Sender<ConversationEvent>,
    // Status edits are check-then-write against the source.
    status_lock: Mutex<()>,
}

impl ConversationStore {
    pub fn new(source: Arc<dyn MessageSource>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            source,
            events,
            status_lock: Mutex::new(()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    /// Returns the ordered conversation, or an empty one for an unknown chat.
    pub fn get_conversation(&self, chat_id: &ChatId) -> Vec<MessageRecord> {
        self.source.list(chat_id)
    }

    pub fn message(&self, chat_id: &ChatId, message_id: &MessageId) -> Option<MessageRecord> {
        self.source
            .list(chat_id)
            .into_iter()
            .find(|message| &message.id == message_id)
    }

    pub fn append(&self, chat_id: &ChatId, record: MessageRecord) -> Vec<MessageRecord> {
        let message_id = record.id.clone();
        let messages = self.source.append(chat_id, record);

        tracing::debug!(
            chat_id = %chat_id,
            message_id = %message_id,
            len = messages.len(),
            "appended message"
        );
        self.publish(ConversationEvent::Appended {
            chat_id: chat_id.clone(),
            message_id,
        });
        messages
    }

    /// Advances one message's delivery status.
    ///
    /// Only the immediate successor of the current status is accepted, which keeps the
    /// observed sequence free of skips, repeats and regressions.
    pub fn set_status(
        &self,
        chat_id: &ChatId,
        message_id: &MessageId,
        status: DeliveryStatus,
    ) -> CoreResult<MessageRecord> {
        let _guard = self
            .status_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let current = self
            .message(chat_id, message_id)
            .context(MessageNotFoundSnafu {
                stage: "set-status-lookup",
                chat_id: chat_id.clone(),
                message_id: message_id.clone(),
            })?;

        let next = DeliveryTransition::to(status)
            .apply(&current)
            .map_err(|rejection| {
                TransitionRejectedSnafu {
                    stage: "set-status-validate",
                    chat_id: chat_id.clone(),
                    message_id: message_id.clone(),
                    rejection,
                }
                .build()
            })?;

        let updated = self
            .source
            .update_status(chat_id, message_id, next)
            .context(SourceSnafu {
                stage: "set-status-write",
            })?;

        tracing::debug!(
            chat_id = %chat_id,
            message_id = %message_id,
            status = next.as_str(),
            "message status advanced"
        );
        self.publish(ConversationEvent::StatusChanged {
            chat_id: chat_id.clone(),
            message_id: message_id.clone(),
            status: next,
        });
        Ok(updated)
    }

    /// Discards live state for a conversation whose screen has closed.
    pub fn release(&self, chat_id: &ChatId) {
        self.source.release(chat_id);
        self.publish(ConversationEvent::Released {
            chat_id: chat_id.clone(),
        });
    }

    fn publish(&self, event: ConversationEvent) {
        // No subscribers is a normal state for headless use.
        let _ = self.events.send(event);
    }
}

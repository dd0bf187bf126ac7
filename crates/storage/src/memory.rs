use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use snafu::OptionExt;

use super::error::{NotFoundSnafu, StorageResult};
use super::fixtures::seeded_chats;
use super::ids::{ChatId, MessageId};
use super::types::{ChatRecord, ChatSummary, DeliveryStatus, LastMessage, MessageRecord};
use super::{ChatDirectory, MessageSource};

/// Process-local message source backed by seeded fixtures.
///
/// Live conversations are copied from their seed on first access and dropped again on
/// `release`, so a reopened chat starts from its fixture content.
pub struct MemoryMessageSource {
    seeds: Vec<ChatRecord>,
    live: Mutex<HashMap<ChatId, Vec<MessageRecord>>>,
}

impl MemoryMessageSource {
    pub fn new() -> Self {
        Self::from_chats(Vec::new())
    }

    pub fn with_fixtures() -> Self {
        Self::from_chats(seeded_chats())
    }

    pub fn from_chats(seeds: Vec<ChatRecord>) -> Self {
        Self {
            seeds,
            live: Mutex::new(HashMap::new()),
        }
    }

    fn seed_messages(&self, chat_id: &ChatId) -> Vec<MessageRecord> {
        self.seeds
            .iter()
            .find(|seed| &seed.id == chat_id)
            .map(|seed| seed.messages.clone())
            .unwrap_or_default()
    }

    fn live(&self) -> MutexGuard<'_, HashMap<ChatId, Vec<MessageRecord>>> {
        // A panic while holding the lock cannot leave a half-written message vector behind.
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn summary_for(&self, seed: &ChatRecord) -> ChatSummary {
        let live = self.live();
        let messages = live.get(&seed.id).unwrap_or(&seed.messages);

        ChatSummary {
            id: seed.id.clone(),
            name: seed.name.clone(),
            avatar_uri: seed.avatar_uri.clone(),
            last_message: messages.last().map(LastMessage::from),
            unread_count: seed.unread_count,
        }
    }
}

impl Default for MemoryMessageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSource for MemoryMessageSource {
    fn list(&self, chat_id: &ChatId) -> Vec<MessageRecord> {
        if let Some(messages) = self.live().get(chat_id) {
            return messages.clone();
        }

        self.seed_messages(chat_id)
    }

    fn append(&self, chat_id: &ChatId, record: MessageRecord) -> Vec<MessageRecord> {
        let seed = self.seed_messages(chat_id);
        let mut live = self.live();
        let messages = live.entry(chat_id.clone()).or_insert(seed);
        messages.push(record);
        messages.clone()
    }

    fn update_status(
        &self,
        chat_id: &ChatId,
        message_id: &MessageId,
        status: DeliveryStatus,
    ) -> StorageResult<MessageRecord> {
        let seed = self.seed_messages(chat_id);
        let mut live = self.live();
        let message = live
            .entry(chat_id.clone())
            .or_insert(seed)
            .iter_mut()
            .find(|message| &message.id == message_id)
            .context(NotFoundSnafu {
                stage: "memory-update-status",
                entity: "message",
                id: message_id.to_string(),
            })?;

        message.status = Some(status);
        Ok(message.clone())
    }

    fn release(&self, chat_id: &ChatId) {
        if self.live().remove(chat_id).is_some() {
            tracing::debug!(chat_id = %chat_id, "released live conversation");
        }
    }
}

impl ChatDirectory for MemoryMessageSource {
    fn list_chats(&self) -> Vec<ChatSummary> {
        self.seeds.iter().map(|seed| self.summary_for(seed)).collect()
    }

    fn chat(&self, chat_id: &ChatId) -> Option<ChatSummary> {
        self.seeds
            .iter()
            .find(|seed| &seed.id == chat_id)
            .map(|seed| self.summary_for(seed))
    }
}

pub mod error;
pub mod fixtures;
pub mod ids;
pub mod memory;
pub mod preferences;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use ids::{ChatId, MessageId};
pub use memory::MemoryMessageSource;
pub use preferences::{JsonPreferenceStore, MemoryPreferenceStore};
pub use types::{
    ChatRecord, ChatSummary, DeliveryStatus, ImageRef, LastMessage, MessageRecord,
};

/// Ordered per-conversation message log.
///
/// Insertion order is the conversation order; sources never re-sort by timestamp.
pub trait MessageSource: Send + Sync {
    /// Returns the conversation for `chat_id`, or an empty sequence for unknown ids.
    fn list(&self, chat_id: &ChatId) -> Vec<MessageRecord>;
    /// Appends to the end of the conversation and returns the updated sequence.
    fn append(&self, chat_id: &ChatId, record: MessageRecord) -> Vec<MessageRecord>;
    fn update_status(
        &self,
        chat_id: &ChatId,
        message_id: &MessageId,
        status: DeliveryStatus,
    ) -> StorageResult<MessageRecord>;
    /// Drops any live state held for a conversation that is no longer displayed.
    fn release(&self, _chat_id: &ChatId) {}
}

pub trait ChatDirectory: Send + Sync {
    fn list_chats(&self) -> Vec<ChatSummary>;
    fn chat(&self, chat_id: &ChatId) -> Option<ChatSummary>;
}

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

use parley_storage::ChatId;

/// Emitted when the chat list selection changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSelected {
    pub chat_id: ChatId,
}

/// Emitted by the input whenever its text changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftChanged {
    pub text: String,
}

/// Emitted when the user presses enter or the send button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submit;

/// Emitted when the record-voice affordance is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordVoice;

/// Emitted when the open conversation changes so the chat list can refresh previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationUpdated {
    pub chat_id: ChatId,
}

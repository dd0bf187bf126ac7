use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ChatId, MessageId};

/// Delivery lifecycle for locally authored messages.
///
/// Variants are declared in lifecycle order so `Ord` follows the progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sending,
    Sent,
    Delivered,
    Seen,
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 4] = [
        DeliveryStatus::Sending,
        DeliveryStatus::Sent,
        DeliveryStatus::Delivered,
        DeliveryStatus::Seen,
    ];

    /// Returns the following stage, or `None` once the message has been seen.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Sending => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered => Some(Self::Seen),
            Self::Seen => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Seen => "seen",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub uri: String,
}

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    pub timestamp: DateTime<Utc>,
    pub is_sent: bool,
    // Received messages never carry a status.
    #[serde(default)]
    pub status: Option<DeliveryStatus>,
}

impl MessageRecord {
    /// Creates a locally authored message at the start of its delivery lifecycle.
    pub fn outgoing(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new_v7(),
            text: Some(text.into()),
            image: None,
            timestamp: Utc::now(),
            is_sent: true,
            status: Some(DeliveryStatus::Sending),
        }
    }

    /// Creates a fixture message. Seeded outgoing messages start out as seen.
    pub fn seeded(
        id: impl Into<MessageId>,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
        is_sent: bool,
    ) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            image: None,
            timestamp,
            is_sent,
            status: is_sent.then_some(DeliveryStatus::Seen),
        }
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    /// Reports whether the message carries any displayable content.
    pub fn is_well_formed(&self) -> bool {
        self.text.as_deref().is_some_and(|text| !text.is_empty()) || self.image.is_some()
    }
}

/// Fixture shape for one seeded conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    pub id: ChatId,
    pub name: String,
    pub avatar_uri: String,
    pub unread_count: u32,
    pub messages: Vec<MessageRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastMessage {
    pub text: Option<String>,
    pub has_image: bool,
    pub timestamp: DateTime<Utc>,
}

impl From<&MessageRecord> for LastMessage {
    fn from(record: &MessageRecord) -> Self {
        Self {
            text: record.text.clone(),
            has_image: record.image.is_some(),
            timestamp: record.timestamp,
        }
    }
}

/// Chat list row data derived from a conversation's current tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub id: ChatId,
    pub name: String,
    pub avatar_uri: String,
    pub last_message: Option<LastMessage>,
    pub unread_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_progression_is_linear_and_ordered() {
        let mut walked = vec![DeliveryStatus::Sending];
        while let Some(next) = walked.last().and_then(|status| status.next()) {
            walked.push(next);
        }

        assert_eq!(walked, DeliveryStatus::ALL);
        assert!(walked.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(DeliveryStatus::Seen.is_terminal());
    }

    #[test]
    fn status_uses_lowercase_wire_names() {
        let json = serde_json::to_string(&DeliveryStatus::Delivered).unwrap();
        assert_eq!(json, "\"delivered\"");
        assert_eq!(DeliveryStatus::Seen.as_str(), "seen");
    }

    #[test]
    fn outgoing_messages_start_sending() {
        let record = MessageRecord::outgoing("hello");
        assert!(record.is_sent);
        assert_eq!(record.status, Some(DeliveryStatus::Sending));
        assert!(record.is_well_formed());
    }

    #[test]
    fn received_fixture_messages_have_no_status() {
        let record = MessageRecord::seeded("9_1", "hi", Utc::now(), false);
        assert_eq!(record.status, None);
    }
}

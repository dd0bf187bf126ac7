use std::fmt;
use std::sync::Arc;

use chrono::{Local, TimeZone};
use parley_storage::{ChatDirectory, ChatId, ChatSummary, LastMessage};

use crate::view::time_label;

const PHOTO_PREVIEW: &str = "Photo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatListRow {
    pub chat_id: ChatId,
    pub name: String,
    pub avatar_uri: String,
    pub preview: String,
    pub time_label: Option<String>,
    pub unread_count: u32,
}

impl ChatListRow {
    pub fn build<Tz>(summary: ChatSummary, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let preview = summary
            .last_message
            .as_ref()
            .map(preview_text)
            .unwrap_or_default();
        let time_label = summary
            .last_message
            .as_ref()
            .map(|last| time_label(&last.timestamp, tz));

        Self {
            chat_id: summary.id,
            name: summary.name,
            avatar_uri: summary.avatar_uri,
            preview,
            time_label,
            unread_count: summary.unread_count,
        }
    }

    pub fn show_badge(&self) -> bool {
        self.unread_count > 0
    }
}

fn preview_text(last: &LastMessage) -> String {
    match last.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ if last.has_image => PHOTO_PREVIEW.to_string(),
        _ => String::new(),
    }
}

/// Conversation index shown beside the open chat.
#[derive(Clone)]
pub struct ChatList {
    directory: Arc<dyn ChatDirectory>,
}

impl ChatList {
    pub fn new(directory: Arc<dyn ChatDirectory>) -> Self {
        Self { directory }
    }

    pub fn rows(&self) -> Vec<ChatListRow> {
        self.rows_in(&Local)
    }

    pub fn rows_in<Tz>(&self, tz: &Tz) -> Vec<ChatListRow>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.directory
            .list_chats()
            .into_iter()
            .map(|summary| ChatListRow::build(summary, tz))
            .collect()
    }

    /// Rows whose name contains `query`, ignoring case. A blank query keeps everything.
    pub fn filter(&self, query: &str) -> Vec<ChatListRow> {
        let needle = query.trim().to_lowercase();
        let rows = self.rows();
        if needle.is_empty() {
            return rows;
        }

        rows.into_iter()
            .filter(|row| row.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn row(&self, chat_id: &ChatId) -> Option<ChatListRow> {
        self.directory
            .chat(chat_id)
            .map(|summary| ChatListRow::build(summary, &Local))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use parley_storage::{MemoryMessageSource, MessageRecord, MessageSource};

    use super::*;

    fn source() -> Arc<MemoryMessageSource> {
        Arc::new(MemoryMessageSource::with_fixtures())
    }

    #[test]
    fn rows_follow_fixture_order() {
        let list = ChatList::new(source());
        let rows = list.rows_in(&Utc);

        let ids = rows.iter().map(|row| row.chat_id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["1", "2", "3", "4", "5"]);
        assert!(rows.iter().all(|row| row.time_label.is_some()));
        assert!(rows.iter().all(|row| !row.preview.is_empty()));
    }

    #[test]
    fn preview_tracks_latest_live_message() {
        let source = source();
        let list = ChatList::new(source.clone());
        let chat_id = ChatId::new("3");

        let mut record = MessageRecord::outgoing("just now");
        record.timestamp = "2024-05-01T08:05:00Z".parse::<DateTime<Utc>>().unwrap();
        source.append(&chat_id, record);

        let row = list
            .rows_in(&Utc)
            .into_iter()
            .find(|row| row.chat_id == chat_id)
            .unwrap();
        assert_eq!(row.preview, "just now");
        assert_eq!(row.time_label.as_deref(), Some("08:05"));
    }

    #[test]
    fn image_only_message_previews_as_photo() {
        let last = LastMessage {
            text: None,
            has_image: true,
            timestamp: Utc::now(),
        };
        assert_eq!(preview_text(&last), "Photo");
    }

    #[test]
    fn filter_matches_names_case_insensitively() {
        let list = ChatList::new(source());
        let everyone = list.filter("  ");
        assert_eq!(everyone.len(), 5);

        let first_name = everyone[0].name.clone();
        let query = first_name.to_uppercase();
        let matched = list.filter(&query);
        assert!(matched.iter().any(|row| row.name == first_name));
        assert!(list.filter("zzzz-no-such-contact").is_empty());
    }

    #[test]
    fn badge_only_for_unread() {
        let row = ChatListRow {
            chat_id: ChatId::new("9"),
            name: "Nine".into(),
            avatar_uri: String::new(),
            preview: String::new(),
            time_label: None,
            unread_count: 0,
        };
        assert!(!row.show_badge());
        assert!(ChatListRow { unread_count: 2, ..row }.show_badge());
    }
}

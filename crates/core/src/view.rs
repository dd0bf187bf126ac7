//! Presentation model for one open conversation.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use parley_storage::{ChatId, DeliveryStatus, MessageId, MessageRecord};

use crate::conversation::{ConversationEvent, ConversationStore};
use crate::theme::{Color, ColorRole, Palette, ThemeHandle};

const TIME_LABEL_FORMAT: &str = "%H:%M";

/// Formats a message timestamp as `HH:mm` in `tz`.
pub fn time_label<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    timestamp
        .with_timezone(tz)
        .format(TIME_LABEL_FORMAT)
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleAlignment {
    /// Received messages.
    Start,
    /// Locally authored messages.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusGlyph {
    pub symbol: &'static str,
    pub color: Color,
}

impl StatusGlyph {
    pub fn for_status(status: DeliveryStatus, palette: &Palette) -> Self {
        let (symbol, role) = match status {
            DeliveryStatus::Sending => ("○", ColorRole::TextSecondary),
            DeliveryStatus::Sent => ("✓", ColorRole::TextSecondary),
            DeliveryStatus::Delivered => ("✓✓", ColorRole::TextSecondary),
            DeliveryStatus::Seen => ("✓✓", ColorRole::Primary),
        };
        Self {
            symbol,
            color: palette.color(role),
        }
    }
}

/// Everything a renderer needs to draw one message bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleRow {
    pub message_id: MessageId,
    pub alignment: BubbleAlignment,
    pub background: Color,
    pub text_color: Color,
    pub time_color: Color,
    pub text: Option<String>,
    pub image_uri: Option<String>,
    pub time_label: String,
    pub status: Option<StatusGlyph>,
}

impl BubbleRow {
    pub fn build<Tz>(message: &MessageRecord, palette: &Palette, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let (alignment, background) = if message.is_sent {
            (BubbleAlignment::End, palette.color(ColorRole::MessageBubble))
        } else {
            (BubbleAlignment::Start, palette.color(ColorRole::Surface))
        };

        // Remote messages never show a status, whatever the record holds.
        let status = message
            .is_sent
            .then_some(message.status)
            .flatten()
            .map(|status| StatusGlyph::for_status(status, palette));

        Self {
            message_id: message.id.clone(),
            alignment,
            background,
            text_color: palette.color(ColorRole::MessageText),
            time_color: palette.color(ColorRole::TextSecondary),
            text: message.text.clone(),
            image_uri: message.image.as_ref().map(|image| image.uri.clone()),
            time_label: time_label(&message.timestamp, tz),
            status,
        }
    }
}

/// Snapshot of one conversation rendered with the active palette.
///
/// Owners feed it `ConversationEvent`s; events for other chats are ignored.
pub struct ConversationView {
    chat_id: ChatId,
    store: Arc<ConversationStore>,
    theme: ThemeHandle,
    messages: Vec<MessageRecord>,
}

impl ConversationView {
    pub fn open(chat_id: ChatId, store: Arc<ConversationStore>, theme: ThemeHandle) -> Self {
        let messages = store.get_conversation(&chat_id);
        Self {
            chat_id,
            store,
            theme,
            messages,
        }
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    pub fn messages(&self) -> &[MessageRecord] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn theme(&self) -> &ThemeHandle {
        &self.theme
    }

    pub fn refresh(&mut self) {
        self.messages = self.store.get_conversation(&self.chat_id);
    }

    /// Refreshes when `event` concerns this conversation. Returns whether it did.
    pub fn apply(&mut self, event: &ConversationEvent) -> bool {
        if event.chat_id() != &self.chat_id {
            return false;
        }

        self.refresh();
        true
    }

    pub fn rows(&self) -> Vec<BubbleRow> {
        self.rows_in(&Local)
    }

    pub fn rows_in<Tz>(&self, tz: &Tz) -> Vec<BubbleRow>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let palette = self.theme.colors();
        self.messages
            .iter()
            .map(|message| BubbleRow::build(message, palette, tz))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use parley_storage::{ImageRef, MemoryMessageSource, MemoryPreferenceStore};

    use super::*;
    use crate::theme::{Appearance, ThemePreference, ThemeService};

    fn fixture_view(chat: &str) -> (Arc<ConversationStore>, ThemeHandle, ConversationView) {
        let store = Arc::new(ConversationStore::new(Arc::new(
            MemoryMessageSource::with_fixtures(),
        )));
        let theme = Arc::new(ThemeService::load(
            Arc::new(MemoryPreferenceStore::new()),
            Appearance::Light,
        ));
        let view = ConversationView::open(ChatId::new(chat), store.clone(), theme.clone());
        (store, theme, view)
    }

    #[test]
    fn time_labels_use_the_given_zone() {
        let timestamp = "2024-03-09T23:45:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(time_label(&timestamp, &Utc), "23:45");

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(time_label(&timestamp, &plus_two), "01:45");
    }

    #[test]
    fn outgoing_and_incoming_rows_use_palette_roles() {
        let (_, _, view) = fixture_view("2");
        let rows = view.rows_in(&Utc);
        assert_eq!(rows.len(), 6);

        let incoming = rows
            .iter()
            .find(|row| row.alignment == BubbleAlignment::Start)
            .unwrap();
        assert_eq!(incoming.background, Palette::LIGHT.surface);
        assert_eq!(incoming.status, None);

        let outgoing = rows
            .iter()
            .find(|row| row.alignment == BubbleAlignment::End)
            .unwrap();
        assert_eq!(outgoing.background, Palette::LIGHT.message_bubble);
        assert_eq!(outgoing.text_color, Palette::LIGHT.message_text);
    }

    #[test]
    fn status_glyphs_follow_delivery_stage() {
        let palette = &Palette::LIGHT;
        let glyphs = DeliveryStatus::ALL
            .map(|status| StatusGlyph::for_status(status, palette))
            .map(|glyph| glyph.symbol);
        assert_eq!(glyphs, ["○", "✓", "✓✓", "✓✓"]);

        assert_eq!(
            StatusGlyph::for_status(DeliveryStatus::Delivered, palette).color,
            palette.text_secondary
        );
        assert_eq!(
            StatusGlyph::for_status(DeliveryStatus::Seen, palette).color,
            palette.primary
        );
    }

    #[test]
    fn image_messages_expose_their_uri() {
        let message = MessageRecord::seeded("img", "", Utc::now(), false)
            .with_image(ImageRef::new("https://example.test/cat.png"));
        let row = BubbleRow::build(&message, &Palette::DARK, &Utc);
        assert_eq!(row.image_uri.as_deref(), Some("https://example.test/cat.png"));
    }

    #[test]
    fn theme_switch_recolors_rows() {
        let (_, theme, view) = fixture_view("1");
        theme.set_preference(ThemePreference::Dark);

        let row = view.rows_in(&Utc).into_iter().next().unwrap();
        let expected = match row.alignment {
            BubbleAlignment::End => Palette::DARK.message_bubble,
            BubbleAlignment::Start => Palette::DARK.surface,
        };
        assert_eq!(row.background, expected);
    }

    #[test]
    fn apply_ignores_other_chats_and_refreshes_own() {
        let (store, _, mut view) = fixture_view("2");

        store.append(&ChatId::new("3"), MessageRecord::outgoing("elsewhere"));
        let other = ConversationEvent::Appended {
            chat_id: ChatId::new("3"),
            message_id: MessageId::new("x"),
        };
        assert!(!view.apply(&other));
        assert_eq!(view.len(), 6);

        let appended = store.append(&ChatId::new("2"), MessageRecord::outgoing("hello"));
        let own = ConversationEvent::Appended {
            chat_id: ChatId::new("2"),
            message_id: appended[6].id.clone(),
        };
        assert!(view.apply(&own));
        assert_eq!(view.len(), 7);
        assert_eq!(view.messages()[6].text.as_deref(), Some("hello"));
    }

    #[test]
    fn unknown_chat_renders_nothing() {
        let (_, _, view) = fixture_view("nope");
        assert!(view.is_empty());
        assert!(view.rows().is_empty());
    }
}

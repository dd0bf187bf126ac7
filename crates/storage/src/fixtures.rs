use chrono::{DateTime, Utc};

use super::ids::ChatId;
use super::types::{ChatRecord, MessageRecord};

struct SeedChat {
    id: &'static str,
    name: &'static str,
    avatar_uri: &'static str,
    unread_count: u32,
    // (timestamp, is_sent, text)
    messages: &'static [(&'static str, bool, &'static str)],
}

const SEED_CHATS: &[SeedChat] = &[
    SeedChat {
        id: "1",
        name: "John Smith",
        avatar_uri: "https://randomuser.me/api/portraits/men/1.jpg",
        unread_count: 2,
        messages: &[
            (
                "2024-01-29T14:30:00Z",
                false,
                "Hey, did you get a chance to review the proposal?",
            ),
            (
                "2024-01-29T14:35:00Z",
                true,
                "Yes, I just finished going through it. Great work!",
            ),
            ("2024-01-29T14:40:00Z", false, "Thanks! Any specific feedback?"),
            (
                "2024-01-30T09:15:00Z",
                true,
                "The financial projections look solid. Let's discuss in tomorrow's meeting.",
            ),
            ("2024-01-30T09:20:00Z", false, "Perfect! What time is the meeting?"),
            ("2024-01-30T09:25:00Z", true, "2 PM in the main conference room"),
            ("2024-01-30T09:30:00Z", false, "See you at the meeting!"),
        ],
    },
    SeedChat {
        id: "2",
        name: "Sarah Johnson",
        avatar_uri: "https://randomuser.me/api/portraits/women/2.jpg",
        unread_count: 0,
        messages: &[
            (
                "2024-01-29T15:00:00Z",
                true,
                "Hey Sarah! Just finished editing the wedding photos",
            ),
            ("2024-01-29T15:05:00Z", false, "Can't wait to see them! 😊"),
            ("2024-01-29T15:10:00Z", true, "Here's a preview of my favorite shots"),
            ("2024-01-30T09:45:00Z", false, "The photos look amazing! 📸"),
            (
                "2024-01-30T09:50:00Z",
                true,
                "Thanks! When would you like me to send the full album?",
            ),
            ("2024-01-30T09:55:00Z", false, "Could you share them this weekend?"),
        ],
    },
    SeedChat {
        id: "3",
        name: "Tech Team",
        avatar_uri: "https://randomuser.me/api/portraits/men/3.jpg",
        unread_count: 5,
        messages: &[
            ("2024-01-29T20:00:00Z", false, "Starting the deployment now"),
            ("2024-01-29T20:15:00Z", true, "All tests passed on staging"),
            (
                "2024-01-29T20:30:00Z",
                false,
                "Great! Proceeding with production deployment",
            ),
            ("2024-01-30T08:00:00Z", true, "Monitoring metrics..."),
            ("2024-01-30T08:15:00Z", false, "New release deployed successfully! 🚀"),
            ("2024-01-30T08:20:00Z", true, "All systems green ✅"),
        ],
    },
    SeedChat {
        id: "4",
        name: "Family Group",
        avatar_uri: "https://randomuser.me/api/portraits/women/4.jpg",
        unread_count: 3,
        messages: &[
            (
                "2024-01-29T16:00:00Z",
                false,
                "Who's coming to the family BBQ this weekend?",
            ),
            ("2024-01-29T16:30:00Z", true, "Count me in! Should I bring anything?"),
            ("2024-01-29T17:00:00Z", false, "Maybe some dessert? 🍰"),
            ("2024-01-30T11:00:00Z", true, "I'll make my famous chocolate cake!"),
            ("2024-01-30T11:10:00Z", false, "Perfect! Everyone loves your cake 😋"),
            (
                "2024-01-30T11:20:00Z",
                false,
                "Can't wait to see everyone this weekend! 🎉",
            ),
        ],
    },
    SeedChat {
        id: "5",
        name: "Gym Buddy",
        avatar_uri: "https://randomuser.me/api/portraits/men/5.jpg",
        unread_count: 0,
        messages: &[
            ("2024-01-29T06:30:00Z", false, "Morning! Ready for leg day? 🏋️‍♂️"),
            ("2024-01-29T06:35:00Z", true, "Always ready! See you at 7"),
            (
                "2024-01-29T08:00:00Z",
                false,
                "That was intense! My legs are already sore 😅",
            ),
            ("2024-01-30T07:30:00Z", true, "Same time tomorrow?"),
            ("2024-01-30T07:35:00Z", false, "You bet! Upper body focus tomorrow"),
            ("2024-01-30T07:45:00Z", false, "Great workout today! 💪"),
        ],
    },
];

/// Builds the seeded conversations the prototype ships with.
pub fn seeded_chats() -> Vec<ChatRecord> {
    SEED_CHATS
        .iter()
        .map(|seed| ChatRecord {
            id: ChatId::new(seed.id),
            name: seed.name.to_string(),
            avatar_uri: seed.avatar_uri.to_string(),
            unread_count: seed.unread_count,
            messages: seed
                .messages
                .iter()
                .enumerate()
                .map(|(index, (timestamp, is_sent, text))| {
                    MessageRecord::seeded(
                        format!("{}_{}", seed.id, index + 1),
                        *text,
                        parse_fixture_timestamp(timestamp),
                        *is_sent,
                    )
                })
                .collect(),
        })
        .collect()
}

fn parse_fixture_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>().unwrap_or_else(|error| {
        tracing::warn!(raw, %error, "invalid fixture timestamp, using epoch");
        DateTime::<Utc>::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_keep_ids_unique_and_chronological() {
        let chats = seeded_chats();
        assert_eq!(chats.len(), 5);

        for chat in &chats {
            let ids = chat
                .messages
                .iter()
                .map(|message| message.id.clone())
                .collect::<std::collections::HashSet<_>>();
            assert_eq!(ids.len(), chat.messages.len());
            assert!(
                chat.messages
                    .windows(2)
                    .all(|pair| pair[0].timestamp <= pair[1].timestamp)
            );
            assert!(chat.messages.iter().all(MessageRecord::is_well_formed));
        }
    }

    #[test]
    fn second_chat_has_six_messages() {
        let chats = seeded_chats();
        let sarah = chats.iter().find(|chat| chat.id.as_str() == "2").unwrap();
        assert_eq!(sarah.messages.len(), 6);
        assert_eq!(sarah.messages[0].id.as_str(), "2_1");
    }
}

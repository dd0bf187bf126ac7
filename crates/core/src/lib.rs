//! Headless chat core: conversations, composing, simulated delivery and theming.

pub mod chat_list;
pub mod composer;
pub mod config;
pub mod conversation;
pub mod delivery;
pub mod error;
pub mod scroll;
pub mod session;
pub mod theme;
pub mod view;

pub use chat_list::{ChatList, ChatListRow};
pub use composer::{Affordance, ComposeEvent, Composer};
pub use config::{AppConfig, DeliveryConfig};
pub use conversation::{ConversationEvent, ConversationStore};
pub use delivery::{DeliverySimulator, DeliveryTimings, DeliveryTransition, TransitionRejection};
pub use error::{CoreError, CoreResult};
pub use scroll::ScrollManager;
pub use session::ChatSession;
pub use theme::{
    Appearance, Color, ColorRole, Palette, ThemeContext, ThemeHandle, ThemePreference,
    ThemeService,
};
pub use view::{BubbleAlignment, BubbleRow, ConversationView, StatusGlyph};

/// Event contracts between chat components.
pub mod events;
pub mod message_input;
pub mod message_list;
pub mod sidebar;
pub mod view;

pub use events::{ChatSelected, ConversationUpdated, DraftChanged, RecordVoice, Submit};
pub use message_input::MessageInput;
pub use message_list::MessageList;
pub use sidebar::ChatSidebar;
pub use view::ChatView;

use std::sync::Arc;

use gpui::*;
use gpui_component::{h_flex, label::Label, v_flex};
use parley_core::{ChatSession, DeliverySimulator, ThemeHandle};
use parley_storage::ChatId;
use tokio::sync::broadcast::error::RecvError;

use crate::chat::events::{ConversationUpdated, DraftChanged, RecordVoice, Submit};
use crate::chat::{MessageInput, MessageList};
use crate::theme::color;

/// Open conversation: message list on top, input below.
pub struct ChatView {
    simulator: Arc<DeliverySimulator>,
    theme: ThemeHandle,
    session: Option<ChatSession>,
    title: Option<String>,
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
    event_task: Option<Task<()>>,
}

impl EventEmitter<ConversationUpdated> for ChatView {}

impl ChatView {
    pub fn new(
        simulator: Arc<DeliverySimulator>,
        theme: ThemeHandle,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let palette = theme.colors();
        let message_list = cx.new(|cx| MessageList::new(palette, cx));
        let message_input = cx.new(|cx| MessageInput::new(palette, window, cx));

        cx.subscribe(&message_input, |this, _, event: &DraftChanged, cx| {
            this.update_draft(event.text.clone(), cx);
        })
        .detach();
        cx.subscribe_in(&message_input, window, |this, _, _event: &Submit, window, cx| {
            this.submit(window, cx);
        })
        .detach();
        cx.subscribe(&message_input, |_, _, _event: &RecordVoice, _cx| {
            tracing::info!("voice messages are not supported yet");
        })
        .detach();

        Self {
            simulator,
            theme,
            session: None,
            title: None,
            message_list,
            message_input,
            event_task: None,
        }
    }

    pub fn chat_id(&self) -> Option<&ChatId> {
        self.session.as_ref().map(ChatSession::chat_id)
    }

    /// Opens `chat_id`, closing the previous conversation first.
    pub fn open_chat(&mut self, chat_id: ChatId, title: String, cx: &mut Context<Self>) {
        if self.chat_id() == Some(&chat_id) {
            return;
        }

        self.close_chat();
        let mut session = ChatSession::open(chat_id, self.simulator.clone(), self.theme.clone());
        // The input keeps its text across chat switches; the new composer picks it up.
        session
            .composer_mut()
            .set_draft(self.message_input.read(cx).draft(cx));
        let affordance = session.composer().affordance();
        self.message_input
            .update(cx, |input, cx| input.set_affordance(affordance, cx));
        let mut events = session.store().subscribe();
        self.session = Some(session);
        self.title = Some(title);

        self.event_task = Some(cx.spawn(async move |this, cx| {
            loop {
                match events.recv().await {
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        let updated = this.update(cx, |this, cx| this.sync_session(cx));
                        if updated.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }));

        self.push_rows(cx);
    }

    pub fn close_chat(&mut self) {
        self.event_task = None;
        if let Some(mut session) = self.session.take() {
            session.close();
        }
        self.title = None;
    }

    /// Re-renders rows and the input with the current palette.
    pub fn refresh_theme(&mut self, cx: &mut Context<Self>) {
        let palette = self.theme.colors();
        self.message_input
            .update(cx, |input, cx| input.set_palette(palette, cx));
        self.push_rows(cx);
    }

    fn update_draft(&mut self, text: String, cx: &mut Context<Self>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.composer_mut().set_draft(text);
        let affordance = session.composer().affordance();
        self.message_input
            .update(cx, |input, cx| input.set_affordance(affordance, cx));
    }

    fn submit(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let Some(record) = session.submit_draft() else {
            return;
        };
        tracing::debug!(chat_id = %session.chat_id(), message_id = %record.id, "message sent");
        let chat_id = session.chat_id().clone();
        let affordance = session.composer().affordance();

        self.message_input.update(cx, |input, cx| {
            input.clear(window, cx);
            input.set_affordance(affordance, cx);
        });
        self.push_rows(cx);
        cx.emit(ConversationUpdated { chat_id });
    }

    fn sync_session(&mut self, cx: &mut Context<Self>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.sync_pending() {
            let chat_id = session.chat_id().clone();
            self.push_rows(cx);
            cx.emit(ConversationUpdated { chat_id });
        }
    }

    fn push_rows(&mut self, cx: &mut Context<Self>) {
        let rows = self
            .session
            .as_ref()
            .map(|session| session.view().rows())
            .unwrap_or_default();
        let palette = self.theme.colors();
        self.message_list
            .update(cx, |list, cx| list.set_rows(rows, palette, cx));
        cx.notify();
    }
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let palette = self.theme.colors();
        let border = color(palette.border);

        let Some(title) = self.title.clone() else {
            return v_flex()
                .id("chat-view-empty")
                .size_full()
                .items_center()
                .justify_center()
                .bg(color(palette.background))
                .child(
                    Label::new("Select a chat to start messaging")
                        .text_sm()
                        .text_color(color(palette.text_secondary)),
                );
        };

        v_flex()
            .id("chat-view")
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .bg(color(palette.background))
            .child(
                h_flex()
                    .w_full()
                    .flex_shrink_0()
                    .px_4()
                    .py_2()
                    .bg(color(palette.surface))
                    .border_b_1()
                    .border_color(border)
                    .child(Label::new(title).text_color(color(palette.text))),
            )
            .child(
                div()
                    .id("chat-view-message-list")
                    .flex_1()
                    .min_h_0()
                    .child(self.message_list.clone()),
            )
            .child(
                div()
                    .id("chat-view-message-input")
                    .flex_shrink_0()
                    .w_full()
                    .bg(color(palette.surface))
                    .border_t_1()
                    .border_color(border)
                    .child(self.message_input.clone()),
            )
    }
}

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    Sizable, h_flex,
    input::{Input, InputEvent, InputState},
    label::Label,
    list::ListItem,
    v_flex,
};
use parley_core::{ChatList, ChatListRow, Palette};
use parley_storage::ChatId;

use crate::chat::events::ChatSelected;
use crate::theme::color;

const CHAT_ROW_HEIGHT: Pixels = px(56.);
const AVATAR_SIZE: Pixels = px(36.);
const BADGE_SIZE: Pixels = px(18.);

pub struct ChatSidebar {
    search_input: Entity<InputState>,
    search_query: String,
    chat_list: ChatList,
    rows: Vec<ChatListRow>,
    selected: Option<ChatId>,
    palette: &'static Palette,
}

impl EventEmitter<ChatSelected> for ChatSidebar {}

impl ChatSidebar {
    pub fn new(
        chat_list: ChatList,
        palette: &'static Palette,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let search_input = cx.new(|cx| InputState::new(window, cx).placeholder("Search chats"));

        cx.subscribe_in(
            &search_input,
            window,
            |this, state, _event: &InputEvent, _window, cx| {
                let query = state.read(cx).value().to_string();
                if query != this.search_query {
                    this.search_query = query;
                    this.refresh(cx);
                }
            },
        )
        .detach();

        let rows = chat_list.rows();
        Self {
            search_input,
            search_query: String::new(),
            chat_list,
            rows,
            selected: None,
            palette,
        }
    }

    pub fn selected(&self) -> Option<&ChatId> {
        self.selected.as_ref()
    }

    pub fn first_chat(&self) -> Option<ChatId> {
        self.chat_list.rows().into_iter().next().map(|row| row.chat_id)
    }

    /// Re-reads previews so the latest message of each chat is shown.
    pub fn refresh(&mut self, cx: &mut Context<Self>) {
        self.rows = self.chat_list.filter(&self.search_query);
        cx.notify();
    }

    pub fn set_palette(&mut self, palette: &'static Palette, cx: &mut Context<Self>) {
        self.palette = palette;
        cx.notify();
    }

    pub fn select_chat(&mut self, chat_id: ChatId, cx: &mut Context<Self>) {
        if self.selected.as_ref() == Some(&chat_id) {
            return;
        }

        tracing::debug!(chat_id = %chat_id, "chat selected");
        self.selected = Some(chat_id.clone());
        cx.emit(ChatSelected { chat_id });
        cx.notify();
    }

    fn render_row(&self, index: usize, row: &ChatListRow, cx: &mut Context<Self>) -> AnyElement {
        let palette = self.palette;
        let chat_id = row.chat_id.clone();
        let is_selected = self.selected.as_ref() == Some(&row.chat_id);
        let initial = row
            .name
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default();

        let avatar = div()
            .size(AVATAR_SIZE)
            .flex_shrink_0()
            .rounded_full()
            .bg(color(palette.primary))
            .flex()
            .items_center()
            .justify_center()
            .child(Label::new(initial).text_sm().text_color(color(palette.surface)));

        let header = h_flex()
            .w_full()
            .justify_between()
            .gap_2()
            .child(
                div().flex_1().min_w_0().truncate().child(
                    Label::new(row.name.clone())
                        .text_sm()
                        .text_color(color(palette.text)),
                ),
            )
            .when_some(row.time_label.clone(), |line, time| {
                line.child(
                    Label::new(time)
                        .text_xs()
                        .text_color(color(palette.text_secondary)),
                )
            });

        let preview = h_flex()
            .w_full()
            .justify_between()
            .gap_2()
            .child(
                div().flex_1().min_w_0().truncate().child(
                    Label::new(row.preview.clone())
                        .text_xs()
                        .text_color(color(palette.text_secondary)),
                ),
            )
            .when(row.show_badge(), |line| {
                line.child(
                    div()
                        .min_w(BADGE_SIZE)
                        .h(BADGE_SIZE)
                        .px_1()
                        .rounded_full()
                        .bg(color(palette.success))
                        .flex()
                        .items_center()
                        .justify_center()
                        .child(
                            Label::new(row.unread_count.to_string())
                                .text_xs()
                                .text_color(color(palette.surface)),
                        ),
                )
            });

        div()
            .w_full()
            .h(CHAT_ROW_HEIGHT)
            .px_2()
            .child(
                ListItem::new(("chat", index))
                    .w_full()
                    .h_full()
                    .px_2()
                    .rounded_md()
                    .selected(is_selected)
                    .on_click(cx.listener(move |this, _event: &ClickEvent, _window, cx| {
                        this.select_chat(chat_id.clone(), cx);
                    }))
                    .child(
                        h_flex()
                            .w_full()
                            .gap_3()
                            .items_center()
                            .child(avatar)
                            .child(v_flex().flex_1().min_w_0().gap_1().child(header).child(preview)),
                    ),
            )
            .into_any_element()
    }
}

impl Render for ChatSidebar {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let border = color(self.palette.border);
        let rows = self.rows.clone();
        let items = rows
            .iter()
            .enumerate()
            .map(|(index, row)| self.render_row(index, row, cx))
            .collect::<Vec<_>>();

        v_flex()
            .size_full()
            .bg(color(self.palette.surface))
            .child(
                div()
                    .w_full()
                    .px_3()
                    .pt_2()
                    .pb_2()
                    .border_b_1()
                    .border_color(border)
                    .child(Input::new(&self.search_input).w_full().small()),
            )
            .when(items.is_empty(), |column| {
                column.child(
                    v_flex().flex_1().items_center().justify_center().child(
                        Label::new("No chats match your search")
                            .text_sm()
                            .text_color(color(self.palette.text_secondary)),
                    ),
                )
            })
            .child(
                v_flex()
                    .id("chat-list")
                    .flex_1()
                    .min_h_0()
                    .py_1()
                    .overflow_y_scroll()
                    .children(items),
            )
    }
}

use gpui::*;
use gpui_component::{
    IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
};
use parley_core::{Affordance, Palette};

use crate::chat::events::{DraftChanged, RecordVoice, Submit};
use crate::theme::color;

/// Text field plus the trailing send or record-voice button.
///
/// The draft itself lives in the owning session's composer; this view only
/// forwards edits and shows the affordance it is told to.
pub struct MessageInput {
    input_state: Entity<InputState>,
    affordance: Affordance,
    palette: &'static Palette,
}

impl EventEmitter<DraftChanged> for MessageInput {}
impl EventEmitter<Submit> for MessageInput {}
impl EventEmitter<RecordVoice> for MessageInput {}

impl MessageInput {
    pub fn new(palette: &'static Palette, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let input_state = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("Type a message")
                .clean_on_escape()
        });

        cx.subscribe(&input_state, |_, state, event: &InputEvent, cx| match event {
            InputEvent::Change { .. } => {
                let text = state.read(cx).value().to_string();
                cx.emit(DraftChanged { text });
            }
            InputEvent::PressEnter { secondary: false } => cx.emit(Submit),
            _ => {}
        })
        .detach();

        Self {
            input_state,
            affordance: Affordance::RecordVoice,
            palette,
        }
    }

    pub fn draft(&self, cx: &App) -> String {
        self.input_state.read(cx).value().to_string()
    }

    pub fn affordance(&self) -> Affordance {
        self.affordance
    }

    pub fn set_affordance(&mut self, affordance: Affordance, cx: &mut Context<Self>) {
        if self.affordance != affordance {
            self.affordance = affordance;
            cx.notify();
        }
    }

    pub fn set_palette(&mut self, palette: &'static Palette, cx: &mut Context<Self>) {
        self.palette = palette;
        cx.notify();
    }

    pub fn clear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
        cx.notify();
    }
}

impl Render for MessageInput {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let action = match self.affordance {
            Affordance::Send => Button::new("send")
                .small()
                .primary()
                .icon(IconName::ArrowUp)
                .child("Send")
                .on_click(cx.listener(|_, _, _window, cx| cx.emit(Submit)))
                .into_any_element(),
            Affordance::RecordVoice => Button::new("record-voice")
                .small()
                .ghost()
                .child("Voice")
                .on_click(cx.listener(|_, _, _window, cx| cx.emit(RecordVoice)))
                .into_any_element(),
        };

        h_flex()
            .w_full()
            .gap_2()
            .p_3()
            .items_center()
            .child(
                div()
                    .flex_1()
                    .min_w_0()
                    .px_3()
                    .py_1()
                    .rounded_lg()
                    .border_1()
                    .border_color(color(self.palette.border))
                    .child(Input::new(&self.input_state).w_full()),
            )
            .child(action)
    }
}

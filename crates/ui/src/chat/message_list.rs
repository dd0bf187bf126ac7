use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{h_flex, label::Label, v_flex};
use parley_core::{BubbleAlignment, BubbleRow, Palette, ScrollManager};

use crate::theme::color;

const BUBBLE_MAX_WIDTH: f32 = 0.8;
const BUBBLE_PADDING_X: Pixels = px(12.);
const BUBBLE_PADDING_Y: Pixels = px(8.);
const IMAGE_SIZE: Pixels = px(200.);
/// Layout changes smaller than this do not count as a content resize.
const SIZE_EPSILON: f32 = 1.0;
/// Frames to re-render after new rows so the scroll sees the settled layout.
const SETTLE_FRAMES: u8 = 2;

pub struct MessageList {
    rows: Vec<BubbleRow>,
    background: Rgba,
    scroll_handle: ScrollHandle,
    scroll: ScrollManager,
    settle_frames: u8,
}

impl MessageList {
    pub fn new(palette: &Palette, _cx: &mut Context<Self>) -> Self {
        Self {
            rows: Vec::new(),
            background: color(palette.background),
            scroll_handle: ScrollHandle::new(),
            scroll: ScrollManager::new(),
            settle_frames: SETTLE_FRAMES,
        }
    }

    pub fn rows(&self) -> &[BubbleRow] {
        &self.rows
    }

    pub fn set_rows(&mut self, rows: Vec<BubbleRow>, palette: &Palette, cx: &mut Context<Self>) {
        self.rows = rows;
        self.background = color(palette.background);
        self.scroll.on_layout();
        self.settle_frames = SETTLE_FRAMES;
        cx.notify();
    }

    fn sync_scroll(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let viewport = f32::from(self.scroll_handle.bounds().size.height);
        let content = f32::from(self.scroll_handle.max_offset().height) + viewport;

        // Scroll offsets grow negative towards the end of the list.
        self.scroll
            .set_offset(-f32::from(self.scroll_handle.offset().y));

        let resized = (content - self.scroll.content_height()).abs() > SIZE_EPSILON
            || (viewport - self.scroll.viewport_height()).abs() > SIZE_EPSILON;
        if resized {
            self.scroll.update_content_size(content, viewport);
        }

        if self.scroll.has_pending_scroll() {
            self.scroll.apply_pending_scroll();
            let current_x = self.scroll_handle.offset().x;
            self.scroll_handle
                .set_offset(point(current_x, px(-self.scroll.offset())));
        }

        if self.settle_frames > 0 {
            self.settle_frames -= 1;
            self.scroll.on_layout();
            cx.on_next_frame(window, |_, _, cx| cx.notify());
        }
    }
}

fn render_bubble(row: &BubbleRow) -> AnyElement {
    let time = h_flex()
        .gap_1()
        .justify_end()
        .child(
            Label::new(row.time_label.clone())
                .text_xs()
                .text_color(color(row.time_color)),
        )
        .when_some(row.status, |line, glyph| {
            line.child(
                Label::new(glyph.symbol)
                    .text_xs()
                    .text_color(color(glyph.color)),
            )
        });

    let bubble = v_flex()
        .max_w(relative(BUBBLE_MAX_WIDTH))
        .px(BUBBLE_PADDING_X)
        .py(BUBBLE_PADDING_Y)
        .gap_1()
        .rounded_lg()
        .bg(color(row.background))
        .when_some(row.image_uri.clone(), |bubble, uri| {
            bubble.child(img(uri).w(IMAGE_SIZE).h(IMAGE_SIZE).rounded_md())
        })
        .when_some(
            row.text.clone().filter(|text| !text.is_empty()),
            |bubble, text| {
                bubble.child(
                    Label::new(text)
                        .text_sm()
                        .text_color(color(row.text_color)),
                )
            },
        )
        .child(time);

    let lane = match row.alignment {
        BubbleAlignment::End => v_flex().w_full().items_end(),
        BubbleAlignment::Start => v_flex().w_full().items_start(),
    };
    lane.child(bubble).into_any_element()
}

impl Render for MessageList {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.sync_scroll(window, cx);

        div().size_full().min_h_0().bg(self.background).child(
            v_flex()
                .id("message-list")
                .size_full()
                .px_4()
                .py_3()
                .gap_2()
                .overflow_y_scroll()
                .track_scroll(&self.scroll_handle)
                .children(self.rows.iter().map(render_bubble)),
        )
    }
}

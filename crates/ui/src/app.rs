use std::sync::Arc;

use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};
use parley_core::{ChatList, DeliverySimulator, ThemeContext, ThemeHandle};
use parley_storage::ChatDirectory;

use crate::chat::{ChatSelected, ChatSidebar, ChatView, ConversationUpdated};
use crate::theme::{appearance_from_window, color, sync_component_theme};

pub const SIDEBAR_DEFAULT_WIDTH: f32 = 300.0;
pub const SIDEBAR_MIN_WIDTH: f32 = 220.0;
pub const SIDEBAR_MAX_WIDTH: f32 = 420.0;
const _: () = {
    assert!(SIDEBAR_MIN_WIDTH < SIDEBAR_DEFAULT_WIDTH);
    assert!(SIDEBAR_DEFAULT_WIDTH < SIDEBAR_MAX_WIDTH);
};

pub fn compute_sidebar_width(drag_x: f32) -> f32 {
    drag_x.clamp(SIDEBAR_MIN_WIDTH, SIDEBAR_MAX_WIDTH)
}

gpui::actions!(shell, [ToggleTheme, Quit]);

/// Long-lived services owned by the application root and shared with every view.
#[derive(Clone)]
pub struct AppServices {
    pub simulator: Arc<DeliverySimulator>,
    pub directory: Arc<dyn ChatDirectory>,
    pub theme: ThemeHandle,
}

#[derive(Clone)]
struct SidebarResizeDrag;

struct EmptyDragView;

impl Render for EmptyDragView {
    fn render(&mut self, _: &mut Window, _: &mut Context<Self>) -> impl IntoElement {
        div()
    }
}

/// Root layout: chat list on the left, open conversation on the right.
pub struct ChatAppShell {
    services: AppServices,
    sidebar: Entity<ChatSidebar>,
    chat_view: Entity<ChatView>,
    sidebar_collapsed: bool,
    sidebar_width: f32,
    _theme_task: Task<()>,
    _appearance_subscription: Subscription,
}

impl ChatAppShell {
    pub fn new(services: AppServices, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let theme = services.theme.clone();
        let chat_list = ChatList::new(services.directory.clone());
        let sidebar = cx.new(|cx| ChatSidebar::new(chat_list, theme.colors(), window, cx));
        let chat_view =
            cx.new(|cx| ChatView::new(services.simulator.clone(), theme.clone(), window, cx));

        cx.subscribe(&sidebar, |this, _, event: &ChatSelected, cx| {
            let title = this
                .services
                .directory
                .chat(&event.chat_id)
                .map(|summary| summary.name)
                .unwrap_or_else(|| event.chat_id.to_string());
            let chat_id = event.chat_id.clone();
            this.chat_view
                .update(cx, |view, cx| view.open_chat(chat_id, title, cx));
        })
        .detach();

        cx.subscribe(&chat_view, |this, _, _event: &ConversationUpdated, cx| {
            this.sidebar.update(cx, |sidebar, cx| sidebar.refresh(cx));
        })
        .detach();

        let appearance_subscription = cx.observe_window_appearance(window, |this, window, _cx| {
            this.services
                .theme
                .set_system_appearance(appearance_from_window(window.appearance()));
        });

        let mut updates = theme.subscribe();
        let theme_task = cx.spawn_in(window, async move |this, cx| {
            while updates.changed().await.is_ok() {
                let context = *updates.borrow_and_update();
                let applied =
                    this.update_in(cx, |this, window, cx| this.apply_theme(context, window, cx));
                if applied.is_err() {
                    break;
                }
            }
        });

        if let Some(first) = sidebar.read(cx).first_chat() {
            sidebar.update(cx, |sidebar, cx| sidebar.select_chat(first, cx));
        }

        Self {
            services,
            sidebar,
            chat_view,
            sidebar_collapsed: false,
            sidebar_width: SIDEBAR_DEFAULT_WIDTH,
            _theme_task: theme_task,
            _appearance_subscription: appearance_subscription,
        }
    }

    fn apply_theme(&mut self, context: ThemeContext, window: &mut Window, cx: &mut Context<Self>) {
        tracing::debug!(
            preference = context.preference.as_str(),
            is_dark_mode = context.is_dark_mode,
            "applying theme"
        );
        sync_component_theme(&context, Some(window), cx);
        self.sidebar
            .update(cx, |sidebar, cx| sidebar.set_palette(context.palette, cx));
        self.chat_view
            .update(cx, |view, cx| view.refresh_theme(cx));
        cx.notify();
    }

    fn toggle_sidebar(&mut self, cx: &mut Context<Self>) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        cx.notify();
    }

    fn resize_sidebar(&mut self, new_width: f32, cx: &mut Context<Self>) {
        self.sidebar_width = compute_sidebar_width(new_width);
        cx.notify();
    }

    fn render_top_bar(&self, cx: &Context<Self>) -> impl IntoElement {
        let palette = self.services.theme.colors();
        let theme_label = if self.services.theme.is_dark_mode() {
            "Light mode"
        } else {
            "Dark mode"
        };
        let sidebar_icon = if self.sidebar_collapsed {
            IconName::PanelLeftOpen
        } else {
            IconName::PanelLeftClose
        };

        h_flex()
            .id("app-top-bar")
            .w_full()
            .flex_shrink_0()
            .px_3()
            .py_1()
            .gap_2()
            .items_center()
            .justify_between()
            .bg(color(palette.surface))
            .border_b_1()
            .border_color(color(palette.border))
            .child(
                Button::new("sidebar-toggle")
                    .ghost()
                    .small()
                    .icon(sidebar_icon)
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.toggle_sidebar(cx);
                    })),
            )
            .child(
                Button::new("theme-toggle")
                    .ghost()
                    .small()
                    .child(theme_label)
                    .on_click(cx.listener(|this, _, _window, _cx| {
                        this.services.theme.toggle();
                    })),
            )
    }

    fn render_resize_handle(&self, cx: &Context<Self>) -> impl IntoElement {
        let palette = self.services.theme.colors();
        let border = color(palette.border);
        let hovered = color(palette.primary);

        div()
            .id("sidebar-resize-handle")
            .w(px(1.0))
            .h_full()
            .flex_shrink_0()
            .cursor(CursorStyle::ResizeLeftRight)
            .bg(border)
            .hover(move |el| el.bg(hovered))
            .on_drag(SidebarResizeDrag, |_, _, _, cx| cx.new(|_| EmptyDragView))
            .on_drag_move::<SidebarResizeDrag>(cx.listener(
                |this, event: &DragMoveEvent<SidebarResizeDrag>, _window, cx| {
                    let new_width: f32 = event.event.position.x.into();
                    this.resize_sidebar(new_width, cx);
                },
            ))
    }
}

impl Render for ChatAppShell {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let palette = self.services.theme.colors();
        let collapsed = self.sidebar_collapsed;

        v_flex()
            .size_full()
            .bg(color(palette.background))
            .child(self.render_top_bar(cx))
            .child(
                h_flex()
                    .id("app-shell-body")
                    .flex_1()
                    .min_w_0()
                    .min_h_0()
                    .overflow_hidden()
                    .when(!collapsed, |body| {
                        body.child(
                            div()
                                .id("sidebar-container")
                                .h_full()
                                .flex_shrink_0()
                                .w(px(self.sidebar_width))
                                .overflow_hidden()
                                .child(self.sidebar.clone()),
                        )
                        .child(self.render_resize_handle(cx))
                    })
                    .child(
                        div()
                            .id("main-content")
                            .flex_1()
                            .h_full()
                            .min_w_0()
                            .min_h_0()
                            .overflow_hidden()
                            .child(self.chat_view.clone()),
                    ),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidebar_width_is_clamped() {
        assert_eq!(compute_sidebar_width(10.0), SIDEBAR_MIN_WIDTH);
        assert_eq!(compute_sidebar_width(320.0), 320.0);
        assert_eq!(compute_sidebar_width(9_000.0), SIDEBAR_MAX_WIDTH);
    }
}

use std::sync::Arc;

use gpui::*;
use gpui_component::Root;
use parley_core::{AppConfig, ConversationStore, DeliverySimulator, DeliveryTimings, ThemeService};
use parley_storage::{JsonPreferenceStore, MemoryMessageSource};

use parley_ui::app::{AppServices, ChatAppShell, Quit, ToggleTheme};
use parley_ui::theme::{appearance_from_window, sync_component_theme};

fn main() {
    tracing_subscriber::fmt::init();

    let config = AppConfig::load();
    tracing::info!(?config, "configuration loaded");

    // Delivery timers run here; the gpui executor only awaits channel updates.
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("parley-delivery")
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!(error = %error, "failed to start delivery runtime");
            return;
        }
    };

    let source = Arc::new(MemoryMessageSource::with_fixtures());
    let store = Arc::new(ConversationStore::new(source.clone()));
    let simulator = Arc::new(DeliverySimulator::new(
        store,
        DeliveryTimings::from(&config.delivery),
        runtime.handle().clone(),
    ));
    let preferences_path = config
        .preferences_path
        .clone()
        .unwrap_or_else(JsonPreferenceStore::default_path);
    let preferences = Arc::new(JsonPreferenceStore::open(preferences_path));

    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        gpui_component::init(cx);

        let theme = Arc::new(ThemeService::load(
            preferences,
            appearance_from_window(cx.window_appearance()),
        ));
        sync_component_theme(&theme.snapshot(), None, cx);

        let services = AppServices {
            simulator,
            directory: source,
            theme: theme.clone(),
        };

        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });
        cx.on_action(move |_: &ToggleTheme, _cx| {
            theme.toggle();
        });
        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("cmd-shift-t", ToggleTheme, None),
        ]);

        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(1100.), px(760.)),
                        cx,
                    ))),
                    titlebar: Some(TitlebarOptions {
                        title: Some("Parley".into()),
                        ..Default::default()
                    }),
                    ..Default::default()
                };

                cx.open_window(options, |window, cx| {
                    let shell = cx.new(|cx| ChatAppShell::new(services, window, cx));
                    cx.new(|cx| Root::new(shell, window, cx))
                })
                .expect("failed to open main window");

                cx.activate(true);
            })
        })
        .detach();
    });

    drop(runtime);
}

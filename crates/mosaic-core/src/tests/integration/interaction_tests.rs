use std::sync::Arc;

use serde_json::json;

use crate::component::{LifecyclePhase, StatePatch};
use crate::event::SystemEvent;
use crate::kernel::constants::{DEFAULT_THEME_TOGGLE_ELEMENT, THEME_STORE_KEY};
use crate::kernel::{Application, BootstrapPhase};
use crate::service::{ServiceKey, Theme, ThemeService};
use crate::storage::{AppConfig, KeyValueStore, MemoryStore};
use crate::tests::integration::common::{
    clicks, deferred_fixture, page_with, page_with_toggle, fixture, EventLog, HookCounts,
};
use crate::ui_bridge::{MemorySurface, UiEvent};

fn themed_app(surface: MemorySurface, store: Arc<dyn KeyValueStore>) -> Application<MemorySurface> {
    let mut app = Application::new(AppConfig::default(), surface);
    app.add_service(ServiceKey::THEME, move || ThemeService::new(store.clone()));
    app
}

#[tokio::test]
async fn test_theme_toggle_is_wired_and_persists() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut app = themed_app(page_with_toggle(&[]), store.clone());
    let events = EventLog::attach(&mut app);

    app.bootstrap().await.expect("bootstrap");
    assert!(app.surface().has_listener(DEFAULT_THEME_TOGGLE_ELEMENT, "click"));

    let toggled = app
        .dispatch_ui_event(&UiEvent::new("click", DEFAULT_THEME_TOGGLE_ELEMENT))
        .expect("toggle handled");

    assert!(toggled);
    let theme = app
        .service_as::<ThemeService>(ServiceKey::THEME.as_str())
        .expect("theme service registered");
    assert_eq!(theme.current(), Theme::Dark);
    assert_eq!(store.get_json::<Theme>(THEME_STORE_KEY).expect("read"), Some(Theme::Dark));
    assert!(events
        .system()
        .contains(&SystemEvent::ThemeChanged { theme: "dark".to_string() }));
}

#[tokio::test]
async fn test_missing_theme_toggle_is_tolerated() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut app = themed_app(page_with(&[]), store);

    app.bootstrap().await.expect("bootstrap");

    assert_eq!(app.phase(), BootstrapPhase::Ready);
    assert_eq!(app.surface().listener_count(), 0);
    let handled = app
        .dispatch_ui_event(&UiEvent::new("click", DEFAULT_THEME_TOGGLE_ELEMENT))
        .expect("unowned events are dropped");
    assert!(!handled);
}

#[tokio::test]
async fn test_missing_theme_service_is_tolerated() {
    let mut app = Application::new(AppConfig::default(), page_with_toggle(&[]));

    app.bootstrap().await.expect("bootstrap");

    assert_eq!(app.phase(), BootstrapPhase::Ready);
    assert!(!app.surface().has_listener(DEFAULT_THEME_TOGGLE_ELEMENT, "click"));
}

#[tokio::test]
async fn test_surface_events_reach_the_owning_component() {
    let counts = HookCounts::new();
    let mut app = Application::new(AppConfig::default(), page_with(&["x-root"]));
    app.add_component("X", fixture("x-root", counts.clone()));
    app.bootstrap().await.expect("bootstrap");

    assert!(app.dispatch_ui_event(&UiEvent::new("click", "x-root")).expect("click"));
    assert!(app.dispatch_ui_event(&UiEvent::new("click", "x-root")).expect("click"));
    assert!(!app.dispatch_ui_event(&UiEvent::new("click", "elsewhere")).expect("unowned"));

    let x = app.component("X").expect("X active");
    assert_eq!(clicks(x.state()), json!(2));
    assert_eq!(HookCounts::get(&counts.render), 3);
    assert!(app.surface().markup("x-root").is_some_and(|m| m.contains("\"clicks\":2")));
}

#[tokio::test]
async fn test_set_component_state_through_application() {
    let counts = HookCounts::new();
    let mut app = Application::new(AppConfig::default(), page_with(&["x-root"]));
    app.add_component("X", fixture("x-root", counts.clone()));
    app.add_component("search", deferred_fixture("search-root", HookCounts::new()));
    app.bootstrap().await.expect("bootstrap");

    let unchanged = app
        .set_component_state("X", StatePatch::new().with("clicks", 0))
        .expect("no-op update");
    assert!(!unchanged);
    assert_eq!(HookCounts::get(&counts.on_changes), 0);

    assert!(app
        .set_component_state("search", StatePatch::new().with("query", "smith"))
        .expect("deferred components accept data"));
    assert_eq!(
        app.component("search").and_then(|c| c.state().get_as::<String>("query")),
        Some("smith".to_string())
    );
}

#[tokio::test]
async fn test_teardown_and_shutdown_release_listeners() {
    let x_counts = HookCounts::new();
    let z_counts = HookCounts::new();
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut app = themed_app(page_with_toggle(&["x-root", "z-root"]), store);
    app.add_component("X", fixture("x-root", x_counts.clone()));
    app.add_component("Z", fixture("z-root", z_counts.clone()));
    let events = EventLog::attach(&mut app);
    app.bootstrap().await.expect("bootstrap");
    assert_eq!(app.surface().listener_count(), 3);

    app.teardown("X").expect("teardown X");
    assert_eq!(HookCounts::get(&x_counts.on_destroy), 1);
    assert_eq!(app.component_names(), vec!["Z"]);
    assert_eq!(app.surface().listener_count(), 2);

    app.shutdown().expect("shutdown");
    assert_eq!(HookCounts::get(&z_counts.on_destroy), 1);
    assert_eq!(HookCounts::get(&x_counts.on_destroy), 1);
    assert!(app.component_names().is_empty());
    assert_eq!(app.surface().listener_count(), 0);
    assert!(events.system().contains(&SystemEvent::Shutdown));
}

#[tokio::test]
async fn test_teardown_marks_instance_destroyed() {
    let mut app = Application::new(AppConfig::default(), page_with(&["x-root"]));
    app.add_component("X", fixture("x-root", HookCounts::new()));
    app.bootstrap().await.expect("bootstrap");
    assert_eq!(app.component("X").map(|c| c.phase()), Some(LifecyclePhase::Active));

    app.teardown("X").expect("teardown");
    assert!(app.component("X").is_none());
    assert!(app.teardown("X").is_err());
}

#[tokio::test]
async fn test_failed_rerender_retires_the_component() {
    let counts = HookCounts::new();
    let mut app = Application::new(AppConfig::default(), page_with(&["x-root", "z-root"]));
    app.add_component("X", fixture("x-root", counts.clone()));
    app.add_component("Z", fixture("z-root", HookCounts::new()));
    app.bootstrap().await.expect("bootstrap");

    app.surface_mut().remove_element("x-root");
    assert!(app.dispatch_ui_event(&UiEvent::new("click", "x-root")).is_err());

    assert_eq!(HookCounts::get(&counts.on_changes), 1);
    assert_eq!(app.component_names(), vec!["Z"]);
    assert_eq!(app.failed_components(), ["X".to_string()]);
    assert!(!app.dispatch_ui_event(&UiEvent::new("click", "x-root")).expect("no owner left"));
    assert!(app.set_component_state("X", StatePatch::new().with("clicks", 9)).is_err());

    app.shutdown().expect("failed components are not torn down");
    assert_eq!(HookCounts::get(&counts.on_destroy), 0);
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::component::LifecyclePhase;
use crate::event::{StageEvent, SystemEvent};
use crate::kernel::constants::DEFAULT_LOADING_ELEMENT;
use crate::kernel::{Application, BootstrapPhase};
use crate::storage::AppConfig;
use crate::tests::integration::common::{
    config_requiring, deferred_fixture, page_with, fixture, EventLog, HookCounts, LabelService,
    ScriptedLoader,
};

#[tokio::test]
async fn test_end_to_end_component_failure_is_not_fatal() {
    let counts = HookCounts::new();
    let mut app = Application::new(config_requiring(&["A", "B"]), page_with(&["x-root"]));
    app.add_service("A", || LabelService { label: "a" });
    app.add_service("B", || LabelService { label: "b" });
    app.add_component("X", fixture("x-root", counts.clone()));
    app.add_component("Y", fixture("y-root", counts.clone()));
    let events = EventLog::attach(&mut app);

    app.bootstrap().await.expect("component failures are not fatal");

    assert_eq!(app.phase(), BootstrapPhase::Ready);
    assert_eq!(app.component_names(), vec!["X"]);
    assert_eq!(app.failed_components(), &["Y".to_string()]);
    assert!(app.service("A").is_some());
    assert!(app.service("B").is_some());
    assert_eq!(events.completed_with(), Some(vec!["X".to_string()]));
    assert!(app.surface().is_hidden(DEFAULT_LOADING_ELEMENT));
}

#[tokio::test]
async fn test_components_share_bundled_services() {
    let counts = HookCounts::new();
    let mut app = Application::new(config_requiring(&["labels"]), page_with(&["x-root", "z-root"]));
    app.add_service("labels", || LabelService { label: "shared" });
    app.add_component("X", fixture("x-root", counts.clone()));
    app.add_component("Z", fixture("z-root", counts.clone()));

    app.bootstrap().await.expect("bootstrap");

    let x = app.component("X").expect("X active");
    let z = app.component("Z").expect("Z active");
    let from_x = x.service("labels").expect("labels in X's bundle");
    let from_z = z.service("labels").expect("labels in Z's bundle");
    assert!(Arc::ptr_eq(&from_x, &from_z));
    assert_eq!(x.state().get_as::<String>("label"), Some("shared".to_string()));
}

#[tokio::test]
async fn test_deferred_component_warms_data_and_attaches_on_navigation() {
    let counts = HookCounts::new();
    let mut app = Application::new(AppConfig::default(), page_with(&["dashboard-root"]));
    app.add_component("dashboard", fixture("dashboard-root", HookCounts::new()));
    app.add_component("search", deferred_fixture("search-root", counts.clone()));
    let events = EventLog::attach(&mut app);

    app.bootstrap().await.expect("bootstrap");

    // Data loaded, nothing rendered, not part of the completion list.
    assert_eq!(app.component_names(), vec!["dashboard"]);
    assert_eq!(app.deferred_names(), vec!["search"]);
    assert!(app.failed_components().is_empty());
    let search = app.component("search").expect("search is tracked");
    assert_eq!(search.phase(), LifecyclePhase::InitializedDataOnly);
    let records = search.state().get_as::<Vec<String>>("records").unwrap_or_default();
    assert!(!records.is_empty());
    assert_eq!(HookCounts::get(&counts.render), 0);
    assert_eq!(events.completed_with(), Some(vec!["dashboard".to_string()]));

    // Showing the screen too early keeps the component deferred.
    assert!(app.show_screen("search").is_err());
    assert_eq!(app.deferred_names(), vec!["search"]);

    app.surface_mut().insert_element("search-root");
    app.show_screen("search").expect("screen shown");

    assert_eq!(app.component_names(), vec!["dashboard", "search"]);
    assert!(app.deferred_names().is_empty());
    assert_eq!(HookCounts::get(&counts.on_init), 1);
    assert_eq!(HookCounts::get(&counts.render), 1);
    assert!(app.surface().markup("search-root").is_some_and(|m| m.contains("r-1")));
    assert!(events
        .system()
        .contains(&SystemEvent::ComponentAttached { component: "search".to_string() }));
}

#[tokio::test]
async fn test_loader_failures_do_not_abort_bootstrap() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut app = Application::new(AppConfig::default(), page_with(&[]));
    app.add_loader(ScriptedLoader { name: "imagery", fail: true, runs: runs.clone() });
    app.add_loader(ScriptedLoader { name: "prices", fail: false, runs: runs.clone() });
    let events = EventLog::attach(&mut app);

    app.bootstrap().await.expect("loader failures are warnings");

    assert_eq!(app.phase(), BootstrapPhase::Ready);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert!(events.stage().iter().any(|e| matches!(
        e,
        StageEvent::Progress { message, .. } if message == "1 of 2 loaders settled"
    )));
    assert!(events
        .stage()
        .iter()
        .any(|e| matches!(e, StageEvent::Warning { stage_id, .. } if stage_id == "core::external_loaders")));
}

#[tokio::test]
async fn test_services_are_reachable_while_bootstrapping() {
    #[derive(Debug)]
    struct FixtureLoader {
        saw_service: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl crate::loader::AsyncLoader for FixtureLoader {
        fn name(&self) -> &str {
            "fixture"
        }

        async fn load(&self, services: &crate::service::ServiceRegistry) -> crate::kernel::error::Result<()> {
            if services.get_concrete::<LabelService>("A").is_some() {
                self.saw_service.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    let saw_service = Arc::new(AtomicUsize::new(0));
    let mut app = Application::new(config_requiring(&["A"]), page_with(&[]));
    app.add_service("A", || LabelService { label: "a" });
    app.add_loader(FixtureLoader { saw_service: saw_service.clone() });

    app.bootstrap().await.expect("bootstrap");
    assert_eq!(saw_service.load(Ordering::SeqCst), 1);
}

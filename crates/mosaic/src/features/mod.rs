//! Feature modules sharing the core infrastructure.
//!
//! Each module owns its service, its screen and the element it mounts on.
pub mod admin;
pub mod dashboard;
pub mod posts;
pub mod records;

use std::path::PathBuf;
use std::sync::Arc;

use mosaic_core::service::ThemeService;
use mosaic_core::{Application, Component, KeyValueStore, ServiceKey, UiEvent, UiSurface};

/// Mount points present on the page from the start. The search screen is
/// absent until it is shown.
pub const PAGE_MOUNTS: &[&str] = &[posts::MOUNT, dashboard::MOUNT, admin::MOUNT];

/// Register every feature service, screen and loader on `app`.
///
/// `records` is an optional records API export imported during the external
/// loading stage.
pub fn install<S: UiSurface>(app: &mut Application<S>, store: Arc<dyn KeyValueStore>, records: Option<PathBuf>) {
    let post_store = Arc::clone(&store);
    app.add_service(posts::SERVICE, move || posts::PostService::new(Arc::clone(&post_store)));
    app.add_service(records::SERVICE, records::CaseService::seeded);
    app.add_service(ServiceKey::THEME, move || ThemeService::new(Arc::clone(&store)));

    app.add_component(posts::COMPONENT, |_| -> Box<dyn Component> { Box::new(posts::PostsComponent::new()) });
    app.add_component(dashboard::COMPONENT, |_| -> Box<dyn Component> {
        Box::new(dashboard::DashboardComponent::new())
    });
    app.add_component(records::COMPONENT, |_| -> Box<dyn Component> {
        Box::new(records::RecordSearchComponent::new())
    });
    app.add_component(admin::COMPONENT, |_| -> Box<dyn Component> { Box::new(admin::AdminSummaryComponent) });

    if let Some(path) = records {
        app.add_loader(records::RecordImportLoader::new(path));
    }
}

/// Bring screens up to date with data that changed after they initialized,
/// such as records imported by the external loaders or a toggled theme.
pub fn refresh<S: UiSurface>(app: &mut Application<S>) {
    if let Err(e) = app.dispatch_ui_event(&UiEvent::new(dashboard::REFRESH_EVENT, dashboard::MOUNT)) {
        log::warn!("Dashboard refresh failed: {}", e);
    }

    let Some(cases) = app.service_as::<records::CaseService>(records::SERVICE) else {
        return;
    };
    let Some(query) = app
        .component(records::COMPONENT)
        .map(|c| c.state().get_as::<String>("query").unwrap_or_default())
    else {
        return;
    };
    if let Err(e) = app.set_component_state(records::COMPONENT, records::results_patch(&cases, &query)) {
        log::warn!("Search refresh failed: {}", e);
    }
}

//! Data dashboard: headline counts across posts and cases.
use std::sync::Arc;

use async_trait::async_trait;

use mosaic_core::component::{Component, ComponentState, StatePatch};
use mosaic_core::kernel::error::Result as KernelResult;
use mosaic_core::service::ThemeService;
use mosaic_core::{DependencyBundle, Markup, ServiceKey, UiEvent};

use super::posts::{self, PostService};
use super::records::{self, CaseService, CaseStatus};

pub const COMPONENT: &str = "dashboard";
pub const MOUNT: &str = "dashboard-root";

pub const REFRESH_EVENT: &str = "refresh";

/// Every source is optional; a missing service shows as zero.
#[derive(Debug, Default)]
pub struct DashboardComponent {
    posts: Option<Arc<PostService>>,
    cases: Option<Arc<CaseService>>,
    theme: Option<Arc<ThemeService>>,
}

impl DashboardComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn figures(&self) -> StatePatch {
        let post_count = self
            .posts
            .as_ref()
            .and_then(|s| s.list().map_err(|e| log::warn!("Dashboard skipped posts: {}", e)).ok())
            .map(|p| p.len())
            .unwrap_or(0);
        let (open, pending, closed) = self
            .cases
            .as_ref()
            .map(|c| {
                (
                    c.count_with(CaseStatus::Open),
                    c.count_with(CaseStatus::Pending),
                    c.count_with(CaseStatus::Closed),
                )
            })
            .unwrap_or_default();
        let theme = self.theme.as_ref().map(|t| t.current().to_string());

        StatePatch::new()
            .with("posts", post_count)
            .with("open_cases", open)
            .with("pending_cases", pending)
            .with("closed_cases", closed)
            .with("theme", serde_json::json!(theme))
    }
}

#[async_trait]
impl Component for DashboardComponent {
    fn mount_point(&self) -> &str {
        MOUNT
    }

    async fn on_init(&mut self, services: &DependencyBundle) -> KernelResult<StatePatch> {
        self.posts = services.get_concrete::<PostService>(posts::SERVICE);
        self.cases = services.get_concrete::<CaseService>(records::SERVICE);
        self.theme = services.get_concrete::<ThemeService>(ServiceKey::THEME.as_str());
        Ok(self.figures())
    }

    fn render(&self, state: &ComponentState) -> Markup {
        let figure = |key: &str| state.get_as::<u64>(key).unwrap_or(0);
        let theme = state.get_as::<String>("theme").unwrap_or_else(|| "-".to_string());
        Markup::new(format!(
            "<section class=\"dashboard\" data-theme=\"{}\"><dl>\
             <dt>Posts</dt><dd>{}</dd>\
             <dt>Open cases</dt><dd>{}</dd>\
             <dt>Pending cases</dt><dd>{}</dd>\
             <dt>Closed cases</dt><dd>{}</dd>\
             <dt>Theme</dt><dd>{}</dd>\
             </dl></section>",
            Markup::escape(&theme),
            figure("posts"),
            figure("open_cases"),
            figure("pending_cases"),
            figure("closed_cases"),
            Markup::escape(&theme),
        ))
    }

    fn handle_event(&mut self, event: &UiEvent, _state: &ComponentState) -> Option<StatePatch> {
        (event.kind == REFRESH_EVENT).then(|| self.figures())
    }
}

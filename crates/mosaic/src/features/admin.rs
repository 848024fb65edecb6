//! Administrative summary of what the application started with.
use async_trait::async_trait;
use serde_json::json;

use mosaic_core::component::{Component, ComponentState, StatePatch};
use mosaic_core::kernel::error::Result as KernelResult;
use mosaic_core::{DependencyBundle, Markup};

pub const COMPONENT: &str = "admin";
pub const MOUNT: &str = "admin-root";

#[derive(Debug, Default)]
pub struct AdminSummaryComponent;

#[async_trait]
impl Component for AdminSummaryComponent {
    fn mount_point(&self) -> &str {
        MOUNT
    }

    async fn on_init(&mut self, services: &DependencyBundle) -> KernelResult<StatePatch> {
        Ok(StatePatch::new().with("services", json!(services.names())))
    }

    fn render(&self, state: &ComponentState) -> Markup {
        let services = state.get_as::<Vec<String>>("services").unwrap_or_default();
        let rows: String = services.iter().map(|s| format!("<li>{}</li>", Markup::escape(s))).collect();
        Markup::new(format!(
            "<section class=\"admin\"><h2>{} services</h2><ul>{}</ul></section>",
            services.len(),
            rows
        ))
    }
}

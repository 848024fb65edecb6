#![cfg(test)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::component::{Changes, Component, ComponentState, StatePatch, View};
use crate::event::{Event, EventResult, StageEvent, SystemEvent};
use crate::kernel::constants::{DEFAULT_LOADING_ELEMENT, DEFAULT_THEME_TOGGLE_ELEMENT};
use crate::kernel::error::{Error, Result as KernelResult};
use crate::kernel::Application;
use crate::loader::AsyncLoader;
use crate::service::{DependencyBundle, Service, ServiceRegistry};
use crate::storage::AppConfig;
use crate::ui_bridge::{ListenerId, Markup, MemorySurface, UiEvent};

// ===== MOCK SERVICES =====

/// A service distinguished only by its label
#[derive(Debug)]
pub struct LabelService {
    pub label: &'static str,
}

impl Service for LabelService {
    fn name(&self) -> &'static str {
        "LabelService"
    }
}

/// A second service type, used to exercise failed downcasts
#[derive(Debug, Default)]
pub struct CounterService {
    pub hits: AtomicUsize,
}

impl Service for CounterService {
    fn name(&self) -> &'static str {
        "CounterService"
    }
}

// ===== MOCK COMPONENTS =====

/// Counts every hook invocation of a [`FixtureComponent`]
#[derive(Debug, Default)]
pub struct HookCounts {
    pub on_init: AtomicUsize,
    pub render: AtomicUsize,
    pub after_view_init: AtomicUsize,
    pub on_changes: AtomicUsize,
    pub on_destroy: AtomicUsize,
    pub last_changes: Mutex<Option<Changes>>,
}

impl HookCounts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn last_changes(&self) -> Option<Changes> {
        self.last_changes.lock().expect("changes lock poisoned").clone()
    }
}

/// A component that records its hook calls and counts clicks
#[derive(Debug)]
pub struct FixtureComponent {
    mount: String,
    deferrable: bool,
    fail_init: bool,
    initial: StatePatch,
    counts: Arc<HookCounts>,
    listeners: Vec<ListenerId>,
}

impl FixtureComponent {
    pub fn new(mount: &str, counts: Arc<HookCounts>) -> Self {
        Self {
            mount: mount.to_string(),
            deferrable: false,
            fail_init: false,
            initial: StatePatch::new().with("clicks", 0),
            counts,
            listeners: Vec::new(),
        }
    }

    pub fn deferrable(mut self) -> Self {
        self.deferrable = true;
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn with_initial(mut self, patch: StatePatch) -> Self {
        self.initial = patch;
        self
    }
}

#[async_trait]
impl Component for FixtureComponent {
    fn mount_point(&self) -> &str {
        &self.mount
    }

    fn is_deferrable(&self) -> bool {
        self.deferrable
    }

    async fn on_init(&mut self, services: &DependencyBundle) -> KernelResult<StatePatch> {
        self.counts.on_init.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(Error::Other("data load failed".to_string()));
        }
        let mut patch = self.initial.clone();
        if let Some(label) = services.get_concrete::<LabelService>("labels") {
            patch.set("label", label.label);
        }
        Ok(patch)
    }

    fn render(&self, state: &ComponentState) -> Markup {
        self.counts.render.fetch_add(1, Ordering::SeqCst);
        Markup::new(format!("<section id=\"{}\">{}</section>", self.mount, state.to_json()))
    }

    fn on_after_view_init(&mut self, view: &mut View<'_>) -> KernelResult<()> {
        self.counts.after_view_init.fetch_add(1, Ordering::SeqCst);
        self.listeners.push(view.listen("click")?);
        Ok(())
    }

    fn on_changes(&mut self, changes: &Changes) {
        self.counts.on_changes.fetch_add(1, Ordering::SeqCst);
        *self.counts.last_changes.lock().expect("changes lock poisoned") = Some(changes.clone());
    }

    fn handle_event(&mut self, event: &UiEvent, state: &ComponentState) -> Option<StatePatch> {
        match event.kind.as_str() {
            "click" => {
                let clicks = state.get_as::<u64>("clicks").unwrap_or(0);
                Some(StatePatch::new().with("clicks", clicks + 1))
            }
            "reset" => Some(StatePatch::new().with("clicks", 0)),
            _ => None,
        }
    }

    fn on_destroy(&mut self, view: &mut View<'_>) {
        self.counts.on_destroy.fetch_add(1, Ordering::SeqCst);
        for listener in self.listeners.drain(..) {
            view.unlisten(listener);
        }
    }
}

/// Constructor registering a [`FixtureComponent`] in a directory
pub fn fixture(
    mount: &'static str,
    counts: Arc<HookCounts>,
) -> impl Fn(Arc<DependencyBundle>) -> Box<dyn Component> + Send + Sync + 'static {
    move |_bundle: Arc<DependencyBundle>| -> Box<dyn Component> {
        Box::new(FixtureComponent::new(mount, Arc::clone(&counts)))
    }
}

/// Constructor registering a deferrable [`FixtureComponent`]
pub fn deferred_fixture(
    mount: &'static str,
    counts: Arc<HookCounts>,
) -> impl Fn(Arc<DependencyBundle>) -> Box<dyn Component> + Send + Sync + 'static {
    move |_bundle: Arc<DependencyBundle>| -> Box<dyn Component> {
        Box::new(
            FixtureComponent::new(mount, Arc::clone(&counts))
                .deferrable()
                .with_initial(StatePatch::new().with("records", json!(["r-1", "r-2"]))),
        )
    }
}

// ===== MOCK LOADERS =====

/// Stage 4 collaborator that either succeeds or fails, counting its runs
#[derive(Debug)]
pub struct ScriptedLoader {
    pub name: &'static str,
    pub fail: bool,
    pub runs: Arc<AtomicUsize>,
}

#[async_trait]
impl AsyncLoader for ScriptedLoader {
    fn name(&self) -> &str {
        self.name
    }

    async fn load(&self, _services: &ServiceRegistry) -> KernelResult<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(Error::Other(format!("{} unavailable", self.name)))
        } else {
            Ok(())
        }
    }
}

/// Read the `clicks` counter rendered into a fixture's state
pub fn clicks(state: &ComponentState) -> Value {
    state.get("clicks").cloned().unwrap_or(Value::Null)
}

// ===== APPLICATION HELPERS =====

/// Config requiring exactly `required`, defaults otherwise
pub fn config_requiring(required: &[&str]) -> AppConfig {
    AppConfig {
        required_services: required.iter().map(|s| s.to_string()).collect(),
        ..AppConfig::default()
    }
}

/// Surface with the loading indicator plus the given elements
pub fn page_with(ids: &[&str]) -> MemorySurface {
    let mut surface = MemorySurface::with_elements(ids.iter().copied());
    surface.insert_element(DEFAULT_LOADING_ELEMENT);
    surface
}

/// Surface with the loading indicator, the theme toggle and the given elements
pub fn page_with_toggle(ids: &[&str]) -> MemorySurface {
    let mut surface = page_with(ids);
    surface.insert_element(DEFAULT_THEME_TOGGLE_ELEMENT);
    surface
}

const SYSTEM_EVENTS: [&str; 8] = [
    "bootstrap.start",
    "stage.begin",
    "stage.complete",
    "bootstrap.complete",
    "bootstrap.failed",
    "component.attached",
    "theme.changed",
    "application.shutdown",
];

const STAGE_EVENTS: [&str; 2] = ["stage.progress", "stage.warning"];

/// Everything published on the application's dispatcher
#[derive(Debug, Default)]
pub struct EventLog {
    pub system: Mutex<Vec<SystemEvent>>,
    pub stage: Mutex<Vec<StageEvent>>,
}

impl EventLog {
    pub fn attach(app: &mut Application<MemorySurface>) -> Arc<Self> {
        let log = Arc::new(Self::default());
        for name in SYSTEM_EVENTS {
            let system = log.clone();
            app.events_mut().register_handler(name, move |event: &dyn Event| {
                if let Some(event) = event.as_any().downcast_ref::<SystemEvent>() {
                    system.system.lock().expect("event log poisoned").push(event.clone());
                }
                EventResult::Continue
            });
        }
        for name in STAGE_EVENTS {
            let stage = log.clone();
            app.events_mut().register_handler(name, move |event: &dyn Event| {
                if let Some(event) = event.as_any().downcast_ref::<StageEvent>() {
                    stage.stage.lock().expect("event log poisoned").push(event.clone());
                }
                EventResult::Continue
            });
        }
        log
    }

    pub fn system(&self) -> Vec<SystemEvent> {
        self.system.lock().expect("event log poisoned").clone()
    }

    pub fn stage(&self) -> Vec<StageEvent> {
        self.stage.lock().expect("event log poisoned").clone()
    }

    /// IDs of the stages that began, in order
    pub fn stages_begun(&self) -> Vec<String> {
        self.system()
            .into_iter()
            .filter_map(|event| match event {
                SystemEvent::StageBegin { stage_id } => Some(stage_id),
                _ => None,
            })
            .collect()
    }

    /// Component list carried by `bootstrap.complete`, if it was published
    pub fn completed_with(&self) -> Option<Vec<String>> {
        self.system().into_iter().find_map(|event| match event {
            SystemEvent::BootstrapComplete { components } => Some(components),
            _ => None,
        })
    }
}

//! Record search: the canonical case schema, the adapter from the records
//! API shape, the service holding the cases and the deferred search screen.
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use mosaic_core::component::{Component, ComponentState, StatePatch};
use mosaic_core::kernel::error::Result as KernelResult;
use mosaic_core::service::ServiceError;
use mosaic_core::{AsyncLoader, DependencyBundle, KernelError, Markup, Service, ServiceRegistry, UiEvent};

pub const SERVICE: &str = "cases";
pub const COMPONENT: &str = "search";
pub const MOUNT: &str = "search-root";

/// Surface event carrying `{"query": ...}` from the search box
pub const QUERY_EVENT: &str = "input";

/// Cases known before any import has run, in the records API shape
const SEED_CASES: &str = r#"[
    {"caseNumber": 101, "caseTitle": "Lease dispute", "clientName": "Harper & Co", "state": "OPEN", "labels": "property,urgent"},
    {"caseNumber": 102, "caseTitle": "Trademark filing", "clientName": "Northwind", "state": "PENDING", "labels": "ip"},
    {"caseNumber": 103, "caseTitle": "Contract review", "clientName": "Harper & Co", "state": "RESOLVED"}
]"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Open,
    Pending,
    Closed,
}

/// The one case shape used everywhere inside the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: String,
    pub title: String,
    pub client: String,
    pub status: CaseStatus,
    pub tags: Vec<String>,
}

impl CaseRecord {
    /// Case-insensitive match on title and client, exact match on id and tags.
    /// A blank query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self.client.to_lowercase().contains(&query)
            || self.id.to_lowercase() == query
            || self.tags.iter().any(|tag| *tag == query)
    }
}

/// A case as the records API returns it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCase {
    pub case_number: u64,
    pub case_title: String,
    #[serde(default)]
    pub client_name: Option<String>,
    pub state: String,
    /// Comma separated
    #[serde(default)]
    pub labels: Option<String>,
}

impl TryFrom<ApiCase> for CaseRecord {
    type Error = KernelError;

    fn try_from(api: ApiCase) -> Result<Self, Self::Error> {
        let status = match api.state.trim().to_ascii_uppercase().as_str() {
            "OPEN" | "NEW" => CaseStatus::Open,
            "PENDING" | "ON_HOLD" => CaseStatus::Pending,
            "CLOSED" | "RESOLVED" => CaseStatus::Closed,
            other => {
                return Err(KernelError::Other(format!(
                    "case {} has unknown state '{}'",
                    api.case_number, other
                )));
            }
        };
        let tags = api
            .labels
            .unwrap_or_default()
            .split(',')
            .map(|label| label.trim().to_lowercase())
            .filter(|label| !label.is_empty())
            .collect();

        Ok(CaseRecord {
            id: format!("C-{:04}", api.case_number),
            title: api.case_title.trim().to_string(),
            client: api.client_name.unwrap_or_default().trim().to_string(),
            status,
            tags,
        })
    }
}

/// Holds the known cases. Imports upsert by id.
#[derive(Debug, Default)]
pub struct CaseService {
    records: Mutex<Vec<CaseRecord>>,
}

impl CaseService {
    /// Service pre-filled with the built-in cases
    pub fn seeded() -> Self {
        let service = Self::default();
        match serde_json::from_str::<Vec<ApiCase>>(SEED_CASES) {
            Ok(batch) => {
                service.import(batch);
            }
            Err(e) => log::warn!("Built-in cases could not be parsed: {}", e),
        }
        service
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CaseRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn search(&self, query: &str) -> Vec<CaseRecord> {
        self.lock().iter().filter(|r| r.matches(query)).cloned().collect()
    }

    pub fn count_with(&self, status: CaseStatus) -> usize {
        self.lock().iter().filter(|r| r.status == status).count()
    }

    /// Adapt and store a batch from the records API. Cases that do not adapt
    /// are logged and skipped. Returns how many were stored.
    pub fn import(&self, batch: Vec<ApiCase>) -> usize {
        let mut records = self.lock();
        let mut imported = 0;
        for api in batch {
            match CaseRecord::try_from(api) {
                Ok(record) => {
                    match records.iter_mut().find(|r| r.id == record.id) {
                        Some(existing) => *existing = record,
                        None => records.push(record),
                    }
                    imported += 1;
                }
                Err(e) => log::warn!("Skipping case: {}", e),
            }
        }
        imported
    }
}

impl Service for CaseService {
    fn name(&self) -> &'static str {
        "CaseService"
    }
}

/// Imports a records API export from disk during the external loading stage
#[derive(Debug)]
pub struct RecordImportLoader {
    path: PathBuf,
}

impl RecordImportLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AsyncLoader for RecordImportLoader {
    fn name(&self) -> &str {
        "record-import"
    }

    async fn load(&self, services: &ServiceRegistry) -> KernelResult<()> {
        let cases = services
            .get_concrete::<CaseService>(SERVICE)
            .ok_or_else(|| ServiceError::NotFound {
                name: SERVICE.to_string(),
            })?;
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            KernelError::Other(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let batch: Vec<ApiCase> = serde_json::from_str(&raw).map_err(|e| {
            KernelError::Other(format!("{} is not a case export: {}", self.path.display(), e))
        })?;
        let imported = cases.import(batch);
        log::info!("Imported {} cases from {}", imported, self.path.display());
        Ok(())
    }
}

/// Search screen. Deferrable: its data is warmed at startup and it attaches
/// once the search screen is shown.
#[derive(Debug, Default)]
pub struct RecordSearchComponent {
    cases: Option<Arc<CaseService>>,
}

impl RecordSearchComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn results_patch(&self, query: &str) -> StatePatch {
        match &self.cases {
            Some(cases) => results_patch(cases, query),
            None => results_patch(&CaseService::default(), query),
        }
    }
}

/// Search screen state for `query` against the current cases
pub fn results_patch(cases: &CaseService, query: &str) -> StatePatch {
    let results = cases.search(query);
    StatePatch::new()
        .with("query", query)
        .with("total", results.len())
        .with("results", json!(results))
}

#[async_trait]
impl Component for RecordSearchComponent {
    fn mount_point(&self) -> &str {
        MOUNT
    }

    fn is_deferrable(&self) -> bool {
        true
    }

    async fn on_init(&mut self, services: &DependencyBundle) -> KernelResult<StatePatch> {
        self.cases = Some(services.require::<CaseService>(SERVICE)?);
        Ok(self.results_patch(""))
    }

    fn render(&self, state: &ComponentState) -> Markup {
        let query = state.get_as::<String>("query").unwrap_or_default();
        let results = state.get_as::<Vec<CaseRecord>>("results").unwrap_or_default();
        let rows: String = results
            .iter()
            .map(|r| {
                format!(
                    "<li data-id=\"{}\">{} ({}, {:?})</li>",
                    Markup::escape(&r.id),
                    Markup::escape(&r.title),
                    Markup::escape(&r.client),
                    r.status
                )
            })
            .collect();
        Markup::new(format!(
            "<section class=\"search\"><input value=\"{}\"/><p>{} results</p><ul>{}</ul></section>",
            Markup::escape(&query),
            results.len(),
            rows
        ))
    }

    fn handle_event(&mut self, event: &UiEvent, _state: &ComponentState) -> Option<StatePatch> {
        if event.kind != QUERY_EVENT {
            return None;
        }
        let query = event.payload.get("query").and_then(|q| q.as_str()).unwrap_or_default();
        Some(self.results_patch(query))
    }
}

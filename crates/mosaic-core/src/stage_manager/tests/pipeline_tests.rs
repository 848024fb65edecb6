use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::event::{Event, EventResult};
use crate::kernel::error::{Error, Result};
use crate::stage_manager::error::StageSystemError;
use crate::stage_manager::tests::Harness;
use crate::stage_manager::{Stage, StageContext, StagePipeline, StageResult, BOOTSTRAP_PIPELINE};

#[derive(Debug)]
struct ScriptedStage {
    id: &'static str,
    fail: bool,
    critical: bool,
    runs: Arc<AtomicUsize>,
}

impl ScriptedStage {
    fn new(id: &'static str, runs: &Arc<AtomicUsize>) -> Self {
        Self { id, fail: false, critical: true, runs: runs.clone() }
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn best_effort(mut self) -> Self {
        self.critical = false;
        self
    }
}

#[async_trait]
impl Stage for ScriptedStage {
    fn id(&self) -> &str { self.id }
    fn name(&self) -> &str { self.id }
    fn description(&self) -> &str { "scripted" }

    fn is_critical(&self) -> bool {
        self.critical
    }

    async fn execute(&self, _context: &mut StageContext<'_>) -> Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(Error::Other(format!("{} exploded", self.id)))
        } else {
            Ok(())
        }
    }
}

fn scripted(stages: Vec<ScriptedStage>) -> StagePipeline {
    let stages = stages.into_iter().map(|s| Box::new(s) as Box<dyn Stage>).collect();
    StagePipeline::with_stages("test", "scripted", stages)
}

#[test]
fn test_bootstrap_pipeline_matches_definition() {
    let pipeline = StagePipeline::bootstrap();
    assert_eq!(pipeline.stage_ids(), BOOTSTRAP_PIPELINE.stages);
    assert_eq!(
        BOOTSTRAP_PIPELINE.stages,
        [
            "core::initialize_services",
            "core::theme_setup",
            "core::initialize_components",
            "core::external_loaders",
            "core::completion",
        ]
    );
}

#[tokio::test]
async fn test_critical_failure_stops_the_pipeline() {
    let runs = Arc::new(AtomicUsize::new(0));
    let pipeline = scripted(vec![
        ScriptedStage::new("first", &runs),
        ScriptedStage::new("second", &runs).failing(),
        ScriptedStage::new("third", &runs),
    ]);

    let mut harness = Harness::default();
    let err = pipeline
        .execute(&mut harness.context())
        .await
        .expect_err("second stage is critical");

    assert_eq!(runs.load(Ordering::SeqCst), 2, "Third stage must not run");
    match &err {
        Error::StageSystem(StageSystemError::StageExecutionFailed { stage_id, source }) => {
            assert_eq!(stage_id, "second");
            assert!(matches!(**source, Error::Other(ref m) if m == "second exploded"));
        }
        other => panic!("Unexpected error: {:?}", other),
    }
    assert!(matches!(err.root_cause(), Error::Other(_)));
}

#[tokio::test]
async fn test_best_effort_failure_is_recorded_and_skipped() {
    let runs = Arc::new(AtomicUsize::new(0));
    let pipeline = scripted(vec![
        ScriptedStage::new("first", &runs).failing().best_effort(),
        ScriptedStage::new("second", &runs),
    ]);

    let warnings = Arc::new(AtomicUsize::new(0));
    let mut harness = Harness::default();
    let seen = warnings.clone();
    harness.events.register_handler("stage.warning", move |_event: &dyn Event| {
        seen.fetch_add(1, Ordering::SeqCst);
        EventResult::Continue
    });

    let results = pipeline.execute(&mut harness.context()).await.expect("pipeline completes");

    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(warnings.load(Ordering::SeqCst), 1);
    assert_eq!(results[0].0, "first");
    assert!(matches!(&results[0].1, StageResult::Failure(m) if m.contains("first exploded")));
    assert_eq!(results[1], ("second".to_string(), StageResult::Success));
}

#[tokio::test]
async fn test_stage_events_bracket_each_stage() {
    let runs = Arc::new(AtomicUsize::new(0));
    let pipeline = scripted(vec![ScriptedStage::new("only", &runs).failing().best_effort()]);

    let log = Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut harness = Harness::default();
    for name in ["stage.begin", "stage.complete"] {
        let sink = log.clone();
        harness.events.register_handler(name, move |event: &dyn Event| {
            sink.lock().expect("log lock").push(event.name());
            EventResult::Continue
        });
    }

    pipeline.execute(&mut harness.context()).await.expect("pipeline completes");

    assert_eq!(*log.lock().expect("log lock"), vec!["stage.begin", "stage.complete"]);
}

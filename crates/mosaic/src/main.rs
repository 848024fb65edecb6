mod cli;
mod features;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{info, warn};
use serde_json::json;

use mosaic_core::kernel::constants::CLICK_EVENT;
use mosaic_core::kernel::error::Result as KernelResult;
use mosaic_core::storage::{FileStore, MemoryStore};
use mosaic_core::{AppConfig, Application, KeyValueStore, MemorySurface, UiEvent};

use cli::CliArgs;
use features::records;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::from(2);
        }
    };
    cli::init_logging(args.log_level.as_deref(), &config.log_level);

    let mut app = match build(&args, config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to initialize application: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = app.bootstrap().await {
        eprintln!("Bootstrap failed: {}", e.root_cause());
        print!("{}", cli::summary(&app));
        return ExitCode::FAILURE;
    }

    features::refresh(&mut app);
    interact(&mut app, &args);
    features::refresh(&mut app);
    print!("{}", cli::summary(&app));

    info!("Shutting down application...");
    if let Err(e) = app.shutdown() {
        warn!("Shutdown was not clean: {}", e);
    }
    ExitCode::SUCCESS
}

fn build(args: &CliArgs, config: AppConfig) -> KernelResult<Application<MemorySurface>> {
    let store: Arc<dyn KeyValueStore> = match &args.store {
        Some(path) => Arc::new(FileStore::open(path)?),
        None => Arc::new(MemoryStore::new()),
    };
    let page = cli::build_page(&config, &args.omit_mount);

    let mut app = Application::new(config, page);
    features::install(&mut app, store, args.records.clone());
    Ok(app)
}

/// Replay the requested navigation and input against the ready application.
/// Each step that fails is logged and skipped.
fn interact(app: &mut Application<MemorySurface>, args: &CliArgs) {
    for screen in &args.show {
        let Some(mount) = app.component(screen).map(|c| c.mount_point().to_string()) else {
            warn!("No screen named '{}'", screen);
            continue;
        };
        app.surface_mut().insert_element(mount);
        if let Err(e) = app.show_screen(screen) {
            warn!("Could not show '{}': {}", screen, e);
        }
    }

    for element in &args.click {
        match app.dispatch_ui_event(&UiEvent::new(CLICK_EVENT, element.as_str())) {
            Ok(true) => info!("Click on '{}' handled", element),
            Ok(false) => warn!("Click on '{}' had no effect", element),
            Err(e) => warn!("Click on '{}' failed: {}", element, e),
        }
    }

    if let Some(query) = &args.search {
        let event = UiEvent::new(records::QUERY_EVENT, records::MOUNT).with_payload(json!({ "query": query }));
        if let Err(e) = app.dispatch_ui_event(&event) {
            warn!("Search failed: {}", e);
        }
    }
}

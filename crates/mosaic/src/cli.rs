use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Parser;

use mosaic_core::kernel::constants::{APP_NAME, APP_VERSION};
use mosaic_core::kernel::error::Result as KernelResult;
use mosaic_core::service::ThemeService;
use mosaic_core::{AppConfig, Application, MemorySurface, ServiceKey};

use crate::features::{self, dashboard, records};

/// Mosaic: boots the feature modules against an in-memory page
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Configuration file (.json, .toml, .yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Persist posts and the theme preference in this JSON file
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Records API export imported while loading
    #[arg(long, value_name = "PATH")]
    pub records: Option<PathBuf>,

    /// Show a deferred screen after startup (repeatable)
    #[arg(long = "show", value_name = "SCREEN")]
    pub show: Vec<String>,

    /// Leave an element off the page (repeatable)
    #[arg(long = "omit-mount", value_name = "ID")]
    pub omit_mount: Vec<String>,

    /// Click an element after startup (repeatable)
    #[arg(long = "click", value_name = "ID")]
    pub click: Vec<String>,

    /// Type a query into the search screen
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Log level, overriding RUST_LOG and the config file
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// The configuration file if one was given, defaults otherwise
    pub fn load_config(&self) -> KernelResult<AppConfig> {
        match &self.config {
            Some(path) => AppConfig::load(path),
            None => Ok(AppConfig::default()),
        }
    }
}

/// Install the log sink. The CLI level wins over `RUST_LOG`, which wins over
/// the config file.
pub fn init_logging(cli_level: Option<&str>, config_level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(config_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if let Some(level) = cli_level {
        builder.parse_filters(level);
    }
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

/// The page as served: loading indicator, theme toggle and the feature
/// mount points, minus the omitted elements.
pub fn build_page(config: &AppConfig, omit: &[String]) -> MemorySurface {
    let elements = [config.loading_element.as_str(), config.theme_toggle_element.as_str()]
        .into_iter()
        .chain(features::PAGE_MOUNTS.iter().copied())
        .filter(|id| !omit.iter().any(|o| o == id));
    MemorySurface::with_elements(elements)
}

/// Plain-text status report printed after a run
pub fn summary(app: &Application<MemorySurface>) -> String {
    let list = |names: &[String]| {
        if names.is_empty() {
            "-".to_string()
        } else {
            names.join(", ")
        }
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} v{}: {}", APP_NAME, APP_VERSION, app.phase());
    let _ = writeln!(out, "active: {}", list(&app.component_names()));
    let _ = writeln!(out, "deferred: {}", list(&app.deferred_names()));
    let _ = writeln!(out, "failed: {}", list(app.failed_components()));
    if let Some(theme) = app.service_as::<ThemeService>(ServiceKey::THEME.as_str()) {
        let _ = writeln!(out, "theme: {}", theme.current());
    }
    if let Some(dashboard) = app.component(dashboard::COMPONENT) {
        let figure = |key: &str| dashboard.state().get_as::<u64>(key).unwrap_or(0);
        let _ = writeln!(
            out,
            "dashboard: {} posts, {} open, {} pending, {} closed, theme {}",
            figure("posts"),
            figure("open_cases"),
            figure("pending_cases"),
            figure("closed_cases"),
            dashboard.state().get_as::<String>("theme").unwrap_or_else(|| "-".to_string())
        );
    }
    if let Some(search) = app.component(records::COMPONENT) {
        let total = search.state().get_as::<u64>("total").unwrap_or(0);
        let query = search.state().get_as::<String>("query").unwrap_or_default();
        let _ = writeln!(out, "search: {} results for '{}'", total, query);
    }
    let loading = &app.config().loading_element;
    if let Some(message) = app.surface().markup(loading).filter(|m| !m.is_empty()) {
        let _ = writeln!(out, "{}: {}", loading, message);
    }
    out
}

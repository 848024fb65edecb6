/// Application name
pub const APP_NAME: &str = "Mosaic";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Element id of the loading indicator hidden once bootstrap completes
pub const DEFAULT_LOADING_ELEMENT: &str = "loading-screen";

/// Element id of the theme toggle control wired during theme setup
pub const DEFAULT_THEME_TOGGLE_ELEMENT: &str = "theme-toggle";

/// Message shown in place of the loading indicator when bootstrap fails
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Failed to load the application. Please refresh the page.";

/// Default log level used when neither the CLI nor the environment sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Persistent store key holding the theme preference
pub const THEME_STORE_KEY: &str = "theme";

/// Surface event kind delivered by clickable controls
pub const CLICK_EVENT: &str = "click";

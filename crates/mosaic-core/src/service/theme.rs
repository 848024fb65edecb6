use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::kernel::constants::THEME_STORE_KEY;
use crate::kernel::error::Result;
use crate::service::Service;
use crate::storage::KeyValueStore;

/// Visual theme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Persists the theme preference in a key-value store.
///
/// The theme setup bootstrap stage looks this service up under
/// [`ServiceKey::THEME`](crate::service::ServiceKey::THEME).
#[derive(Debug)]
pub struct ThemeService {
    store: Arc<dyn KeyValueStore>,
    current: Mutex<Theme>,
}

impl ThemeService {
    /// Create the service, restoring a previously saved preference.
    /// An unreadable preference falls back to the default theme.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let current = match store.get_json::<Theme>(THEME_STORE_KEY) {
            Ok(Some(theme)) => theme,
            Ok(None) => Theme::default(),
            Err(e) => {
                log::warn!("Ignoring unreadable theme preference: {}", e);
                Theme::default()
            }
        };
        Self {
            store,
            current: Mutex::new(current),
        }
    }

    pub fn current(&self) -> Theme {
        *self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Switch to `theme` and persist it.
    pub fn set(&self, theme: Theme) -> Result<()> {
        self.store.set_json(THEME_STORE_KEY, &theme)?;
        *self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = theme;
        log::info!("Theme switched to {}", theme);
        Ok(())
    }

    /// Flip between light and dark, returning the new theme.
    pub fn toggle(&self) -> Result<Theme> {
        let next = self.current().toggled();
        self.set(next)?;
        Ok(next)
    }
}

impl Service for ThemeService {
    fn name(&self) -> &'static str {
        "ThemeService"
    }
}

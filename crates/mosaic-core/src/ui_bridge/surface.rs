use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug};

use serde_json::Value;

use crate::ui_bridge::error::UiBridgeError;

/// Rendered markup attached under a mount point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn new(text: impl Into<String>) -> Self {
        Markup(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Escape text for interpolation into markup or a quoted attribute
    pub fn escape(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}

impl From<String> for Markup {
    fn from(text: String) -> Self {
        Markup(text)
    }
}

impl From<&str> for Markup {
    fn from(text: &str) -> Self {
        Markup(text.to_string())
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle returned when a listener is attached, used to detach it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// An interaction raised by the surface on one of its elements
#[derive(Debug, Clone, PartialEq)]
pub struct UiEvent {
    /// Event kind, e.g. `click` or `submit`
    pub kind: String,
    /// Element the event was raised on
    pub target: String,
    /// Event payload such as form values
    pub payload: Value,
}

impl UiEvent {
    pub fn new(kind: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: target.into(),
            payload: Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

/// The live UI surface components render into (the DOM-equivalent).
///
/// Each component owns exactly one mount point and is its only writer.
pub trait UiSurface: Send + Debug {
    /// Check whether an element with `id` currently exists
    fn resolve(&self, id: &str) -> bool;

    /// Replace everything under element `id` with `markup`
    fn replace_markup(&mut self, id: &str, markup: &Markup) -> Result<(), UiBridgeError>;

    /// Attach a listener for `event` on element `id`
    fn add_listener(&mut self, id: &str, event: &str) -> Result<ListenerId, UiBridgeError>;

    /// Detach a listener. Returns whether it was attached.
    fn remove_listener(&mut self, listener: ListenerId) -> bool;

    /// Hide element `id`
    fn hide(&mut self, id: &str) -> Result<(), UiBridgeError>;
}

#[derive(Debug, Default, Clone)]
struct Element {
    markup: Markup,
    hidden: bool,
    writes: usize,
}

#[derive(Debug, Clone)]
struct Binding {
    element: String,
    event: String,
}

/// In-memory surface used by the headless host and by tests.
#[derive(Default)]
pub struct MemorySurface {
    elements: HashMap<String, Element>,
    listeners: BTreeMap<ListenerId, Binding>,
    next_listener: u64,
}

impl Debug for MemorySurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.elements.keys().collect();
        ids.sort();
        f.debug_struct("MemorySurface")
            .field("elements", &ids)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface that already contains the given elements
    pub fn with_elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut surface = Self::new();
        for id in ids {
            surface.insert_element(id);
        }
        surface
    }

    /// Add an empty element, e.g. when a screen becomes visible
    pub fn insert_element(&mut self, id: impl Into<String>) {
        self.elements.entry(id.into()).or_default();
    }

    /// Remove an element together with every listener bound to it
    pub fn remove_element(&mut self, id: &str) -> bool {
        self.listeners.retain(|_, binding| binding.element != id);
        self.elements.remove(id).is_some()
    }

    pub fn markup(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.markup.as_str())
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.hidden)
    }

    /// Number of times markup under `id` was replaced
    pub fn write_count(&self, id: &str) -> usize {
        self.elements.get(id).map_or(0, |e| e.writes)
    }

    pub fn has_listener(&self, id: &str, event: &str) -> bool {
        self.listeners
            .values()
            .any(|binding| binding.element == id && binding.event == event)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl UiSurface for MemorySurface {
    fn resolve(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn replace_markup(&mut self, id: &str, markup: &Markup) -> Result<(), UiBridgeError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| UiBridgeError::ElementNotFound(id.to_string()))?;
        element.markup = markup.clone();
        element.writes += 1;
        Ok(())
    }

    fn add_listener(&mut self, id: &str, event: &str) -> Result<ListenerId, UiBridgeError> {
        if !self.elements.contains_key(id) {
            return Err(UiBridgeError::ListenerAttachFailed {
                element: id.to_string(),
                event: event.to_string(),
                reason: "element not found".to_string(),
            });
        }
        let listener = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(
            listener,
            Binding {
                element: id.to_string(),
                event: event.to_string(),
            },
        );
        Ok(listener)
    }

    fn remove_listener(&mut self, listener: ListenerId) -> bool {
        self.listeners.remove(&listener).is_some()
    }

    fn hide(&mut self, id: &str) -> Result<(), UiBridgeError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| UiBridgeError::ElementNotFound(id.to_string()))?;
        element.hidden = true;
        Ok(())
    }
}

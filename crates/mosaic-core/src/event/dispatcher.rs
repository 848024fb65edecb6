use std::collections::HashMap;
use std::fmt;

use crate::event::{Event, EventHandler, EventResult};

/// Event dispatcher owned by the application.
///
/// Handlers are keyed by event name and run synchronously in registration
/// order. A handler returning [`EventResult::Stop`] ends propagation for that
/// event.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<&'static str, Vec<EventHandler>>,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&&str> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("EventDispatcher")
            .field("events", &names)
            .field("handlers_count", &self.handler_count())
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every event whose name is `event_name`
    pub fn register_handler<F>(&mut self, event_name: &'static str, handler: F)
    where
        F: Fn(&dyn Event) -> EventResult + Send + Sync + 'static,
    {
        self.handlers.entry(event_name).or_default().push(Box::new(handler));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Deliver `event` to its handlers right away
    pub fn dispatch(&self, event: &dyn Event) -> EventResult {
        log::trace!("Dispatching event '{}'", event.name());
        let Some(handlers) = self.handlers.get(event.name()) else {
            return EventResult::Continue;
        };
        for handler in handlers {
            if handler(event) == EventResult::Stop {
                return EventResult::Stop;
            }
        }
        EventResult::Continue
    }
}

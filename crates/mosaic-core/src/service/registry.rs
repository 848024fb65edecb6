use std::collections::HashMap;
use std::sync::Arc;

use crate::service::{downcast_service, DependencyBundle, Service, ServiceKey};

/// Name-keyed store of singleton services.
///
/// Registration overwrites (last write wins). Overwrites are logged as
/// conflicts so they never go unnoticed. Lookups report absence with `None`
/// and leave the decision about fatality to the caller.
#[derive(Default, Debug)]
pub struct ServiceRegistry {
    services: HashMap<ServiceKey, Arc<dyn Service>>,
}

impl ServiceRegistry {
    /// Create a new empty service registry
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Register a service under `key`, replacing any previous entry.
    pub fn register(&mut self, key: impl Into<ServiceKey>, service: Arc<dyn Service>) {
        let key = key.into();
        if let Some(previous) = self.services.insert(key.clone(), service) {
            log::warn!(
                "Service key '{}' registered twice; replacing {} with {}",
                key,
                previous.name(),
                self.services[&key].name()
            );
        } else {
            log::debug!("Registered service '{}'", key);
        }
    }

    /// Register a concrete service instance.
    pub fn register_instance<S: Service>(&mut self, key: impl Into<ServiceKey>, service: Arc<S>) {
        self.register(key, service);
    }

    /// Look up a service by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.services.get(name).cloned()
    }

    /// Look up a service by name and downcast it to `T`.
    /// Returns `None` when the name is unknown or the type does not match.
    pub fn get_concrete<T: Service>(&self, name: &str) -> Option<Arc<T>> {
        self.services.get(name).and_then(downcast_service::<T>)
    }

    /// Check whether a service is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Registered service names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.keys().map(|k| k.as_str().to_string()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Return the subset of `required` names that do not resolve, in the
    /// order they were given.
    pub fn missing<S: AsRef<str>>(&self, required: &[S]) -> Vec<String> {
        required
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.contains(name))
            .map(str::to_string)
            .collect()
    }

    /// Build a dependency bundle holding the named services.
    /// Unknown names are skipped with a warning.
    pub fn bundle<S: AsRef<str>>(&self, names: &[S]) -> DependencyBundle {
        let mut selected = HashMap::new();
        for name in names.iter().map(AsRef::as_ref) {
            match self.services.get_key_value(name) {
                Some((key, service)) => {
                    selected.insert(key.clone(), service.clone());
                }
                None => log::warn!("Dependency bundle requested unknown service '{}'", name),
            }
        }
        DependencyBundle::from_map(selected)
    }

    /// Build a dependency bundle holding every registered service.
    pub fn snapshot(&self) -> DependencyBundle {
        DependencyBundle::from_map(self.services.clone())
    }
}

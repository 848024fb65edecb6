use std::collections::HashMap;
use std::sync::Arc;

use crate::service::{downcast_service, Service, ServiceError, ServiceKey};

/// Immutable name → service snapshot handed to every component.
///
/// Built once per bootstrap and shared behind an `Arc`, so two components
/// asking for the same name receive the same service instance.
#[derive(Default, Debug, Clone)]
pub struct DependencyBundle {
    services: HashMap<ServiceKey, Arc<dyn Service>>,
}

impl DependencyBundle {
    /// An empty bundle, useful for components without dependencies
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(services: HashMap<ServiceKey, Arc<dyn Service>>) -> Self {
        Self { services }
    }

    /// Look up a service by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.services.get(name).cloned()
    }

    /// Look up a service by name and downcast it to `T`.
    pub fn get_concrete<T: Service>(&self, name: &str) -> Option<Arc<T>> {
        self.services.get(name).and_then(downcast_service::<T>)
    }

    /// Like [`get_concrete`](Self::get_concrete), but reports why the lookup failed.
    pub fn require<T: Service>(&self, name: &str) -> Result<Arc<T>, ServiceError> {
        let service = self.services.get(name).ok_or_else(|| ServiceError::NotFound {
            name: name.to_string(),
        })?;
        downcast_service::<T>(service).ok_or_else(|| ServiceError::TypeMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Names held by this bundle, sorted
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
}

//! # Mosaic Core Services
//!
//! Services are long-lived singletons holding business logic. They are
//! registered by name in the [`ServiceRegistry`] during the first bootstrap
//! stage and handed to components through an immutable [`DependencyBundle`].
pub mod bundle;
pub mod error;
pub mod registry;
pub mod theme;

use std::any::Any;
use std::borrow::{Borrow, Cow};
use std::fmt::{self, Debug};
use std::sync::Arc;

pub use bundle::DependencyBundle;
pub use error::ServiceError;
pub use registry::ServiceRegistry;
pub use theme::{Theme, ThemeService};

/// Marker trait for anything that can live in the service registry.
///
/// The `Any` bound lets callers recover the concrete type through
/// [`ServiceRegistry::get_concrete`] or [`DependencyBundle::get_concrete`].
pub trait Service: Any + Send + Sync + Debug {
    /// Human-readable name used in diagnostics
    fn name(&self) -> &'static str;
}

/// Constructs a service with no arguments. Run once during service init.
pub type ServiceFactory = Box<dyn Fn() -> Arc<dyn Service> + Send + Sync>;

/// Name under which a service is registered.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey(Cow<'static, str>);

impl ServiceKey {
    /// Theme preference service consumed by the theme setup stage
    pub const THEME: ServiceKey = ServiceKey::from_static("theme");

    pub const fn from_static(name: &'static str) -> Self {
        ServiceKey(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        ServiceKey(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ServiceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceKey {
    fn from(name: &str) -> Self {
        ServiceKey::new(name)
    }
}

impl From<String> for ServiceKey {
    fn from(name: String) -> Self {
        ServiceKey(Cow::Owned(name))
    }
}

impl From<&ServiceKey> for ServiceKey {
    fn from(key: &ServiceKey) -> Self {
        key.clone()
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceKey({:?})", self.as_str())
    }
}

/// Downcast a stored service to its concrete type.
pub(crate) fn downcast_service<T: Service>(service: &Arc<dyn Service>) -> Option<Arc<T>> {
    let arc_any: Arc<dyn Any + Send + Sync> = service.clone();
    Arc::downcast::<T>(arc_any).ok()
}

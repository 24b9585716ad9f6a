//! Fluent construction of a [`Container`].

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::config::ContainerConfig;
use crate::container::Container;
use crate::definition::ServiceDefinition;
use crate::host::{Host, TypeRegistry};
use crate::observer::{Observers, ResolutionObserver};
use crate::parameters::Parameters;
use crate::value::Value;

/// Collects definitions, parameters, the host and tunables, then builds an
/// immutable [`Container`].
///
/// Defining the same service id twice keeps the last definition, in the
/// position of the first. Without a host, an empty [`TypeRegistry`] is used,
/// so every `get` fails with an unknown-class error.
///
/// # Examples
///
/// ```
/// use ferrous_container::{Container, ContainerConfig, FailurePolicy, ServiceDefinition, TypeRegistry};
///
/// let mut types = TypeRegistry::new();
/// types.register("Clock", |_| Ok(std::time::Instant::now()));
///
/// let container = Container::builder()
///     .host(types)
///     .service("clock", ServiceDefinition::new("Clock"))
///     .config(ContainerConfig::default().with_failure_policy(FailurePolicy::Reset))
///     .build();
///
/// assert!(container.has("clock"));
/// assert!(container.get("clock").is_ok());
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    services: IndexMap<String, ServiceDefinition>,
    parameters: Parameters,
    host: Option<Arc<dyn Host>>,
    config: ContainerConfig,
    observers: Observers,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service(mut self, id: impl Into<String>, definition: ServiceDefinition) -> Self {
        self.services.insert(id.into(), definition);
        self
    }

    pub fn services<K, I>(mut self, services: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ServiceDefinition)>,
    {
        self.services
            .extend(services.into_iter().map(|(id, def)| (id.into(), def)));
        self
    }

    /// Adds or replaces one top-level parameter.
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key, value);
        self
    }

    /// Replaces the whole parameter tree.
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn host<H: Host + 'static>(mut self, host: H) -> Self {
        self.host = Some(Arc::new(host));
        self
    }

    /// Uses a host that is shared with other containers.
    pub fn shared_host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn build(self) -> Container {
        debug!(
            services = self.services.len(),
            parameters = self.parameters.len(),
            "Building container"
        );
        let host = self
            .host
            .unwrap_or_else(|| Arc::new(TypeRegistry::new()) as Arc<dyn Host>);
        Container::from_parts(self.services, self.parameters, host, self.config, self.observers)
    }
}

//! The container: definition-driven, memoized service resolution.
//!
//! A [`Container`] owns the service definitions, the parameter tree and the
//! instance store. Asking it for a service builds that service on first use,
//! resolving every [`ServiceReference`](crate::ServiceReference) and
//! [`ParameterReference`](crate::ParameterReference) in its argument lists
//! recursively, then hands out the same instance forever after.

use std::any::{type_name, Any};
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, trace, warn};

use crate::builder::ContainerBuilder;
use crate::config::{ContainerConfig, FailurePolicy};
use crate::definition::{Argument, CallDefinition, ServiceDefinition};
use crate::error::{ContainerErrorKind, DiError, DiResult};
use crate::host::{AnyArc, Arguments, Host, Resolved};
use crate::observer::Observers;
use crate::parameters::Parameters;
use crate::reference::Reference;
use crate::validation::{self, ValidationReport};
use crate::value::Value;

mod state;

pub use state::ServiceState;
use state::{cycle_path, ResolutionStack, StackGuard, StateTable};

/// Dependency injection container built from declarative definitions.
///
/// Services are constructed lazily, at most once per id, and shared: every
/// successful [`get`](Container::get) of an id returns the same `Arc`.
///
/// # Thread Safety
///
/// `Container` is `Send + Sync` and cheap to clone (clones share state).
/// Resolution is serialized by a re-entrant lock, so nested references on
/// the resolving thread proceed while other threads wait, and an id raced by
/// two threads is still built only once. A host factory must not block on
/// another thread that resolves from the same container.
///
/// # Examples
///
/// ```
/// use ferrous_container::{Argument, Arguments, Container, ServiceDefinition, TypeRegistry, Value};
/// use std::sync::Arc;
///
/// struct Logger;
/// struct App { logger: Arc<Logger>, env: String }
///
/// let mut types = TypeRegistry::new();
/// types.register("Logger", |_| Ok(Logger));
/// types.register("App", |args: Arguments| {
///     Ok(App { logger: args.service::<Logger>(0)?, env: args.str(1)?.to_string() })
/// });
///
/// let container = Container::builder()
///     .host(types)
///     .service("logger", ServiceDefinition::new("Logger"))
///     .service(
///         "app",
///         ServiceDefinition::new("App")
///             .arg(Argument::service("logger"))
///             .arg(Argument::parameter("env.name")),
///     )
///     .parameter("env", Value::map([("name", Value::from("prod"))]))
///     .build();
///
/// let app = container.get_as::<App>("app").unwrap();
/// let logger = container.get_as::<Logger>("logger").unwrap();
/// assert_eq!(app.env, "prod");
/// assert!(Arc::ptr_eq(&app.logger, &logger));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    pub(crate) services: IndexMap<String, ServiceDefinition>,
    pub(crate) parameters: Parameters,
    pub(crate) host: Arc<dyn Host>,
    pub(crate) config: ContainerConfig,
    pub(crate) observers: Observers,
    states: Mutex<StateTable>,
    resolution: ReentrantMutex<ResolutionStack>,
}

impl Container {
    /// Creates a container with the default configuration and no observers.
    pub fn new<H>(services: IndexMap<String, ServiceDefinition>, parameters: Parameters, host: H) -> Self
    where
        H: Host + 'static,
    {
        Self::from_parts(
            services,
            parameters,
            Arc::new(host),
            ContainerConfig::default(),
            Observers::default(),
        )
    }

    /// Starts a [`ContainerBuilder`].
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_parts(
        services: IndexMap<String, ServiceDefinition>,
        parameters: Parameters,
        host: Arc<dyn Host>,
        config: ContainerConfig,
        observers: Observers,
    ) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                services,
                parameters,
                host,
                config,
                observers,
                states: Mutex::new(StateTable::default()),
                resolution: ReentrantMutex::new(ResolutionStack::default()),
            }),
        }
    }

    /// True iff a definition exists for `id`. Never builds anything.
    pub fn has(&self, id: &str) -> bool {
        self.inner.services.contains_key(id)
    }

    /// Returns the service registered under `id`, building it on first use.
    ///
    /// # Errors
    ///
    /// * [`DiError::ServiceNotFound`] when no definition exists for `id`.
    /// * [`DiError::Container`] for invalid definitions and circular
    ///   references, naming the service that is actually at fault.
    /// * [`DiError::ParameterNotFound`] for a dangling parameter reference.
    /// * Whatever the [`Host`] returned while constructing or calling.
    ///
    /// Errors from nested references are returned unchanged.
    pub fn get(&self, id: &str) -> DiResult<AnyArc> {
        if !self.has(id) {
            return Err(DiError::ServiceNotFound(id.to_string()));
        }

        if let Some(instance) = self.inner.states.lock().instance(id) {
            return Ok(memoized(id, instance));
        }

        let stack = self.inner.resolution.lock();

        // Another thread may have finished it while we waited for the lock.
        if let Some(instance) = self.inner.states.lock().instance(id) {
            return Ok(memoized(id, instance));
        }

        let instance = self.create_service(id, &stack)?;
        self.inner.states.lock().complete(id, instance.clone());
        Ok(instance)
    }

    /// Like [`get`](Container::get), downcast to the concrete type.
    pub fn get_as<T: Any + Send + Sync>(&self, id: &str) -> DiResult<Arc<T>> {
        self.get(id)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                id: id.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Looks up a parameter by dotted path (`"db.host"`).
    ///
    /// The value at the end of the path is returned as-is, even when it is
    /// itself a nested map.
    pub fn get_parameter(&self, id: &str) -> DiResult<&Value> {
        self.inner.parameters.get(id)
    }

    pub fn has_parameter(&self, id: &str) -> bool {
        self.inner.parameters.contains(id)
    }

    /// Construction state of `id`, or `None` when it has no definition.
    pub fn state(&self, id: &str) -> Option<ServiceState> {
        self.has(id).then(|| self.inner.states.lock().state(id))
    }

    /// Service ids in declaration order.
    pub fn service_ids(&self) -> impl Iterator<Item = &str> {
        self.inner.services.keys().map(String::as_str)
    }

    pub fn definition(&self, id: &str) -> Option<&ServiceDefinition> {
        self.inner.services.get(id)
    }

    pub fn parameters(&self) -> &Parameters {
        &self.inner.parameters
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    /// Number of services built so far.
    pub fn resolved_count(&self) -> usize {
        self.inner.states.lock().resolved_count()
    }

    /// Checks every definition without building anything.
    ///
    /// See [`ValidationReport`] for what is reported.
    pub fn validate(&self) -> ValidationReport {
        validation::validate(
            &self.inner.services,
            &self.inner.parameters,
            self.inner.host.as_ref(),
        )
    }

    // Each level of a dependency chain recurses through `get`, `create_service`,
    // `construct` and `resolve_arguments`; their frames must stay small.
    fn create_service(&self, id: &str, stack: &ResolutionStack) -> DiResult<AnyArc> {
        let definition = self
            .inner
            .services
            .get(id)
            .ok_or_else(|| DiError::ServiceNotFound(id.to_string()))?;

        let class = match definition.class.as_deref() {
            Some(class) if !class.is_empty() => class,
            _ => return Err(self.rejected(id, None, ContainerErrorKind::MissingClass)),
        };

        if !self.inner.host.type_exists(class) {
            let kind = ContainerErrorKind::UnknownClass(class.to_string());
            return Err(self.rejected(id, Some(stack), kind));
        }

        if self.inner.states.lock().state(id) == ServiceState::InProgress {
            return Err(self.rejected(id, Some(stack), ContainerErrorKind::CircularReference));
        }

        let _frame = StackGuard::enter(stack, id, self.inner.config.max_depth)?;
        self.inner.states.lock().begin(id);

        let started = self.starting(id, class);
        let result = self.construct(id, class, definition);
        self.finished(id, class, started, &result);
        result
    }

    #[cold]
    #[inline(never)]
    fn rejected(&self, id: &str, stack: Option<&ResolutionStack>, kind: ContainerErrorKind) -> DiError {
        match (&kind, stack) {
            (ContainerErrorKind::CircularReference, Some(stack)) => {
                warn!(service = id, path = %cycle_path(stack, id), "Circular reference detected");
            }
            (ContainerErrorKind::UnknownClass(class), _) => {
                warn!(service = id, class = class.as_str(), "Service class is not known to the host");
            }
            _ => warn!(service = id, "Service definition has no class"),
        }
        DiError::container(id, kind)
    }

    #[inline(never)]
    fn starting(&self, id: &str, class: &str) -> Instant {
        debug!(service = id, class, "Constructing service");
        self.inner.observers.resolving(id);
        Instant::now()
    }

    #[inline(never)]
    fn finished(&self, id: &str, class: &str, started: Instant, result: &DiResult<AnyArc>) {
        match result {
            Ok(_) => {
                let elapsed = started.elapsed();
                debug!(service = id, class, ?elapsed, "Service constructed");
                self.inner.observers.resolved(id, elapsed);
            }
            Err(err) => {
                if self.inner.config.failure_policy == FailurePolicy::Reset {
                    self.inner.states.lock().reset(id);
                }
                debug!(service = id, class, error = %err, "Service construction failed");
                self.inner.observers.failed(id, err);
            }
        }
    }

    fn construct(&self, id: &str, class: &str, definition: &ServiceDefinition) -> DiResult<AnyArc> {
        let arguments = self.resolve_arguments(id, &definition.arguments)?;
        let instance = self
            .inner
            .host
            .instantiate(class, Arguments::new(class, arguments))?;

        if !definition.calls.is_empty() {
            self.initialize_service(&instance, id, class, &definition.calls)?;
        }

        Ok(instance)
    }

    fn resolve_arguments(&self, id: &str, definitions: &[Argument]) -> DiResult<Vec<Resolved>> {
        trace!(service = id, count = definitions.len(), "Resolving arguments");
        let mut resolved = Vec::with_capacity(definitions.len());
        for argument in definitions {
            resolved.push(match argument {
                Argument::Service(reference) => Resolved::Service(self.get(reference.id())?),
                Argument::Parameter(reference) => {
                    Resolved::Value(self.get_parameter(reference.id())?.clone())
                }
                Argument::Literal(value) => Resolved::Value(value.clone()),
            });
        }
        Ok(resolved)
    }

    fn initialize_service(
        &self,
        instance: &AnyArc,
        id: &str,
        class: &str,
        calls: &[CallDefinition],
    ) -> DiResult<()> {
        for call in calls {
            let method = match call.method.as_deref() {
                Some(method) if !method.is_empty() => method,
                _ => return Err(DiError::container(id, ContainerErrorKind::MissingMethod)),
            };

            if !self.inner.host.is_callable(class, method) {
                return Err(DiError::container(
                    id,
                    ContainerErrorKind::UncallableMethod(method.to_string()),
                ));
            }

            let arguments = self.resolve_arguments(id, &call.arguments)?;
            trace!(service = id, method, "Invoking post-construction call");
            self.inner.host.invoke(
                class,
                instance,
                method,
                Arguments::new(format!("{}::{}", class, method), arguments),
            )?;
        }
        Ok(())
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let states = self.inner.states.lock();
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str("Services:\n");
        for (id, definition) in &self.inner.services {
            s.push_str(&format!(
                "  {}: {} [{:?}]\n",
                id,
                definition.class.as_deref().unwrap_or("<no class>"),
                states.state(id)
            ));
        }
        s.push_str(&format!("Parameters: {} top-level\n", self.inner.parameters.len()));
        s.push_str(&format!("Observers: {}\n", self.inner.observers.len()));
        s
    }
}

#[inline(never)]
fn memoized(id: &str, instance: AnyArc) -> AnyArc {
    trace!(service = id, "Resolved from instance store");
    instance
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.inner.services.len())
            .field("parameters", &self.inner.parameters.len())
            .field("resolved", &self.resolved_count())
            .field("observers", &self.inner.observers.has_observers())
            .finish()
    }
}

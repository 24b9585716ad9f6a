//! The host construction facility.
//!
//! The container never knows how to allocate anything itself: it asks a
//! [`Host`] to "build type `T` from these positional arguments" and to "call
//! method `M` on this instance". [`TypeRegistry`] is the stock implementation,
//! a table of factory closures keyed by type name.

use std::any::{type_name, Any};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::value::Value;

/// Type-erased shared instance, as stored in the container's instance store.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Construction capability consumed by the container.
///
/// Errors returned from [`instantiate`](Host::instantiate) and
/// [`invoke`](Host::invoke) reach the caller of
/// [`Container::get`](crate::Container::get) unchanged.
pub trait Host: Send + Sync {
    /// Whether `class` names a constructible type.
    fn type_exists(&self, class: &str) -> bool;

    /// Builds a new instance of `class` from positional arguments.
    fn instantiate(&self, class: &str, args: Arguments) -> DiResult<AnyArc>;

    /// Whether `method` can be invoked on instances of `class`.
    fn is_callable(&self, class: &str, method: &str) -> bool;

    /// Invokes `method` on the instance; any return value is discarded.
    fn invoke(&self, class: &str, instance: &AnyArc, method: &str, args: Arguments) -> DiResult<()>;
}

/// One resolved positional argument.
#[derive(Clone)]
pub enum Resolved {
    /// An instance obtained from a service reference.
    Service(AnyArc),
    /// A literal, or the value found at a parameter path.
    Value(Value),
}

impl Resolved {
    fn kind(&self) -> &'static str {
        match self {
            Resolved::Service(_) => "service",
            Resolved::Value(value) => value.type_name(),
        }
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Service(_) => f.write_str("Service(..)"),
            Resolved::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl PartialEq for Resolved {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Resolved::Service(a), Resolved::Service(b)) => Arc::ptr_eq(a, b),
            (Resolved::Value(a), Resolved::Value(b)) => a == b,
            _ => false,
        }
    }
}

/// Positional argument list handed to a factory or method.
///
/// The typed accessors turn shape problems into [`DiError::Arity`] and
/// [`DiError::ArgumentType`] errors naming the constructor or method.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Arguments, Resolved, Value};
///
/// let args = Arguments::new("Server", vec![
///     Resolved::Value(Value::from("localhost")),
///     Resolved::Value(Value::from(8080)),
/// ]);
///
/// assert_eq!(args.str(0).unwrap(), "localhost");
/// assert_eq!(args.i64(1).unwrap(), 8080);
/// assert!(args.expect_len(3).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Arguments {
    target: String,
    items: Vec<Resolved>,
}

impl Arguments {
    /// `target` names the constructor or method, for error messages.
    pub fn new(target: impl Into<String>, items: Vec<Resolved>) -> Self {
        Self {
            target: target.into(),
            items,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Resolved> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resolved> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Resolved> {
        self.items
    }

    /// Fails unless exactly `expected` arguments were passed.
    pub fn expect_len(&self, expected: usize) -> DiResult<()> {
        if self.items.len() != expected {
            return Err(DiError::Arity {
                target: self.target.clone(),
                expected,
                found: self.items.len(),
            });
        }
        Ok(())
    }

    /// The instance at `index`, downcast to `T`.
    pub fn service<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
        match self.item(index)? {
            Resolved::Service(instance) => instance
                .clone()
                .downcast::<T>()
                .map_err(|_| self.type_error(index, type_name::<T>(), "service")),
            other => Err(self.type_error(index, type_name::<T>(), other.kind())),
        }
    }

    /// The value at `index`; service instances are rejected.
    pub fn value(&self, index: usize) -> DiResult<&Value> {
        match self.item(index)? {
            Resolved::Value(value) => Ok(value),
            other => Err(self.type_error(index, "value", other.kind())),
        }
    }

    pub fn str(&self, index: usize) -> DiResult<&str> {
        let value = self.value(index)?;
        value
            .as_str()
            .ok_or_else(|| self.type_error(index, "string", value.type_name()))
    }

    pub fn i64(&self, index: usize) -> DiResult<i64> {
        let value = self.value(index)?;
        value
            .as_i64()
            .ok_or_else(|| self.type_error(index, "integer", value.type_name()))
    }

    pub fn f64(&self, index: usize) -> DiResult<f64> {
        let value = self.value(index)?;
        value
            .as_f64()
            .ok_or_else(|| self.type_error(index, "float", value.type_name()))
    }

    pub fn bool(&self, index: usize) -> DiResult<bool> {
        let value = self.value(index)?;
        value
            .as_bool()
            .ok_or_else(|| self.type_error(index, "bool", value.type_name()))
    }

    fn item(&self, index: usize) -> DiResult<&Resolved> {
        self.items.get(index).ok_or_else(|| DiError::Arity {
            target: self.target.clone(),
            expected: index + 1,
            found: self.items.len(),
        })
    }

    fn type_error(&self, index: usize, expected: &'static str, found: &'static str) -> DiError {
        DiError::ArgumentType {
            target: self.target.clone(),
            index,
            expected,
            found,
        }
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Resolved;
    type IntoIter = std::slice::Iter<'a, Resolved>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

type Constructor = Arc<dyn Fn(Arguments) -> DiResult<AnyArc> + Send + Sync>;
type Method = Arc<dyn Fn(&AnyArc, Arguments) -> DiResult<()> + Send + Sync>;

struct TypeEntry {
    ctor: Constructor,
    methods: HashMap<String, Method>,
}

/// [`Host`] backed by factory closures keyed by type name.
///
/// Registering a name twice replaces the earlier constructor and its methods.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Arguments, Host, TypeRegistry};
/// use std::sync::Mutex;
///
/// struct Greeter { name: Mutex<String> }
///
/// let mut types = TypeRegistry::new();
/// types
///     .register("Greeter", |args: Arguments| {
///         Ok(Greeter { name: Mutex::new(args.str(0)?.to_string()) })
///     })
///     .method("rename", |g: &Greeter, args: Arguments| {
///         *g.name.lock().unwrap() = args.str(0)?.to_string();
///         Ok(())
///     });
///
/// assert!(types.type_exists("Greeter"));
/// assert!(!types.type_exists("Farewell"));
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the factory for `class` and returns a handle for adding
    /// invocable methods.
    pub fn register<T, F>(&mut self, class: impl Into<String>, factory: F) -> TypeRegistration<'_, T>
    where
        T: Any + Send + Sync,
        F: Fn(Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        let class = class.into();
        let ctor: Constructor = Arc::new(move |args| factory(args).map(|instance| Arc::new(instance) as AnyArc));
        let entry = TypeEntry {
            ctor,
            methods: HashMap::new(),
        };
        let entry = match self.types.entry(class.clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(entry);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(entry),
        };
        TypeRegistration {
            class,
            entry,
            _marker: PhantomData,
        }
    }

    pub fn contains(&self, class: &str) -> bool {
        self.types.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<_> = self.types.keys().collect();
        classes.sort();
        f.debug_struct("TypeRegistry").field("types", &classes).finish()
    }
}

impl Host for TypeRegistry {
    fn type_exists(&self, class: &str) -> bool {
        self.types.contains_key(class)
    }

    fn instantiate(&self, class: &str, args: Arguments) -> DiResult<AnyArc> {
        let entry = self
            .types
            .get(class)
            .ok_or_else(|| DiError::host(format!("no constructor registered for {}", class)))?;
        (entry.ctor)(args)
    }

    fn is_callable(&self, class: &str, method: &str) -> bool {
        self.types
            .get(class)
            .is_some_and(|entry| entry.methods.contains_key(method))
    }

    fn invoke(&self, class: &str, instance: &AnyArc, method: &str, args: Arguments) -> DiResult<()> {
        let method_fn = self
            .types
            .get(class)
            .and_then(|entry| entry.methods.get(method))
            .ok_or_else(|| DiError::host(format!("{}::{} is not registered", class, method)))?;
        method_fn(instance, args)
    }
}

/// Handle returned by [`TypeRegistry::register`].
pub struct TypeRegistration<'a, T> {
    class: String,
    entry: &'a mut TypeEntry,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> TypeRegistration<'_, T> {
    /// Registers a method callable from a definition's `calls`.
    ///
    /// Methods receive `&T`: the instance may already be shared, so state set
    /// by a call lives behind interior mutability.
    pub fn method<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T, Arguments) -> DiResult<()> + Send + Sync + 'static,
    {
        let class = self.class.clone();
        let method: Method = Arc::new(move |instance: &AnyArc, args| {
            let typed = (**instance)
                .downcast_ref::<T>()
                .ok_or_else(|| DiError::TypeMismatch {
                    id: class.clone(),
                    expected: type_name::<T>(),
                })?;
            f(typed, args)
        });
        self.entry.methods.insert(name.into(), method);
        self
    }
}

//! # ferrous-container
//!
//! Definition-driven dependency injection: describe services as data, and the
//! container builds the object graph on demand.
//!
//! ## Features
//!
//! - **Lazy, memoized construction**: each service is built on first use, at most once
//! - **Reference wiring**: constructor and call arguments can name other services or parameters
//! - **Dotted parameter paths**: `"db.host"` walks a nested parameter tree
//! - **Circular reference detection**: cycles fail with an error naming the service, never overflow
//! - **Pluggable construction**: a [`Host`] builds instances by type name; [`TypeRegistry`] is a ready-made one
//! - **Pre-flight validation**: [`Container::validate`] reports broken definitions without building anything
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_container::{Argument, Arguments, CallDefinition, Container, ServiceDefinition, TypeRegistry, Value};
//! use std::sync::{Arc, Mutex};
//!
//! struct Logger { lines: Mutex<Vec<String>> }
//!
//! struct Database { host: String, port: i64, logger: Arc<Logger> }
//!
//! let mut types = TypeRegistry::new();
//! types
//!     .register("Logger", |_| Ok(Logger { lines: Mutex::new(Vec::new()) }))
//!     .method("log", |logger: &Logger, args: Arguments| {
//!         logger.lines.lock().unwrap().push(args.str(0)?.to_string());
//!         Ok(())
//!     });
//! types.register("Database", |args: Arguments| {
//!     args.expect_len(3)?;
//!     Ok(Database { host: args.str(0)?.to_string(), port: args.i64(1)?, logger: args.service(2)? })
//! });
//!
//! let container = Container::builder()
//!     .host(types)
//!     .service(
//!         "logger",
//!         ServiceDefinition::new("Logger").call(CallDefinition::new("log").arg(Argument::literal("ready"))),
//!     )
//!     .service(
//!         "db",
//!         ServiceDefinition::new("Database")
//!             .arg(Argument::parameter("db.host"))
//!             .arg(Argument::parameter("db.port"))
//!             .arg(Argument::service("logger")),
//!     )
//!     .parameter("db", Value::map([("host", Value::from("localhost")), ("port", Value::from(5432))]))
//!     .build();
//!
//! let db = container.get_as::<Database>("db").unwrap();
//! assert_eq!((db.host.as_str(), db.port), ("localhost", 5432));
//! assert_eq!(*db.logger.lines.lock().unwrap(), ["ready"]);
//!
//! // Built once, shared afterwards
//! assert!(Arc::ptr_eq(&db, &container.get_as::<Database>("db").unwrap()));
//! ```
//!
//! ## Errors
//!
//! Every failure is a [`DiError`] and reaches the caller exactly as it was
//! raised, however deep in the graph:
//!
//! ```rust
//! use ferrous_container::{Argument, Container, DiError, ServiceDefinition, TypeRegistry};
//!
//! let mut types = TypeRegistry::new();
//! types.register("Node", |_| Ok(()));
//!
//! let container = Container::builder()
//!     .host(types)
//!     .service("a", ServiceDefinition::new("Node").arg(Argument::service("b")))
//!     .service("b", ServiceDefinition::new("Node").arg(Argument::parameter("missing.path")))
//!     .build();
//!
//! assert_eq!(
//!     container.get("a").unwrap_err(),
//!     DiError::ParameterNotFound("missing.path".to_string())
//! );
//! ```

pub mod builder;
pub mod config;
pub mod container;
pub mod definition;
pub mod error;
pub mod host;
pub mod observer;
pub mod parameters;
pub mod reference;
pub mod validation;
pub mod value;

pub use builder::ContainerBuilder;
pub use config::{ContainerConfig, FailurePolicy, DEFAULT_MAX_DEPTH};
pub use container::{Container, ServiceState};
pub use definition::{Argument, CallDefinition, ServiceDefinition};
pub use error::{ContainerErrorKind, DiError, DiResult};
pub use host::{AnyArc, Arguments, Host, Resolved, TypeRegistration, TypeRegistry};
pub use observer::ResolutionObserver;
pub use parameters::Parameters;
pub use reference::{ParameterReference, Reference, ServiceReference};
pub use validation::{ValidationError, ValidationReport};
pub use value::Value;

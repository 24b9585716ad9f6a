use ferrous_container::{
    Argument, Arguments, CallDefinition, Container, ContainerErrorKind, DiError, ServiceDefinition,
    TypeRegistry, Value,
};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

/// Writes every call into a log shared with the test, so side effects stay
/// observable even when construction fails and no instance is returned.
struct Mailer {
    log: Log,
}

impl Mailer {
    fn record(&self, entry: impl Into<String>) {
        self.log.lock().unwrap().push(entry.into());
    }
}

struct Transport {
    dsn: String,
}

fn container(calls: Vec<CallDefinition>) -> (Container, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let mut types = TypeRegistry::new();

    types.register("Transport", |args: Arguments| {
        Ok(Transport { dsn: args.str(0)?.to_string() })
    });

    let shared = log.clone();
    types
        .register("Mailer", move |_| Ok(Mailer { log: shared.clone() }))
        .method("set_transport", |m: &Mailer, args: Arguments| {
            let transport = args.service::<Transport>(0)?;
            m.record(format!("transport:{}", transport.dsn));
            Ok(())
        })
        .method("set_from", |m: &Mailer, args: Arguments| {
            m.record(format!("from:{}", args.str(0)?));
            Ok(())
        })
        .method("fail", |_: &Mailer, _| Err(DiError::host("smtp down")));

    let mut definition = ServiceDefinition::new("Mailer");
    definition.calls = calls;

    let container = Container::builder()
        .host(types)
        .service(
            "transport",
            ServiceDefinition::new("Transport").arg(Argument::parameter("mail.dsn")),
        )
        .service("mailer", definition)
        .parameter(
            "mail",
            Value::map([
                ("dsn", Value::from("smtp://localhost")),
                ("from", Value::from("ops@example.com")),
            ]),
        )
        .build();

    (container, log)
}

#[test]
fn test_calls_run_in_declaration_order() {
    let (container, log) = container(vec![
        CallDefinition::new("set_transport").arg(Argument::service("transport")),
        CallDefinition::new("set_from").arg(Argument::parameter("mail.from")),
    ]);

    container.get("mailer").unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        ["transport:smtp://localhost", "from:ops@example.com"]
    );

    // calls are not replayed on later lookups
    container.get("mailer").unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn test_earlier_calls_run_before_uncallable_method() {
    let (container, log) = container(vec![
        CallDefinition::new("set_from").arg(Argument::literal("first@example.com")),
        CallDefinition::new("explode"),
        CallDefinition::new("set_from").arg(Argument::literal("never@example.com")),
    ]);

    let err = container.get("mailer").unwrap_err();
    assert_eq!(
        err,
        DiError::container("mailer", ContainerErrorKind::UncallableMethod("explode".into()))
    );
    assert_eq!(
        err.to_string(),
        "mailer service asks for call to uncallable method: explode"
    );
    assert_eq!(*log.lock().unwrap(), ["from:first@example.com"]);
}

#[test]
fn test_missing_method_key() {
    let (container, log) = container(vec![CallDefinition::default()]);

    let err = container.get("mailer").unwrap_err();
    assert_eq!(err, DiError::container("mailer", ContainerErrorKind::MissingMethod));
    assert_eq!(
        err.to_string(),
        "mailer service calls must be arrays containing a 'method' key"
    );
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_method_errors_propagate_unchanged() {
    let (container, _) = container(vec![CallDefinition::new("fail")]);
    assert_eq!(container.get("mailer").unwrap_err(), DiError::Host("smtp down".into()));
}

#[test]
fn test_call_argument_errors_abort_remaining_calls() {
    let (container, log) = container(vec![
        CallDefinition::new("set_from").arg(Argument::parameter("mail.reply_to")),
        CallDefinition::new("set_transport").arg(Argument::service("transport")),
    ]);

    assert_eq!(
        container.get("mailer").unwrap_err(),
        DiError::ParameterNotFound("mail.reply_to".into())
    );
    assert!(log.lock().unwrap().is_empty());
    // the transport reference in the second call was never resolved
    assert_eq!(container.resolved_count(), 0);
}

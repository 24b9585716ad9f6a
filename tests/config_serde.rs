#![cfg(feature = "config")]

use ferrous_container::{
    Argument, Arguments, CallDefinition, Container, ContainerConfig, FailurePolicy, Parameters,
    ServiceDefinition, TypeRegistry, Value,
};
use indexmap::IndexMap;
use std::sync::{Arc, Mutex};

#[test]
fn test_definitions_deserialize_from_json() {
    let services: IndexMap<String, ServiceDefinition> = serde_json::from_value(serde_json::json!({
        "logger": {"class": "Logger"},
        "app": {
            "class": "App",
            "arguments": [{"service": "logger"}, {"parameter": "env.name"}, 3, {"other": 1}],
            "calls": [{"method": "boot", "arguments": [true]}, {"arguments": []}]
        }
    }))
    .unwrap();

    assert_eq!(services["logger"], ServiceDefinition::new("Logger"));

    let app = &services["app"];
    assert_eq!(
        app.arguments,
        vec![
            Argument::service("logger"),
            Argument::parameter("env.name"),
            Argument::literal(3),
            Argument::literal(Value::map([("other", Value::from(1))])),
        ]
    );
    assert_eq!(app.calls[0], CallDefinition::new("boot").arg(Argument::literal(true)));
    assert_eq!(app.calls[1].method, None);
}

#[test]
fn test_json_container_end_to_end() {
    let services: IndexMap<String, ServiceDefinition> = serde_json::from_str(
        r#"{
            "greeting": {"class": "Greeting", "arguments": [{"parameter": "app.greeting"}, {"parameter": "app.names.1"}]}
        }"#,
    )
    .unwrap();
    let parameters: Parameters =
        serde_json::from_str(r#"{"app": {"greeting": "hello", "names": ["ann", "bo"]}}"#).unwrap();
    let config: ContainerConfig = serde_json::from_str(r#"{"failure_policy": "reset"}"#).unwrap();

    let seen = Arc::new(Mutex::new(String::new()));
    let sink = seen.clone();
    let mut types = TypeRegistry::new();
    types.register("Greeting", move |args: Arguments| {
        *sink.lock().unwrap() = format!("{} {}", args.str(0)?, args.str(1)?);
        Ok(())
    });

    let container = Container::builder()
        .host(types)
        .services(services)
        .parameters(parameters)
        .config(config)
        .build();

    container.get("greeting").unwrap();
    assert_eq!(*seen.lock().unwrap(), "hello bo");
    assert_eq!(container.config().failure_policy, FailurePolicy::Reset);
}

#[test]
fn test_only_reference_maps_become_references() {
    let decode = |json: serde_json::Value| serde_json::from_value::<Argument>(json).unwrap();

    assert_eq!(
        decode(serde_json::json!(["localhost"])),
        Argument::literal(vec![Value::from("localhost")])
    );
    assert_eq!(
        decode(serde_json::json!([["db.host"]])),
        Argument::literal(vec![Value::from(vec![Value::from("db.host")])])
    );
    // a reference key next to other keys, or with a non-string id, is plain data
    assert_eq!(
        decode(serde_json::json!({"service": "db", "lazy": true})),
        Argument::literal(Value::map([("service", Value::from("db")), ("lazy", Value::from(true))]))
    );
    assert_eq!(
        decode(serde_json::json!({"parameter": 5})),
        Argument::literal(Value::map([("parameter", Value::from(5))]))
    );

    assert_eq!(decode(serde_json::json!({"service": "db"})), Argument::service("db"));
    assert_eq!(decode(serde_json::json!({"parameter": "db.host"})), Argument::parameter("db.host"));
}

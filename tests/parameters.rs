use ferrous_container::{Container, DiError, Parameters, Value};

fn container() -> Container {
    Container::builder()
        .parameter(
            "db",
            Value::map([("host", Value::from("localhost")), ("port", Value::from(5432))]),
        )
        .parameter(
            "servers",
            Value::from(vec![
                Value::map([("name", Value::from("alpha"))]),
                Value::map([("name", Value::from("beta"))]),
            ]),
        )
        .parameter("nothing", Value::Null)
        .build()
}

#[test]
fn test_parameter_path_resolution() {
    let c = container();

    assert_eq!(c.get_parameter("db.host").unwrap(), &Value::from("localhost"));
    assert_eq!(c.get_parameter("db.port").unwrap(), &Value::from(5432));
}

#[test]
fn test_missing_segments_report_full_id() {
    let c = container();

    assert_eq!(
        c.get_parameter("db.missing").unwrap_err(),
        DiError::ParameterNotFound("db.missing".into())
    );
    assert_eq!(
        c.get_parameter("missing").unwrap_err(),
        DiError::ParameterNotFound("missing".into())
    );
    assert_eq!(
        c.get_parameter("db.port.value").unwrap_err().to_string(),
        "Parameter not found: db.port.value"
    );
}

#[test]
fn test_nested_structure_returned_as_is() {
    let c = container();

    let db = c.get_parameter("db").unwrap();
    assert_eq!(
        db,
        &Value::map([("host", Value::from("localhost")), ("port", Value::from(5432))])
    );
}

#[test]
fn test_empty_id_fails() {
    let c = container();
    assert_eq!(c.get_parameter("").unwrap_err(), DiError::ParameterNotFound(String::new()));
    assert!(!c.has_parameter(""));
}

#[test]
fn test_array_indexing() {
    let c = container();

    assert_eq!(c.get_parameter("servers.1.name").unwrap(), &Value::from("beta"));
    assert!(c.get_parameter("servers.2.name").unwrap_err().is_not_found());
    assert!(c.get_parameter("servers.first").unwrap_err().is_not_found());
}

#[test]
fn test_present_null_is_found() {
    let c = container();
    assert_eq!(c.get_parameter("nothing").unwrap(), &Value::Null);
    assert!(c.has_parameter("nothing"));
}

#[test]
fn test_parameters_replace_wholesale() {
    let mut params = Parameters::new();
    params.insert("env", Value::map([("name", Value::from("dev"))]));

    let c = Container::builder()
        .parameter("stale", Value::from(1))
        .parameters(params)
        .build();

    assert!(!c.has_parameter("stale"));
    assert_eq!(c.get_parameter("env.name").unwrap(), &Value::from("dev"));
    assert_eq!(c.parameters().len(), 1);
}

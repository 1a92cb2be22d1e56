use notesync_core::{Arguments, BindingError, Callable, ComposeBuilder, CoreError, Extra, Parameter, Signature, TypeTag, compose};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

// --- Test Helper Functions ---

/// Records every call as (callable name, received arguments).
type CallLog = Arc<Mutex<Vec<(String, Arguments)>>>;

fn recording_group(name: &str, signature: Signature, log: &CallLog) -> Callable<(), anyhow::Error> {
    let log = Arc::clone(log);
    let label = name.to_string();
    Callable::new(name, signature, move |args| {
        log.lock().unwrap().push((label.clone(), args));
        Ok(())
    })
}

// Option group A: (timeout: int = 10)
fn group_a() -> Signature {
    Signature::builder()
        .optional("timeout", TypeTag::Int, 10)
        .build()
        .unwrap()
}

// Option group B: (user: str, password: str)
fn group_b() -> Signature {
    Signature::builder()
        .required("user", TypeTag::Str)
        .required("password", TypeTag::Str)
        .build()
        .unwrap()
}

// Primary: (tag: list[str] = [])
fn primary_signature() -> Signature {
    Signature::builder()
        .optional("tag", TypeTag::List(Box::new(TypeTag::Str)), json!([]))
        .build()
        .unwrap()
}

fn primary(log: &CallLog) -> Callable<Value, anyhow::Error> {
    let log = Arc::clone(log);
    Callable::new("primary", primary_signature(), move |args: Arguments| {
        let tag = args.get("tag").cloned().unwrap_or(Value::Null);
        log.lock().unwrap().push(("primary".to_string(), args));
        Ok(json!({ "tag": tag }))
    })
}

fn calls(log: &CallLog) -> Vec<(String, Arguments)> {
    log.lock().unwrap().clone()
}

#[test]
fn test_dispatch_fidelity() {
    let log = CallLog::default();
    let composed = compose(
        primary(&log),
        vec![
            Extra::new(recording_group("a", group_a(), &log)),
            Extra::new(recording_group("b", group_b(), &log)),
        ],
    )
    .unwrap();

    assert_eq!(
        composed.signature().names().collect::<Vec<_>>(),
        vec!["user", "password", "tag", "timeout"]
    );

    let result = composed
        .invoke(&Arguments::new().with("user", "u").with("password", "p"))
        .unwrap();

    assert_eq!(result, json!({ "tag": [] }));
    assert_eq!(
        calls(&log),
        vec![
            ("a".to_string(), Arguments::new().with("timeout", 10)),
            (
                "b".to_string(),
                Arguments::new().with("user", "u").with("password", "p")
            ),
            ("primary".to_string(), Arguments::new().with("tag", json!([]))),
        ]
    );
}

#[test]
fn test_required_missing_calls_nothing() {
    let log = CallLog::default();
    let composed = ComposeBuilder::new(primary(&log))
        .extra(recording_group("a", group_a(), &log))
        .extra(recording_group("b", group_b(), &log))
        .build()
        .unwrap();

    let err = composed
        .invoke(&Arguments::new().with("user", "u"))
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<CoreError>(),
        Some(&CoreError::Binding(BindingError::MissingArgument(
            "password".to_string()
        )))
    );
    assert!(calls(&log).is_empty());
}

#[test]
fn test_drop_set_hides_parameter() {
    let log = CallLog::default();
    let composed = ComposeBuilder::new(primary(&log))
        .extra(recording_group("a", group_a(), &log))
        .extra_dropping(recording_group("b", group_b(), &log), ["password"])
        .build()
        .unwrap();

    assert!(!composed.signature().contains("password"));
    assert!(composed.merged_signature().provenance().sources("password").is_none());

    // A stray value for the dropped name is not forwarded.
    composed
        .invoke(&Arguments::new().with("user", "u").with("password", "p"))
        .unwrap();

    let recorded = calls(&log);
    assert_eq!(recorded[1], ("b".to_string(), Arguments::new().with("user", "u")));
    assert!(recorded.iter().all(|(_, args)| !args.contains("password")));
}

#[test]
fn test_extra_failure_aborts_remaining_calls() {
    let log = CallLog::default();
    let failing = Callable::new("failing", group_a(), |_args: Arguments| {
        Err(anyhow::anyhow!("browser unavailable"))
    });

    let composed = ComposeBuilder::new(primary(&log))
        .extra(failing)
        .extra(recording_group("b", group_b(), &log))
        .build()
        .unwrap();

    let err = composed
        .invoke(&Arguments::new().with("user", "u").with("password", "p"))
        .unwrap_err();

    // Propagated unchanged, not wrapped in a core error.
    assert_eq!(err.to_string(), "browser unavailable");
    assert!(err.downcast_ref::<CoreError>().is_none());
    assert!(calls(&log).is_empty());
}

#[test]
fn test_completed_extras_are_not_rolled_back() {
    let log = CallLog::default();
    let failing = Callable::new("failing", Signature::empty(), |_args: Arguments| {
        Err(anyhow::anyhow!("late failure"))
    });

    let composed = ComposeBuilder::new(primary(&log))
        .extra(recording_group("a", group_a(), &log))
        .extra(failing)
        .build()
        .unwrap();

    assert!(composed.invoke(&Arguments::new()).is_err());

    let recorded = calls(&log);
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, "a");
}

#[test]
fn test_conflicting_groups_fail_at_build_time() {
    let log = CallLog::default();
    let positional = Signature::new(vec![Parameter::new(
        "source",
        notesync_core::ParamKind::PositionalOnly,
    )])
    .unwrap();

    let err = ComposeBuilder::new(primary(&log))
        .extra(recording_group("positional", positional, &log))
        .build()
        .unwrap_err();

    assert!(matches!(err, CoreError::DispatchConfiguration { .. }));
}

#[test]
fn test_invoke_is_repeatable() {
    let log = CallLog::default();
    let composed = ComposeBuilder::new(primary(&log))
        .extra(recording_group("a", group_a(), &log))
        .build()
        .unwrap();

    composed.invoke(&Arguments::new()).unwrap();
    composed
        .invoke(&Arguments::new().with("timeout", 30).with("tag", json!(["x"])))
        .unwrap();

    let recorded = calls(&log);
    assert_eq!(recorded.len(), 4);
    assert_eq!(recorded[2].1, Arguments::new().with("timeout", 30));
    assert_eq!(recorded[3].1, Arguments::new().with("tag", json!(["x"])));
}

use std::sync::{Arc, Mutex};

use createapi::{
    ApiCompiler, ApiConfig, ApiRegistry, Descriptor, Error, ErrorFunc, Failure, OnFailure, OnSuccess,
    Params, Request, ResponseHandle, Result, Transport, TransportKind, builtin,
};
use serde_json::{Value, json};

/// Holds issued requests until the test completes them.
#[derive(Default)]
struct RecordingTransport {
    pending: Mutex<Vec<Request>>,
}

impl RecordingTransport {
    fn urls(&self) -> Vec<String> {
        self.pending.lock().unwrap().iter().map(|r| r.url.clone()).collect()
    }

    fn complete_next(&self, status: u16, body: &str) {
        let request = self.pending.lock().unwrap().remove(0);
        let handle = ResponseHandle {
            kind:   self.kind(),
            url:    request.url.clone(),
            status: Some(status),
        };
        request.complete(status, body.to_string(), handle);
    }
}

impl Transport for RecordingTransport {
    fn kind(&self) -> TransportKind { TransportKind::Custom("recording") }

    fn issue_request(&self, request: Request) -> Result<()> {
        self.pending.lock().unwrap().push(request);
        Ok(())
    }
}

/// Refuses every request synchronously.
struct RefusingTransport;

impl Transport for RefusingTransport {
    fn kind(&self) -> TransportKind { TransportKind::Custom("refusing") }

    fn issue_request(&self, request: Request) -> Result<()> {
        Err(Error::InvalidUrl(request.url))
    }
}

#[derive(Debug, PartialEq)]
enum Outcome {
    Success(Value, String, Option<u16>),
    Failure(Option<u16>, String),
}

fn recorder() -> (Arc<Mutex<Vec<Outcome>>>, impl Fn() -> (OnSuccess, OnFailure)) {
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let sink = outcomes.clone();
    let make = move || {
        let ok = sink.clone();
        let err = sink.clone();
        let on_success: OnSuccess = Box::new(move |value: Value, raw: String, handle: ResponseHandle| {
            ok.lock().unwrap().push(Outcome::Success(value, raw, handle.status))
        });
        let on_failure: OnFailure = Box::new(move |failure: Failure, raw: String, _: ResponseHandle| {
            err.lock().unwrap().push(Outcome::Failure(failure.status(), raw))
        });
        (on_success, on_failure)
    };
    (outcomes, make)
}

fn search_descriptor() -> Descriptor {
    Descriptor::new("/search")
        .required_param("key", "X")
        .default_param("limit", "10")
}

#[test]
fn test_search_scenario() {
    let transport = Arc::new(RecordingTransport::default());
    let api = ApiCompiler::new(transport.clone()).compile_get(search_descriptor(), None);

    let merged = api.call(Some(Params::from([("q", "abc")])), None, None);

    assert_eq!(merged, Params::from([("q", "abc"), ("limit", "10"), ("key", "X")]));
    assert_eq!(transport.urls(), ["/search/?q=abc&limit=10&key=X"]);
}

#[test]
fn test_merging_is_evaluated_per_call() {
    let transport = Arc::new(RecordingTransport::default());
    let api = ApiCompiler::new(transport.clone()).compile_get(search_descriptor(), None);

    api.call(Some(Params::from([("limit", "50"), ("key", "mine")])), None, None);
    api.call(None, None, None);

    assert_eq!(transport.urls(), ["/search/?limit=50&key=X", "/search/?limit=10&key=X"]);
    assert!(api.descriptor().data_default.get("key").is_none());
}

#[test]
fn test_default_descriptor_url() {
    let transport = Arc::new(RecordingTransport::default());
    let api = ApiCompiler::new(transport.clone()).compile_get(Descriptor::default(), None);

    let merged = api.call(Some(Params::from([("a", "1")])), None, None);

    assert_eq!(merged, Params::from([("a", "1")]));
    assert_eq!(transport.urls(), ["//?a=1"]);
}

#[test]
fn test_success_runs_transforms() {
    let transport = Arc::new(RecordingTransport::default());
    let api = ApiCompiler::new(transport.clone())
        .compile_get(Descriptor::new("/answer").transform(builtin::number()), None);
    let (outcomes, callbacks) = recorder();

    let (on_success, on_failure) = callbacks();
    api.call(None, Some(on_success), Some(on_failure));
    assert!(outcomes.lock().unwrap().is_empty());

    transport.complete_next(200, "42");
    assert_eq!(
        *outcomes.lock().unwrap(),
        [Outcome::Success(json!(42), "42".to_string(), Some(200))]
    );
}

#[test]
fn test_error_status_goes_to_failure_only() {
    let transport = Arc::new(RecordingTransport::default());
    let api = ApiCompiler::new(transport.clone())
        .compile_get(Descriptor::new("/answer").transform(builtin::number()), None);
    let (outcomes, callbacks) = recorder();

    let (on_success, on_failure) = callbacks();
    api.call(None, Some(on_success), Some(on_failure));
    transport.complete_next(500, "internal error");

    assert_eq!(
        *outcomes.lock().unwrap(),
        [Outcome::Failure(Some(500), "internal error".to_string())]
    );
}

#[test]
fn test_concurrent_requests_are_independent() {
    let transport = Arc::new(RecordingTransport::default());
    let api = ApiCompiler::new(transport.clone()).compile_get(Descriptor::new("/n"), None);
    let (outcomes, callbacks) = recorder();

    for _ in 0..2 {
        let (on_success, on_failure) = callbacks();
        api.call(None, Some(on_success), Some(on_failure));
    }
    transport.complete_next(404, "missing");
    transport.complete_next(200, "found");

    assert_eq!(
        *outcomes.lock().unwrap(),
        [
            Outcome::Failure(Some(404), "missing".to_string()),
            Outcome::Success(json!("found"), "found".to_string(), Some(200)),
        ]
    );
}

#[test]
fn test_error_func_receives_dispatch_error_once() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let error_func: ErrorFunc = Arc::new(move |e: Error| sink.lock().unwrap().push(e.to_string()));

    let api = ApiCompiler::new(Arc::new(RefusingTransport))
        .compile_get(search_descriptor(), Some(error_func));
    let merged = api.call(Some(Params::from([("q", "abc")])), None, None);

    assert_eq!(merged.get("key"), Some("X"));
    assert_eq!(*errors.lock().unwrap(), ["invalid URL: /search/?q=abc&limit=10&key=X"]);
}

#[test]
fn test_dispatch_error_without_handler_is_dropped() {
    let api = ApiCompiler::new(Arc::new(RefusingTransport)).compile_get(search_descriptor(), None);
    let merged = api.call(None, None, None);
    assert_eq!(merged, Params::from([("limit", "10"), ("key", "X")]));
}

#[test]
fn test_compile_registry_with_error_factory() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let factory = move |name: &str| -> ErrorFunc {
        let sink = sink.clone();
        let name = name.to_string();
        Arc::new(move |_: Error| sink.lock().unwrap().push(name.clone()))
    };

    let compiler = ApiCompiler::new(Arc::new(RefusingTransport));
    let registry = compiler.compile_registry(
        [("alpha", Descriptor::new("/a")), ("beta", Descriptor::new("/b"))],
        None,
        Some(&factory),
    );

    assert_eq!(registry.names().collect::<Vec<_>>(), ["alpha", "beta"]);
    registry.call("beta", None, None, None);
    registry.call("alpha", None, None, None);
    assert!(registry.call("gamma", None, None, None).is_none());

    assert_eq!(*errors.lock().unwrap(), ["beta", "alpha"]);
}

#[test]
fn test_compile_registry_is_incremental() {
    let transport = Arc::new(RecordingTransport::default());
    let compiler = ApiCompiler::new(transport.clone());

    let registry = compiler.compile_registry([("a", Descriptor::new("/a1"))], None, None);
    let registry = compiler.compile_registry(
        [("b", Descriptor::new("/b")), ("a", Descriptor::new("/a2"))],
        Some(registry),
        None,
    );

    assert_eq!(registry.len(), 2);
    registry.call("a", None, None, None);
    registry.call("b", None, None, None);
    assert_eq!(transport.urls(), ["/a2/?", "/b/?"]);
}

#[test]
fn test_compile_config() {
    let config = ApiConfig::from_toml_str(
        r#"
[apis.integers]
url = "/integers"
transform_response = ["lines", "numbers"]

[apis.integers.data_default]
num = "3"

[apis.integers.data_required]
format = "plain"
"#,
    )
    .unwrap();

    let transport = Arc::new(RecordingTransport::default());
    let registry: ApiRegistry = ApiCompiler::new(transport.clone())
        .compile_config(&config, None, None)
        .unwrap();
    let (outcomes, callbacks) = recorder();

    let (on_success, on_failure) = callbacks();
    registry.call("integers", Some(Params::from([("min", "1")])), Some(on_success), Some(on_failure));
    assert_eq!(transport.urls(), ["/integers/?min=1&num=3&format=plain"]);

    transport.complete_next(200, "4\n2\n6\n");
    assert_eq!(
        *outcomes.lock().unwrap(),
        [Outcome::Success(json!([4, 2, 6]), "4\n2\n6\n".to_string(), Some(200))]
    );
}

#[test]
fn test_compile_config_unknown_transform() {
    let config = ApiConfig::from_json_str(r#"{"apis":{"x":{"transform_response":"Number"}}}"#).unwrap();
    let compiler = ApiCompiler::new(Arc::new(RefusingTransport));
    assert!(matches!(
        compiler.compile_config(&config, None, None),
        Err(Error::UnknownTransform(name)) if name == "Number"
    ));
}

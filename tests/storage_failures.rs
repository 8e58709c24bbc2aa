//! Failure-path behavior: backend errors surface as operation-specific
//! 500s, and panics stop at the dispatcher's outermost boundary.

use serde_json::{json, Value};

use itemstore::api::{ApiRequest, ApiResponse, Dispatcher};
use itemstore::config::HandlerConfig;
use itemstore::item::{AttributeMerge, Item};
use itemstore::observability::{Metric, RecordingSink, Severity};
use itemstore::storage::{ItemStore, StorageError, StorageResult};

/// Backend that fails every call.
struct FailingStore;

impl ItemStore for FailingStore {
    fn get(&self, _item_id: &str) -> StorageResult<Option<Item>> {
        Err(StorageError::Backend("injected".to_string()))
    }

    fn put(&self, _item: Item) -> StorageResult<()> {
        Err(StorageError::Backend("injected".to_string()))
    }

    fn update(&self, _item_id: &str, _merge: AttributeMerge) -> StorageResult<()> {
        Err(StorageError::Backend("injected".to_string()))
    }

    fn delete(&self, _item_id: &str) -> StorageResult<()> {
        Err(StorageError::Backend("injected".to_string()))
    }
}

/// Backend that panics, standing in for a programming error.
struct PanickingStore;

impl ItemStore for PanickingStore {
    fn get(&self, _item_id: &str) -> StorageResult<Option<Item>> {
        panic!("backend invariant violated");
    }

    fn put(&self, _item: Item) -> StorageResult<()> {
        panic!("backend invariant violated");
    }

    fn update(&self, _item_id: &str, _merge: AttributeMerge) -> StorageResult<()> {
        panic!("backend invariant violated");
    }

    fn delete(&self, _item_id: &str) -> StorageResult<()> {
        panic!("backend invariant violated");
    }
}

fn body_of(response: &ApiResponse) -> Value {
    serde_json::from_str(&response.body).unwrap()
}

fn failing_dispatcher() -> Dispatcher<FailingStore, RecordingSink> {
    Dispatcher::new(FailingStore, RecordingSink::new(), HandlerConfig::default())
}

#[test]
fn backend_failures_map_to_operation_specific_500s() {
    let dispatcher = failing_dispatcher();

    let cases = [
        (
            ApiRequest::new("POST", "/items").with_body(json!({"name": "A"})),
            "Failed to create item",
        ),
        (ApiRequest::new("GET", "/items/abc"), "Failed to retrieve item"),
        (
            ApiRequest::new("PUT", "/items/abc").with_body(json!({"description": "B"})),
            "Failed to update item",
        ),
        (
            ApiRequest::new("DELETE", "/items/abc"),
            "Failed to delete item",
        ),
    ];

    for (request, expected) in cases {
        let response = dispatcher.dispatch(&request);
        assert_eq!(response.status_code, 500);
        assert_eq!(body_of(&response)["error"], expected);
        assert_eq!(response.headers["Content-Type"], "application/json");
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
    }
}

#[test]
fn backend_failure_is_logged_with_request_context() {
    let dispatcher = failing_dispatcher();

    dispatcher.dispatch(&ApiRequest::new("GET", "/items/abc"));

    let logs = dispatcher.sink().logs();
    let storage_error = logs
        .iter()
        .find(|record| record.event == "STORAGE_ERROR")
        .expect("STORAGE_ERROR should be logged");

    assert_eq!(storage_error.severity, Severity::Error);
    assert_eq!(storage_error.field("itemId"), Some("abc"));
    assert!(storage_error.field("requestId").is_some());
    assert!(storage_error.field("error").unwrap().contains("injected"));
}

#[test]
fn validation_runs_before_storage() {
    // An empty id fails validation; the failing backend is never reached.
    let dispatcher = failing_dispatcher();

    let response = dispatcher.dispatch(&ApiRequest::new("GET", "/items/"));

    assert_eq!(response.status_code, 400);
    assert_eq!(body_of(&response)["error"], "Item ID is required");
    assert!(dispatcher
        .sink()
        .events()
        .iter()
        .all(|event| event != "STORAGE_ERROR"));
}

#[test]
fn panic_maps_to_generic_500_and_error_counter() {
    let dispatcher = Dispatcher::new(
        PanickingStore,
        RecordingSink::new(),
        HandlerConfig::default(),
    );

    let response = dispatcher.dispatch(&ApiRequest::new("GET", "/items/abc"));

    assert_eq!(response.status_code, 500);
    assert_eq!(body_of(&response)["error"], "Internal server error");
    assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");

    assert!(dispatcher
        .sink()
        .events()
        .iter()
        .any(|event| event == "UNHANDLED_ERROR"));
    assert_eq!(dispatcher.sink().count_total(Metric::InvocationErrors), 1);
    assert_eq!(
        dispatcher.sink().count_total(Metric::SuccessfulInvocations),
        0
    );
}

#[test]
fn panicking_dispatcher_stays_usable() {
    let dispatcher = Dispatcher::new(
        PanickingStore,
        RecordingSink::new(),
        HandlerConfig::default(),
    );

    dispatcher.dispatch(&ApiRequest::new("GET", "/items/abc"));
    let second = dispatcher.dispatch(&ApiRequest::new("GET", "/items/def"));

    assert_eq!(second.status_code, 500);
    assert_eq!(dispatcher.sink().count_total(Metric::InvocationErrors), 2);
}

//! Request dispatcher and CRUD operation handlers
//!
//! The dispatcher owns the route table and the outermost failure boundary.
//! Each operation handler validates its input, performs at most two storage
//! calls, and converts every expected failure into a structured response
//! before it leaves this module; only panics reach the boundary.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::HandlerConfig;
use crate::item::{AttributeMerge, Item};
use crate::observability::{Metric, ObservabilitySink, Severity};
use crate::storage::{ItemStore, StorageError};

use super::errors::{HandlerError, HandlerResult, Operation};
use super::request::ApiRequest;
use super::response::{ApiResponse, MutationAck};
use super::router::{self, Route};

/// Dispatcher over an item store and an observability sink.
///
/// Holds no mutable state of its own; the store provides its own interior
/// concurrency control, so `dispatch` is `&self` and safe to call from any
/// number of threads.
pub struct Dispatcher<S, O> {
    store: S,
    sink: O,
    config: HandlerConfig,
}

impl<S: ItemStore, O: ObservabilitySink> Dispatcher<S, O> {
    pub fn new(store: S, sink: O, config: HandlerConfig) -> Self {
        Self {
            store,
            sink,
            config,
        }
    }

    /// Borrow the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Borrow the sink (metrics snapshots, test assertions).
    pub fn sink(&self) -> &O {
        &self.sink
    }

    /// Handle one request end to end.
    ///
    /// Expected failures come back as structured 4xx/5xx responses from the
    /// operation handlers. This wrapper catches only panics, which map to a
    /// generic 500 with an error counter; every other dispatch counts as a
    /// successful invocation regardless of status code.
    pub fn dispatch(&self, request: &ApiRequest) -> ApiResponse {
        let request_id = Uuid::new_v4().to_string();

        self.sink.log(
            Severity::Info,
            "INCOMING_REQUEST",
            &[
                ("requestId", &request_id),
                ("method", &request.method),
                ("path", &request.path),
                ("component", &self.config.component),
            ],
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.route(request, &request_id)));

        match outcome {
            Ok(response) => {
                let status = response.status_code.to_string();
                self.sink.log(
                    Severity::Info,
                    "REQUEST_COMPLETE",
                    &[
                        ("requestId", &request_id),
                        ("statusCode", &status),
                        ("method", &request.method),
                        ("path", &request.path),
                    ],
                );
                self.emit_count(Metric::SuccessfulInvocations, 1);
                response
            }
            Err(_) => {
                self.sink.log(
                    Severity::Error,
                    "UNHANDLED_ERROR",
                    &[
                        ("requestId", &request_id),
                        ("method", &request.method),
                        ("path", &request.path),
                    ],
                );
                self.emit_count(Metric::InvocationErrors, 1);
                ApiResponse::error(500, "Internal server error")
            }
        }
    }

    /// Classify and run one operation, converting handler errors into their
    /// structured responses.
    fn route(&self, request: &ApiRequest, request_id: &str) -> ApiResponse {
        let result = match router::classify(request, &self.config) {
            Route::CreateItem => self.handle_create(request.body.as_ref(), request_id),
            Route::GetItem(id) => self.handle_get(&id, request_id),
            Route::UpdateItem(id) => self.handle_update(&id, request.body.as_ref(), request_id),
            Route::DeleteItem(id) => self.handle_delete(&id, request_id),
            Route::NotMatched => {
                self.sink.log(
                    Severity::Warn,
                    "ROUTE_NOT_MATCHED",
                    &[
                        ("requestId", request_id),
                        ("method", &request.method),
                        ("path", &request.path),
                    ],
                );
                Err(HandlerError::RouteNotFound)
            }
        };

        match result {
            Ok(response) => response,
            Err(error) => {
                if error.status_code() == 400 {
                    let reason = error.to_string();
                    self.sink.log(
                        Severity::Warn,
                        "VALIDATION_FAILED",
                        &[("requestId", request_id), ("reason", &reason)],
                    );
                }
                ApiResponse::error(error.status_code(), &error.to_string())
            }
        }
    }

    /// Create: validate body, generate the identifier, single unconditional
    /// insert.
    fn handle_create(
        &self,
        body: Option<&Value>,
        request_id: &str,
    ) -> HandlerResult<ApiResponse> {
        let started = Instant::now();

        let body = object_body(body)?;
        if !body.contains_key("name") {
            return Err(HandlerError::MissingField("name"));
        }

        let item_id = Uuid::new_v4().to_string();
        let item = Item::from_body(item_id.clone(), epoch_now(), body);

        if let Err(source) = self.store.put(item) {
            self.log_storage_error(request_id, &item_id, &source);
            return Err(HandlerError::Storage {
                op: Operation::Create,
                source,
            });
        }

        self.sink.log(
            Severity::Info,
            "ITEM_CREATED",
            &[("requestId", request_id), ("itemId", &item_id)],
        );
        self.emit_count(Metric::ItemsCreated, 1);
        self.emit_timing(Metric::ProcessingTime, started.elapsed().as_millis() as u64);

        Ok(ApiResponse::json(
            201,
            &MutationAck {
                item_id,
                message: "Item created successfully",
            },
        ))
    }

    /// Get: single point lookup.
    fn handle_get(&self, item_id: &str, request_id: &str) -> HandlerResult<ApiResponse> {
        if item_id.is_empty() {
            return Err(HandlerError::MissingId(Operation::Get));
        }

        let found = self.store.get(item_id).map_err(|source| {
            self.log_storage_error(request_id, item_id, &source);
            HandlerError::Storage {
                op: Operation::Get,
                source,
            }
        })?;

        match found {
            Some(item) => {
                self.sink.log(
                    Severity::Info,
                    "ITEM_RETRIEVED",
                    &[("requestId", request_id), ("itemId", item_id)],
                );
                Ok(ApiResponse::json(200, &item))
            }
            None => {
                self.log_not_found(request_id, item_id);
                Err(HandlerError::NotFound)
            }
        }
    }

    /// Update: existence check, then partial merge. Never an upsert.
    fn handle_update(
        &self,
        item_id: &str,
        body: Option<&Value>,
        request_id: &str,
    ) -> HandlerResult<ApiResponse> {
        if item_id.is_empty() {
            return Err(HandlerError::MissingId(Operation::Update));
        }
        let body = object_body(body)?;

        let existing = self.store.get(item_id).map_err(|source| {
            self.log_storage_error(request_id, item_id, &source);
            HandlerError::Storage {
                op: Operation::Update,
                source,
            }
        })?;
        if existing.is_none() {
            self.log_not_found(request_id, item_id);
            return Err(HandlerError::NotFound);
        }

        let merge = AttributeMerge::from_body(epoch_now(), body);
        self.store.update(item_id, merge).map_err(|source| {
            self.log_storage_error(request_id, item_id, &source);
            HandlerError::Storage {
                op: Operation::Update,
                source,
            }
        })?;

        self.sink.log(
            Severity::Info,
            "ITEM_UPDATED",
            &[("requestId", request_id), ("itemId", item_id)],
        );

        Ok(ApiResponse::json(
            200,
            &MutationAck {
                item_id: item_id.to_string(),
                message: "Item updated successfully",
            },
        ))
    }

    /// Delete: existence check, then unconditional delete by key.
    fn handle_delete(&self, item_id: &str, request_id: &str) -> HandlerResult<ApiResponse> {
        if item_id.is_empty() {
            return Err(HandlerError::MissingId(Operation::Delete));
        }

        let existing = self.store.get(item_id).map_err(|source| {
            self.log_storage_error(request_id, item_id, &source);
            HandlerError::Storage {
                op: Operation::Delete,
                source,
            }
        })?;
        if existing.is_none() {
            self.log_not_found(request_id, item_id);
            return Err(HandlerError::NotFound);
        }

        self.store.delete(item_id).map_err(|source| {
            self.log_storage_error(request_id, item_id, &source);
            HandlerError::Storage {
                op: Operation::Delete,
                source,
            }
        })?;

        self.sink.log(
            Severity::Info,
            "ITEM_DELETED",
            &[("requestId", request_id), ("itemId", item_id)],
        );

        Ok(ApiResponse::json(
            200,
            &MutationAck {
                item_id: item_id.to_string(),
                message: "Item deleted successfully",
            },
        ))
    }

    fn log_storage_error(&self, request_id: &str, item_id: &str, error: &StorageError) {
        let rendered = error.to_string();
        self.sink.log(
            Severity::Error,
            "STORAGE_ERROR",
            &[
                ("requestId", request_id),
                ("itemId", item_id),
                ("error", &rendered),
            ],
        );
    }

    fn log_not_found(&self, request_id: &str, item_id: &str) {
        self.sink.log(
            Severity::Info,
            "ITEM_NOT_FOUND",
            &[("requestId", request_id), ("itemId", item_id)],
        );
    }

    fn emit_count(&self, metric: Metric, value: u64) {
        self.sink
            .emit_count(metric, value, &[("component", &self.config.component)]);
    }

    fn emit_timing(&self, metric: Metric, millis: u64) {
        self.sink
            .emit_timing(metric, millis, &[("component", &self.config.component)]);
    }
}

/// The body must be present and a JSON object.
fn object_body(body: Option<&Value>) -> HandlerResult<&Map<String, Value>> {
    body.and_then(Value::as_object).ok_or(HandlerError::InvalidBody)
}

/// Current epoch seconds.
fn epoch_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::RecordingSink;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn dispatcher() -> Dispatcher<MemoryStore, RecordingSink> {
        Dispatcher::new(
            MemoryStore::new(),
            RecordingSink::new(),
            HandlerConfig::default(),
        )
    }

    fn body_of(response: &ApiResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[test]
    fn test_create_returns_201_with_item_id() {
        let dispatcher = dispatcher();
        let request = ApiRequest::new("POST", "/items").with_body(json!({"name": "Widget"}));

        let response = dispatcher.dispatch(&request);

        assert_eq!(response.status_code, 201);
        let body = body_of(&response);
        assert!(!body["itemId"].as_str().unwrap().is_empty());
        assert_eq!(body["message"], "Item created successfully");
        assert_eq!(dispatcher.store().len(), 1);
    }

    #[test]
    fn test_create_without_name_is_rejected() {
        let dispatcher = dispatcher();
        let request =
            ApiRequest::new("POST", "/items").with_body(json!({"description": "no name"}));

        let response = dispatcher.dispatch(&request);

        assert_eq!(response.status_code, 400);
        assert_eq!(body_of(&response)["error"], "Missing required field: name");
        assert!(dispatcher.store().is_empty());
    }

    #[test]
    fn test_create_with_non_object_body_is_rejected() {
        let dispatcher = dispatcher();

        let missing = dispatcher.dispatch(&ApiRequest::new("POST", "/items"));
        assert_eq!(missing.status_code, 400);
        assert_eq!(
            body_of(&missing)["error"],
            "Invalid input: body must be a JSON object"
        );

        let raw = dispatcher
            .dispatch(&ApiRequest::new("POST", "/items").with_body(json!("not json at all")));
        assert_eq!(raw.status_code, 400);
    }

    #[test]
    fn test_unmatched_route_is_404() {
        let dispatcher = dispatcher();

        let response = dispatcher.dispatch(&ApiRequest::new("PATCH", "/items/abc"));

        assert_eq!(response.status_code, 404);
        assert_eq!(body_of(&response)["error"], "Not found");
    }

    #[test]
    fn test_get_empty_id_is_rejected() {
        let dispatcher = dispatcher();

        let response = dispatcher.dispatch(&ApiRequest::new("GET", "/items/"));

        assert_eq!(response.status_code, 400);
        assert_eq!(body_of(&response)["error"], "Item ID is required");
    }

    #[test]
    fn test_create_emits_count_and_timing() {
        let dispatcher = dispatcher();
        let request = ApiRequest::new("POST", "/items").with_body(json!({"name": "Widget"}));

        dispatcher.dispatch(&request);

        assert_eq!(dispatcher.sink().count_total(Metric::ItemsCreated), 1);
        let timings = dispatcher.sink().timings();
        assert_eq!(timings.len(), 1);
        assert_eq!(timings[0].metric, Metric::ProcessingTime);
    }
}

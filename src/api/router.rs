//! Request routing
//!
//! Fixed route table, checked in precedence order, first match wins:
//! POST on the collection path creates; GET/PUT/DELETE on an id-scoped
//! path operate on a single item; anything else is unmatched. No wildcard
//! or parameterized routing beyond this set.

use crate::config::HandlerConfig;

use super::request::ApiRequest;

/// Routing outcome for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    CreateItem,
    GetItem(String),
    UpdateItem(String),
    DeleteItem(String),
    NotMatched,
}

/// Classify a request into a route.
pub fn classify(request: &ApiRequest, config: &HandlerConfig) -> Route {
    let id_marker = format!("{}/", config.collection_path);

    match request.method.as_str() {
        "POST" if request.path.ends_with(config.collection_path.as_str()) => Route::CreateItem,
        "GET" if request.path.contains(&id_marker) => Route::GetItem(extract_id(request)),
        "PUT" if request.path.contains(&id_marker) => Route::UpdateItem(extract_id(request)),
        "DELETE" if request.path.contains(&id_marker) => Route::DeleteItem(extract_id(request)),
        _ => Route::NotMatched,
    }
}

/// Identifier for an id-scoped route: the explicit `id` path parameter when
/// present and non-empty, else the final path segment.
fn extract_id(request: &ApiRequest) -> String {
    if let Some(id) = request.path_parameters.get("id") {
        if !id.is_empty() {
            return id.clone();
        }
    }
    request
        .path
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

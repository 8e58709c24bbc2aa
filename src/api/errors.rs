//! Handler error taxonomy
//!
//! Every expected failure a handler can hit, with its HTTP status mapping.
//! Messages are the exact strings callers see in the `error` body field;
//! backend detail stays in the `source` chain and the logs.

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for operation handlers
pub type HandlerResult<T> = Result<T, HandlerError>;

/// The four routed operations. Picks operation-specific error messages and
/// metric dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

fn missing_id_message(op: &Operation) -> &'static str {
    match op {
        Operation::Update => "Item ID is required for update",
        Operation::Delete => "Item ID is required for deletion",
        _ => "Item ID is required",
    }
}

fn storage_failure_message(op: &Operation) -> &'static str {
    match op {
        Operation::Create => "Failed to create item",
        Operation::Get => "Failed to retrieve item",
        Operation::Update => "Failed to update item",
        Operation::Delete => "Failed to delete item",
    }
}

/// Failures a handler converts into a structured response.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Body absent, unparseable, or not a JSON object.
    #[error("Invalid input: body must be a JSON object")]
    InvalidBody,

    /// Required field absent from the create body.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Id-scoped operation reached with an empty identifier.
    #[error("{}", missing_id_message(.0))]
    MissingId(Operation),

    /// No record at the requested key.
    #[error("Item not found")]
    NotFound,

    /// The storage backend failed the call.
    #[error("{}", storage_failure_message(.op))]
    Storage {
        op: Operation,
        #[source]
        source: StorageError,
    },

    /// No route matched the method + path.
    #[error("Not found")]
    RouteNotFound,
}

impl HandlerError {
    /// HTTP status code for this failure class.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::InvalidBody => 400,
            HandlerError::MissingField(_) => 400,
            HandlerError::MissingId(_) => 400,
            HandlerError::NotFound => 404,
            HandlerError::Storage { .. } => 500,
            HandlerError::RouteNotFound => 404,
        }
    }
}

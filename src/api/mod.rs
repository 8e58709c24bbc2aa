//! API layer for itemstore
//!
//! The request/response envelopes, the fixed route table, the CRUD
//! operation handlers, and the error taxonomy they share.
//!
//! # Request handling flow
//!
//! 1. Classify method + path into a route
//! 2. Validate operation input
//! 3. At most two storage calls (existence check, then mutation)
//! 4. Uniform response envelope on every code path
//!
//! Expected failures never escape a handler; the dispatcher's outermost
//! boundary catches only panics.

mod errors;
mod handler;
mod request;
mod response;
mod router;

pub use errors::{HandlerError, HandlerResult, Operation};
pub use handler::Dispatcher;
pub use request::ApiRequest;
pub use response::{ApiResponse, MutationAck};
pub use router::{classify, Route};

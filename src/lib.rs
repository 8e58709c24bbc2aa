//! itemstore - a small, deterministic CRUD item API over a pluggable
//! key-value store
//!
//! Dispatch an [`api::ApiRequest`] through an [`api::Dispatcher`] built
//! from an [`storage::ItemStore`] backend and an
//! [`observability::ObservabilitySink`].

pub mod api;
pub mod config;
pub mod item;
pub mod observability;
pub mod storage;

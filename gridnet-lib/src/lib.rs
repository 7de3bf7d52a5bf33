//! Grid networking library
//!
//! The network request orchestrator of an embeddable data grid: mediates all
//! reads and writes between the grid's in-memory row store and a remote data
//! service, with single-flight read locking, pagination- and sort-driven
//! refetching, per-kind payload shaping, a confirmation gate before mutating
//! requests, a stoppable event pipeline and reload semantics.

pub mod config;
pub mod confirm;
pub mod error;
pub mod event;
pub mod history;
pub mod kind;
pub mod pagination;
pub mod payload;
pub mod rows;
pub mod sort;
pub mod transport;

mod orchestrator;

pub use orchestrator::*;

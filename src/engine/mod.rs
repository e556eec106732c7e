// src/engine/mod.rs

//! Orchestration engine for driftwatch.
//!
//! This module ties together:
//! - the identity filter (which entities are interesting at all)
//! - the per-notification dispatcher (cache lookup, diff, cache update)
//! - the per-kind workers and the router that feeds them
//!
//! The synchronous dispatch logic lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`] and [`worker`].

pub mod core;
pub mod filter;
pub mod runtime;
pub mod worker;

pub use self::core::{DispatchOutcome, Dispatcher};
pub use filter::IdentityFilter;
pub use runtime::{Runtime, RuntimeSummary};
pub use worker::run_kind_worker;

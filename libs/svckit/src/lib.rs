//! # svckit - service toolkit
//!
//! Shared plumbing for the catalog service modules:
//!
//! - **Contracts**: [`Module`], [`DbModule`] and [`RestfulModule`] phases,
//!   driven by [`ModuleRegistry`] in the order init → migrate → REST
//! - **Context**: [`ModuleCtx`] hands each module its config section and the
//!   optional database connection
//! - **API**: RFC 9457 problem responses and JSON response helpers
//! - **Ingress**: request ids, tracing, timeouts, CORS, body limit, `/health`

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod api;
pub mod context;
pub mod contracts;
pub mod ingress;
pub mod registry;
pub mod shutdown;

pub use api::problem::{not_found, Problem, ProblemResponse, ValidationError};
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};
pub use contracts::{DbModule, Module, RestfulModule};
pub use registry::{ModuleEntry, ModuleRegistry};

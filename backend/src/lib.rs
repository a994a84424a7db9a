//! In-memory retail banking backend.
//!
//! The crate is laid out as a hexagon: [`domain`] holds entities, ports and
//! use-case services; [`outbound`] implements the driven ports in memory;
//! [`inbound::http`] exposes the use-cases over Actix Web.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

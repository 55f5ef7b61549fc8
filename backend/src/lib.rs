//! Travel listings booking backend.
//!
//! Accounts, listings and bookings behind a cookie-session REST API, laid out
//! as a hexagon: [`domain`] holds the rules and ports, [`inbound`] adapts
//! HTTP onto them, [`outbound`] implements them over PostgreSQL or memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

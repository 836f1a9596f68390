//! Marketplace backend: listings with images and comments over HTTP.
//!
//! Layout follows a hexagonal split. [`domain`] holds entities, services and
//! ports; [`inbound`] adapts HTTP onto the driving ports; [`outbound`] holds
//! the PostgreSQL, in-memory, and filesystem adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

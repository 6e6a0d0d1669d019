//! Interface layer: the surface the CRUD/API layer talks to.
//!
//! Fachadas síncronas sobre el coordinador y el agregador; la capa HTTP/REST
//! que las expone queda fuera de este repositorio.

pub mod api;

pub use api::{TenantCommandService, TenantQueryService};

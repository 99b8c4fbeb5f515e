// ============================================================================
// Contact Service
// ============================================================================
//
// HTTP/JSON service that persists portfolio contact-form submissions and
// answers health/status/CRUD/search queries over them. The store side lives
// in the contact-db crate; this crate is the transport layer.
//
// ============================================================================

pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

/// Middleware modules for the API server
///
/// Session authentication lives in `todoback_shared::auth::middleware`; this
/// module only holds response-shaping layers.

pub mod security;

//! Cross-origin policy for browser clients.

use actix_cors::Cors;

/// Allows the configured origins to call the API with credentials and any request header.
pub fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

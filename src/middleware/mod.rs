pub mod auth;
pub mod security;
pub mod tracing;

pub use self::auth::AdminActor;
pub use self::security::security_headers;
pub use self::tracing::request_tracing;

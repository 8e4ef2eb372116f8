pub mod jwt;
pub mod service;

pub use service::{AuthError, AuthService};

pub mod auth;
pub mod farmer;
pub mod loan;

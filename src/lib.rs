pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod farmer;
pub mod handlers;
pub mod loan;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

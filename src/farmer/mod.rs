pub mod service;

pub use service::{FarmerDeletion, FarmerService, UpdateFarmerRequest};

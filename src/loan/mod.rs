pub mod model;
pub mod policy;
pub mod service;

pub use model::{
    CreateLoanRequest, ListLoansQuery, LoanApplication, LoanStatistics, LoanStatus,
    LoanWithFarmer, UpdateLoanStatusRequest,
};
pub use policy::LoanPolicy;
pub use service::LoanService;

pub mod model;
pub mod repository;

pub use model::{InvestmentDB, NewInvestmentDB};
pub use repository::InvestmentRepository;

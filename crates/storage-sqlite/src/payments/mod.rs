pub mod model;
pub mod repository;

pub use model::{NewPaymentDB, PaymentDB};
pub use repository::PaymentRepository;

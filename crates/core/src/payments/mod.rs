//! Payments module - domain models, scheduler, services, and traits.

mod payments_model;
mod payments_scheduler;
mod payments_service;
mod payments_traits;

pub use payments_model::{NewPayment, Payment, PaymentUpdate, RollbackResult};
pub use payments_scheduler::{days_in_month, next_due_date, payment_amount};
pub use payments_service::PaymentService;
pub use payments_traits::{PaymentRepositoryTrait, PaymentServiceTrait};

//! Background delivery of confirmation links with bounded retries.

mod policy;
mod scheduler;


pub use policy::RetryPolicy;
pub use scheduler::{DeliveryOutcome, DeliveryReport, TokioDeliveryScheduler};

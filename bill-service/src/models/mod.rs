//! Domain models for bill-service.

pub mod bill;
pub mod filter;
pub mod role;

pub use bill::{AmountType, Bill, BillStatus, BillType};
pub use filter::BillFilter;
pub use role::Role;

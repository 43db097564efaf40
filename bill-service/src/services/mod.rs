//! Services module for bill-service.

pub mod bill_list;
pub mod database;
pub mod metrics;
pub mod query;
pub mod store;

pub use bill_list::{BillListService, ListPolicy};
pub use database::Database;
pub use metrics::{record_db_query, record_error, record_list_outcome};
pub use query::{build_query, BillQuery, BindValue, QueryMode, QueryOptions};
pub use store::BillStore;

use crate::models::{AmountType, BillStatus, BillType};
use chrono::NaiveDate;

/// Validated list filters. `None` / empty means "not filtered".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillFilter {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub search_text: Option<String>,
    pub people_oid: Option<String>,
    pub amount_type: Option<AmountType>,
    pub statuses: Vec<BillStatus>,
    pub bill_type: Option<BillType>,
}

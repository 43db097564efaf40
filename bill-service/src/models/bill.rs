//! Bill projection and its closed vocabularies.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// What a bill was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillType {
    Service,
    Product,
    Ticket,
}

impl BillType {
    pub const ALL: [BillType; 3] = [BillType::Service, BillType::Product, BillType::Ticket];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillType::Service => "Service",
            BillType::Product => "Product",
            BillType::Ticket => "Ticket",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Approval lifecycle of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillStatus {
    Draft,
    Submitted,
    Rejected,
    Approved,
}

impl BillStatus {
    pub const ALL: [BillStatus; 4] = [
        BillStatus::Draft,
        BillStatus::Submitted,
        BillStatus::Rejected,
        BillStatus::Approved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Draft => "Draft",
            BillStatus::Submitted => "Submitted",
            BillStatus::Rejected => "Rejected",
            BillStatus::Approved => "Approved",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount filter. Not a column: each variant selects a fixed predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountType {
    /// Something is still owed (`due_amount > 0`).
    Due,
    /// Fully settled (`bill_amount = paid_amount`).
    Paid,
}

impl AmountType {
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Due" => Some(AmountType::Due),
            "Paid" => Some(AmountType::Paid),
            _ => None,
        }
    }
}

/// Read-only bill row as returned by the list endpoint.
///
/// `bill_date` is already formatted by the database (`DD Mon, YYYY`).
/// `due_amount = bill_amount - paid_amount` is maintained by the writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Bill {
    pub oid: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub bill_type: String,
    pub bill_no: String,
    pub description: Option<String>,
    pub bill_date: String,
    pub image_path: Option<String>,
    pub bill_amount: f64,
    pub status: String,
    pub people_oid: Option<String>,
    pub created_by: String,
    pub company_oid: String,
    pub paid_amount: f64,
    pub due_amount: f64,
    pub supplier_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_round_trip() {
        for status in BillStatus::ALL {
            assert_eq!(BillStatus::from_label(status.as_str()), Some(status));
        }
        assert_eq!(BillStatus::from_label("draft"), None);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert_eq!(BillType::from_label("Ticket"), Some(BillType::Ticket));
        assert_eq!(BillType::from_label("Subscription"), None);
    }

    #[test]
    fn test_bill_serializes_type_field() {
        let bill = Bill {
            oid: "b-1".to_string(),
            bill_type: "Service".to_string(),
            bill_no: "INV-100".to_string(),
            description: None,
            bill_date: "05 Jan, 2024".to_string(),
            image_path: None,
            bill_amount: 100.0,
            status: "Draft".to_string(),
            people_oid: Some("p-1".to_string()),
            created_by: "maker@acme".to_string(),
            company_oid: "acme".to_string(),
            paid_amount: 40.0,
            due_amount: 60.0,
            supplier_name: Some("Invent Corp".to_string()),
        };

        let json = serde_json::to_value(&bill).unwrap();
        assert_eq!(json["type"], "Service");
        assert!(json.get("bill_type").is_none());
        assert_eq!(json["supplier_name"], "Invent Corp");
    }
}

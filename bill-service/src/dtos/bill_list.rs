//! Request and response bodies for `POST /api/v1/bill/list`.

use crate::models::{AmountType, Bill, BillFilter, BillStatus, BillType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Application code: page returned.
pub const CODE_SUCCESS: u16 = 200;
/// Application code: nothing matched.
pub const CODE_NO_DATA: u16 = 201;
/// Application code: request body rejected.
pub const CODE_VALIDATION_FAILED: u16 = 301;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw list filters as posted by the client.
///
/// Every field is optional; empty strings and nulls mean "not filtered".
/// Unknown fields are rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BillListRequest {
    #[validate(custom(function = "validate_date"))]
    pub from_date: Option<String>,
    #[validate(custom(function = "validate_date"))]
    pub to_date: Option<String>,
    #[validate(range(min = 0, message = "offset must be greater than or equal to 0"))]
    pub offset: Option<i64>,
    #[validate(range(min = 0, message = "limit must be greater than or equal to 0"))]
    pub limit: Option<i64>,
    pub search_text: Option<String>,
    pub people_oid: Option<String>,
    #[validate(custom(function = "validate_amount_type"))]
    pub amount_type: Option<String>,
    #[validate(custom(function = "validate_statuses"))]
    pub status: Option<Vec<Option<String>>>,
    #[serde(rename = "type")]
    #[validate(custom(function = "validate_bill_type"))]
    pub bill_type: Option<String>,
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    if value.len() != 10 {
        return Err(invalid(
            "length",
            "date length must be 10 characters long".to_string(),
        ));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| invalid("date", format!("'{}' is not a valid YYYY-MM-DD date", value)))
}

fn validate_amount_type(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || AmountType::from_label(value).is_some() {
        return Ok(());
    }
    Err(invalid(
        "amount_type",
        format!("amount_type must be one of [Paid, Due], got '{}'", value),
    ))
}

fn validate_bill_type(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || BillType::from_label(value).is_some() {
        return Ok(());
    }
    Err(invalid(
        "type",
        format!(
            "type must be one of [Service, Product, Ticket], got '{}'",
            value
        ),
    ))
}

fn validate_statuses(values: &[Option<String>]) -> Result<(), ValidationError> {
    for value in values.iter().flatten() {
        let value = value.trim();
        if !value.is_empty() && BillStatus::from_label(value).is_none() {
            return Err(invalid(
                "status",
                format!(
                    "status must be one of [Draft, Submitted, Rejected, Approved], got '{}'",
                    value
                ),
            ));
        }
    }
    Ok(())
}

/// Trimmed, non-empty value.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Non-empty value, kept verbatim.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl BillListRequest {
    /// Convert a validated request into typed filters.
    ///
    /// Values that fail to parse are dropped, so call [`Validate::validate`]
    /// first.
    pub fn into_filter(self) -> BillFilter {
        let parse_date =
            |v: Option<String>| present(v).and_then(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).ok());

        let mut statuses: Vec<BillStatus> = Vec::new();
        for status in self
            .status
            .unwrap_or_default()
            .into_iter()
            .filter_map(present)
            .filter_map(|s| BillStatus::from_label(&s))
        {
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }

        BillFilter {
            from_date: parse_date(self.from_date),
            to_date: parse_date(self.to_date),
            offset: self.offset,
            limit: self.limit,
            search_text: non_empty(self.search_text),
            people_oid: non_empty(self.people_oid),
            amount_type: present(self.amount_type).and_then(|a| AmountType::from_label(&a)),
            statuses,
            bill_type: present(self.bill_type).and_then(|t| BillType::from_label(&t)),
        }
    }
}

/// Response envelope. HTTP status is 200; `code` carries the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillListResponse {
    pub status: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Bill>>,
}

impl BillListResponse {
    pub fn success(total: i64, data: Vec<Bill>) -> Self {
        Self {
            status: true,
            code: CODE_SUCCESS,
            message: "Successfully get bill list".to_string(),
            total: Some(total),
            data: Some(data),
        }
    }

    pub fn no_data() -> Self {
        Self {
            status: false,
            code: CODE_NO_DATA,
            message: "No data found".to_string(),
            total: None,
            data: None,
        }
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self {
            status: false,
            code: CODE_VALIDATION_FAILED,
            message: message.into(),
            total: None,
            data: None,
        }
    }
}

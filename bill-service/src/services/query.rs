//! Bill list query construction.
//!
//! Filters are first turned into an ordered list of [`Predicate`]s by pure
//! functions, then rendered once into a statement with sequential `$n`
//! placeholders. Count and data queries share the same predicate list; only
//! the select list and the order/limit suffix differ.

use crate::middleware::CallerContext;
use crate::models::{AmountType, BillFilter, BillStatus, Role};
use chrono::NaiveDate;
use std::borrow::Cow;

const COUNT_SELECT: &str = "SELECT count(*)::int8 AS total";

const DATA_SELECT: &str = "SELECT ex.oid, ex.type, ex.bill_no, ex.description, \
     to_char(ex.bill_date, 'DD Mon, YYYY') AS bill_date, ex.image_path, \
     ex.bill_amount::float8 AS bill_amount, ex.status, ex.people_oid, ex.created_by, \
     ex.company_oid, ex.paid_amount::float8 AS paid_amount, \
     ex.due_amount::float8 AS due_amount, p.name AS supplier_name";

const BILL_FROM: &str =
    "FROM bill_information ex LEFT JOIN people p ON p.oid = ex.people_oid";

const DATA_ORDER: &str = "ORDER BY ex.bill_date DESC, ex.created_on DESC";

/// Placeholder marker inside predicate templates.
const MARKER: char = '?';

/// Which of the two list statements is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Count,
    Data,
}

/// Knobs that change predicate construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Count approver rows without excluding drafts, as older clients expect.
    /// The data query always excludes drafts for approvers.
    pub legacy_approver_count: bool,
}

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    Date(NaiveDate),
    Int(i64),
}

/// One `WHERE` conjunct.
///
/// Every `?` in the template refers to the same single parameter, so a value
/// used twice (search term, approver login) is bound once.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    template: Cow<'static, str>,
    param: Option<BindValue>,
}

impl Predicate {
    /// A predicate without parameters.
    pub fn fixed(template: impl Into<Cow<'static, str>>) -> Self {
        let template = template.into();
        debug_assert!(!template.contains(MARKER));
        Self {
            template,
            param: None,
        }
    }

    /// A predicate whose `?` markers all bind `param`.
    pub fn bound(template: impl Into<Cow<'static, str>>, param: BindValue) -> Self {
        let template = template.into();
        debug_assert!(template.contains(MARKER));
        Self {
            template,
            param: Some(param),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn param(&self) -> Option<&BindValue> {
        self.param.as_ref()
    }
}

/// A rendered statement and its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct BillQuery {
    pub mode: QueryMode,
    pub sql: String,
    pub params: Vec<BindValue>,
}

/// Build the count or data statement for `filter` as seen by `caller`.
pub fn build_query(
    filter: &BillFilter,
    caller: &CallerContext,
    mode: QueryMode,
    options: QueryOptions,
) -> BillQuery {
    render(mode, predicates(filter, caller, mode, options), filter)
}

/// Ordered predicate list: tenant scope, filters, then role visibility.
pub fn predicates(
    filter: &BillFilter,
    caller: &CallerContext,
    mode: QueryMode,
    options: QueryOptions,
) -> Vec<Predicate> {
    let mut predicates = vec![Predicate::bound(
        "ex.company_oid = ?",
        BindValue::Text(caller.tenant_id.clone()),
    )];

    if !filter.statuses.is_empty() {
        let statuses = filter
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        predicates.push(Predicate::bound(
            "ex.status = ANY(?)",
            BindValue::TextArray(statuses),
        ));
    }

    if let Some(bill_type) = filter.bill_type {
        predicates.push(Predicate::bound(
            "ex.type = ?",
            BindValue::Text(bill_type.as_str().to_string()),
        ));
    }

    if let Some(amount_type) = filter.amount_type {
        predicates.push(amount_predicate(amount_type));
    }

    if let Some(people_oid) = &filter.people_oid {
        predicates.push(Predicate::bound(
            "ex.people_oid = ?",
            BindValue::Text(people_oid.clone()),
        ));
    }

    if let Some(search_text) = &filter.search_text {
        predicates.push(Predicate::bound(
            "(ex.bill_no ILIKE ? OR p.name ILIKE ?)",
            BindValue::Text(format!("%{}%", search_text)),
        ));
    }

    if let Some(from_date) = filter.from_date {
        predicates.push(Predicate::bound(
            "ex.bill_date >= ?",
            BindValue::Date(from_date),
        ));
    }

    if let Some(to_date) = filter.to_date {
        predicates.push(Predicate::bound(
            "ex.bill_date <= ?",
            BindValue::Date(to_date),
        ));
    }

    predicates.extend(visibility(caller, mode, options));
    predicates
}

fn amount_predicate(amount_type: AmountType) -> Predicate {
    match amount_type {
        AmountType::Due => Predicate::fixed("ex.due_amount > 0"),
        AmountType::Paid => Predicate::fixed("ex.bill_amount = ex.paid_amount"),
    }
}

/// Row visibility for the caller's role.
pub fn visibility(
    caller: &CallerContext,
    mode: QueryMode,
    options: QueryOptions,
) -> Option<Predicate> {
    match caller.role {
        Role::Maker => Some(maker_visibility(&caller.login_id)),
        Role::Approver => {
            let exclude_drafts = mode == QueryMode::Data || !options.legacy_approver_count;
            Some(approver_visibility(&caller.login_id, exclude_drafts))
        }
        Role::Admin => Some(admin_visibility(&caller.login_id)),
        Role::Unrestricted => None,
    }
}

/// Makers only see what they created.
fn maker_visibility(login_id: &str) -> Predicate {
    Predicate::bound("ex.created_by = ?", BindValue::Text(login_id.to_string()))
}

/// Approvers see rows nobody else has approved or rejected yet.
fn approver_visibility(login_id: &str, exclude_drafts: bool) -> Predicate {
    let decided = "(ex.approved_by IS NULL OR ex.approved_by = ?) \
                   AND (ex.rejected_by IS NULL OR ex.rejected_by = ?)";
    let template = if exclude_drafts {
        format!(
            "(ex.status <> '{}' AND {})",
            BillStatus::Draft.as_str(),
            decided
        )
    } else {
        format!("({})", decided)
    };
    Predicate::bound(template, BindValue::Text(login_id.to_string()))
}

/// Admins see everything except other people's drafts.
fn admin_visibility(login_id: &str) -> Predicate {
    Predicate::bound(
        format!(
            "(ex.created_by = ? OR ex.status <> '{}')",
            BillStatus::Draft.as_str()
        ),
        BindValue::Text(login_id.to_string()),
    )
}

/// Render predicates into a statement, numbering placeholders in order.
pub fn render(mode: QueryMode, predicates: Vec<Predicate>, filter: &BillFilter) -> BillQuery {
    let select = match mode {
        QueryMode::Count => COUNT_SELECT,
        QueryMode::Data => DATA_SELECT,
    };

    let mut sql = format!("{} {} WHERE ", select, BILL_FROM);
    let mut params = Vec::with_capacity(predicates.len() + 2);

    for (i, predicate) in predicates.into_iter().enumerate() {
        if i > 0 {
            sql.push_str(" AND ");
        }
        match predicate.param {
            Some(param) => {
                params.push(param);
                let placeholder = format!("${}", params.len());
                sql.push_str(&predicate.template.replace(MARKER, &placeholder));
            }
            None => sql.push_str(&predicate.template),
        }
    }

    if mode == QueryMode::Data {
        sql.push(' ');
        sql.push_str(DATA_ORDER);

        // Zero is treated like an absent limit: no cap.
        if let Some(limit) = filter.limit.filter(|l| *l > 0) {
            params.push(BindValue::Int(limit));
            sql.push_str(&format!(" LIMIT ${}", params.len()));
            params.push(BindValue::Int(filter.offset.unwrap_or(0)));
            sql.push_str(&format!(" OFFSET ${}", params.len()));
        }
    }

    BillQuery { mode, sql, params }
}

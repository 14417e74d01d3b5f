//! Filter engine for payable accounts.
//!
//! The same `PayableFilter` drives the list view on the client and the
//! server-side CSV export, so both sides always agree on what "the filtered
//! collection" is. The wire form is `PayableFilterQuery`, whose field names
//! are the query-string parameters of `GET /api/cuentas-pagar/export`.

use crate::PayableAccount;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Month filter; `All` is the "no month filter" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

impl MonthFilter {
    pub const ALL_SENTINEL: &'static str = "all";

    pub fn parse(value: &str) -> Result<Self, FilterParseError> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(Self::ALL_SENTINEL) {
            return Ok(MonthFilter::All);
        }
        match value.parse::<u32>() {
            Ok(month) if (1..=12).contains(&month) => Ok(MonthFilter::Month(month)),
            _ => Err(FilterParseError::InvalidMonth(value.to_string())),
        }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(month) => date.month() == *month,
        }
    }

    pub fn query_value(&self) -> String {
        match self {
            MonthFilter::All => Self::ALL_SENTINEL.to_string(),
            MonthFilter::Month(month) => month.to_string(),
        }
    }
}

/// Payment status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    /// "pagadas"
    Paid,
    /// "pendientes"
    Pending,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Result<Self, FilterParseError> {
        match value.trim() {
            "" => Ok(StatusFilter::All),
            "pagadas" => Ok(StatusFilter::Paid),
            "pendientes" => Ok(StatusFilter::Pending),
            other => Err(FilterParseError::InvalidStatus(other.to_string())),
        }
    }

    pub fn matches(&self, is_paid: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Paid => is_paid,
            StatusFilter::Pending => !is_paid,
        }
    }

    pub fn query_value(&self) -> &'static str {
        match self {
            StatusFilter::All => "",
            StatusFilter::Paid => "pagadas",
            StatusFilter::Pending => "pendientes",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterParseError {
    InvalidMonth(String),
    InvalidStatus(String),
    InvalidDate(String),
    InvalidAmount(String),
}

impl fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterParseError::InvalidMonth(v) => write!(f, "Invalid month filter: {}", v),
            FilterParseError::InvalidStatus(v) => write!(f, "Invalid status filter: {}", v),
            FilterParseError::InvalidDate(v) => write!(f, "Invalid date (expected YYYY-MM-DD): {}", v),
            FilterParseError::InvalidAmount(v) => write!(f, "Invalid amount: {}", v),
        }
    }
}

impl std::error::Error for FilterParseError {}

/// Active filters of the payables list; every predicate is ANDed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PayableFilter {
    pub month: MonthFilter,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub status: StatusFilter,
    /// Inclusive lower bound on `amount_with_tax`
    pub min_amount: Option<f64>,
    /// Inclusive upper bound on `amount_with_tax`
    pub max_amount: Option<f64>,
    pub provider_id: Option<String>,
    pub category: Option<String>,
}

impl PayableFilter {
    /// True when at least one predicate would narrow the collection
    pub fn is_active(&self) -> bool {
        self.month != MonthFilter::All
            || (self.date_start.is_some() && self.date_end.is_some())
            || self.status != StatusFilter::All
            || self.min_amount.is_some()
            || self.max_amount.is_some()
            || self.provider_id.is_some()
            || self.category.is_some()
    }

    pub fn matches(&self, account: &PayableAccount) -> bool {
        if !self.month.matches(account.due_date) {
            return false;
        }

        // The range only applies once both ends are set; the end date is inclusive
        if let (Some(start), Some(end)) = (self.date_start, self.date_end) {
            if account.due_date < start {
                return false;
            }
            match end.succ_opt() {
                Some(end_exclusive) if account.due_date >= end_exclusive => return false,
                _ => {}
            }
        }

        if !self.status.matches(account.is_paid) {
            return false;
        }

        if self.min_amount.is_some_and(|min| account.amount_with_tax < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| account.amount_with_tax > max) {
            return false;
        }

        if let Some(provider_id) = &self.provider_id {
            if account.provider_id.as_deref() != Some(provider_id.as_str()) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !account.category.trim().eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }

        true
    }

    /// Query-string pairs for the active predicates only
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.month != MonthFilter::All {
            pairs.push(("filtroMes", self.month.query_value()));
        }
        if let (Some(start), Some(end)) = (self.date_start, self.date_end) {
            pairs.push(("fechaInicio", start.format("%Y-%m-%d").to_string()));
            pairs.push(("fechaFin", end.format("%Y-%m-%d").to_string()));
        }
        if self.status != StatusFilter::All {
            pairs.push(("estadoFiltro", self.status.query_value().to_string()));
        }
        if let Some(min) = self.min_amount {
            pairs.push(("montoMin", min.to_string()));
        }
        if let Some(max) = self.max_amount {
            pairs.push(("montoMax", max.to_string()));
        }
        if let Some(provider_id) = &self.provider_id {
            pairs.push(("proveedorId", provider_id.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("categoria", category.clone()));
        }
        pairs
    }

    /// Encoded query string without the leading `?`; empty when no filter is active
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, encode_query_component(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Raw query parameters of the export endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayableFilterQuery {
    #[serde(rename = "filtroMes", default)]
    pub month: Option<String>,
    #[serde(rename = "fechaInicio", default)]
    pub date_start: Option<String>,
    #[serde(rename = "fechaFin", default)]
    pub date_end: Option<String>,
    #[serde(rename = "estadoFiltro", default)]
    pub status: Option<String>,
    #[serde(rename = "montoMin", default)]
    pub min_amount: Option<String>,
    #[serde(rename = "montoMax", default)]
    pub max_amount: Option<String>,
    #[serde(rename = "proveedorId", default)]
    pub provider_id: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>, FilterParseError> {
    match non_empty(value) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(&v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| FilterParseError::InvalidDate(v)),
    }
}

fn parse_amount(value: Option<String>) -> Result<Option<f64>, FilterParseError> {
    match non_empty(value) {
        None => Ok(None),
        Some(v) => match v.parse::<f64>() {
            Ok(amount) if amount.is_finite() => Ok(Some(amount)),
            _ => Err(FilterParseError::InvalidAmount(v)),
        },
    }
}

impl TryFrom<PayableFilterQuery> for PayableFilter {
    type Error = FilterParseError;

    fn try_from(query: PayableFilterQuery) -> Result<Self, Self::Error> {
        Ok(PayableFilter {
            month: MonthFilter::parse(query.month.as_deref().unwrap_or(""))?,
            date_start: parse_date(query.date_start)?,
            date_end: parse_date(query.date_end)?,
            status: StatusFilter::parse(query.status.as_deref().unwrap_or(""))?,
            min_amount: parse_amount(query.min_amount)?,
            max_amount: parse_amount(query.max_amount)?,
            provider_id: non_empty(query.provider_id),
            category: non_empty(query.category),
        })
    }
}

/// Apply the filter; output is a subset of the input in input order
pub fn apply_filters(items: &[PayableAccount], filter: &PayableFilter) -> Vec<PayableAccount> {
    items
        .iter()
        .filter(|account| filter.matches(account))
        .cloned()
        .collect()
}

/// Display order: most recent due date first, ties by id descending
pub fn sort_by_due_date_desc(items: &mut [PayableAccount]) {
    items.sort_by(|a, b| b.due_date.cmp(&a.due_date).then_with(|| b.id.cmp(&a.id)));
}

/// Percent-encode everything outside the RFC 3986 unreserved set
pub fn encode_query_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

//! Boundary parsing for caller-supplied strings.
//!
//! Date and amount negotiation happens here, once. The accrual engine only
//! ever sees typed values.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::cashflow::CashFlowEvent;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::types::CashFlowKind;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// grouping characters accepted inside amounts
const GROUPING: [char; 4] = [' ', '\u{a0}', '\u{202f}', '\''];

/// raw cash flow as typed by a user or read from a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowInput {
    pub date: String,
    pub kind: String,
    pub amount: String,
}

impl CashFlowInput {
    pub fn new(
        date: impl Into<String>,
        kind: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            kind: kind.into(),
            amount: amount.into(),
        }
    }

    pub fn try_into_event(&self) -> Result<CashFlowEvent> {
        let date = parse_date(&self.date)?;
        let kind = parse_kind(&self.kind)?;
        let amount = parse_amount(&self.amount)?;
        CashFlowEvent::new(date, kind, amount)
    }
}

impl TryFrom<&CashFlowInput> for CashFlowEvent {
    type Error = LoanError;

    fn try_from(input: &CashFlowInput) -> Result<Self> {
        input.try_into_event()
    }
}

/// parse `DD/MM/YYYY` or `YYYY-MM-DD`; an ISO time of day is accepted and dropped
///
/// The year must have four digits. `%Y` alone would read `15/01/24` as year 24.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
        .filter(|date| (1000..=9999).contains(&date.year()))
        .ok_or_else(|| LoanError::InvalidDateFormat {
            input: input.to_string(),
        })
}

/// parse a non-negative amount written with either decimal separator
///
/// Spaces, non-breaking spaces and apostrophes are grouping. When both `.`
/// and `,` appear, the last one is the decimal separator. A single separator
/// occurring once is decimal (`1,5` and `1.5` are both one and a half); one
/// occurring several times is grouping. A trailing `€` or `EUR` is ignored.
/// Amounts above [`Money::MAX_CASH_FLOW`] are rejected.
pub fn parse_amount(input: &str) -> Result<Money> {
    let invalid = || LoanError::InvalidAmount {
        input: input.to_string(),
    };

    let mut text = input.trim();
    for suffix in ["€", "EUR", "eur"] {
        if let Some(stripped) = text.strip_suffix(suffix) {
            text = stripped.trim_end();
            break;
        }
    }

    let compact: String = text.chars().filter(|c| !GROUPING.contains(c)).collect();
    if compact.is_empty() {
        return Err(invalid());
    }

    let normalized = normalize_separators(&compact);
    let value = Decimal::from_str(&normalized).map_err(|_| invalid())?;
    let amount = Money::from_decimal(value);

    if amount.is_negative() {
        return Err(LoanError::NegativeAmount { amount });
    }
    if amount > Money::MAX_CASH_FLOW {
        return Err(invalid());
    }
    Ok(amount)
}

fn normalize_separators(compact: &str) -> String {
    let last_dot = compact.rfind('.');
    let last_comma = compact.rfind(',');

    let decimal = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => Some(if dot > comma { '.' } else { ',' }),
        (Some(_), None) if compact.matches('.').count() == 1 => Some('.'),
        (None, Some(_)) if compact.matches(',').count() == 1 => Some(','),
        _ => None,
    };

    compact
        .chars()
        .filter_map(|c| match c {
            '.' | ',' if Some(c) == decimal => Some('.'),
            '.' | ',' => None,
            other => Some(other),
        })
        .collect()
}

/// parse a cash flow kind; the French labels are accepted as well
pub fn parse_kind(input: &str) -> Result<CashFlowKind> {
    match input.trim().to_lowercase().as_str() {
        "disbursement" | "versement" => Ok(CashFlowKind::Disbursement),
        "repayment" | "remboursement" => Ok(CashFlowKind::Repayment),
        _ => Err(LoanError::InvalidCashFlowKind {
            input: input.to_string(),
        }),
    }
}

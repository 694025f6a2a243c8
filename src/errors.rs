use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::CashFlowId;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("invalid date format: {input:?} (expected DD/MM/YYYY or YYYY-MM-DD)")]
    InvalidDateFormat {
        input: String,
    },

    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("negative amount: {amount}")]
    NegativeAmount {
        amount: Money,
    },

    #[error("invalid amount: {input:?}")]
    InvalidAmount {
        input: String,
    },

    #[error("invalid cash flow kind: {input:?}")]
    InvalidCashFlowKind {
        input: String,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("period not found: {sequence_number}")]
    PeriodNotFound {
        sequence_number: u32,
    },

    #[error("cash flow not found: {id}")]
    CashFlowNotFound {
        id: CashFlowId,
    },

    #[error("index out of range: {index} (len {len})")]
    IndexOutOfRange {
        index: usize,
        len: usize,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LoanError>;

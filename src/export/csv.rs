//! Comma-separated export of an accrual report.
//!
//! Header: `period,disbursed,repaid,balance,elapsed_days,rate_percent,interest`.
//! Money columns carry two decimals, the rate column is a percentage with
//! three decimals.

use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::str::FromStr;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::interest::{AccrualReport, AccrualResult};

pub const HEADERS: [&str; 7] = [
    "period",
    "disbursed",
    "repaid",
    "balance",
    "elapsed_days",
    "rate_percent",
    "interest",
];

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    period: String,
    disbursed: String,
    repaid: String,
    balance: String,
    elapsed_days: i64,
    rate_percent: String,
    interest: String,
}

impl From<&AccrualResult> for CsvRow {
    fn from(result: &AccrualResult) -> Self {
        Self {
            period: result.label.clone(),
            disbursed: money_cell(result.disbursed),
            repaid: money_cell(result.repaid),
            balance: money_cell(result.closing_balance),
            elapsed_days: result.elapsed_days,
            rate_percent: rate_cell(result.rate),
            interest: money_cell(result.interest),
        }
    }
}

/// one exported line, parsed back into numeric values
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedRow {
    pub period: String,
    pub disbursed: Money,
    pub repaid: Money,
    pub balance: Money,
    pub elapsed_days: i64,
    pub rate: Rate,
    pub interest: Money,
}

impl ExportedRow {
    /// the row a result exports to, at export precision
    pub fn from_result(result: &AccrualResult) -> Self {
        Self {
            period: result.label.clone(),
            disbursed: result.disbursed.round_cents(),
            repaid: result.repaid.round_cents(),
            balance: result.closing_balance.round_cents(),
            elapsed_days: result.elapsed_days,
            rate: Rate::from_percentage(result.rate.percentage_dp(3)),
            interest: result.interest.round_cents(),
        }
    }
}

pub fn write_report<W: Write>(writer: W, report: &AccrualReport) -> Result<()> {
    let mut wrt = WriterBuilder::new().has_headers(false).from_writer(writer);

    wrt.write_record(HEADERS)?;
    for result in report.results() {
        wrt.serialize(CsvRow::from(result))?;
    }
    wrt.flush()?;
    Ok(())
}

pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ExportedRow>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.iter().ne(HEADERS.iter().copied()) {
        return Err(LoanError::InvalidConfiguration {
            message: format!(
                "unexpected csv header: {}",
                headers.iter().collect::<Vec<_>>().join(",")
            ),
        });
    }

    let mut rows = Vec::new();
    for record in rdr.deserialize::<CsvRow>() {
        let row = record?;
        rows.push(ExportedRow {
            disbursed: parse_cell(&row.disbursed)?,
            repaid: parse_cell(&row.repaid)?,
            balance: parse_cell(&row.balance)?,
            elapsed_days: row.elapsed_days,
            rate: Rate::from_percentage(parse_decimal(&row.rate_percent)?),
            interest: parse_cell(&row.interest)?,
            period: row.period,
        });
    }
    Ok(rows)
}

fn money_cell(amount: Money) -> String {
    let mut value = amount.round_cents().as_decimal();
    value.rescale(2);
    value.to_string()
}

fn rate_cell(rate: Rate) -> String {
    let mut value = rate.percentage_dp(3);
    value.rescale(3);
    value.to_string()
}

fn parse_decimal(cell: &str) -> Result<Decimal> {
    Decimal::from_str(cell).map_err(|_| LoanError::InvalidAmount {
        input: cell.to_string(),
    })
}

fn parse_cell(cell: &str) -> Result<Money> {
    parse_decimal(cell).map(Money::from_decimal)
}

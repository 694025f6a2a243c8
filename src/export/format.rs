//! Display formatting for reports and summaries.
//!
//! Money renders with two decimals, a comma decimal separator, space
//! grouping and a trailing currency (`1 084,93 €`). Dates render as
//! `DD/MM/YYYY`.

use chrono::NaiveDate;

use crate::cashflow::LoanSummary;
use crate::decimal::{Money, Rate};
use crate::interest::AccrualReport;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// human-readable label of an inclusive date range
pub fn period_label(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} to {}", format_date(start), format_date(end))
}

pub fn format_money(amount: Money, currency: &str) -> String {
    let rounded = amount.round_cents();
    let mut magnitude = rounded.abs().as_decimal();
    magnitude.rescale(2);

    let text = magnitude.to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_negative() { "-" } else { "" };

    let formatted = format!("{sign}{},{cents}", group_thousands(whole));
    if currency.is_empty() {
        formatted
    } else {
        format!("{formatted} {currency}")
    }
}

/// percentage with three decimals, e.g. `2,000 %`
pub fn format_rate(rate: Rate) -> String {
    let mut percentage = rate.percentage_dp(3);
    percentage.rescale(3);
    format!("{} %", percentage.to_string().replace('.', ","))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped
}

/// aligned text table of every period plus the total interest
pub fn render_table(report: &AccrualReport, currency: &str) -> String {
    let headers = ["Period", "Disbursed", "Repaid", "Balance", "Days", "Rate", "Interest"];
    let rows: Vec<[String; 7]> = report
        .results()
        .iter()
        .map(|r| {
            [
                r.label.clone(),
                format_money(r.disbursed, currency),
                format_money(r.repaid, currency),
                format_money(r.closing_balance, currency),
                r.elapsed_days.to_string(),
                format_rate(r.rate),
                format_money(r.interest, currency),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&format!(
        "Total interest: {}\n",
        format_money(report.total_interest, currency)
    ));
    out
}

fn push_row(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            let pad = " ".repeat(width - cell.chars().count());
            if i == 0 {
                format!("{cell}{pad}")
            } else {
                format!("{pad}{cell}")
            }
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

/// the loan overview shown above the schedule
pub fn format_summary(summary: &LoanSummary, currency: &str) -> String {
    let partner = summary.partner_name.as_deref().unwrap_or("not provided");
    format!(
        "Partner: {partner}\nTotal disbursed: {}\nRepaid: {}\nRemaining: {}\n",
        format_money(summary.total_disbursed, currency),
        format_money(summary.total_repaid, currency),
        format_money(summary.remaining, currency),
    )
}

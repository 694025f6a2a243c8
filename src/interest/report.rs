use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::export;
use crate::interest::DayCountConvention;

/// accrual outcome for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualResult {
    pub sequence_number: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
    /// period-local sum of disbursements
    pub disbursed: Money,
    /// period-local sum of repayments
    pub repaid: Money,
    pub opening_balance: Money,
    /// carried into the next period
    pub closing_balance: Money,
    pub elapsed_days: i64,
    pub rate: Rate,
    pub interest: Money,
}

/// ordered per-period results with their totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccrualReport {
    pub convention: DayCountConvention,
    pub results: Vec<AccrualResult>,
    pub total_interest: Money,
    pub total_disbursed: Money,
    pub total_repaid: Money,
    pub final_balance: Money,
}

impl AccrualReport {
    pub fn new(convention: DayCountConvention, results: Vec<AccrualResult>) -> Self {
        let total_interest: Money = results.iter().map(|r| r.interest).sum();
        let total_disbursed: Money = results.iter().map(|r| r.disbursed).sum();
        let total_repaid: Money = results.iter().map(|r| r.repaid).sum();
        let final_balance = results
            .last()
            .map(|r| r.closing_balance)
            .unwrap_or(Money::ZERO);

        Self {
            convention,
            results,
            total_interest,
            total_disbursed,
            total_repaid,
            final_balance,
        }
    }

    pub fn results(&self) -> &[AccrualResult] {
        &self.results
    }

    pub fn get(&self, sequence_number: u32) -> Option<&AccrualResult> {
        self.results
            .iter()
            .find(|r| r.sequence_number == sequence_number)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// write comma-separated rows in the stable export order
    pub fn to_csv<W: Write>(&self, writer: W) -> Result<()> {
        export::csv::write_report(writer, self)
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.to_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// plain text table for terminals and logs
    pub fn render_table(&self, currency: &str) -> String {
        export::format::render_table(self, currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashflow::CashFlowEvent;
    use crate::interest::AccrualEngine;
    use crate::schedule::PeriodGenerator;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_report() -> AccrualReport {
        let periods = PeriodGenerator::semi_annual(Rate::from_percentage(2))
            .generate(date(2024, 1, 15), date(2024, 7, 31), 3)
            .unwrap();
        let events = vec![
            CashFlowEvent::disbursement(date(2024, 1, 15), Money::from_major(100_000)).unwrap(),
            CashFlowEvent::repayment(date(2024, 5, 1), Money::from_major(40_000)).unwrap(),
            CashFlowEvent::repayment(date(2024, 10, 1), Money::from_major(60_000)).unwrap(),
        ];
        AccrualEngine::default().report(&events, &periods)
    }

    #[test]
    fn test_totals() {
        let report = sample_report();
        let expected: Money = report.results().iter().map(|r| r.interest).sum();

        assert_eq!(report.len(), 3);
        assert_eq!(report.total_interest, expected);
        assert_eq!(report.total_disbursed, Money::from_major(100_000));
        assert_eq!(report.total_repaid, Money::from_major(100_000));
        assert!(report.final_balance.is_zero());
        assert!(report.get(3).unwrap().interest.is_zero());
    }

    #[test]
    fn test_empty_report() {
        let report = AccrualReport::new(DayCountConvention::Actual365, Vec::new());
        assert!(report.is_empty());
        assert!(report.final_balance.is_zero());
        assert!(report.total_interest.is_zero());
    }

    #[test]
    fn test_json_rendering() {
        let json = sample_report().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["convention"], "Actual365");
        assert_eq!(value["results"].as_array().unwrap().len(), 3);
        assert_eq!(value["results"][0]["label"], "15/01/2024 to 31/07/2024");
        assert_eq!(value["results"][0]["elapsed_days"], 198);
    }
}

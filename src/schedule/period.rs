use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::decimal::Rate;
use crate::errors::{LoanError, Result};
use crate::export::format::period_label;
use crate::schedule::PeriodGenerator;

/// a date range carrying one annualized simple rate
///
/// Boundaries are fixed at construction; the rate is the only mutable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    sequence_number: u32,
    start: NaiveDate,
    end: NaiveDate,
    rate: Rate,
}

impl Period {
    pub fn new(sequence_number: u32, start: NaiveDate, end: NaiveDate, rate: Rate) -> Result<Self> {
        if start > end {
            return Err(LoanError::InvalidRange { start, end });
        }
        validate_rate(rate)?;

        Ok(Self {
            sequence_number,
            start,
            end,
            rate,
        })
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// replace the rate, returning the previous one
    pub fn set_rate(&mut self, rate: Rate) -> Result<Rate> {
        validate_rate(rate)?;
        Ok(std::mem::replace(&mut self.rate, rate))
    }

    /// inclusive on both ends
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn elapsed_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn label(&self) -> String {
        period_label(self.start, self.end)
    }
}

fn validate_rate(rate: Rate) -> Result<()> {
    if !rate.is_valid() {
        return Err(LoanError::InvalidInterestRate { rate });
    }
    Ok(())
}

/// caller-owned, ordered collection of periods
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSchedule {
    generator: PeriodGenerator,
    periods: Vec<Period>,
}

impl PeriodSchedule {
    /// generate a fresh schedule of `count` periods
    pub fn generate(
        generator: PeriodGenerator,
        start: NaiveDate,
        first_end: NaiveDate,
        count: usize,
    ) -> Result<Self> {
        let periods = generator.generate(start, first_end, count)?;
        Ok(Self { generator, periods })
    }

    /// wrap hand-built periods; gaps and overlaps are allowed
    pub fn from_periods(generator: PeriodGenerator, periods: Vec<Period>) -> Self {
        Self { generator, periods }
    }

    pub fn generator(&self) -> &PeriodGenerator {
        &self.generator
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn get(&self, sequence_number: u32) -> Option<&Period> {
        self.periods
            .iter()
            .find(|p| p.sequence_number == sequence_number)
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// copy of the current periods for a single accrual run
    pub fn snapshot(&self) -> Vec<Period> {
        self.periods.clone()
    }

    /// append `additional` periods using the schedule's cadence
    pub fn extend(&mut self, additional: usize) -> Result<&[Period]> {
        let before = self.periods.len();
        self.generator.extend(&mut self.periods, additional)?;

        info!(
            added = self.periods.len() - before,
            total = self.periods.len(),
            "extended period schedule"
        );
        Ok(&self.periods[before..])
    }

    /// set the rate of one period, returning the previous rate
    pub fn set_rate(&mut self, sequence_number: u32, rate: Rate) -> Result<Rate> {
        let period = self
            .periods
            .iter_mut()
            .find(|p| p.sequence_number == sequence_number)
            .ok_or(LoanError::PeriodNotFound { sequence_number })?;

        let previous = period.set_rate(rate)?;
        info!(sequence_number, %previous, %rate, "period rate changed");
        Ok(previous)
    }

    /// set the same rate on every period, including ones appended later
    pub fn set_all_rates(&mut self, rate: Rate) -> Result<()> {
        validate_rate(rate)?;
        for period in &mut self.periods {
            period.rate = rate;
        }
        self.generator.default_rate = rate;
        Ok(())
    }
}

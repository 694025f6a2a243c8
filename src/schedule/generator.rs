use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Rate;
use crate::errors::{LoanError, Result};
use crate::schedule::Period;
use crate::types::Cadence;

/// produces contiguous calendar periods from an anchor and a cadence rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodGenerator {
    pub cadence: Cadence,
    pub default_rate: Rate,
}

impl PeriodGenerator {
    pub fn new(cadence: Cadence, default_rate: Rate) -> Self {
        Self {
            cadence,
            default_rate,
        }
    }

    /// semi-annual month-end periods
    pub fn semi_annual(default_rate: Rate) -> Self {
        Self::new(Cadence::SEMI_ANNUAL, default_rate)
    }

    /// generate `count` periods, the first spanning `[start, first_end]`
    pub fn generate(
        &self,
        start: NaiveDate,
        first_end: NaiveDate,
        count: usize,
    ) -> Result<Vec<Period>> {
        if start > first_end {
            return Err(LoanError::InvalidRange {
                start,
                end: first_end,
            });
        }

        let mut periods = Vec::with_capacity(count);
        if count == 0 {
            return Ok(periods);
        }

        periods.push(Period::new(1, start, first_end, self.default_rate)?);
        self.extend(&mut periods, count - 1)?;

        debug!(count, %start, %first_end, "generated periods");
        Ok(periods)
    }

    /// append `additional` periods after the last one
    ///
    /// The appended periods are identical to the ones a fresh `generate` of
    /// the combined length would produce. An empty sequence has no anchor and
    /// is left untouched.
    pub fn extend(&self, periods: &mut Vec<Period>, additional: usize) -> Result<()> {
        let Some(last) = periods.last() else {
            debug!(additional, "no anchor period, nothing to extend");
            return Ok(());
        };

        let mut sequence_number = last.sequence_number();
        let mut previous_end = last.end();
        periods.reserve(additional);

        for _ in 0..additional {
            let start = previous_end
                .succ_opt()
                .ok_or_else(|| out_of_range(previous_end))?;
            let end = self.period_end(start)?;
            sequence_number += 1;

            periods.push(Period::new(sequence_number, start, end, self.default_rate)?);
            previous_end = end;
        }

        Ok(())
    }

    /// end date of a period starting on `start` under this cadence
    pub fn period_end(&self, start: NaiveDate) -> Result<NaiveDate> {
        let end = match self.cadence {
            Cadence::MonthEnd { months } => month_end_after(start, months),
            Cadence::FixedDays { days } => start.checked_add_signed(Duration::days(days as i64)),
        };
        end.ok_or_else(|| out_of_range(start))
    }

    /// default first-period end for a loan signed on `start`
    pub fn first_period_end_for(&self, start: NaiveDate) -> Result<NaiveDate> {
        self.period_end(start)
    }
}

/// advance `date` by `months` and snap to the last day of the resulting month
pub fn month_end_after(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let months_since_epoch = date.year() as i64 * 12 + date.month0() as i64 + months as i64;
    let year = i32::try_from(months_since_epoch.div_euclid(12)).ok()?;
    let month = months_since_epoch.rem_euclid(12) as u32 + 1;
    last_day_of_month(year, month)
}

/// last calendar day of `month` in `year`
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn out_of_range(date: NaiveDate) -> LoanError {
    LoanError::InvalidConfiguration {
        message: format!("period boundary after {date} is outside the supported calendar"),
    }
}

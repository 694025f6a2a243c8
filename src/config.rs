use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{LoanError, Result};
use crate::interest::DayCountConvention;
use crate::schedule::PeriodGenerator;
use crate::types::Cadence;

pub const DEFAULT_RATE_PERCENT: u32 = 2;
pub const DEFAULT_DURATION_YEARS: u32 = 5;
pub const DEFAULT_CURRENCY: &str = "€";
pub const PERIODS_PER_YEAR: u32 = 2;

/// simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub partner_name: Option<String>,
    pub signing_date: NaiveDate,
    pub first_period_end: NaiveDate,
    pub period_count: usize,
    pub default_rate: Rate,
    #[serde(default)]
    pub day_count_convention: DayCountConvention,
    #[serde(default)]
    pub cadence: Cadence,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl SimulationConfig {
    /// semi-annual schedule of two periods per year of `duration_years`
    pub fn semi_annual(
        signing_date: NaiveDate,
        default_rate: Rate,
        duration_years: u32,
    ) -> Result<Self> {
        let generator = PeriodGenerator::semi_annual(default_rate);
        let first_period_end = generator.first_period_end_for(signing_date)?;
        let period_count = period_count_for_years(duration_years)?;

        let config = Self {
            partner_name: None,
            signing_date,
            first_period_end,
            period_count,
            default_rate,
            day_count_convention: DayCountConvention::Actual365,
            cadence: Cadence::SEMI_ANNUAL,
            currency: default_currency(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.signing_date > self.first_period_end {
            return Err(LoanError::InvalidRange {
                start: self.signing_date,
                end: self.first_period_end,
            });
        }

        if !self.default_rate.is_valid() {
            return Err(LoanError::InvalidInterestRate {
                rate: self.default_rate,
            });
        }

        if self.period_count == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "period count must be at least 1".to_string(),
            });
        }

        if let Cadence::FixedDays { days: 0 } = self.cadence {
            return Err(LoanError::InvalidConfiguration {
                message: "fixed-day cadence needs a positive day count".to_string(),
            });
        }

        Ok(())
    }

    pub fn generator(&self) -> PeriodGenerator {
        PeriodGenerator::new(self.cadence, self.default_rate)
    }

    /// parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// number of periods for a term of `duration_years`
pub fn period_count_for_years(duration_years: u32) -> Result<usize> {
    duration_years
        .checked_mul(PERIODS_PER_YEAR)
        .and_then(|count| usize::try_from(count).ok())
        .ok_or_else(|| LoanError::InvalidConfiguration {
            message: format!("a {duration_years} year term is out of range"),
        })
}

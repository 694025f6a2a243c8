pub mod accrual;
pub mod report;

pub use accrual::{days_between, events_in_period, AccrualEngine, DayCountConvention};
pub use report::{AccrualReport, AccrualResult};

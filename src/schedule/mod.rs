pub mod generator;
pub mod period;

pub use generator::{last_day_of_month, month_end_after, PeriodGenerator};
pub use period::{Period, PeriodSchedule};

pub mod cashflow;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod export;
pub mod interest;
pub mod schedule;
pub mod simulation;
pub mod types;

// re-export key types
pub use cashflow::{
    parse_amount, parse_date, parse_kind, CashFlowEvent, CashFlowInput, CashFlowLedger,
    LoanSummary,
};
pub use config::SimulationConfig;
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use export::{format_date, format_money, format_rate, read_rows, ExportedRow};
pub use interest::{AccrualEngine, AccrualReport, AccrualResult, DayCountConvention};
pub use schedule::{Period, PeriodGenerator, PeriodSchedule};
pub use simulation::{Simulation, SimulationBuilder};
pub use types::{Cadence, CashFlowId, CashFlowKind};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;

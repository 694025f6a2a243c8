use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a recorded cash flow
pub type CashFlowId = Uuid;

/// direction of a cash flow relative to the outstanding balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashFlowKind {
    /// money advanced to the borrower, increases the balance
    Disbursement,
    /// money paid back, decreases the balance
    Repayment,
}

impl CashFlowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashFlowKind::Disbursement => "Disbursement",
            CashFlowKind::Repayment => "Repayment",
        }
    }
}

impl fmt::Display for CashFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// rule producing the end date of each period after the first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    /// advance the start month by `months`, then snap to that month's last day
    MonthEnd { months: u32 },
    /// end `days` calendar days after the start
    FixedDays { days: u32 },
}

impl Cadence {
    /// semi-annual periods ending on month ends
    pub const SEMI_ANNUAL: Cadence = Cadence::MonthEnd { months: 6 };
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence::SEMI_ANNUAL
    }
}

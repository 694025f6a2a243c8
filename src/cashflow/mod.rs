pub mod ingest;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::types::{CashFlowId, CashFlowKind};

pub use ingest::{parse_amount, parse_date, parse_kind, CashFlowInput};

/// a dated disbursement or repayment; immutable once recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlowEvent {
    id: CashFlowId,
    date: NaiveDate,
    kind: CashFlowKind,
    amount: Money,
}

impl CashFlowEvent {
    pub fn new(date: NaiveDate, kind: CashFlowKind, amount: Money) -> Result<Self> {
        if amount.is_negative() {
            return Err(LoanError::NegativeAmount { amount });
        }
        if amount > Money::MAX_CASH_FLOW {
            return Err(LoanError::InvalidAmount {
                input: amount.to_string(),
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            date,
            kind,
            amount,
        })
    }

    pub fn disbursement(date: NaiveDate, amount: Money) -> Result<Self> {
        Self::new(date, CashFlowKind::Disbursement, amount)
    }

    pub fn repayment(date: NaiveDate, amount: Money) -> Result<Self> {
        Self::new(date, CashFlowKind::Repayment, amount)
    }

    pub fn id(&self) -> CashFlowId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> CashFlowKind {
        self.kind
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    /// effect on the outstanding balance
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            CashFlowKind::Disbursement => self.amount,
            CashFlowKind::Repayment => -self.amount,
        }
    }
}

/// totals over every recorded cash flow, regardless of period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanSummary {
    pub partner_name: Option<String>,
    pub total_disbursed: Money,
    pub total_repaid: Money,
    pub remaining: Money,
    pub cash_flow_count: usize,
}

/// caller-owned cash flows in insertion order
#[derive(Debug, Clone, Default, Serialize)]
pub struct CashFlowLedger {
    events: Vec<CashFlowEvent>,
}

impl CashFlowLedger {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn record(&mut self, event: CashFlowEvent) -> CashFlowId {
        let id = event.id;
        info!(
            %id,
            date = %event.date,
            kind = %event.kind,
            amount = %event.amount,
            "cash flow recorded"
        );
        self.events.push(event);
        id
    }

    /// parse raw input and record it; nothing is stored on failure
    pub fn record_input(&mut self, input: &CashFlowInput) -> Result<CashFlowId> {
        let event = input.try_into_event()?;
        Ok(self.record(event))
    }

    pub fn remove_at(&mut self, index: usize) -> Result<CashFlowEvent> {
        if index >= self.events.len() {
            return Err(LoanError::IndexOutOfRange {
                index,
                len: self.events.len(),
            });
        }

        let removed = self.events.remove(index);
        info!(id = %removed.id, index, "cash flow removed");
        Ok(removed)
    }

    pub fn remove(&mut self, id: CashFlowId) -> Result<CashFlowEvent> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or(LoanError::CashFlowNotFound { id })?;
        self.remove_at(index)
    }

    pub fn get(&self, id: CashFlowId) -> Option<&CashFlowEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn events(&self) -> &[CashFlowEvent] {
        &self.events
    }

    /// copy of the current events for a single accrual run
    pub fn snapshot(&self) -> Vec<CashFlowEvent> {
        self.events.clone()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn total(&self, kind: CashFlowKind) -> Money {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.amount)
            .sum()
    }

    pub fn summary(&self, partner_name: Option<&str>) -> LoanSummary {
        let total_disbursed = self.total(CashFlowKind::Disbursement);
        let total_repaid = self.total(CashFlowKind::Repayment);

        LoanSummary {
            partner_name: partner_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            total_disbursed,
            total_repaid,
            remaining: total_disbursed - total_repaid,
            cash_flow_count: self.events.len(),
        }
    }
}
